//! Repository layer for the employee dataset.
//!
//! # Responsibility
//! - Define the seeding and lookup contract over the six employee tables.
//! - Isolate SQLite statement details from callers.
//! - Ship a small sample dataset for demos.
//!
//! # Invariants
//! - Repository writes enforce `validate()` before persistence.
//! - Constraint failures from SQLite propagate unchanged as `DbError::Sqlite`.

pub mod employee_repo;
pub mod sample;
