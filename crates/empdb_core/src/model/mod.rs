//! Domain records for the employee dataset and the film CRUD walkthrough.
//!
//! # Responsibility
//! - Define the row shapes persisted by `repo` and read back by `report`.
//! - Define the `Film` entity shared by all three CRUD approaches.
//!
//! # Invariants
//! - Write paths call `validate()` before any SQL mutation.
//! - Period ordering (`from_date <= to_date`) is an application rule only;
//!   the schema does not declare it.

pub mod employee;
pub mod film;
pub mod validation;
