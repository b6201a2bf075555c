//! Use-case services.
//!
//! # Responsibility
//! - Orchestrate stores into end-to-end flows for callers.
//! - Keep the CLI decoupled from store and SQL details.

pub mod film_walkthrough;
