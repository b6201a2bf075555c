//! Core library for empdb.
//!
//! Two independent pieces share an employee-data vocabulary: the employee
//! schema with its analytical reports, and a film CRUD walkthrough written
//! at three abstraction levels (raw SQL, expression builder, ORM).

pub mod config;
pub mod crud;
pub mod db;
pub mod logging;
pub mod model;
pub mod report;
pub mod repo;
pub mod service;

pub use config::{ConfigError, DatabaseConfig};
pub use crud::{
    film_store, Approach, BuilderFilmStore, CrudError, CrudResult, FilmStore, OrmFilmStore,
    RawSqlFilmStore,
};
pub use db::{open_configured, open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use model::employee::{
    Department, DeptEmployee, DeptManager, EmpNo, Employee, Gender, Salary, Title,
};
pub use model::film::Film;
pub use model::validation::ValidationError;
pub use report::{run_all, ReportSet};
pub use repo::employee_repo::{
    Dataset, EmployeeRepository, EmployeeTable, RepoError, RepoResult, SqliteEmployeeRepository,
};
pub use repo::sample::sample_dataset;
pub use service::film_walkthrough::{
    run_walkthroughs, ApproachOutcome, FilmWalkthrough, WalkthroughDatabase, WalkthroughError,
    WalkthroughReport,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
