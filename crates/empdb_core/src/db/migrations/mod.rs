//! Versioned schema steps for the employee database.
//!
//! # Responsibility
//! - List the schema steps in version order.
//! - Bring a connection from its recorded version to the newest one.
//!
//! # Invariants
//! - Step versions start at 1 and increase by one.
//! - The recorded version lives in `PRAGMA user_version`.
//! - All pending steps commit together or not at all.
//! - The `films` demo table is never created here.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;
use std::time::Instant;

/// DDL for the six employee-dataset tables and their foreign keys.
pub const EMPLOYEE_SCHEMA_SQL: &str = include_str!("0001_employees_schema.sql");

/// Tables declared by [`EMPLOYEE_SCHEMA_SQL`], in creation order.
pub const EMPLOYEE_TABLES: [&str; 6] = [
    "employees",
    "titles",
    "salaries",
    "departments",
    "dept_emp",
    "dept_manager",
];

struct SchemaStep {
    version: u32,
    name: &'static str,
    ddl: &'static str,
}

const STEPS: &[SchemaStep] = &[SchemaStep {
    version: 1,
    name: "employees_schema",
    ddl: EMPLOYEE_SCHEMA_SQL,
}];

/// Newest schema version this build can produce.
pub fn latest_version() -> u32 {
    STEPS.iter().map(|step| step.version).max().unwrap_or(0)
}

/// Reads the version recorded in `PRAGMA user_version`.
pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get::<_, u32>(0))?)
}

/// Applies every step newer than the recorded version.
///
/// A database recorded at a version newer than [`latest_version`] is left
/// untouched and reported as `DbError::UnsupportedSchemaVersion`.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let recorded = current_user_version(conn)?;
    let target = latest_version();
    if recorded > target {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: recorded,
            latest_supported: target,
        });
    }

    let pending: Vec<&SchemaStep> = STEPS.iter().filter(|step| step.version > recorded).collect();
    if pending.is_empty() {
        return Ok(());
    }

    let started_at = Instant::now();
    let tx = conn.transaction()?;
    for step in &pending {
        tx.execute_batch(step.ddl)?;
        tx.pragma_update(None, "user_version", step.version)?;
        info!(
            "event=migration_step module=db status=ok version={} name={}",
            step.version, step.name
        );
    }
    tx.commit()?;

    info!(
        "event=migrations_apply module=db status=ok from_version={recorded} to_version={target} steps={} duration_ms={}",
        pending.len(),
        started_at.elapsed().as_millis()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{apply_migrations, current_user_version, latest_version, STEPS};
    use rusqlite::Connection;

    #[test]
    fn step_versions_are_contiguous() {
        for (index, step) in STEPS.iter().enumerate() {
            assert_eq!(step.version as usize, index + 1, "{}", step.name);
        }
    }

    #[test]
    fn apply_records_latest_version_once() {
        let mut conn = Connection::open_in_memory().unwrap();
        apply_migrations(&mut conn).unwrap();
        assert_eq!(current_user_version(&conn).unwrap(), latest_version());

        apply_migrations(&mut conn).unwrap();
        assert_eq!(current_user_version(&conn).unwrap(), latest_version());
    }
}
