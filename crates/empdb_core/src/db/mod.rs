//! SQLite storage bootstrap and schema migration entry points.
//!
//! # Responsibility
//! - Open and configure SQLite connections for empdb.
//! - Apply the employee schema migrations in deterministic order.
//! - Classify driver failures into the few errors callers anticipate.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - Only "table already exists" failures are reclassified; every other
//!   driver failure is surfaced unchanged as `DbError::Sqlite`.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_configured, open_db, open_db_in_memory};

static DUPLICATE_TABLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^table\s+"?([^"\s]+)"?\s+already exists$"#).expect("valid duplicate table regex")
});

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// `CREATE TABLE` without create-if-absent semantics hit an existing table.
    DuplicateTable {
        table: String,
    },
    UnsupportedEngine(String),
}

impl DbError {
    /// Converts a driver error, recognizing duplicate-table failures.
    pub fn from_sqlite(err: rusqlite::Error) -> Self {
        let table = driver_message(&err)
            .and_then(|message| DUPLICATE_TABLE_RE.captures(message.trim()))
            .map(|captures| captures[1].to_string());
        match table {
            Some(table) => Self::DuplicateTable { table },
            None => Self::Sqlite(err),
        }
    }

    pub fn is_duplicate_table(&self) -> bool {
        matches!(self, Self::DuplicateTable { .. })
    }
}

/// SQLite's own message for a failed statement.
///
/// Statements rejected while preparing (such as `CREATE TABLE` on an existing
/// table) arrive as `SqlInputError`; failures while stepping arrive as
/// `SqliteFailure`.
fn driver_message(err: &rusqlite::Error) -> Option<&str> {
    match err {
        rusqlite::Error::SqlInputError { msg, .. } => Some(msg.as_str()),
        rusqlite::Error::SqliteFailure(_, Some(message)) => Some(message.as_str()),
        _ => None,
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::DuplicateTable { table } => write!(
                f,
                "table `{table}` already exists; drop it before re-running create"
            ),
            Self::UnsupportedEngine(engine) => {
                write!(f, "unsupported database engine `{engine}`; expected sqlite")
            }
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
            Self::DuplicateTable { .. } => None,
            Self::UnsupportedEngine(_) => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::from_sqlite(value)
    }
}
