//! Minimal object-relational mapping layer.
//!
//! # Responsibility
//! - Describe how a Rust type maps to one table (`Entity`).
//! - Generate create-if-absent DDL from that mapping.
//! - Track loaded objects and write their changes back (`Session`).
//!
//! # Invariants
//! - Row identity is the SQLite `rowid`; mapped tables need no declared key.
//! - `Entity::to_values` and `Entity::from_row` use `Entity::columns` order.

mod session;

pub use session::{EntityKey, FlushStats, Session};

use crate::db::DbError;
use log::info;
use rusqlite::types::Value;
use rusqlite::{Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type OrmResult<T> = Result<T, OrmError>;

#[derive(Debug)]
pub enum OrmError {
    Db(DbError),
    UnknownColumn {
        table: &'static str,
        column: String,
    },
    /// The key is not tracked by this session (never loaded, or deleted).
    UnknownEntity(EntityKey),
}

impl Display for OrmError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::UnknownColumn { table, column } => {
                write!(f, "table `{table}` has no mapped column `{column}`")
            }
            Self::UnknownEntity(key) => write!(f, "entity {key} is not tracked by this session"),
        }
    }
}

impl Error for OrmError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for OrmError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for OrmError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::from_sqlite(value))
    }
}

/// One mapped column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: &'static str,
    /// SQLite type name used in generated DDL.
    pub sql_type: &'static str,
    pub nullable: bool,
}

/// A Rust type persisted as one row of `TABLE`.
pub trait Entity: Clone {
    const TABLE: &'static str;

    fn columns() -> &'static [ColumnSpec];

    /// Column values in `columns()` order.
    fn to_values(&self) -> Vec<Value>;

    /// Decodes columns `0..columns().len()` of `row`.
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

/// Renders `CREATE TABLE IF NOT EXISTS` for `E`.
pub fn create_table_sql<E: Entity>() -> String {
    let columns = E::columns()
        .iter()
        .map(|column| {
            let mut definition = format!("{} {}", quote_ident(column.name), column.sql_type);
            if !column.nullable {
                definition.push_str(" NOT NULL");
            }
            definition
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "CREATE TABLE IF NOT EXISTS {} ({columns});",
        quote_ident(E::TABLE)
    )
}

/// Creates the table mapped by `E` unless it already exists.
pub fn create_table_if_absent<E: Entity>(conn: &Connection) -> OrmResult<()> {
    conn.execute_batch(&create_table_sql::<E>())?;
    info!(
        "event=orm_create_all module=orm status=ok table={}",
        E::TABLE
    );
    Ok(())
}

pub(crate) fn column_position<E: Entity>(name: &str) -> OrmResult<usize> {
    E::columns()
        .iter()
        .position(|column| column.name == name)
        .ok_or_else(|| OrmError::UnknownColumn {
            table: E::TABLE,
            column: name.to_string(),
        })
}

pub(crate) fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
