//! Film CRUD at three abstraction levels.
//!
//! # Responsibility
//! - Define the `FilmStore` contract shared by every approach.
//! - Provide the raw SQL, expression builder and ORM implementations.
//!
//! # Invariants
//! - All approaches read and write the same `films` table shape
//!   (`title`, `director`, `year`, all text).
//! - Raw and builder `create_table` use plain `CREATE TABLE` and surface
//!   `DbError::DuplicateTable` on re-run; the ORM store creates if absent.

pub mod builder;
pub mod mapped;
pub mod orm;
pub mod raw;

use crate::db::DbError;
use crate::model::film::{Film, FILMS_TABLE};
use crate::model::validation::ValidationError;
use log::{error, info};
use orm::OrmError;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub use builder::BuilderFilmStore;
pub use mapped::OrmFilmStore;
pub use raw::RawSqlFilmStore;

pub type CrudResult<T> = Result<T, CrudError>;

#[derive(Debug)]
pub enum CrudError {
    Validation(ValidationError),
    Db(DbError),
    /// The expression builder rejected a statement before it reached SQLite.
    Builder(String),
    Orm(OrmError),
}

impl CrudError {
    pub fn is_duplicate_table(&self) -> bool {
        matches!(self, Self::Db(err) if err.is_duplicate_table())
    }
}

impl Display for CrudError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Builder(message) => write!(f, "invalid built statement: {message}"),
            Self::Orm(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CrudError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Builder(_) => None,
            Self::Orm(err) => Some(err),
        }
    }
}

impl From<ValidationError> for CrudError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for CrudError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for CrudError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::from_sqlite(value))
    }
}

impl From<OrmError> for CrudError {
    fn from(value: OrmError) -> Self {
        match value {
            OrmError::Db(err) => Self::Db(err),
            other => Self::Orm(other),
        }
    }
}

/// Which abstraction level a store works at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Approach {
    RawSql,
    Builder,
    Orm,
}

impl Approach {
    pub const ALL: [Approach; 3] = [Approach::RawSql, Approach::Builder, Approach::Orm];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::RawSql => "raw",
            Self::Builder => "builder",
            Self::Orm => "orm",
        }
    }
}

impl Display for Approach {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The five-step film lifecycle every approach implements.
pub trait FilmStore {
    fn approach(&self) -> Approach;
    /// Ensures `films` exists. Semantics on an existing table differ per approach.
    fn create_table(&self) -> CrudResult<()>;
    fn insert(&self, film: &Film) -> CrudResult<()>;
    /// Returns all rows in insertion order.
    fn read_all(&self) -> CrudResult<Vec<Film>>;
    /// Sets `title` on rows whose year equals `year`; returns rows changed.
    fn update_title_by_year(&self, title: &str, year: &str) -> CrudResult<usize>;
    /// Deletes rows whose year equals `year`; returns rows removed.
    fn delete_by_year(&self, year: &str) -> CrudResult<usize>;
}

impl<S: FilmStore + ?Sized> FilmStore for Box<S> {
    fn approach(&self) -> Approach {
        (**self).approach()
    }

    fn create_table(&self) -> CrudResult<()> {
        (**self).create_table()
    }

    fn insert(&self, film: &Film) -> CrudResult<()> {
        (**self).insert(film)
    }

    fn read_all(&self) -> CrudResult<Vec<Film>> {
        (**self).read_all()
    }

    fn update_title_by_year(&self, title: &str, year: &str) -> CrudResult<usize> {
        (**self).update_title_by_year(title, year)
    }

    fn delete_by_year(&self, year: &str) -> CrudResult<usize> {
        (**self).delete_by_year(year)
    }
}

/// Builds the store for `approach` over `conn`.
pub fn film_store<'conn>(approach: Approach, conn: &'conn Connection) -> Box<dyn FilmStore + 'conn> {
    match approach {
        Approach::RawSql => Box::new(RawSqlFilmStore::new(conn)),
        Approach::Builder => Box::new(BuilderFilmStore::new(conn)),
        Approach::Orm => Box::new(OrmFilmStore::new(conn)),
    }
}

/// Drops the `films` table if present.
///
/// This is the out-of-band remedy for a duplicate-table failure; no store
/// calls it on its own.
pub fn drop_films_table(conn: &Connection) -> CrudResult<()> {
    conn.execute_batch(&format!("DROP TABLE IF EXISTS {FILMS_TABLE};"))?;
    info!("event=crud_reset module=crud status=ok table={FILMS_TABLE}");
    Ok(())
}

pub(crate) fn timed_step<T>(
    approach: Approach,
    step: &'static str,
    op: impl FnOnce() -> CrudResult<T>,
) -> CrudResult<T> {
    let started_at = Instant::now();
    let result = op();
    match &result {
        Ok(_) => info!(
            "event=crud_step module=crud status=ok approach={} step={} duration_ms={}",
            approach,
            step,
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=crud_step module=crud status=error approach={} step={} duration_ms={} error={}",
            approach,
            step,
            started_at.elapsed().as_millis(),
            err
        ),
    }
    result
}
