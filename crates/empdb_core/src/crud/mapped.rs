//! Film CRUD through the ORM layer.
//!
//! Each operation is one scoped unit of work: open a `Session`, work on
//! mapped `Film` objects, commit. The table comes from the mapping with
//! create-if-absent semantics, so re-running `create_table` is harmless.

use super::orm::{create_table_if_absent, ColumnSpec, Entity, Session};
use super::{timed_step, Approach, CrudResult, FilmStore};
use crate::model::film::{Film, FILMS_TABLE};
use rusqlite::types::Value;
use rusqlite::{Connection, Row};

const FILM_COLUMNS: [ColumnSpec; 3] = [
    ColumnSpec {
        name: "title",
        sql_type: "text",
        nullable: true,
    },
    ColumnSpec {
        name: "director",
        sql_type: "text",
        nullable: true,
    },
    ColumnSpec {
        name: "year",
        sql_type: "text",
        nullable: true,
    },
];

impl Entity for Film {
    const TABLE: &'static str = FILMS_TABLE;

    fn columns() -> &'static [ColumnSpec] {
        &FILM_COLUMNS
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.title.clone()),
            Value::Text(self.director.clone()),
            Value::Text(self.year.clone()),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            title: row.get(0)?,
            director: row.get(1)?,
            year: row.get(2)?,
        })
    }
}

/// Works on mapped objects; SQL is derived from the `Film` mapping.
pub struct OrmFilmStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> OrmFilmStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Opens a unit of work over `films`.
    pub fn session(&self) -> Session<'conn, Film> {
        Session::new(self.conn)
    }
}

impl FilmStore for OrmFilmStore<'_> {
    fn approach(&self) -> Approach {
        Approach::Orm
    }

    fn create_table(&self) -> CrudResult<()> {
        timed_step(Approach::Orm, "create", || {
            create_table_if_absent::<Film>(self.conn)?;
            Ok(())
        })
    }

    fn insert(&self, film: &Film) -> CrudResult<()> {
        timed_step(Approach::Orm, "insert", || {
            film.validate()?;
            let mut session = self.session();
            session.add(film.clone());
            session.commit()?;
            Ok(())
        })
    }

    fn read_all(&self) -> CrudResult<Vec<Film>> {
        timed_step(Approach::Orm, "read", || {
            let mut session = self.session();
            let keys = session.all()?;
            let films = keys
                .into_iter()
                .filter_map(|key| session.get(key).cloned())
                .collect();
            session.commit()?;
            Ok(films)
        })
    }

    /// Counts only objects whose title actually changed.
    fn update_title_by_year(&self, title: &str, year: &str) -> CrudResult<usize> {
        timed_step(Approach::Orm, "update", || {
            let mut session = self.session();
            for key in session.filter_by("year", year.to_string())? {
                if let Some(film) = session.get_mut(key) {
                    film.title = title.to_string();
                }
            }
            Ok(session.commit()?.updated)
        })
    }

    fn delete_by_year(&self, year: &str) -> CrudResult<usize> {
        timed_step(Approach::Orm, "delete", || {
            let mut session = self.session();
            for key in session.filter_by("year", year.to_string())? {
                session.delete(key)?;
            }
            Ok(session.commit()?.deleted)
        })
    }
}
