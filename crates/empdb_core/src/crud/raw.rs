//! Film CRUD with hand-written SQL strings.

use super::{timed_step, Approach, CrudResult, FilmStore};
use crate::model::film::Film;
use rusqlite::{params, Connection};

const CREATE_FILMS_SQL: &str = "CREATE TABLE films (title text, director text, year text);";
const INSERT_FILM_SQL: &str = "INSERT INTO films (title, director, year) VALUES (?1, ?2, ?3);";
const SELECT_FILMS_SQL: &str = "SELECT title, director, year FROM films ORDER BY rowid;";
const UPDATE_TITLE_SQL: &str = "UPDATE films SET title = ?1 WHERE year = ?2;";
const DELETE_BY_YEAR_SQL: &str = "DELETE FROM films WHERE year = ?1;";

/// Executes literal SQL statements with bound parameters.
pub struct RawSqlFilmStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> RawSqlFilmStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl FilmStore for RawSqlFilmStore<'_> {
    fn approach(&self) -> Approach {
        Approach::RawSql
    }

    fn create_table(&self) -> CrudResult<()> {
        timed_step(Approach::RawSql, "create", || {
            self.conn.execute_batch(CREATE_FILMS_SQL)?;
            Ok(())
        })
    }

    fn insert(&self, film: &Film) -> CrudResult<()> {
        timed_step(Approach::RawSql, "insert", || {
            film.validate()?;
            self.conn.execute(
                INSERT_FILM_SQL,
                params![film.title.as_str(), film.director.as_str(), film.year.as_str()],
            )?;
            Ok(())
        })
    }

    fn read_all(&self) -> CrudResult<Vec<Film>> {
        timed_step(Approach::RawSql, "read", || {
            let mut stmt = self.conn.prepare(SELECT_FILMS_SQL)?;
            let films = stmt
                .query_map([], |row| {
                    Ok(Film {
                        title: row.get(0)?,
                        director: row.get(1)?,
                        year: row.get(2)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(films)
        })
    }

    fn update_title_by_year(&self, title: &str, year: &str) -> CrudResult<usize> {
        timed_step(Approach::RawSql, "update", || {
            Ok(self.conn.execute(UPDATE_TITLE_SQL, params![title, year])?)
        })
    }

    fn delete_by_year(&self, year: &str) -> CrudResult<usize> {
        timed_step(Approach::RawSql, "delete", || {
            Ok(self.conn.execute(DELETE_BY_YEAR_SQL, [year])?)
        })
    }
}
