//! Film CRUD walkthrough.
//!
//! # Responsibility
//! - Drive one `FilmStore` through create, insert, read, update, read,
//!   delete, read with the fixed demo values.
//! - Print each observed row the way the walkthrough narrates it.
//! - Run several approaches back to back, on fresh or shared databases.
//!
//! # Invariants
//! - Steps run strictly in order; the first failure stops the walkthrough.
//! - The service never retries or recovers from a duplicate-table error.
//! - In a multi-approach run a duplicate-table failure is recorded and the
//!   next approach still runs; any other failure ends the run.

use crate::crud::{film_store, Approach, CrudError, FilmStore};
use crate::db::open_db_in_memory;
use crate::model::film::Film;
use log::{info, warn};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::Write;

pub const DEMO_TITLE: &str = "1917";
pub const DEMO_DIRECTOR: &str = "Sam Mendes";
pub const DEMO_YEAR: &str = "2019";
pub const UPDATED_TITLE: &str = "Some2019Film";

#[derive(Debug)]
pub enum WalkthroughError {
    Crud(CrudError),
    /// Writing narration output failed.
    Output(std::io::Error),
}

impl WalkthroughError {
    pub fn is_duplicate_table(&self) -> bool {
        matches!(self, Self::Crud(err) if err.is_duplicate_table())
    }
}

impl Display for WalkthroughError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Crud(err) => write!(f, "{err}"),
            Self::Output(err) => write!(f, "failed to write walkthrough output: {err}"),
        }
    }
}

impl Error for WalkthroughError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Crud(err) => Some(err),
            Self::Output(err) => Some(err),
        }
    }
}

impl From<CrudError> for WalkthroughError {
    fn from(value: CrudError) -> Self {
        Self::Crud(value)
    }
}

impl From<std::io::Error> for WalkthroughError {
    fn from(value: std::io::Error) -> Self {
        Self::Output(value)
    }
}

/// Rows observed at each read of one walkthrough run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkthroughReport {
    pub approach: Approach,
    pub after_insert: Vec<Film>,
    pub after_update: Vec<Film>,
    pub after_delete: Vec<Film>,
    pub updated_rows: usize,
    pub deleted_rows: usize,
}

pub fn demo_film() -> Film {
    Film::new(DEMO_TITLE, DEMO_DIRECTOR, DEMO_YEAR)
}

/// Renders one observed row for `approach`.
///
/// Raw and builder reads print the whole row as a tuple; ORM reads print the
/// mapped object's title.
pub fn describe_row(approach: Approach, film: &Film) -> String {
    match approach {
        Approach::RawSql | Approach::Builder => format!(
            "A row is ('{}', '{}', '{}')",
            film.title, film.director, film.year
        ),
        Approach::Orm => format!("The title of a film is \"{}\"", film.title),
    }
}

pub struct FilmWalkthrough<S: FilmStore> {
    store: S,
}

impl<S: FilmStore> FilmWalkthrough<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Runs the full lifecycle, narrating every read into `out`.
    pub fn run(&self, out: &mut impl Write) -> Result<WalkthroughReport, WalkthroughError> {
        let approach = self.store.approach();

        self.store.create_table()?;
        self.store.insert(&demo_film())?;
        let after_insert = self.read_and_print(out)?;

        let updated_rows = self.store.update_title_by_year(UPDATED_TITLE, DEMO_YEAR)?;
        let after_update = self.read_and_print(out)?;

        let deleted_rows = self.store.delete_by_year(DEMO_YEAR)?;
        let after_delete = self.read_and_print(out)?;

        Ok(WalkthroughReport {
            approach,
            after_insert,
            after_update,
            after_delete,
            updated_rows,
            deleted_rows,
        })
    }

    fn read_and_print(&self, out: &mut impl Write) -> Result<Vec<Film>, WalkthroughError> {
        let films = self.store.read_all()?;
        for film in &films {
            writeln!(out, "{}", describe_row(self.store.approach(), film))?;
        }
        Ok(films)
    }
}

/// Where each approach of a multi-approach run keeps its `films` table.
#[derive(Clone, Copy)]
pub enum WalkthroughDatabase<'conn> {
    /// A new in-memory database per approach.
    FreshInMemory,
    /// One database for every approach, so later approaches see the table
    /// created by earlier ones.
    Shared(&'conn Connection),
}

#[derive(Debug)]
pub struct ApproachOutcome {
    pub approach: Approach,
    pub result: Result<WalkthroughReport, WalkthroughError>,
}

/// Runs the walkthrough for each of `approaches` in order.
///
/// Every approach is introduced by a `== <approach> ==` line and closed by a
/// row-count line. The returned outcomes end at the first failure that is not
/// a duplicate table.
pub fn run_walkthroughs(
    database: WalkthroughDatabase<'_>,
    approaches: &[Approach],
    out: &mut impl Write,
) -> Vec<ApproachOutcome> {
    let mut outcomes = Vec::with_capacity(approaches.len());
    for &approach in approaches {
        let result = run_approach(database, approach, out);
        let fatal = match &result {
            Ok(_) => {
                info!("event=crud_walkthrough module=service status=ok approach={approach}");
                false
            }
            Err(err) => {
                warn!(
                    "event=crud_walkthrough module=service status=error approach={approach} duplicate_table={} error={err}",
                    err.is_duplicate_table()
                );
                !err.is_duplicate_table()
            }
        };
        outcomes.push(ApproachOutcome { approach, result });
        if fatal {
            break;
        }
    }
    outcomes
}

fn run_approach(
    database: WalkthroughDatabase<'_>,
    approach: Approach,
    out: &mut impl Write,
) -> Result<WalkthroughReport, WalkthroughError> {
    writeln!(out, "== {approach} ==")?;
    let report = match database {
        WalkthroughDatabase::Shared(conn) => FilmWalkthrough::new(film_store(approach, conn)).run(out)?,
        WalkthroughDatabase::FreshInMemory => {
            let conn = open_db_in_memory().map_err(CrudError::from)?;
            let walkthrough = FilmWalkthrough::new(film_store(approach, &conn));
            walkthrough.run(out)?
        }
    };
    writeln!(
        out,
        "updated {} row(s), deleted {} row(s)",
        report.updated_rows, report.deleted_rows
    )?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::{demo_film, describe_row};
    use crate::crud::Approach;

    #[test]
    fn rows_are_described_per_approach() {
        let film = demo_film();
        assert_eq!(
            describe_row(Approach::RawSql, &film),
            "A row is ('1917', 'Sam Mendes', '2019')"
        );
        assert_eq!(
            describe_row(Approach::Orm, &film),
            "The title of a film is \"1917\""
        );
    }
}
