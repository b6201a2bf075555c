//! Film CRUD with statements composed by `sea-query`.
//!
//! Statements are rendered with `SqliteQueryBuilder` and their values bound
//! through `sea-query-rusqlite`, so no SQL text is written by hand here.

use super::{timed_step, Approach, CrudError, CrudResult, FilmStore};
use crate::model::film::Film;
use rusqlite::Connection;
use sea_query::{
    Alias, ColumnDef, Expr, Iden, Order, Query, SchemaStatementBuilder, SimpleExpr,
    SqliteQueryBuilder, Table,
};
use sea_query_rusqlite::RusqliteBinder;

#[derive(Iden)]
enum Films {
    Table,
    Title,
    Director,
    Year,
}

/// Builds every statement from typed identifiers.
pub struct BuilderFilmStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> BuilderFilmStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl FilmStore for BuilderFilmStore<'_> {
    fn approach(&self) -> Approach {
        Approach::Builder
    }

    fn create_table(&self) -> CrudResult<()> {
        timed_step(Approach::Builder, "create", || {
            let sql = Table::create()
                .table(Films::Table)
                .col(ColumnDef::new(Films::Title).text())
                .col(ColumnDef::new(Films::Director).text())
                .col(ColumnDef::new(Films::Year).text())
                .build(SqliteQueryBuilder);
            self.conn.execute_batch(&sql)?;
            Ok(())
        })
    }

    fn insert(&self, film: &Film) -> CrudResult<()> {
        timed_step(Approach::Builder, "insert", || {
            film.validate()?;
            let (sql, values) = Query::insert()
                .into_table(Films::Table)
                .columns([Films::Title, Films::Director, Films::Year])
                .values([
                    SimpleExpr::from(film.title.as_str()),
                    SimpleExpr::from(film.director.as_str()),
                    SimpleExpr::from(film.year.as_str()),
                ])
                .map_err(|err| CrudError::Builder(err.to_string()))?
                .build_rusqlite(SqliteQueryBuilder);
            self.conn.execute(&sql, &*values.as_params())?;
            Ok(())
        })
    }

    fn read_all(&self) -> CrudResult<Vec<Film>> {
        timed_step(Approach::Builder, "read", || {
            let (sql, values) = Query::select()
                .columns([Films::Title, Films::Director, Films::Year])
                .from(Films::Table)
                .order_by(Alias::new("rowid"), Order::Asc)
                .build_rusqlite(SqliteQueryBuilder);
            let mut stmt = self.conn.prepare(&sql)?;
            let films = stmt
                .query_map(&*values.as_params(), |row| {
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
        timed_step(Approach::Builder, "update", || {
            let (sql, values) = Query::update()
                .table(Films::Table)
                .values([(Films::Title, SimpleExpr::from(title))])
                .and_where(Expr::col(Films::Year).eq(year))
                .build_rusqlite(SqliteQueryBuilder);
            Ok(self.conn.execute(&sql, &*values.as_params())?)
        })
    }

    fn delete_by_year(&self, year: &str) -> CrudResult<usize> {
        timed_step(Approach::Builder, "delete", || {
            let (sql, values) = Query::delete()
                .from_table(Films::Table)
                .and_where(Expr::col(Films::Year).eq(year))
                .build_rusqlite(SqliteQueryBuilder);
            Ok(self.conn.execute(&sql, &*values.as_params())?)
        })
    }
}
