//! Opening employee databases.
//!
//! Every connection handed out here enforces foreign keys, waits on a busy
//! database for up to five seconds and is migrated to the latest schema.

use super::migrations::apply_migrations;
use super::{DbError, DbResult};
use crate::config::{DatabaseConfig, SQLITE_ENGINE};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const IN_MEMORY_DATABASE: &str = ":memory:";
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens (creating if needed) the database file at `path`.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let path = path.as_ref();
    bootstrap("file", || Connection::open(path))
}

/// Opens a private in-memory database with the schema applied.
pub fn open_db_in_memory() -> DbResult<Connection> {
    bootstrap("memory", Connection::open_in_memory)
}

/// Opens the database described by `config`.
///
/// `database = ":memory:"` selects an in-memory database; anything else is a
/// file path. Engines other than `sqlite` are rejected before any I/O.
pub fn open_configured(config: &DatabaseConfig) -> DbResult<Connection> {
    if !config.engine.eq_ignore_ascii_case(SQLITE_ENGINE) {
        error!(
            "event=db_open module=db status=error mode=config error_code=unsupported_engine url={}",
            config.redacted_url()
        );
        return Err(DbError::UnsupportedEngine(config.engine.clone()));
    }

    info!(
        "event=db_open module=db status=resolve mode=config url={}",
        config.redacted_url()
    );
    if config.database == IN_MEMORY_DATABASE {
        open_db_in_memory()
    } else {
        open_db(&config.database)
    }
}

fn bootstrap(
    mode: &'static str,
    connect: impl FnOnce() -> rusqlite::Result<Connection>,
) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode={mode}");

    let result = connect().map_err(DbError::from).and_then(|mut conn| {
        conn.pragma_update(None, "foreign_keys", true)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        apply_migrations(&mut conn)?;
        Ok(conn)
    });

    let elapsed = started_at.elapsed().as_millis();
    match &result {
        Ok(_) => info!("event=db_open module=db status=ok mode={mode} duration_ms={elapsed}"),
        Err(err) => error!(
            "event=db_open module=db status=error mode={mode} duration_ms={elapsed} error={err}"
        ),
    }
    result
}
