//! Unit-of-work session over one mapped entity type.
//!
//! # Responsibility
//! - Stage new objects and defer their `INSERT` until flush.
//! - Keep one in-memory object per loaded row (identity map).
//! - Diff tracked objects against their last-flushed snapshot and write
//!   only changed columns.
//!
//! # Invariants
//! - Reads never open a transaction; the first flush with pending changes
//!   does, and it spans everything up to `commit` or `rollback`.
//! - Queries flush staged work first, so they observe it.
//! - Reloading a tracked row never overwrites its in-memory state.
//! - Dropping a session with an open transaction rolls it back.

use super::{column_position, quote_ident, Entity, OrmError, OrmResult};
use log::{debug, info};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, Transaction};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Identity of a persisted object: its SQLite `rowid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityKey(pub i64);

impl Display for EntityKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "rowid={}", self.0)
    }
}

/// Statement counts written by one flush.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushStats {
    pub inserted: usize,
    pub updated: usize,
    pub deleted: usize,
}

impl FlushStats {
    pub fn is_empty(&self) -> bool {
        self.inserted == 0 && self.updated == 0 && self.deleted == 0
    }
}

struct Tracked<E> {
    current: E,
    snapshot: Vec<Value>,
    deleted: bool,
}

impl<E: Entity> Tracked<E> {
    fn changed_columns(&self) -> Vec<(usize, Value)> {
        self.current
            .to_values()
            .into_iter()
            .enumerate()
            .filter(|(index, value)| self.snapshot.get(*index) != Some(value))
            .collect()
    }
}

pub struct Session<'conn, E: Entity> {
    conn: &'conn Connection,
    tx: Option<Transaction<'conn>>,
    staged: Vec<E>,
    identity: BTreeMap<EntityKey, Tracked<E>>,
}

impl<'conn, E: Entity> Session<'conn, E> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self {
            conn,
            tx: None,
            staged: Vec::new(),
            identity: BTreeMap::new(),
        }
    }

    /// Stages a new object; it is inserted on the next flush.
    pub fn add(&mut self, entity: E) {
        self.staged.push(entity);
    }

    /// Loads every row of the mapped table.
    pub fn all(&mut self) -> OrmResult<Vec<EntityKey>> {
        self.load(None)
    }

    /// Loads rows whose `column` equals `value`.
    pub fn filter_by(
        &mut self,
        column: &str,
        value: impl Into<Value>,
    ) -> OrmResult<Vec<EntityKey>> {
        let position = column_position::<E>(column)?;
        self.load(Some((position, value.into())))
    }

    pub fn get(&self, key: EntityKey) -> Option<&E> {
        self.identity
            .get(&key)
            .filter(|tracked| !tracked.deleted)
            .map(|tracked| &tracked.current)
    }

    /// Mutable access; changes are written on the next flush.
    pub fn get_mut(&mut self, key: EntityKey) -> Option<&mut E> {
        self.identity
            .get_mut(&key)
            .filter(|tracked| !tracked.deleted)
            .map(|tracked| &mut tracked.current)
    }

    /// Marks a tracked object for deletion on the next flush.
    pub fn delete(&mut self, key: EntityKey) -> OrmResult<()> {
        match self.identity.get_mut(&key) {
            Some(tracked) if !tracked.deleted => {
                tracked.deleted = true;
                Ok(())
            }
            _ => Err(OrmError::UnknownEntity(key)),
        }
    }

    /// Number of inserts, updates and deletes the next flush would write.
    pub fn pending_changes(&self) -> usize {
        let tracked = self
            .identity
            .values()
            .filter(|tracked| tracked.deleted || !tracked.changed_columns().is_empty())
            .count();
        self.staged.len() + tracked
    }

    /// Writes staged inserts, dirty updates and deletions.
    pub fn flush(&mut self) -> OrmResult<FlushStats> {
        if self.pending_changes() == 0 {
            return Ok(FlushStats::default());
        }

        let started_at = Instant::now();
        self.begin()?;
        let conn = self.conn;
        let mut stats = FlushStats::default();

        for entity in std::mem::take(&mut self.staged) {
            let values = entity.to_values();
            conn.execute(&insert_sql::<E>(), params_from_iter(values.iter()))?;
            let key = EntityKey(conn.last_insert_rowid());
            self.identity.insert(
                key,
                Tracked {
                    current: entity,
                    snapshot: values,
                    deleted: false,
                },
            );
            stats.inserted += 1;
        }

        let mut removed = Vec::new();
        for (key, tracked) in self.identity.iter_mut() {
            if tracked.deleted {
                removed.push(*key);
                continue;
            }

            let changed = tracked.changed_columns();
            if changed.is_empty() {
                continue;
            }
            let assignments = changed
                .iter()
                .map(|(index, _)| format!("{} = ?", quote_ident(E::columns()[*index].name)))
                .collect::<Vec<_>>()
                .join(", ");
            let mut bind_values = changed.into_iter().map(|(_, value)| value).collect::<Vec<_>>();
            bind_values.push(Value::Integer(key.0));
            conn.execute(
                &format!(
                    "UPDATE {} SET {assignments} WHERE rowid = ?;",
                    quote_ident(E::TABLE)
                ),
                params_from_iter(bind_values),
            )?;
            tracked.snapshot = tracked.current.to_values();
            stats.updated += 1;
        }

        for key in removed {
            conn.execute(
                &format!("DELETE FROM {} WHERE rowid = ?1;", quote_ident(E::TABLE)),
                [key.0],
            )?;
            self.identity.remove(&key);
            stats.deleted += 1;
        }

        info!(
            "event=orm_flush module=orm status=ok table={} inserted={} updated={} deleted={} duration_ms={}",
            E::TABLE,
            stats.inserted,
            stats.updated,
            stats.deleted,
            started_at.elapsed().as_millis()
        );
        Ok(stats)
    }

    /// Flushes, then commits the open transaction.
    ///
    /// Tracked objects stay attached; later work opens a new transaction.
    pub fn commit(&mut self) -> OrmResult<FlushStats> {
        let stats = self.flush()?;
        if let Some(tx) = self.tx.take() {
            tx.commit()?;
            debug!("event=orm_commit module=orm status=ok table={}", E::TABLE);
        }
        Ok(stats)
    }

    /// Discards staged work and tracked objects, then rolls back.
    pub fn rollback(&mut self) -> OrmResult<()> {
        self.staged.clear();
        self.identity.clear();
        if let Some(tx) = self.tx.take() {
            tx.rollback()?;
            debug!("event=orm_rollback module=orm status=ok table={}", E::TABLE);
        }
        Ok(())
    }

    fn begin(&mut self) -> OrmResult<()> {
        if self.tx.is_none() {
            self.tx = Some(self.conn.unchecked_transaction()?);
        }
        Ok(())
    }

    fn load(&mut self, filter: Option<(usize, Value)>) -> OrmResult<Vec<EntityKey>> {
        self.flush()?;

        let conn = self.conn;
        let columns = E::columns();
        let mut sql = format!(
            "SELECT {}, rowid FROM {}",
            columns
                .iter()
                .map(|column| quote_ident(column.name))
                .collect::<Vec<_>>()
                .join(", "),
            quote_ident(E::TABLE)
        );
        let mut bind_values = Vec::new();
        if let Some((position, value)) = filter {
            sql.push_str(&format!(" WHERE {} = ?", quote_ident(columns[position].name)));
            bind_values.push(value);
        }
        sql.push_str(" ORDER BY rowid;");

        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut keys = Vec::new();

        while let Some(row) = rows.next()? {
            let key = EntityKey(row.get(columns.len())?);
            if !self.identity.contains_key(&key) {
                let entity = E::from_row(row)?;
                self.identity.insert(
                    key,
                    Tracked {
                        snapshot: entity.to_values(),
                        current: entity,
                        deleted: false,
                    },
                );
            }
            keys.push(key);
        }

        Ok(keys)
    }
}

fn insert_sql<E: Entity>() -> String {
    let columns = E::columns();
    let names = columns
        .iter()
        .map(|column| quote_ident(column.name))
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = vec!["?"; columns.len()].join(", ");
    format!(
        "INSERT INTO {} ({names}) VALUES ({placeholders});",
        quote_ident(E::TABLE)
    )
}
