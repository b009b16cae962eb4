//! SQLite-backed slot storage.

use crate::dlog;
use crate::persistence::SlotStore;
use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;

pub struct SqliteSlots {
    conn: Connection,
}

impl SqliteSlots {
    pub fn open(db_path: &Path) -> Result<Self> {
        let display = db_path.display();
        let conn =
            Connection::open(db_path).with_context(|| format!("Opening SQLite DB: {display}"))?;
        Self::with_connection(conn)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Opening in-memory SQLite DB")?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        ensure_schema(&conn)?;
        Ok(Self { conn })
    }
}

fn ensure_schema(conn: &Connection) -> Result<()> {
    let existed = table_exists(conn, "slots")?;
    conn.execute_batch(
        r"
        CREATE TABLE IF NOT EXISTS slots (
          key         TEXT PRIMARY KEY NOT NULL,
          value       TEXT NOT NULL,
          updated_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );
        ",
    )
    .context("Ensuring SQLite schema")?;
    if !existed {
        tracing::info!("created slots table");
    }
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    let mut stmt =
        conn.prepare("SELECT 1 FROM sqlite_master WHERE type='table' AND name=?1 LIMIT 1")?;
    let mut rows = stmt.query([table])?;
    Ok(rows.next()?.is_some())
}

impl SlotStore for SqliteSlots {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row("SELECT value FROM slots WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()
            .with_context(|| format!("Reading slot {key:?}"))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.conn
            .execute(
                r"
                INSERT INTO slots (key, value) VALUES (?1, ?2)
                ON CONFLICT (key) DO UPDATE SET
                  value = excluded.value,
                  updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                ",
                params![key, value],
            )
            .with_context(|| format!("Writing slot {key:?}"))?;
        dlog!("sqlite_set key={key} bytes={}", value.len());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let n = self
            .conn
            .execute("DELETE FROM slots WHERE key = ?1", [key])
            .with_context(|| format!("Deleting slot {key:?}"))?;
        dlog!("sqlite_remove key={key} rows={n}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_overwrite_remove() {
        let mut slots = SqliteSlots::in_memory().unwrap();
        assert_eq!(slots.get("workout").unwrap(), None);
        slots.set("workout", "[1]").unwrap();
        slots.set("workout", "[2]").unwrap();
        assert_eq!(slots.get("workout").unwrap().as_deref(), Some("[2]"));
        slots.remove("workout").unwrap();
        assert_eq!(slots.get("workout").unwrap(), None);
    }

    #[test]
    fn reopening_file_keeps_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mapty.sqlite");
        {
            let mut slots = SqliteSlots::open(&path).unwrap();
            slots.set("workout", "[]").unwrap();
        }
        let slots = SqliteSlots::open(&path).unwrap();
        assert_eq!(slots.get("workout").unwrap().as_deref(), Some("[]"));
    }
}
