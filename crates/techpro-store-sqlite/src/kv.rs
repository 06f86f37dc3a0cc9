//! [`SqliteKv`]: a [`KvStore`] host backed by one SQLite table.

use std::{
  path::Path,
  sync::{Mutex, MutexGuard},
};

use rusqlite::{Connection, OptionalExtension as _};
use techpro_core::kv::KvStore;

use crate::{Error, Result, schema::SCHEMA};

/// Persistent string key/value storage in a single SQLite file.
///
/// Calls are synchronous; the connection is guarded by a mutex so the store
/// can be shared across threads.
pub struct SqliteKv {
  conn: Mutex<Connection>,
}

impl SqliteKv {
  /// Open (or create) the store at `path` and run schema initialisation.
  pub fn open(path: impl AsRef<Path>) -> Result<Self> {
    Self::init(Connection::open(path)?)
  }

  /// Open an in-memory store, for tests.
  pub fn open_in_memory() -> Result<Self> {
    Self::init(Connection::open_in_memory()?)
  }

  fn init(conn: Connection) -> Result<Self> {
    conn.execute_batch(SCHEMA)?;
    Ok(Self { conn: Mutex::new(conn) })
  }

  fn conn(&self) -> MutexGuard<'_, Connection> {
    self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
  }

  /// Every stored key, sorted.
  pub fn keys(&self) -> Result<Vec<String>> {
    let conn = self.conn();
    let mut stmt = conn.prepare("SELECT key FROM kv ORDER BY key")?;
    let keys = stmt
      .query_map([], |row| row.get(0))?
      .collect::<rusqlite::Result<Vec<String>>>()?;
    Ok(keys)
  }
}

impl KvStore for SqliteKv {
  type Error = Error;

  fn get(&self, key: &str) -> Result<Option<String>> {
    let value = self
      .conn()
      .query_row(
        "SELECT value FROM kv WHERE key = ?1",
        rusqlite::params![key],
        |row| row.get(0),
      )
      .optional()?;
    Ok(value)
  }

  fn set(&self, key: &str, value: &str) -> Result<()> {
    self.conn().execute(
      "INSERT INTO kv (key, value) VALUES (?1, ?2)
       ON CONFLICT(key) DO UPDATE SET value = excluded.value",
      rusqlite::params![key, value],
    )?;
    Ok(())
  }

  fn remove(&self, key: &str) -> Result<()> {
    self
      .conn()
      .execute("DELETE FROM kv WHERE key = ?1", rusqlite::params![key])?;
    Ok(())
  }
}
