//! [`SqliteInbox`]: the SQLite implementation of [`Inbox`].

use std::path::Path;

use chrono::Utc;
use techpro_core::inbox::{Inbox, InboxEntry, NewInboxEntry};

use crate::{
  Result,
  encode::{RawInboxEntry, encode_dt},
  schema::SCHEMA,
};

/// Contacts received by the intake service, in one SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteInbox {
  conn: tokio_rusqlite::Connection,
}

impl SqliteInbox {
  /// Open (or create) an inbox at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let inbox = Self { conn };
    inbox.init_schema().await?;
    Ok(inbox)
  }

  /// Open an in-memory inbox, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let inbox = Self { conn };
    inbox.init_schema().await?;
    Ok(inbox)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

impl Inbox for SqliteInbox {
  type Error = crate::Error;

  async fn append(&self, entry: NewInboxEntry) -> Result<InboxEntry> {
    let created = Utc::now();
    let created_str = encode_dt(created);
    let row = entry.clone();

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO inbox (created, name, details, message, user_agent, source)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![
            created_str,
            row.name,
            row.details,
            row.message,
            row.user_agent,
            row.source,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    tracing::debug!(id, source = %entry.source, "inbox entry stored");

    Ok(InboxEntry {
      id,
      created,
      name: entry.name,
      details: entry.details,
      message: entry.message,
      user_agent: entry.user_agent,
      source: entry.source,
    })
  }

  async fn list(&self) -> Result<Vec<InboxEntry>> {
    let raws: Vec<RawInboxEntry> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT id, created, name, details, message, user_agent, source
           FROM inbox ORDER BY id",
        )?;
        let rows = stmt
          .query_map([], RawInboxEntry::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawInboxEntry::into_entry).collect()
  }
}
