//! Conversions between domain types and the plain-text column values stored
//! in SQLite. Timestamps are stored as RFC 3339 strings.

use chrono::{DateTime, SecondsFormat, Utc};
use techpro_core::inbox::InboxEntry;

use crate::{Error, Result};

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

/// Raw column values of an `inbox` row.
pub struct RawInboxEntry {
  pub id:         i64,
  pub created:    String,
  pub name:       String,
  pub details:    String,
  pub message:    String,
  pub user_agent: String,
  pub source:     String,
}

impl RawInboxEntry {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      created:    row.get(1)?,
      name:       row.get(2)?,
      details:    row.get(3)?,
      message:    row.get(4)?,
      user_agent: row.get(5)?,
      source:     row.get(6)?,
    })
  }

  pub fn into_entry(self) -> Result<InboxEntry> {
    Ok(InboxEntry {
      id:         self.id,
      created:    decode_dt(&self.created)?,
      name:       self.name,
      details:    self.details,
      message:    self.message,
      user_agent: self.user_agent,
      source:     self.source,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::TimeZone;

  #[test]
  fn datetime_text_roundtrip() {
    let at = Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap();
    assert_eq!(encode_dt(at), "2024-05-06T07:08:09.000000Z");
    assert_eq!(decode_dt(&encode_dt(at)).unwrap(), at);
  }

  #[test]
  fn bad_datetime_is_an_error() {
    assert!(matches!(decode_dt("yesterday"), Err(Error::DateParse(_))));
  }
}
