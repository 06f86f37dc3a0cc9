//! The `Inbox` trait: server-side storage for the contact intake service.
//!
//! The site core never reads an inbox; only the intake service does.

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A contact accepted by the intake service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboxEntry {
  pub id:         i64,
  pub created:    DateTime<Utc>,
  pub name:       String,
  pub details:    String,
  pub message:    String,
  pub user_agent: String,
  pub source:     String,
}

/// A validated contact about to be stored. `created` and `id` are assigned
/// by the inbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInboxEntry {
  pub name:       String,
  pub details:    String,
  pub message:    String,
  pub user_agent: String,
  pub source:     String,
}

/// Append-only storage for received contacts.
pub trait Inbox: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist `entry` and return it with its id and timestamp.
  fn append(
    &self,
    entry: NewInboxEntry,
  ) -> impl Future<Output = Result<InboxEntry, Self::Error>> + Send + '_;

  /// Every entry in the order it was received.
  fn list(&self) -> impl Future<Output = Result<Vec<InboxEntry>, Self::Error>> + Send + '_;
}
