//! Handlers for the contact endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/api/contact` | Body: `{"name","details","message","secret"?,"meta"?}` |
//! | `GET`  | `/api/contacts` | All received contacts, oldest first |

use axum::{
  Json,
  body::Bytes,
  extract::State,
  http::{HeaderMap, header},
};
use serde::Deserialize;
use serde_json::{Value, json};
use techpro_core::inbox::{Inbox, NewInboxEntry};

use crate::{AppState, auth::verify_secret, error::Error};

// ─── Create ───────────────────────────────────────────────────────────────────

/// Incoming submission. Every field is optional at the wire level; presence
/// is checked after trimming.
#[derive(Debug, Default, Deserialize)]
pub struct ContactBody {
  #[serde(default)]
  pub name:    Option<String>,
  #[serde(default)]
  pub details: Option<String>,
  #[serde(default)]
  pub message: Option<String>,
  #[serde(default)]
  pub secret:  Option<String>,
  #[serde(default)]
  pub meta:    Option<ContactMeta>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMeta {
  #[serde(default)]
  pub source:     Option<String>,
  #[serde(default)]
  pub user_agent: Option<String>,
}

fn required(field: Option<String>) -> Result<String, Error> {
  field
    .map(|v| v.trim().to_owned())
    .filter(|v| !v.is_empty())
    .ok_or(Error::MissingFields)
}

/// `POST /api/contact`
pub async fn create<I>(
  State(state): State<AppState<I>>,
  headers: HeaderMap,
  body: Bytes,
) -> Result<Json<Value>, Error>
where
  I: Inbox + Clone + Send + Sync + 'static,
{
  let body: ContactBody = serde_json::from_slice(&body).map_err(|_| Error::InvalidJson)?;

  verify_secret(body.secret.as_deref(), &state.secret)?;

  let name = required(body.name)?;
  let details = required(body.details)?;
  let message = required(body.message)?;

  let meta = body.meta.unwrap_or_default();
  let user_agent = meta
    .user_agent
    .filter(|ua| !ua.is_empty())
    .or_else(|| {
      headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
    })
    .unwrap_or_default();
  let source = meta
    .source
    .filter(|s| !s.is_empty())
    .unwrap_or_else(|| state.config.default_source.clone());

  let entry = state
    .inbox
    .append(NewInboxEntry { name, details, message, user_agent, source })
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;

  tracing::info!(id = entry.id, source = %entry.source, "contact received");
  Ok(Json(json!({ "ok": true })))
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /api/contacts`
pub async fn list<I>(State(state): State<AppState<I>>) -> Result<Json<Value>, Error>
where
  I: Inbox + Clone + Send + Sync + 'static,
{
  let items = state
    .inbox
    .list()
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;
  Ok(Json(json!({ "ok": true, "items": items })))
}
