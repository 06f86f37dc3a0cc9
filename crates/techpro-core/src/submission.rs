//! The contact submission pipeline.
//!
//! Each submission is attempted once against the remote endpoint. If that
//! fails for any reason, or no endpoint is configured, it is appended to
//! the local contacts collection instead. Every call ends in exactly one
//! [`Outcome`].

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::{
  Error, Result,
  collection,
  kv::KvStore,
  model::{ContactSubmission, iso_timestamp},
  records::{Contacts, RecordStore},
};

/// Source tag sent with every payload unless configured otherwise.
pub const DEFAULT_SOURCE: &str = "techpro-spa";

// ─── Input ───────────────────────────────────────────────────────────────────

/// A contact-form or service-request submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inquiry {
  pub name:    String,
  /// Email address or phone number.
  pub details: String,
  pub message: String,
  /// Label of the service this request came from, if any.
  pub service: Option<String>,
}

impl Inquiry {
  /// Build an inquiry; every field must be non-blank.
  pub fn new(
    name: impl Into<String>,
    details: impl Into<String>,
    message: impl Into<String>,
  ) -> Result<Self> {
    let inquiry = Self {
      name:    name.into(),
      details: details.into(),
      message: message.into(),
      service: None,
    };
    for (field, value) in [
      ("name", &inquiry.name),
      ("details", &inquiry.details),
      ("message", &inquiry.message),
    ] {
      if value.trim().is_empty() {
        return Err(Error::MissingField(field));
      }
    }
    Ok(inquiry)
  }

  /// Mark this inquiry as a request for `service`.
  pub fn for_service(mut self, service: impl Into<String>) -> Self {
    self.service = Some(service.into()).filter(|s: &String| !s.trim().is_empty());
    self
  }

  /// The message as kept locally, prefixed with the service label.
  fn stored_message(&self) -> String {
    match &self.service {
      Some(service) => format!("[Service: {service}] {}", self.message),
      None => self.message.clone(),
    }
  }
}

// ─── Wire payload ────────────────────────────────────────────────────────────

/// Identifies the sending client in every payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientInfo {
  pub source:     String,
  pub user_agent: String,
  /// Optional shared secret expected by the endpoint.
  pub secret:     Option<String>,
}

impl Default for ClientInfo {
  fn default() -> Self {
    Self {
      source:     DEFAULT_SOURCE.to_owned(),
      user_agent: concat!("techpro/", env!("CARGO_PKG_VERSION")).to_owned(),
      secret:     None,
    }
  }
}

/// JSON body posted to the remote endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundPayload {
  pub name:    String,
  pub details: String,
  pub message: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub secret:  Option<String>,
  pub meta:    PayloadMeta,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadMeta {
  pub source:     String,
  pub user_agent: String,
}

impl OutboundPayload {
  pub fn new(inquiry: &Inquiry, client: &ClientInfo) -> Self {
    Self {
      name:    inquiry.name.clone(),
      details: inquiry.details.clone(),
      message: inquiry.message.clone(),
      secret:  client.secret.clone().filter(|s| !s.is_empty()),
      meta:    PayloadMeta {
        source:     client.source.clone(),
        user_agent: client.user_agent.clone(),
      },
    }
  }
}

// ─── Delivery ────────────────────────────────────────────────────────────────

/// Why a remote delivery did not happen. Never shown to the user beyond a
/// generic notice; the submission is stored locally instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryError {
  #[error("no endpoint configured")]
  NoEndpoint,

  #[error("network error: {0}")]
  Network(String),

  #[error("response is not a JSON object")]
  InvalidResponse,

  #[error("endpoint declined the submission: {0}")]
  Rejected(String),
}

/// Sends a payload to the remote endpoint.
pub trait Courier {
  /// One attempt, no retries. `Ok` means the endpoint acknowledged it.
  fn deliver(
    &self,
    payload: &OutboundPayload,
  ) -> impl Future<Output = Result<(), DeliveryError>> + Send;
}

impl<C: Courier + ?Sized> Courier for &C {
  fn deliver(
    &self,
    payload: &OutboundPayload,
  ) -> impl Future<Output = Result<(), DeliveryError>> + Send {
    (**self).deliver(payload)
  }
}

/// Interpret an endpoint's reply body.
///
/// The reply must be a JSON object whose `ok` field is truthy. The HTTP
/// status is not consulted.
pub fn check_reply(body: &str) -> Result<(), DeliveryError> {
  let Ok(Value::Object(reply)) = serde_json::from_str::<Value>(body) else {
    return Err(DeliveryError::InvalidResponse);
  };

  if reply.get("ok").is_some_and(is_truthy) {
    return Ok(());
  }

  let reason = reply
    .get("error")
    .and_then(Value::as_str)
    .unwrap_or("reply was not ok");
  Err(DeliveryError::Rejected(reason.to_owned()))
}

fn is_truthy(v: &Value) -> bool {
  match v {
    Value::Null => false,
    Value::Bool(b) => *b,
    Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
    Value::String(s) => !s.is_empty(),
    Value::Array(_) | Value::Object(_) => true,
  }
}

// ─── Outcome ─────────────────────────────────────────────────────────────────

/// Terminal state of one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
  /// The remote endpoint acknowledged the submission.
  Delivered,
  /// Delivery failed; the submission was appended to the local contacts.
  StoredLocally {
    record: ContactSubmission,
    reason: DeliveryError,
  },
}

impl Outcome {
  pub fn is_delivered(&self) -> bool { matches!(self, Self::Delivered) }

  /// User-facing notice for this outcome.
  pub fn notice(&self) -> &'static str {
    match self {
      Self::Delivered => "Thanks, your message was sent. We will contact you soon.",
      Self::StoredLocally { .. } => {
        "Could not reach backend, saved locally. You can export submissions."
      }
    }
  }
}

// ─── Pipeline ────────────────────────────────────────────────────────────────

pub struct SubmissionPipeline<'a, K, C> {
  records: &'a RecordStore<K>,
  courier: Option<C>,
  client:  ClientInfo,
}

impl<'a, K: KvStore, C: Courier> SubmissionPipeline<'a, K, C> {
  /// `courier` is `None` when no endpoint is configured.
  pub fn new(records: &'a RecordStore<K>, courier: Option<C>, client: ClientInfo) -> Self {
    Self { records, courier, client }
  }

  /// Deliver `inquiry`, or keep it locally when delivery fails.
  ///
  /// Errors only when the local fallback itself cannot be written.
  pub async fn submit(&self, inquiry: Inquiry) -> Result<Outcome> {
    let reason = match &self.courier {
      None => DeliveryError::NoEndpoint,
      Some(courier) => {
        let payload = OutboundPayload::new(&inquiry, &self.client);
        match courier.deliver(&payload).await {
          Ok(()) => {
            tracing::info!(name = %inquiry.name, "submission delivered");
            return Ok(Outcome::Delivered);
          }
          Err(e) => e,
        }
      }
    };

    tracing::warn!(error = %reason, "delivery failed; storing submission locally");
    let record = self.store_locally(&inquiry, Utc::now())?;
    Ok(Outcome::StoredLocally { record, reason })
  }

  fn store_locally(&self, inquiry: &Inquiry, now: DateTime<Utc>) -> Result<ContactSubmission> {
    let contacts = self.records.list::<Contacts>();
    let record = ContactSubmission {
      id:      collection::next_id(&contacts, now),
      name:    inquiry.name.clone(),
      details: inquiry.details.clone(),
      message: inquiry.stored_message(),
      created: iso_timestamp(now),
    };
    self
      .records
      .replace_all::<Contacts>(&collection::append(contacts, record.clone()))?;
    tracing::debug!(id = %record.id, "stored submission");
    Ok(record)
  }
}
