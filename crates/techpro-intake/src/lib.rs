//! Contact intake service for the TechPro site.
//!
//! Exposes an axum [`Router`] that accepts contact submissions from the
//! site's submission pipeline and stores them in any [`Inbox`].

pub mod auth;
pub mod error;
pub mod handlers;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post},
};
use serde::Deserialize;
use techpro_core::{inbox::Inbox, submission::DEFAULT_SOURCE};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use auth::SecretConfig;
use handlers::{contacts, landing};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime service configuration, deserialised from `intake.toml` and
/// `TECHPRO_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct IntakeConfig {
  #[serde(default = "default_host")]
  pub host:           String,
  #[serde(default = "default_port")]
  pub port:           u16,
  #[serde(default = "default_store_path")]
  pub store_path:     PathBuf,
  /// argon2 PHC string of the shared secret; `None` accepts all senders.
  #[serde(default)]
  pub secret_hash:    Option<String>,
  /// Source recorded when a submission carries none.
  #[serde(default = "default_source")]
  pub default_source: String,
}

fn default_host() -> String { "0.0.0.0".to_string() }

fn default_port() -> u16 { 5000 }

fn default_store_path() -> PathBuf { PathBuf::from("contacts.db") }

fn default_source() -> String { DEFAULT_SOURCE.to_string() }

impl Default for IntakeConfig {
  fn default() -> Self {
    Self {
      host:           default_host(),
      port:           default_port(),
      store_path:     default_store_path(),
      secret_hash:    None,
      default_source: default_source(),
    }
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<I: Inbox> {
  pub inbox:  Arc<I>,
  pub config: Arc<IntakeConfig>,
  pub secret: Arc<SecretConfig>,
}

impl<I: Inbox> AppState<I> {
  pub fn new(inbox: I, config: IntakeConfig) -> Self {
    let secret = SecretConfig { secret_hash: config.secret_hash.clone() };
    Self {
      inbox:  Arc::new(inbox),
      config: Arc::new(config),
      secret: Arc::new(secret),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the intake [`Router`].
///
/// CORS is wide open: submissions come from browsers on any origin.
pub fn router<I>(state: AppState<I>) -> Router
where
  I: Inbox + Clone + Send + Sync + 'static,
{
  Router::new()
    .route("/",             get(landing::handler))
    .route("/api/contact",  post(contacts::create::<I>))
    .route("/api/contacts", get(contacts::list::<I>))
    .layer(CorsLayer::permissive())
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
  };
  use serde_json::{Value, json};
  use techpro_core::{
    RecordStore,
    kv::MemoryKv,
    records::Contacts,
    submission::{
      ClientInfo, Courier, DeliveryError, Inquiry, OutboundPayload, SubmissionPipeline,
      check_reply,
    },
  };
  use techpro_store_sqlite::SqliteInbox;
  use tower::ServiceExt as _;

  async fn make_state(secret: Option<&str>) -> AppState<SqliteInbox> {
    let inbox = SqliteInbox::open_in_memory().await.unwrap();
    let config = IntakeConfig {
      store_path: PathBuf::from(":memory:"),
      secret_hash: secret.map(|s| auth::hash_secret(s).unwrap()),
      ..IntakeConfig::default()
    };
    AppState::new(inbox, config)
  }

  async fn send(
    state: AppState<SqliteInbox>,
    method: &str,
    uri: &str,
    headers: Vec<(header::HeaderName, &str)>,
    body: &str,
  ) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    for (k, v) in headers {
      builder = builder.header(k, v);
    }
    let req = builder.body(Body::from(body.to_string())).unwrap();
    router(state).oneshot(req).await.unwrap()
  }

  async fn post_json(state: AppState<SqliteInbox>, body: Value) -> (StatusCode, Value) {
    let resp = send(
      state,
      "POST",
      "/api/contact",
      vec![(header::CONTENT_TYPE, "application/json")],
      &body.to_string(),
    )
    .await;
    let status = resp.status();
    (status, json_body(resp).await)
  }

  async fn json_body(resp: Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), 1 << 20).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  async fn list(state: AppState<SqliteInbox>) -> Vec<Value> {
    let resp = send(state, "GET", "/api/contacts", vec![], "").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["ok"], true);
    body["items"].as_array().unwrap().clone()
  }

  // ── Landing ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn landing_page_lists_endpoints() {
    let state = make_state(None).await;
    let resp = send(state, "GET", "/", vec![], "").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), 1 << 20).await.unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("/api/contacts"));
  }

  // ── POST /api/contact ───────────────────────────────────────────────────────

  #[tokio::test]
  async fn accepts_and_stores_trimmed_contact() {
    let state = make_state(None).await;
    let (status, body) = post_json(
      state.clone(),
      json!({
        "name": "  Ada ",
        "details": "ada@example.com",
        "message": "Hello",
        "meta": { "source": "landing", "userAgent": "ua/1" }
      }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true }));

    let items = list(state).await;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["name"], "Ada");
    assert_eq!(items[0]["source"], "landing");
    assert_eq!(items[0]["user_agent"], "ua/1");
  }

  #[tokio::test]
  async fn missing_meta_falls_back_to_header_and_default_source() {
    let state = make_state(None).await;
    let resp = send(
      state.clone(),
      "POST",
      "/api/contact",
      vec![(header::USER_AGENT, "curl/8")],
      r#"{"name":"N","details":"D","message":"M"}"#,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let items = list(state).await;
    assert_eq!(items[0]["user_agent"], "curl/8");
    assert_eq!(items[0]["source"], "techpro-spa");
  }

  #[tokio::test]
  async fn invalid_json_is_rejected() {
    let state = make_state(None).await;
    let resp = send(state.clone(), "POST", "/api/contact", vec![], "{nope").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
      json_body(resp).await,
      json!({ "ok": false, "error": "invalid_json" })
    );
    assert!(list(state).await.is_empty());
  }

  #[tokio::test]
  async fn blank_fields_are_rejected() {
    let state = make_state(None).await;
    let (status, body) = post_json(
      state.clone(),
      json!({ "name": "N", "details": "   ", "message": "M" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "missing_fields");
    assert!(list(state).await.is_empty());
  }

  #[tokio::test]
  async fn secret_is_enforced_when_configured() {
    let state = make_state(Some("hunter2")).await;
    let contact = json!({ "name": "N", "details": "D", "message": "M" });

    let (status, body) = post_json(state.clone(), contact.clone()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");

    let mut with_secret = contact;
    with_secret["secret"] = json!("hunter2");
    let (status, _) = post_json(state.clone(), with_secret).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list(state).await.len(), 1);
  }

  // ── Pipeline against the router ─────────────────────────────────────────────

  /// Delivers through the router in-process, the way an HTTP courier would
  /// over the network.
  struct RouterCourier(AppState<SqliteInbox>);

  impl Courier for RouterCourier {
    async fn deliver(&self, payload: &OutboundPayload) -> Result<(), DeliveryError> {
      let body = serde_json::to_string(payload)
        .map_err(|e| DeliveryError::Network(e.to_string()))?;
      let resp = send(
        self.0.clone(),
        "POST",
        "/api/contact",
        vec![(header::CONTENT_TYPE, "application/json")],
        &body,
      )
      .await;
      let bytes = axum::body::to_bytes(resp.into_body(), 1 << 20)
        .await
        .map_err(|e| DeliveryError::Network(e.to_string()))?;
      check_reply(&String::from_utf8_lossy(&bytes))
    }
  }

  #[tokio::test]
  async fn pipeline_delivers_to_intake() {
    let state = make_state(None).await;
    let records = RecordStore::new(MemoryKv::new());
    records.ensure_seeded().unwrap();

    let pipeline = SubmissionPipeline::new(
      &records,
      Some(RouterCourier(state.clone())),
      ClientInfo::default(),
    );
    let outcome = pipeline
      .submit(Inquiry::new("Grace", "grace@example.com", "Hi").unwrap())
      .await
      .unwrap();

    assert!(outcome.is_delivered());
    assert!(records.list::<Contacts>().is_empty());
    let items = list(state).await;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["source"], "techpro-spa");
  }

  #[tokio::test]
  async fn pipeline_falls_back_when_intake_rejects() {
    let state = make_state(Some("expected")).await;
    let records = RecordStore::new(MemoryKv::new());
    records.ensure_seeded().unwrap();

    let client = ClientInfo { secret: Some("wrong".into()), ..ClientInfo::default() };
    let pipeline = SubmissionPipeline::new(&records, Some(RouterCourier(state.clone())), client);
    let outcome = pipeline
      .submit(Inquiry::new("Grace", "grace@example.com", "Hi").unwrap())
      .await
      .unwrap();

    assert!(!outcome.is_delivered());
    assert_eq!(records.list::<Contacts>().len(), 1);
    assert!(list(state).await.is_empty());
  }
}
