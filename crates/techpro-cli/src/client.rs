//! HTTP courier for the remote contact endpoint.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use techpro_core::submission::{Courier, DeliveryError, OutboundPayload, check_reply};

/// Posts submissions to a single endpoint URL.
///
/// Cheap to clone: the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct HttpCourier {
  client:   Client,
  endpoint: String,
}

impl HttpCourier {
  pub fn new(endpoint: impl Into<String>) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, endpoint: endpoint.into() })
  }
}

impl Courier for HttpCourier {
  /// `POST <endpoint>` with the payload as JSON. The reply body decides the
  /// outcome, whatever the status code.
  async fn deliver(&self, payload: &OutboundPayload) -> Result<(), DeliveryError> {
    let resp = self
      .client
      .post(&self.endpoint)
      .json(payload)
      .send()
      .await
      .map_err(|e| DeliveryError::Network(e.to_string()))?;

    let status = resp.status();
    let body = resp
      .text()
      .await
      .map_err(|e| DeliveryError::Network(e.to_string()))?;
    tracing::debug!(%status, endpoint = %self.endpoint, "endpoint replied");

    check_reply(&body)
  }
}
