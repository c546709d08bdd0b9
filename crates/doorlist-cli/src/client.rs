//! Async HTTP client wrapping the doorlist JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use doorlist_core::{
  guest::{CheckInStatus, GuestRecord, NewGuest},
  host::Host,
};
use reqwest::{Client, Response, Url};
use serde::Deserialize;
use serde_json::json;

/// Connection settings for the doorlist API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
  pub username: String,
  pub password: String,
}

/// Async HTTP client for the doorlist JSON REST API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

/// Error body returned by the server on 4xx/5xx.
#[derive(Deserialize)]
struct ErrorBody {
  error: String,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(10))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!(
      "{}/api{}",
      self.config.base_url.trim_end_matches('/'),
      path
    )
  }

  /// `/api/guests/{name}[/suffix]`, with the name percent-encoded as one
  /// path segment.
  fn guest_url(&self, name: &str, suffix: Option<&str>) -> Result<Url> {
    let mut url = Url::parse(&self.url("/guests")).context("invalid base URL")?;
    {
      let mut segments = url
        .path_segments_mut()
        .map_err(|()| anyhow!("base URL cannot carry a path"))?;
      segments.push(name);
      if let Some(suffix) = suffix {
        segments.push(suffix);
      }
    }
    Ok(url)
  }

  fn auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    if self.config.username.is_empty() {
      req
    } else {
      req.basic_auth(&self.config.username, Some(&self.config.password))
    }
  }

  /// Turn a non-success response into an error carrying the server's message.
  async fn check(resp: Response, what: &str) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
      return Ok(resp);
    }
    let message = resp
      .json::<ErrorBody>()
      .await
      .map(|b| b.error)
      .unwrap_or_else(|_| status.to_string());
    tracing::warn!(%status, %message, "{what} failed");
    Err(anyhow!("{what} → {status}: {message}"))
  }

  // ── Guests ────────────────────────────────────────────────────────────────

  /// `GET /api/guests`
  pub async fn list_guests(&self) -> Result<Vec<GuestRecord>> {
    let resp = self
      .auth(self.client.get(self.url("/guests")))
      .send()
      .await
      .context("GET /guests failed")?;

    Self::check(resp, "GET /guests")
      .await?
      .json()
      .await
      .context("deserialising guests")
  }

  /// `POST /api/guests`
  pub async fn add_guest(&self, guest: &NewGuest) -> Result<GuestRecord> {
    let resp = self
      .auth(self.client.post(self.url("/guests")))
      .json(guest)
      .send()
      .await
      .context("POST /guests failed")?;

    Self::check(resp, "POST /guests")
      .await?
      .json()
      .await
      .context("deserialising new guest")
  }

  /// `POST /api/guests/{name}/toggle`
  ///
  /// `expected` is the status currently on screen; the server refuses the
  /// toggle if it has moved on.
  pub async fn toggle(
    &self,
    name: &str,
    expected: CheckInStatus,
  ) -> Result<GuestRecord> {
    let url = self.guest_url(name, Some("toggle"))?;
    let resp = self
      .auth(self.client.post(url))
      .json(&json!({ "expected": expected }))
      .send()
      .await
      .with_context(|| format!("POST /guests/{name}/toggle failed"))?;

    Self::check(resp, "toggle")
      .await?
      .json()
      .await
      .context("deserialising toggled guest")
  }

  // ── Hosts ─────────────────────────────────────────────────────────────────

  /// `GET /api/hosts`
  pub async fn list_hosts(&self) -> Result<Vec<Host>> {
    let resp = self
      .auth(self.client.get(self.url("/hosts")))
      .send()
      .await
      .context("GET /hosts failed")?;

    Self::check(resp, "GET /hosts")
      .await?
      .json()
      .await
      .context("deserialising hosts")
  }
}
