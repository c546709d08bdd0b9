//! HTTP server for the doorlist.
//!
//! Mounts the JSON API from `doorlist-api` under `/api` behind the
//! Basic-auth gate, plus an unauthenticated `/health` check.

pub mod auth;
pub mod error;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{Router, middleware, routing::get};
use doorlist_core::store::RosterStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use auth::{AuthConfig, require_auth};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `DOORLIST_*` environment variables.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:               String,
  pub port:               u16,
  pub store_path:         PathBuf,
  pub auth_username:      String,
  pub auth_password_hash: String,
}

impl ServerConfig {
  pub fn auth(&self) -> AuthConfig {
    AuthConfig {
      username:      self.auth_username.clone(),
      password_hash: self.auth_password_hash.clone(),
    }
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Everything the router needs: the roster store and the login credentials.
pub struct AppState<S: RosterStore> {
  pub store: Arc<S>,
  pub auth:  Arc<AuthConfig>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the top-level axum [`Router`].
pub fn router<S>(state: AppState<S>) -> Router
where
  S: RosterStore + 'static,
{
  Router::new()
    .nest("/api", doorlist_api::api_router(state.store))
    .layer(middleware::from_fn_with_state(state.auth, require_auth))
    // Routes added after the auth layer are public.
    .route("/health", get(health))
    .layer(TraceLayer::new_for_http())
}

async fn health() -> &'static str { "ok" }

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use base64::Engine as _;
  use base64::engine::general_purpose::STANDARD as B64;
  use doorlist_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;

  use super::*;
  use crate::auth::hash_password;

  async fn make_state(password: &str) -> AppState<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    AppState {
      store: Arc::new(store),
      auth:  Arc::new(AuthConfig {
        username:      "door".to_string(),
        password_hash: hash_password(password).unwrap(),
      }),
    }
  }

  fn auth_header(user: &str, pass: &str) -> String {
    format!("Basic {}", B64.encode(format!("{user}:{pass}")))
  }

  async fn get(
    state: AppState<SqliteStore>,
    uri: &str,
    auth: Option<String>,
  ) -> axum::response::Response {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(auth) = auth {
      builder = builder.header(header::AUTHORIZATION, auth);
    }
    router(state)
      .oneshot(builder.body(Body::empty()).unwrap())
      .await
      .unwrap()
  }

  #[tokio::test]
  async fn health_is_public() {
    let state = make_state("secret").await;
    let resp = get(state, "/health", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
  }

  #[tokio::test]
  async fn api_requires_credentials() {
    let state = make_state("secret").await;
    let resp = get(state, "/api/guests", None).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.headers().contains_key(header::WWW_AUTHENTICATE));
  }

  #[tokio::test]
  async fn api_rejects_wrong_password() {
    let state = make_state("secret").await;
    let resp = get(state, "/api/guests", Some(auth_header("door", "nope"))).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn api_serves_authenticated_requests() {
    let state = make_state("secret").await;
    let resp = get(state, "/api/guests", Some(auth_header("door", "secret"))).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"[]");
  }
}
