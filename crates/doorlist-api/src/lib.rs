//! JSON REST API for the doorlist.
//!
//! Exposes an axum [`Router`] backed by any [`doorlist_core::store::RosterStore`].
//! Auth, TLS, and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", doorlist_api::api_router(store.clone()))
//! ```

pub mod error;
pub mod extract;
pub mod guests;
pub mod hosts;
pub mod roster;
pub mod stats;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post, put},
};
use doorlist_core::store::RosterStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: RosterStore + 'static,
{
  Router::new()
    // Guests
    .route("/guests", get(guests::list::<S>).post(guests::create::<S>))
    .route("/guests/{name}", get(guests::get_one::<S>))
    .route("/guests/{name}/toggle", post(guests::toggle::<S>))
    // Hosts
    .route("/hosts", get(hosts::list::<S>))
    // Dashboard
    .route("/stats", get(stats::summary::<S>))
    .route("/stats/timeline", get(stats::timeline::<S>))
    // Bulk load
    .route("/roster", put(roster::replace::<S>))
    .with_state(store)
}

#[cfg(test)]
mod tests;
