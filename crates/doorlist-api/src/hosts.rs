//! Handler for `GET /hosts`.

use std::sync::Arc;

use axum::{Json, extract::State};
use doorlist_core::{host::HostDirectory, store::RosterStore};

use crate::error::ApiError;

/// `GET /hosts`: the host directory, sorted by name.
pub async fn list<S: RosterStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<HostDirectory>, ApiError> {
  let hosts = store.hosts().await.map_err(ApiError::store)?;
  Ok(Json(hosts))
}
