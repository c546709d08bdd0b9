//! Handlers for `/guests` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/guests` | Optional `?query`, `status`, `location`, `cohort` |
//! | `POST` | `/guests` | Body: [`NewGuest`]; added as a late add, returns 201 |
//! | `GET`  | `/guests/{name}` | 404 if not found |
//! | `POST` | `/guests/{name}/toggle` | Optional body `{"expected":"not_checked_in"}` |

use std::sync::Arc;

use axum::{
  Json,
  body::Bytes,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use doorlist_core::{
  Error as Rejection,
  guest::{CheckInStatus, GuestOrigin, GuestRecord, NewGuest, normalize_name},
  query::{LocationFilter, SearchQuery, StatusFilter, filter},
  roster::{add_guest, toggle_guest},
  store::RosterStore,
};
use serde::Deserialize;

use crate::{error::ApiError, extract::ApiJson};

// ─── Filter params ───────────────────────────────────────────────────────────

/// Query-string form of a [`SearchQuery`]. Shared with `/stats`.
#[derive(Debug, Default, Deserialize)]
pub struct FilterParams {
  /// Case-insensitive substring of the guest or host name.
  pub query:    Option<String>,
  pub status:   Option<StatusFilter>,
  pub location: Option<LocationFilter>,
  /// Exact host cohort, e.g. `2026`.
  pub cohort:   Option<String>,
}

impl FilterParams {
  pub fn into_query(self) -> SearchQuery {
    SearchQuery::with_cohort(
      self.query.unwrap_or_default(),
      self.status.unwrap_or_default(),
      self.location.unwrap_or_default(),
      self.cohort,
    )
  }
}

/// Every stored guest matching `params`, cloned out of the snapshot.
pub(crate) async fn filtered<S: RosterStore>(
  store: &S,
  params: FilterParams,
) -> Result<Vec<GuestRecord>, ApiError> {
  let all = store.select_all().await.map_err(ApiError::store)?;
  let query = params.into_query();
  if query.is_unfiltered() {
    return Ok(all);
  }
  Ok(filter(&all, &query).into_iter().cloned().collect())
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /guests[?query=...][&status=...][&location=...][&cohort=...]`
pub async fn list<S: RosterStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<FilterParams>,
) -> Result<Json<Vec<GuestRecord>>, ApiError> {
  Ok(Json(filtered(store.as_ref(), params).await?))
}

// ─── Quick add ────────────────────────────────────────────────────────────────

/// `POST /guests`. Body: `{"name":..,"host_name":..,"campus_status":..,"gender":..}`
pub async fn create<S: RosterStore>(
  State(store): State<Arc<S>>,
  ApiJson(body): ApiJson<NewGuest>,
) -> Result<impl IntoResponse, ApiError> {
  let record = add_guest(store.as_ref(), body, GuestOrigin::WalkIn).await?;
  tracing::info!(name = %record.name, host = %record.host_name, "late add");
  Ok((StatusCode::CREATED, Json(record)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /guests/{name}`
pub async fn get_one<S: RosterStore>(
  State(store): State<Arc<S>>,
  Path(name): Path<String>,
) -> Result<Json<GuestRecord>, ApiError> {
  let name = normalize_name(&name);
  let record = store
    .select_by_name(&name)
    .await
    .map_err(ApiError::store)?
    .ok_or(Rejection::GuestNotFound(name))?;
  Ok(Json(record))
}

// ─── Toggle ───────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct ToggleBody {
  /// The status the caller last saw. If the stored status differs, the
  /// toggle is refused with 409.
  #[serde(default)]
  pub expected: Option<CheckInStatus>,
}

/// `POST /guests/{name}/toggle`
///
/// An empty body toggles unconditionally.
pub async fn toggle<S: RosterStore>(
  State(store): State<Arc<S>>,
  Path(name): Path<String>,
  body: Bytes,
) -> Result<Json<GuestRecord>, ApiError> {
  let expected = if body.is_empty() {
    None
  } else {
    serde_json::from_slice::<ToggleBody>(&body)
      .map_err(|e| ApiError::BadRequest(e.to_string()))?
      .expected
  };

  let record = toggle_guest(store.as_ref(), &name, expected).await?;
  tracing::info!(
    name = %record.name,
    status = %record.check_in_status,
    "guest toggled"
  );
  Ok(Json(record))
}
