//! Handler for `PUT /roster`.

use std::sync::Arc;

use axum::{Json, extract::State};
use doorlist_core::{
  roster::{ReconcileReport, RosterUpload, replace_roster},
  store::RosterStore,
};

use crate::{error::ApiError, extract::ApiJson};

/// `PUT /roster`. Body: [`RosterUpload`]
///
/// Replaces the stored roster. Guests already present keep their check-in
/// state; guests missing from the upload are removed.
pub async fn replace<S: RosterStore>(
  State(store): State<Arc<S>>,
  ApiJson(upload): ApiJson<RosterUpload>,
) -> Result<Json<ReconcileReport>, ApiError> {
  let report = replace_roster(store.as_ref(), upload).await?;
  tracing::info!(
    hosts = report.hosts,
    inserted = report.inserted,
    kept = report.kept,
    duplicates = report.duplicates,
    removed = report.removed,
    "roster replaced"
  );
  Ok(Json(report))
}
