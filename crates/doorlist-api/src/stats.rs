//! Handlers for the dashboard endpoints.
//!
//! Both accept the same filter parameters as `GET /guests` and aggregate over
//! the matching guests only.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
};
use chrono::{DateTime, Utc};
use doorlist_core::{
  stats::{DashboardStats, time_series},
  store::RosterStore,
};
use serde::Serialize;

use crate::{
  error::ApiError,
  guests::{FilterParams, filtered},
};

/// `GET /stats`
pub async fn summary<S: RosterStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<FilterParams>,
) -> Result<Json<DashboardStats>, ApiError> {
  let records = filtered(store.as_ref(), params).await?;
  Ok(Json(DashboardStats::compute(&records)))
}

/// One point of the cumulative check-in curve.
#[derive(Debug, Serialize)]
pub struct TimelinePoint {
  pub at:         DateTime<Utc>,
  pub checked_in: usize,
}

/// `GET /stats/timeline`
pub async fn timeline<S: RosterStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<FilterParams>,
) -> Result<Json<Vec<TimelinePoint>>, ApiError> {
  let records = filtered(store.as_ref(), params).await?;
  let points = time_series(&records)
    .map(|(at, checked_in)| TimelinePoint { at, checked_in })
    .collect();
  Ok(Json(points))
}
