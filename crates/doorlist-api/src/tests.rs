//! Router tests against an in-memory SQLite store.

use std::sync::Arc;

use axum::{
  body::Body,
  http::{Request, StatusCode, header},
};
use doorlist_core::{
  guest::{CampusStatus, Gender, GuestOrigin, NewGuest},
  host::Host,
  roster::add_guest,
  store::RosterStore,
};
use doorlist_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;

use crate::api_router;

async fn seeded() -> Arc<SqliteStore> {
  let store = SqliteStore::open_in_memory().await.unwrap();
  store
    .upsert_hosts(vec![
      Host { name: "Smith".into(), cohort: Some("2026".into()) },
      Host { name: "Jones".into(), cohort: Some("2027".into()) },
    ])
    .await
    .unwrap();

  for (name, host_name, campus_status, gender) in [
    ("Amy Adams", "Smith", CampusStatus::OnCampus, Gender::F),
    ("Ben Brown", "Jones", CampusStatus::OffCampus, Gender::M),
    ("Cat Cole", "Jones", CampusStatus::OnCampus, Gender::F),
  ] {
    let input = NewGuest {
      name: name.into(),
      host_name: host_name.into(),
      campus_status,
      gender,
    };
    add_guest(&store, input, GuestOrigin::Roster).await.unwrap();
  }
  Arc::new(store)
}

async fn send(
  store: &Arc<SqliteStore>,
  method: &str,
  uri: &str,
  body: Option<Value>,
) -> (StatusCode, Value) {
  let mut builder = Request::builder().method(method).uri(uri);
  let body = match body {
    Some(v) => {
      builder = builder.header(header::CONTENT_TYPE, "application/json");
      Body::from(v.to_string())
    }
    None => Body::empty(),
  };
  let resp = api_router(store.clone())
    .oneshot(builder.body(body).unwrap())
    .await
    .unwrap();

  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
    .await
    .unwrap();
  let json = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap()
  };
  (status, json)
}

fn names(list: &Value) -> Vec<&str> {
  list
    .as_array()
    .unwrap()
    .iter()
    .map(|g| g["name"].as_str().unwrap())
    .collect()
}

// ── Guests ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_returns_every_guest_in_order() {
  let store = seeded().await;
  let (status, body) = send(&store, "GET", "/guests", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(names(&body), ["AMY ADAMS", "BEN BROWN", "CAT COLE"]);
}

#[tokio::test]
async fn list_applies_text_and_category_filters() {
  let store = seeded().await;

  let (_, body) = send(&store, "GET", "/guests?query=jones", None).await;
  assert_eq!(names(&body), ["BEN BROWN", "CAT COLE"]);

  let (_, body) =
    send(&store, "GET", "/guests?query=jones&location=on_campus", None).await;
  assert_eq!(names(&body), ["CAT COLE"]);

  let (_, body) = send(&store, "GET", "/guests?cohort=2026", None).await;
  assert_eq!(names(&body), ["AMY ADAMS"]);
}

#[tokio::test]
async fn list_rejects_unknown_filter_value() {
  let store = seeded().await;
  let (status, _) = send(&store, "GET", "/guests?status=maybe", None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn get_one_normalises_the_name() {
  let store = seeded().await;
  let (status, body) = send(&store, "GET", "/guests/amy%20adams", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["host_name"], "Smith");
  assert_eq!(body["cohort"], "2026");
}

#[tokio::test]
async fn get_one_missing_returns_404() {
  let store = seeded().await;
  let (status, body) = send(&store, "GET", "/guests/NOBODY", None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert!(body["error"].as_str().unwrap().contains("NOBODY"));
}

#[tokio::test]
async fn create_adds_a_late_guest() {
  let store = seeded().await;
  let guest = json!({
    "name": " dan doe ",
    "host_name": "Smith",
    "campus_status": "off_campus",
    "gender": "M",
  });
  let (status, body) = send(&store, "POST", "/guests", Some(guest)).await;

  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(body["name"], "DAN DOE");
  assert_eq!(body["is_late_add"], true);
  assert_eq!(body["check_in_status"], "not_checked_in");
}

#[tokio::test]
async fn create_with_unknown_host_is_422() {
  let store = seeded().await;
  let guest = json!({
    "name": "Dan Doe",
    "host_name": "Nobody",
    "campus_status": "on_campus",
    "gender": "M",
  });
  let (status, _) = send(&store, "POST", "/guests", Some(guest)).await;
  assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

  let (_, body) = send(&store, "GET", "/guests", None).await;
  assert_eq!(body.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn create_duplicate_is_409() {
  let store = seeded().await;
  let guest = json!({
    "name": "amy adams",
    "host_name": "Jones",
    "campus_status": "on_campus",
    "gender": "F",
  });
  let (status, _) = send(&store, "POST", "/guests", Some(guest)).await;
  assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn create_with_malformed_body_is_400_with_json_error() {
  let store = seeded().await;
  let guest = json!({
    "name": "Dan Doe",
    "host_name": "Smith",
    "campus_status": "on_campus",
    "gender": "X",
  });
  let (status, body) = send(&store, "POST", "/guests", Some(guest)).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].as_str().unwrap().starts_with("bad request:"));

  // No content type at all.
  let (status, body) = send(&store, "POST", "/guests", None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].is_string());
}

// ── Toggle ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn toggle_without_body_flips_status() {
  let store = seeded().await;

  let (status, body) = send(&store, "POST", "/guests/AMY%20ADAMS/toggle", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["check_in_status"], "checked_in");
  assert!(body["check_in_time"].is_string());

  let (_, body) = send(&store, "POST", "/guests/AMY%20ADAMS/toggle", None).await;
  assert_eq!(body["check_in_status"], "not_checked_in");
  assert!(body["check_in_time"].is_null());
}

#[tokio::test]
async fn toggle_with_stale_expectation_is_409() {
  let store = seeded().await;
  let expected = json!({ "expected": "not_checked_in" });

  let (status, _) =
    send(&store, "POST", "/guests/AMY%20ADAMS/toggle", Some(expected.clone())).await;
  assert_eq!(status, StatusCode::OK);

  let (status, _) =
    send(&store, "POST", "/guests/AMY%20ADAMS/toggle", Some(expected)).await;
  assert_eq!(status, StatusCode::CONFLICT);

  let (_, body) = send(&store, "GET", "/guests/AMY%20ADAMS", None).await;
  assert_eq!(body["check_in_status"], "checked_in");
}

#[tokio::test]
async fn toggle_missing_guest_is_404() {
  let store = seeded().await;
  let (status, _) = send(&store, "POST", "/guests/NOBODY/toggle", None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

// ── Hosts and stats ──────────────────────────────────────────────────────────

#[tokio::test]
async fn hosts_lists_the_directory() {
  let store = seeded().await;
  let (status, body) = send(&store, "GET", "/hosts", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body.as_array().unwrap().len(), 2);
  assert_eq!(body[0]["name"], "Jones");
}

#[tokio::test]
async fn stats_follow_the_filter() {
  let store = seeded().await;
  send(&store, "POST", "/guests/CAT%20COLE/toggle", None).await;

  let (status, body) = send(&store, "GET", "/stats", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["total"], 3);
  assert_eq!(body["checked_in"], 1);
  assert_eq!(body["remaining"], 2);

  let (_, body) = send(&store, "GET", "/stats?query=jones", None).await;
  assert_eq!(body["total"], 2);
  assert_eq!(body["checked_in"], 1);
  assert_eq!(body["capacity_pct"], 50.0);
}

#[tokio::test]
async fn timeline_counts_check_ins() {
  let store = seeded().await;
  send(&store, "POST", "/guests/AMY%20ADAMS/toggle", None).await;
  send(&store, "POST", "/guests/BEN%20BROWN/toggle", None).await;

  let (status, body) = send(&store, "GET", "/stats/timeline", None).await;
  assert_eq!(status, StatusCode::OK);
  let points = body.as_array().unwrap();
  assert_eq!(points.len(), 2);
  assert_eq!(points[1]["checked_in"], 2);
}

// ── Roster ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn roster_upload_reports_changes() {
  let store = seeded().await;
  let upload = json!({
    "hosts": [{ "name": "Lee", "cohort": "2028" }],
    "guests": [
      { "name": "Amy Adams", "host_name": "Smith", "campus_status": "on_campus", "gender": "F" },
      { "name": "Eve East", "host_name": "Lee", "campus_status": "off_campus", "gender": "F" },
    ],
  });
  let (status, body) = send(&store, "PUT", "/roster", Some(upload)).await;

  assert_eq!(status, StatusCode::OK);
  assert_eq!(
    body,
    json!({ "hosts": 1, "inserted": 1, "kept": 1, "duplicates": 0, "removed": 2 })
  );

  let (_, body) = send(&store, "GET", "/guests", None).await;
  assert_eq!(names(&body), ["AMY ADAMS", "EVE EAST"]);
}

#[tokio::test]
async fn roster_upload_with_unknown_host_changes_nothing() {
  let store = seeded().await;
  let upload = json!({
    "guests": [
      { "name": "Eve East", "host_name": "Lee", "campus_status": "off_campus", "gender": "F" },
    ],
  });
  let (status, _) = send(&store, "PUT", "/roster", Some(upload)).await;
  assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

  let (_, body) = send(&store, "GET", "/guests", None).await;
  assert_eq!(body.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn roster_upload_with_wrong_shape_is_400_with_json_error() {
  let store = seeded().await;
  let (status, body) =
    send(&store, "PUT", "/roster", Some(json!({ "guests": "everyone" }))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].is_string());

  let (_, body) = send(&store, "GET", "/guests", None).await;
  assert_eq!(body.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn roster_upload_with_padded_host_name_links_its_guests() {
  let store = seeded().await;
  let upload = json!({
    "hosts": [{ "name": " Lee ", "cohort": "2028" }],
    "guests": [
      { "name": "Eve East", "host_name": "Lee", "campus_status": "off_campus", "gender": "F" },
    ],
  });
  let (status, body) = send(&store, "PUT", "/roster", Some(upload)).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["inserted"], 1);

  let (_, body) = send(&store, "GET", "/guests/eve%20east", None).await;
  assert_eq!(body["host_name"], "Lee");
}
