//! Search queries and the filter engine.
//!
//! A [`SearchQuery`] is a complete description of what the door list should
//! show. Changing any part of it means building a new query; there is no
//! incremental patching.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::guest::{CampusStatus, CheckInStatus, GuestRecord};

// ─── Categorical filters ─────────────────────────────────────────────────────

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum StatusFilter {
  #[default]
  All,
  CheckedIn,
  NotCheckedIn,
}

impl StatusFilter {
  pub fn admits(self, status: CheckInStatus) -> bool {
    match self {
      Self::All => true,
      Self::CheckedIn => status == CheckInStatus::CheckedIn,
      Self::NotCheckedIn => status == CheckInStatus::NotCheckedIn,
    }
  }

  /// Next filter in display order, wrapping around.
  pub fn cycle(self) -> Self {
    match self {
      Self::All => Self::CheckedIn,
      Self::CheckedIn => Self::NotCheckedIn,
      Self::NotCheckedIn => Self::All,
    }
  }
}

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LocationFilter {
  #[default]
  All,
  OnCampus,
  OffCampus,
}

impl LocationFilter {
  pub fn admits(self, status: CampusStatus) -> bool {
    match self {
      Self::All => true,
      Self::OnCampus => status == CampusStatus::OnCampus,
      Self::OffCampus => status == CampusStatus::OffCampus,
    }
  }

  pub fn cycle(self) -> Self {
    match self {
      Self::All => Self::OnCampus,
      Self::OnCampus => Self::OffCampus,
      Self::OffCampus => Self::All,
    }
  }
}

// ─── Query ───────────────────────────────────────────────────────────────────

/// Free text plus categorical filters, all ANDed together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
  query:           String,
  status_filter:   StatusFilter,
  location_filter: LocationFilter,
  cohort:          Option<String>,
}

impl SearchQuery {
  pub fn new(
    query: impl Into<String>,
    status_filter: StatusFilter,
    location_filter: LocationFilter,
  ) -> Self {
    Self {
      query: query.into(),
      status_filter,
      location_filter,
      cohort: None,
    }
  }

  /// Build a query that also restricts to one host cohort.
  pub fn with_cohort(
    query: impl Into<String>,
    status_filter: StatusFilter,
    location_filter: LocationFilter,
    cohort: Option<String>,
  ) -> Self {
    Self { cohort, ..Self::new(query, status_filter, location_filter) }
  }

  pub fn query(&self) -> &str { &self.query }

  pub fn status_filter(&self) -> StatusFilter { self.status_filter }

  pub fn location_filter(&self) -> LocationFilter { self.location_filter }

  pub fn cohort(&self) -> Option<&str> { self.cohort.as_deref() }

  /// `true` when the query admits every record.
  pub fn is_unfiltered(&self) -> bool {
    self.query.is_empty()
      && self.status_filter == StatusFilter::All
      && self.location_filter == LocationFilter::All
      && self.cohort.is_none()
  }

  pub fn matches(&self, record: &GuestRecord) -> bool {
    self.matches_text(record)
      && self.status_filter.admits(record.check_in_status)
      && self.location_filter.admits(record.campus_status)
      && self
        .cohort
        .as_deref()
        .is_none_or(|c| record.cohort.as_deref() == Some(c))
  }

  fn matches_text(&self, record: &GuestRecord) -> bool {
    if self.query.is_empty() {
      return true;
    }
    let needle = self.query.to_lowercase();
    record.name.to_lowercase().contains(&needle)
      || record.host_name.to_lowercase().contains(&needle)
  }
}

/// Return the records admitted by `query`, in their original order.
pub fn filter<'a>(
  records: &'a [GuestRecord],
  query: &SearchQuery,
) -> Vec<&'a GuestRecord> {
  records.iter().filter(|r| query.matches(r)).collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::guest::Gender;

  fn guest(
    name: &str,
    host: &str,
    campus: CampusStatus,
    status: CheckInStatus,
  ) -> GuestRecord {
    GuestRecord {
      name:            name.into(),
      host_name:       host.into(),
      campus_status:   campus,
      gender:          Gender::M,
      check_in_status: status,
      check_in_time:   None,
      is_late_add:     false,
      cohort:          None,
    }
  }

  fn sample() -> Vec<GuestRecord> {
    vec![
      guest("JANE DOE", "Smith", CampusStatus::OnCampus, CheckInStatus::CheckedIn),
      guest("JOHN SMITH", "Garcia", CampusStatus::OffCampus, CheckInStatus::NotCheckedIn),
      guest("ALEX KIM", "Smith", CampusStatus::OffCampus, CheckInStatus::CheckedIn),
    ]
  }

  #[test]
  fn default_query_returns_everything_in_order() {
    let records = sample();
    let out = filter(&records, &SearchQuery::default());
    assert_eq!(out.len(), records.len());
    assert!(out.iter().zip(&records).all(|(a, b)| *a == b));
  }

  #[test]
  fn text_matches_guest_name_case_insensitively() {
    let records = sample();
    let q = SearchQuery::new("jan", StatusFilter::All, LocationFilter::All);
    let names: Vec<_> = filter(&records, &q).into_iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["JANE DOE"]);
  }

  #[test]
  fn text_matches_host_name_too() {
    let records = sample();
    let q = SearchQuery::new("smith", StatusFilter::All, LocationFilter::All);
    let names: Vec<_> = filter(&records, &q).into_iter().map(|r| r.name.as_str()).collect();
    // JOHN SMITH by name, the other two by host.
    assert_eq!(names, ["JANE DOE", "JOHN SMITH", "ALEX KIM"]);
  }

  #[test]
  fn predicates_are_anded() {
    let records = sample();
    let q = SearchQuery::new("smith", StatusFilter::CheckedIn, LocationFilter::OffCampus);
    let names: Vec<_> = filter(&records, &q).into_iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["ALEX KIM"]);
  }

  #[test]
  fn status_filter_not_checked_in() {
    let records = sample();
    let q = SearchQuery::new("", StatusFilter::NotCheckedIn, LocationFilter::All);
    let out = filter(&records, &q);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].name, "JOHN SMITH");
  }

  #[test]
  fn cohort_filter_is_exact() {
    let mut records = sample();
    records[0].cohort = Some("2026".into());
    records[2].cohort = Some("2027".into());
    let q = SearchQuery::with_cohort(
      "",
      StatusFilter::All,
      LocationFilter::All,
      Some("2026".into()),
    );
    let out = filter(&records, &q);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].name, "JANE DOE");
  }

  #[test]
  fn empty_input_is_empty_output() {
    let q = SearchQuery::new("x", StatusFilter::CheckedIn, LocationFilter::OnCampus);
    let none: Vec<GuestRecord> = Vec::new();
    assert!(filter(&none, &q).is_empty());
  }

  #[test]
  fn filter_does_not_touch_input() {
    let records = sample();
    let before = records.clone();
    let _ = filter(&records, &SearchQuery::new("zzz", StatusFilter::All, LocationFilter::All));
    assert_eq!(records, before);
  }

  #[test]
  fn cycles_wrap_around() {
    assert_eq!(StatusFilter::All.cycle().cycle().cycle(), StatusFilter::All);
    assert_eq!(LocationFilter::OffCampus.cycle(), LocationFilter::All);
    assert!(SearchQuery::default().is_unfiltered());
  }
}
