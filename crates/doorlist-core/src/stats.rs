//! Aggregation over guest collections for the dashboard.
//!
//! Every function here is total: empty input yields zeros or empty output,
//! never an error.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::guest::{CampusStatus, CheckInStatus, Gender, GuestRecord};

// ─── Primitives ──────────────────────────────────────────────────────────────

/// `(total, checked_in)` over `records`.
pub fn total_and_checked_in<'a>(
  records: impl IntoIterator<Item = &'a GuestRecord>,
) -> (usize, usize) {
  records.into_iter().fold((0, 0), |(total, checked_in), r| {
    (total + 1, checked_in + usize::from(r.is_checked_in()))
  })
}

/// Fraction of `records` whose key equals `target`. An empty collection
/// yields `0.0`.
///
/// To restrict to a subset (say, only checked-in guests), filter the
/// iterator before passing it in.
pub fn ratio_by<'a, K, F>(
  records: impl IntoIterator<Item = &'a GuestRecord>,
  key_fn: F,
  target: K,
) -> f64
where
  K: PartialEq,
  F: Fn(&GuestRecord) -> K,
{
  let (total, hits) = records.into_iter().fold((0usize, 0usize), |(n, h), r| {
    (n + 1, h + usize::from(key_fn(r) == target))
  });
  if total == 0 { 0.0 } else { hits as f64 / total as f64 }
}

/// Count records per key, most common first; equal counts in key order.
pub fn group_counts<'a, K, F>(
  records: impl IntoIterator<Item = &'a GuestRecord>,
  key_fn: F,
) -> Vec<(K, usize)>
where
  K: Ord,
  F: Fn(&GuestRecord) -> K,
{
  let mut counts: BTreeMap<K, usize> = BTreeMap::new();
  for r in records {
    *counts.entry(key_fn(r)).or_default() += 1;
  }
  let mut out: Vec<(K, usize)> = counts.into_iter().collect();
  // Stable sort over key-ordered input keeps ties in ascending key order.
  out.sort_by(|a, b| b.1.cmp(&a.1));
  out
}

// ─── Check-in curve ──────────────────────────────────────────────────────────

/// Cumulative check-ins over time, oldest first.
///
/// Yields each point once; it cannot be rewound. Build a new one with
/// [`time_series`] to iterate again.
#[derive(Debug)]
pub struct CheckInCurve {
  times: std::vec::IntoIter<DateTime<Utc>>,
  seen:  usize,
}

impl Iterator for CheckInCurve {
  type Item = (DateTime<Utc>, usize);

  fn next(&mut self) -> Option<Self::Item> {
    let at = self.times.next()?;
    self.seen += 1;
    Some((at, self.seen))
  }

  fn size_hint(&self) -> (usize, Option<usize>) { self.times.size_hint() }
}

impl ExactSizeIterator for CheckInCurve {}

/// Build the cumulative check-in curve. Guests that are not checked in, or
/// have no check-in time, are left out.
pub fn time_series<'a>(
  records: impl IntoIterator<Item = &'a GuestRecord>,
) -> CheckInCurve {
  let mut times: Vec<DateTime<Utc>> = records
    .into_iter()
    .filter(|r| r.check_in_status == CheckInStatus::CheckedIn)
    .filter_map(|r| r.check_in_time)
    .collect();
  times.sort_unstable();
  CheckInCurve { times: times.into_iter(), seen: 0 }
}

// ─── Dashboard ───────────────────────────────────────────────────────────────

/// Everything the dashboard shows, computed in one pass over a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
  pub total:                 usize,
  pub checked_in:            usize,
  pub remaining:             usize,
  /// Checked in as a percentage of the listed guests.
  pub capacity_pct:          f64,
  /// Walk-ins added after the roster upload.
  pub late_adds:             usize,

  // Splits among checked-in guests.
  pub checked_in_on_campus:  usize,
  pub checked_in_off_campus: usize,
  pub on_campus_pct:         f64,
  pub checked_in_female:     usize,
  pub checked_in_male:       usize,
  pub female_pct:            f64,

  // Distributions over all listed guests.
  pub by_host:               Vec<(String, usize)>,
  pub by_gender:             Vec<(Gender, usize)>,
  pub by_campus:             Vec<(CampusStatus, usize)>,
  /// `None` collects guests whose host has no cohort on file.
  pub by_cohort:             Vec<(Option<String>, usize)>,
}

impl DashboardStats {
  pub fn compute(records: &[GuestRecord]) -> Self {
    let (total, checked_in) = total_and_checked_in(records);
    let present = || records.iter().filter(|r| r.is_checked_in());

    let checked_in_on_campus = present()
      .filter(|r| r.campus_status == CampusStatus::OnCampus)
      .count();
    let checked_in_female = present().filter(|r| r.gender == Gender::F).count();

    Self {
      total,
      checked_in,
      remaining: total - checked_in,
      capacity_pct: 100.0
        * ratio_by(records, |r| r.check_in_status, CheckInStatus::CheckedIn),
      late_adds: records.iter().filter(|r| r.is_late_add).count(),

      checked_in_on_campus,
      checked_in_off_campus: checked_in - checked_in_on_campus,
      on_campus_pct: 100.0
        * ratio_by(present(), |r| r.campus_status, CampusStatus::OnCampus),
      checked_in_female,
      checked_in_male: checked_in - checked_in_female,
      female_pct: 100.0 * ratio_by(present(), |r| r.gender, Gender::F),

      by_host: group_counts(records, |r| r.host_name.clone()),
      by_gender: group_counts(records, |r| r.gender),
      by_campus: group_counts(records, |r| r.campus_status),
      by_cohort: group_counts(records, |r| r.cohort.clone()),
    }
  }
}
