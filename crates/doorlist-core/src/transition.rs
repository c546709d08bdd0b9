//! Check-in / check-out transitions.
//!
//! The engine never writes anywhere. It returns the updated record together
//! with the [`StatusChange`] the caller must persist; until that write
//! succeeds the caller keeps the old record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  guest::{CheckInStatus, GuestRecord},
};

/// Field-level delta for one guest, addressed by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
  pub name:            String,
  pub check_in_status: CheckInStatus,
  pub check_in_time:   Option<DateTime<Utc>>,
}

/// Flip `record` to its other state, stamping the current time on check-in.
///
/// Calling this twice toggles twice. Callers reacting to possibly-duplicated
/// UI events should use [`toggle_from`] instead.
pub fn toggle_status(record: &GuestRecord) -> (GuestRecord, StatusChange) {
  toggle_status_at(record, Utc::now())
}

/// [`toggle_status`] with an explicit clock reading.
pub fn toggle_status_at(
  record: &GuestRecord,
  now: DateTime<Utc>,
) -> (GuestRecord, StatusChange) {
  let check_in_status = record.check_in_status.flipped();
  let check_in_time = match check_in_status {
    CheckInStatus::CheckedIn => Some(now),
    CheckInStatus::NotCheckedIn => None,
  };

  let change = StatusChange {
    name: record.name.clone(),
    check_in_status,
    check_in_time,
  };
  (apply(record, &change), change)
}

/// Toggle only if `record` is still in the `expected` state.
pub fn toggle_from(
  record: &GuestRecord,
  expected: CheckInStatus,
) -> Result<(GuestRecord, StatusChange)> {
  if record.check_in_status != expected {
    return Err(Error::StaleStatus {
      name: record.name.clone(),
      expected,
      actual: record.check_in_status,
    });
  }
  Ok(toggle_status(record))
}

/// Return a copy of `record` with `change` applied to its check-in fields.
pub fn apply(record: &GuestRecord, change: &StatusChange) -> GuestRecord {
  GuestRecord {
    check_in_status: change.check_in_status,
    check_in_time: change.check_in_time,
    ..record.clone()
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;
  use crate::guest::{CampusStatus, Gender};

  fn jane() -> GuestRecord {
    GuestRecord {
      name:            "JANE DOE".into(),
      host_name:       "Smith".into(),
      campus_status:   CampusStatus::OnCampus,
      gender:          Gender::F,
      check_in_status: CheckInStatus::NotCheckedIn,
      check_in_time:   None,
      is_late_add:     false,
      cohort:          Some("2026".into()),
    }
  }

  #[test]
  fn check_in_stamps_time_not_before_call() {
    let before = Utc::now();
    let (updated, change) = toggle_status(&jane());
    assert_eq!(updated.check_in_status, CheckInStatus::CheckedIn);
    let stamped = updated.check_in_time.unwrap();
    assert!(stamped >= before);
    assert_eq!(change.check_in_time, Some(stamped));
    assert_eq!(change.name, "JANE DOE");
  }

  #[test]
  fn check_out_clears_time() {
    let (checked_in, _) = toggle_status(&jane());
    let (checked_out, change) = toggle_status(&checked_in);
    assert_eq!(checked_out.check_in_status, CheckInStatus::NotCheckedIn);
    assert!(checked_out.check_in_time.is_none());
    assert!(change.check_in_time.is_none());
  }

  #[test]
  fn double_toggle_restores_status_but_not_time() {
    let t0 = Utc.with_ymd_and_hms(2026, 2, 14, 21, 0, 0).unwrap();
    let t1 = Utc.with_ymd_and_hms(2026, 2, 14, 22, 0, 0).unwrap();

    let (a, _) = toggle_status_at(&jane(), t0);
    let (b, _) = toggle_status_at(&a, t1);
    assert_eq!(b.check_in_status, jane().check_in_status);
    assert_eq!(b, jane());

    let (c, _) = toggle_status_at(&b, t1);
    assert_eq!(c.check_in_status, a.check_in_status);
    assert_ne!(c.check_in_time, a.check_in_time);
  }

  #[test]
  fn toggle_leaves_other_fields_alone() {
    let original = jane();
    let (updated, _) = toggle_status(&original);
    assert_eq!(updated.name, original.name);
    assert_eq!(updated.host_name, original.host_name);
    assert_eq!(updated.cohort, original.cohort);
    assert_eq!(updated.is_late_add, original.is_late_add);
    // The input is untouched.
    assert_eq!(original.check_in_status, CheckInStatus::NotCheckedIn);
  }

  #[test]
  fn guarded_toggle_rejects_stale_expectation() {
    let (checked_in, _) = toggle_status(&jane());
    let err = toggle_from(&checked_in, CheckInStatus::NotCheckedIn).unwrap_err();
    assert!(matches!(
      err,
      Error::StaleStatus { expected: CheckInStatus::NotCheckedIn, actual: CheckInStatus::CheckedIn, .. }
    ));

    let (out, _) = toggle_from(&checked_in, CheckInStatus::CheckedIn).unwrap();
    assert!(!out.is_checked_in());
  }
}
