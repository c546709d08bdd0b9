//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings. Enums are stored as their
//! `strum` text form (`on_campus`, `checked_in`, `F`, ...).

use std::str::FromStr;

use chrono::{DateTime, Utc};
use doorlist_core::guest::GuestRecord;

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Enums ───────────────────────────────────────────────────────────────────

pub fn decode_variant<T: FromStr>(kind: &'static str, s: &str) -> Result<T> {
  s.parse().map_err(|_| {
    Error::Core(doorlist_core::Error::UnknownVariant {
      kind,
      value: s.to_owned(),
    })
  })
}

// ─── Row types ───────────────────────────────────────────────────────────────

pub const GUEST_COLUMNS: &str = "name, host_name, campus_status, gender, \
                                 check_in_status, check_in_time, is_late_add, cohort";

/// Raw values read directly from a `guests` row, in [`GUEST_COLUMNS`] order.
pub struct RawGuest {
  pub name:            String,
  pub host_name:       String,
  pub campus_status:   String,
  pub gender:          String,
  pub check_in_status: String,
  pub check_in_time:   Option<String>,
  pub is_late_add:     bool,
  pub cohort:          Option<String>,
}

impl RawGuest {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      name:            row.get(0)?,
      host_name:       row.get(1)?,
      campus_status:   row.get(2)?,
      gender:          row.get(3)?,
      check_in_status: row.get(4)?,
      check_in_time:   row.get(5)?,
      is_late_add:     row.get(6)?,
      cohort:          row.get(7)?,
    })
  }

  pub fn from_record(record: &GuestRecord) -> Self {
    Self {
      name:            record.name.clone(),
      host_name:       record.host_name.clone(),
      campus_status:   record.campus_status.as_ref().to_owned(),
      gender:          record.gender.as_ref().to_owned(),
      check_in_status: record.check_in_status.as_ref().to_owned(),
      check_in_time:   record.check_in_time.map(encode_dt),
      is_late_add:     record.is_late_add,
      cohort:          record.cohort.clone(),
    }
  }

  pub fn into_record(self) -> Result<GuestRecord> {
    Ok(GuestRecord {
      name:            self.name,
      host_name:       self.host_name,
      campus_status:   decode_variant("campus status", &self.campus_status)?,
      gender:          decode_variant("gender", &self.gender)?,
      check_in_status: decode_variant("check-in status", &self.check_in_status)?,
      check_in_time:   self.check_in_time.as_deref().map(decode_dt).transpose()?,
      is_late_add:     self.is_late_add,
      cohort:          self.cohort,
    })
  }
}

#[cfg(test)]
mod tests {
  use doorlist_core::guest::{CampusStatus, CheckInStatus, Gender};

  use super::*;

  fn raw() -> RawGuest {
    RawGuest {
      name:            "JANE DOE".into(),
      host_name:       "Smith".into(),
      campus_status:   "off_campus".into(),
      gender:          "F".into(),
      check_in_status: "checked_in".into(),
      check_in_time:   Some("2026-02-14T21:30:00+00:00".into()),
      is_late_add:     true,
      cohort:          Some("2026".into()),
    }
  }

  #[test]
  fn decodes_a_full_row() {
    let record = raw().into_record().unwrap();
    assert_eq!(record.campus_status, CampusStatus::OffCampus);
    assert_eq!(record.gender, Gender::F);
    assert_eq!(record.check_in_status, CheckInStatus::CheckedIn);
    assert_eq!(
      record.check_in_time.map(encode_dt).as_deref(),
      Some("2026-02-14T21:30:00+00:00")
    );
  }

  #[test]
  fn encoding_a_record_gives_back_the_same_row() {
    let row = RawGuest::from_record(&raw().into_record().unwrap());
    assert_eq!(row.campus_status, "off_campus");
    assert_eq!(row.check_in_status, "checked_in");
    assert_eq!(row.check_in_time.as_deref(), Some("2026-02-14T21:30:00+00:00"));
  }

  #[test]
  fn unknown_enum_text_is_reported() {
    let mut bad = raw();
    bad.gender = "X".into();
    let err = bad.into_record().unwrap_err();
    assert!(matches!(
      err,
      Error::Core(doorlist_core::Error::UnknownVariant { kind: "gender", .. })
    ));
  }

  #[test]
  fn bad_timestamp_is_a_date_error() {
    let mut bad = raw();
    bad.check_in_time = Some("last tuesday".into());
    assert!(matches!(bad.into_record(), Err(Error::DateParse(_))));
  }
}
