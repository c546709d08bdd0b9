//! Guest records. Each is one invited or walk-in guest on the door list.
//!
//! A record is created once, either from a roster upload or through the
//! quick-add path. After creation only the check-in fields change, and only
//! through [`crate::transition`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::{Error, Result, host::HostDirectory};

// ─── Enumerations ────────────────────────────────────────────────────────────

/// Whether the guest lives on or off the hosting institution's campus.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CampusStatus {
  OnCampus,
  OffCampus,
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum Gender {
  M,
  F,
}

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CheckInStatus {
  #[default]
  NotCheckedIn,
  CheckedIn,
}

impl CheckInStatus {
  /// The other state of the two-state machine.
  pub fn flipped(self) -> Self {
    match self {
      Self::NotCheckedIn => Self::CheckedIn,
      Self::CheckedIn => Self::NotCheckedIn,
    }
  }
}

/// How a guest entered the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuestOrigin {
  /// Part of an uploaded roster.
  Roster,
  /// Added at the door after the roster was loaded.
  WalkIn,
}

// ─── Records ─────────────────────────────────────────────────────────────────

/// Caller-supplied fields for a new guest. Validated by [`GuestRecord::new`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewGuest {
  pub name:          String,
  pub host_name:     String,
  pub campus_status: CampusStatus,
  pub gender:        Gender,
}

/// One guest on the door list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestRecord {
  /// Uppercase display name; the lookup key for every mutation.
  pub name:            String,
  /// The inviting member, spelled as in the host directory.
  pub host_name:       String,
  pub campus_status:   CampusStatus,
  pub gender:          Gender,
  pub check_in_status: CheckInStatus,
  /// Set while checked in, `None` otherwise.
  pub check_in_time:   Option<DateTime<Utc>>,
  /// `true` for walk-ins added after the roster upload.
  pub is_late_add:     bool,
  /// The host's cohort (class year) at creation time.
  pub cohort:          Option<String>,
}

impl GuestRecord {
  /// Validate `input` against `hosts` and build a not-checked-in record.
  ///
  /// Blank names fail with [`Error::MissingField`]; an unknown host fails
  /// with [`Error::HostNotFound`].
  pub fn new(
    input: NewGuest,
    origin: GuestOrigin,
    hosts: &HostDirectory,
  ) -> Result<Self> {
    let name = normalize_name(&input.name);
    if name.is_empty() {
      return Err(Error::MissingField("name"));
    }
    let host_name = input.host_name.trim();
    if host_name.is_empty() {
      return Err(Error::MissingField("host_name"));
    }

    let host = hosts
      .get(host_name)
      .ok_or_else(|| Error::HostNotFound(host_name.to_owned()))?;

    Ok(Self {
      name,
      host_name: host.name.clone(),
      campus_status: input.campus_status,
      gender: input.gender,
      check_in_status: CheckInStatus::NotCheckedIn,
      check_in_time: None,
      is_late_add: origin == GuestOrigin::WalkIn,
      cohort: host.cohort.clone(),
    })
  }

  pub fn is_checked_in(&self) -> bool {
    self.check_in_status == CheckInStatus::CheckedIn
  }
}

/// Canonical form of a guest name: trimmed and uppercased.
pub fn normalize_name(name: &str) -> String { name.trim().to_uppercase() }
