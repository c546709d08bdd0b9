//! Roster workflows: the store-facing operations built from the pure engines.
//!
//! Each workflow reads what it needs from a [`RosterStore`], runs the
//! relevant engine, and writes the result back. Nothing is cached here; the
//! caller owns whatever snapshot it displays.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
  Error,
  guest::{CheckInStatus, GuestOrigin, GuestRecord, NewGuest, normalize_name},
  host::{Host, HostDirectory},
  store::{RosterStore, StoreError},
  transition::{toggle_from, toggle_status},
};

/// Failure of a workflow: either the input was rejected before touching the
/// store, or the store call failed.
#[derive(Debug, Error)]
pub enum RosterError<E: StoreError> {
  #[error(transparent)]
  Invalid(#[from] Error),

  #[error("store error: {0}")]
  Store(#[source] E),
}

impl<E: StoreError> RosterError<E> {
  /// The domain error behind this failure, wherever it was raised.
  pub fn rejection(&self) -> Option<&Error> {
    match self {
      Self::Invalid(e) => Some(e),
      Self::Store(e) => e.rejection(),
    }
  }
}

// ─── Single-guest workflows ──────────────────────────────────────────────────

/// Validate `input` against the stored host directory and insert it.
pub async fn add_guest<S: RosterStore>(
  store: &S,
  input: NewGuest,
  origin: GuestOrigin,
) -> Result<GuestRecord, RosterError<S::Error>> {
  let hosts = store.hosts().await.map_err(RosterError::Store)?;
  let record = GuestRecord::new(input, origin, &hosts)?;
  store.insert(record).await.map_err(RosterError::Store)
}

/// Flip a guest's check-in status and persist it.
///
/// With `expected` set, the toggle only happens if the stored status still
/// equals it; otherwise [`Error::StaleStatus`] is returned and nothing is
/// written.
pub async fn toggle_guest<S: RosterStore>(
  store: &S,
  name: &str,
  expected: Option<CheckInStatus>,
) -> Result<GuestRecord, RosterError<S::Error>> {
  let name = normalize_name(name);
  let record = store
    .select_by_name(&name)
    .await
    .map_err(RosterError::Store)?
    .ok_or_else(|| Error::GuestNotFound(name.clone()))?;

  let (updated, change) = match expected {
    Some(expected) => toggle_from(&record, expected)?,
    None => toggle_status(&record),
  };

  store
    .update_status(change)
    .await
    .map_err(RosterError::Store)?;
  Ok(updated)
}

// ─── Bulk reconciliation ─────────────────────────────────────────────────────

/// A freshly uploaded roster: the hosts and the guests they invited.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RosterUpload {
  #[serde(default)]
  pub hosts:  Vec<Host>,
  #[serde(default)]
  pub guests: Vec<NewGuest>,
}

/// What [`replace_roster`] changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileReport {
  /// Hosts added or updated.
  pub hosts:      usize,
  pub inserted:   usize,
  /// Uploaded guests already stored; their check-in state is untouched.
  pub kept:       usize,
  /// Repeats of a name earlier in the same upload.
  pub duplicates: usize,
  /// Stored guests absent from the upload, now deleted.
  pub removed:    usize,
}

/// Make the stored roster match `upload`.
///
/// Every entry is validated before anything is written, and the store
/// applies the result in one atomic step, so a failed upload leaves the
/// store untouched. Guests already stored are kept as they are; stored
/// guests missing from the upload (walk-ins included) are removed.
pub async fn replace_roster<S: RosterStore>(
  store: &S,
  upload: RosterUpload,
) -> Result<ReconcileReport, RosterError<S::Error>> {
  if upload.hosts.iter().any(|h| h.name.trim().is_empty()) {
    return Err(Error::MissingField("host name").into());
  }

  let mut directory = store.hosts().await.map_err(RosterError::Store)?;
  for host in &upload.hosts {
    directory.insert(host.clone());
  }
  let hosts: Vec<Host> = HostDirectory::from_iter(upload.hosts).into();

  let mut seen = BTreeSet::new();
  let mut records = Vec::with_capacity(upload.guests.len());
  let mut duplicates = 0;
  for guest in upload.guests {
    let record = GuestRecord::new(guest, GuestOrigin::Roster, &directory)?;
    if seen.insert(record.name.clone()) {
      records.push(record);
    } else {
      duplicates += 1;
    }
  }

  let report = store
    .reconcile(hosts, records)
    .await
    .map_err(RosterError::Store)?;
  Ok(ReconcileReport { duplicates, ..report })
}
