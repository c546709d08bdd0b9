//! The `RosterStore` trait.
//!
//! Implemented by storage backends (e.g. `doorlist-store-sqlite`). Higher
//! layers (`doorlist-api`, the workflows in [`crate::roster`]) depend on this
//! abstraction, not on any concrete backend.

use std::{collections::BTreeSet, future::Future};

use crate::{
  Error,
  guest::GuestRecord,
  host::{Host, HostDirectory},
  roster::ReconcileReport,
  transition::StatusChange,
};

/// Error type of a [`RosterStore`] backend.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  /// The domain rejection behind this error, if it is one (unknown host,
  /// duplicate name, missing guest). `None` for I/O and encoding failures.
  fn rejection(&self) -> Option<&Error>;
}

/// A table of guests keyed by name, plus the host directory.
///
/// Every call is a single attempt: it either completes or fails, with no
/// retries. Concurrent writers to the same guest are last-write-wins.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait RosterStore: Send + Sync {
  type Error: StoreError;

  // ── Guests ────────────────────────────────────────────────────────────

  /// Every guest, in insertion order.
  fn select_all(
    &self,
  ) -> impl Future<Output = Result<Vec<GuestRecord>, Self::Error>> + Send + '_;

  /// Look a guest up by exact (already normalised) name.
  fn select_by_name<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<Option<GuestRecord>, Self::Error>> + Send + 'a;

  /// Persist a new guest.
  ///
  /// Rejects with [`Error::HostNotFound`] if `record.host_name` is not in the
  /// host directory and [`Error::DuplicateName`] if the name is taken. The
  /// host check and the insert are atomic.
  fn insert(
    &self,
    record: GuestRecord,
  ) -> impl Future<Output = Result<GuestRecord, Self::Error>> + Send + '_;

  /// Write the check-in fields of one guest. Rejects with
  /// [`Error::GuestNotFound`] if no guest has `change.name`.
  fn update_status(
    &self,
    change: StatusChange,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Remove every guest whose name is not in `current_names`; returns how
  /// many were removed.
  fn delete_missing(
    &self,
    current_names: BTreeSet<String>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  // ── Hosts ─────────────────────────────────────────────────────────────

  fn hosts(
    &self,
  ) -> impl Future<Output = Result<HostDirectory, Self::Error>> + Send + '_;

  /// Add hosts or update their cohort. Existing guests keep the cohort they
  /// were created with.
  fn upsert_hosts(
    &self,
    hosts: Vec<Host>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  // ── Roster ────────────────────────────────────────────────────────────

  /// Apply a validated roster as one atomic step: upsert `hosts`, insert
  /// each of `records` whose name is not stored yet, then delete every
  /// stored guest not named in `records`.
  ///
  /// `records` have distinct names. If any step fails, including a record
  /// whose host is unknown ([`Error::HostNotFound`]), nothing is written.
  /// The returned report leaves `duplicates` at zero.
  fn reconcile(
    &self,
    hosts: Vec<Host>,
    records: Vec<GuestRecord>,
  ) -> impl Future<Output = Result<ReconcileReport, Self::Error>> + Send + '_;
}
