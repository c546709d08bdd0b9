//! [`SqliteStore`]: the SQLite implementation of [`RosterStore`].

use std::{collections::BTreeSet, path::Path};

use doorlist_core::{
  guest::GuestRecord,
  host::{Host, HostDirectory},
  roster::ReconcileReport,
  store::RosterStore,
  transition::StatusChange,
};
use rusqlite::OptionalExtension as _;

use crate::{
  Error, Result,
  encode::{GUEST_COLUMNS, RawGuest, encode_dt},
  schema::SCHEMA,
};

/// Result of the insert transaction, decided on the database thread.
enum InsertOutcome {
  Inserted,
  HostMissing,
  NameTaken,
}

/// Result of the reconcile transaction. On `HostMissing` the transaction is
/// dropped uncommitted.
enum ReconcileOutcome {
  Applied(ReconcileReport),
  HostMissing(String),
}

// ─── Transaction steps ───────────────────────────────────────────────────────

fn host_known(conn: &rusqlite::Connection, name: &str) -> rusqlite::Result<bool> {
  Ok(
    conn
      .query_row("SELECT 1 FROM hosts WHERE name = ?1", [name], |_| Ok(()))
      .optional()?
      .is_some(),
  )
}

fn guest_exists(conn: &rusqlite::Connection, name: &str) -> rusqlite::Result<bool> {
  Ok(
    conn
      .query_row("SELECT 1 FROM guests WHERE name = ?1", [name], |_| Ok(()))
      .optional()?
      .is_some(),
  )
}

fn stored_names(conn: &rusqlite::Connection) -> rusqlite::Result<Vec<String>> {
  let mut stmt = conn.prepare("SELECT name FROM guests ORDER BY guest_id")?;
  let names = stmt
    .query_map([], |row| row.get(0))?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(names)
}

fn insert_row(conn: &rusqlite::Connection, row: &RawGuest) -> rusqlite::Result<()> {
  conn.execute(
    "INSERT INTO guests (
       name, host_name, campus_status, gender,
       check_in_status, check_in_time, is_late_add, cohort
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    rusqlite::params![
      row.name,
      row.host_name,
      row.campus_status,
      row.gender,
      row.check_in_status,
      row.check_in_time,
      row.is_late_add,
      row.cohort,
    ],
  )?;
  Ok(())
}

fn write_hosts(conn: &rusqlite::Connection, hosts: &[Host]) -> rusqlite::Result<usize> {
  let mut written = 0;
  for host in hosts {
    written += conn.execute(
      "INSERT INTO hosts (name, cohort) VALUES (?1, ?2)
       ON CONFLICT(name) DO UPDATE SET cohort = excluded.cohort",
      rusqlite::params![host.name, host.cohort],
    )?;
  }
  Ok(written)
}

fn delete_absent(
  conn: &rusqlite::Connection,
  keep: &BTreeSet<String>,
) -> rusqlite::Result<usize> {
  let mut removed = 0;
  for name in stored_names(conn)?.iter().filter(|n| !keep.contains(*n)) {
    removed += conn.execute("DELETE FROM guests WHERE name = ?1", [name])?;
  }
  Ok(removed)
}

/// Trim host names; blank ones are rejected.
fn canonical_hosts(hosts: Vec<Host>) -> Result<Vec<Host>> {
  let hosts: Vec<Host> = hosts
    .into_iter()
    .map(|h| Host { name: h.name.trim().to_owned(), cohort: h.cohort })
    .collect();
  if hosts.iter().any(|h| h.name.is_empty()) {
    return Err(doorlist_core::Error::MissingField("host name").into());
  }
  Ok(hosts)
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A doorlist roster backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── RosterStore impl ────────────────────────────────────────────────────────

impl RosterStore for SqliteStore {
  type Error = Error;

  // ── Guests ────────────────────────────────────────────────────────────────

  async fn select_all(&self) -> Result<Vec<GuestRecord>> {
    let raws: Vec<RawGuest> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {GUEST_COLUMNS} FROM guests ORDER BY guest_id"
        ))?;
        let rows = stmt
          .query_map([], RawGuest::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawGuest::into_record).collect()
  }

  async fn select_by_name(&self, name: &str) -> Result<Option<GuestRecord>> {
    let name = name.to_owned();

    let raw: Option<RawGuest> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {GUEST_COLUMNS} FROM guests WHERE name = ?1"),
            rusqlite::params![name],
            RawGuest::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawGuest::into_record).transpose()
  }

  async fn insert(&self, record: GuestRecord) -> Result<GuestRecord> {
    let row = RawGuest::from_record(&record);

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        if !host_known(&tx, &row.host_name)? {
          return Ok(InsertOutcome::HostMissing);
        }
        if guest_exists(&tx, &row.name)? {
          return Ok(InsertOutcome::NameTaken);
        }
        insert_row(&tx, &row)?;
        tx.commit()?;
        Ok(InsertOutcome::Inserted)
      })
      .await?;

    match outcome {
      InsertOutcome::Inserted => Ok(record),
      InsertOutcome::HostMissing => {
        Err(doorlist_core::Error::HostNotFound(record.host_name).into())
      }
      InsertOutcome::NameTaken => {
        Err(doorlist_core::Error::DuplicateName(record.name).into())
      }
    }
  }

  async fn update_status(&self, change: StatusChange) -> Result<()> {
    let status   = change.check_in_status.as_ref().to_owned();
    let time_str = change.check_in_time.map(encode_dt);
    let name     = change.name.clone();

    let updated = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE guests SET check_in_status = ?1, check_in_time = ?2 WHERE name = ?3",
          rusqlite::params![status, time_str, name],
        )?)
      })
      .await?;

    if updated == 0 {
      return Err(doorlist_core::Error::GuestNotFound(change.name).into());
    }
    Ok(())
  }

  async fn delete_missing(&self, current_names: BTreeSet<String>) -> Result<usize> {
    let removed = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let removed = delete_absent(&tx, &current_names)?;
        tx.commit()?;
        Ok(removed)
      })
      .await?;

    Ok(removed)
  }

  // ── Hosts ─────────────────────────────────────────────────────────────────

  async fn hosts(&self) -> Result<HostDirectory> {
    let hosts: Vec<Host> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare("SELECT name, cohort FROM hosts ORDER BY name")?;
        let rows = stmt
          .query_map([], |row| {
            Ok(Host {
              name:   row.get(0)?,
              cohort: row.get(1)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(hosts.into_iter().collect())
  }

  async fn upsert_hosts(&self, hosts: Vec<Host>) -> Result<usize> {
    let hosts = canonical_hosts(hosts)?;

    let written = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let written = write_hosts(&tx, &hosts)?;
        tx.commit()?;
        Ok(written)
      })
      .await?;

    Ok(written)
  }

  // ── Roster ────────────────────────────────────────────────────────────────

  async fn reconcile(
    &self,
    hosts: Vec<Host>,
    records: Vec<GuestRecord>,
  ) -> Result<ReconcileReport> {
    let hosts = canonical_hosts(hosts)?;
    let rows: Vec<RawGuest> = records.iter().map(RawGuest::from_record).collect();

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut report = ReconcileReport {
          hosts: write_hosts(&tx, &hosts)?,
          ..ReconcileReport::default()
        };

        let stored: BTreeSet<String> = stored_names(&tx)?.into_iter().collect();
        let mut keep = BTreeSet::new();
        for row in &rows {
          keep.insert(row.name.clone());
          if stored.contains(&row.name) {
            report.kept += 1;
            continue;
          }
          if !host_known(&tx, &row.host_name)? {
            return Ok(ReconcileOutcome::HostMissing(row.host_name.clone()));
          }
          insert_row(&tx, row)?;
          report.inserted += 1;
        }

        report.removed = delete_absent(&tx, &keep)?;
        tx.commit()?;
        Ok(ReconcileOutcome::Applied(report))
      })
      .await?;

    match outcome {
      ReconcileOutcome::Applied(report) => Ok(report),
      ReconcileOutcome::HostMissing(host) => {
        Err(doorlist_core::Error::HostNotFound(host).into())
      }
    }
  }
}
