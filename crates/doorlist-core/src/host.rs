//! The host directory: members who may invite guests.
//!
//! Owned by the roster upload; the guest-management core only reads it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A member who invites guests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Host {
  pub name:   String,
  /// Class year, copied onto each guest this host invites.
  pub cohort: Option<String>,
}

/// Hosts keyed by exact (trimmed) name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Host>", into = "Vec<Host>")]
pub struct HostDirectory {
  hosts: BTreeMap<String, Host>,
}

impl HostDirectory {
  pub fn new() -> Self { Self::default() }

  /// Add or replace a host. The stored name is trimmed, so records built
  /// from this directory carry the same name the store writes.
  pub fn insert(&mut self, host: Host) {
    let name = host.name.trim().to_owned();
    self.hosts.insert(name.clone(), Host { name, ..host });
  }

  pub fn get(&self, name: &str) -> Option<&Host> { self.hosts.get(name.trim()) }

  pub fn contains(&self, name: &str) -> bool { self.get(name).is_some() }

  pub fn len(&self) -> usize { self.hosts.len() }

  pub fn is_empty(&self) -> bool { self.hosts.is_empty() }

  /// Hosts in name order.
  pub fn iter(&self) -> impl Iterator<Item = &Host> { self.hosts.values() }
}

impl FromIterator<Host> for HostDirectory {
  fn from_iter<I: IntoIterator<Item = Host>>(iter: I) -> Self {
    let mut dir = Self::new();
    for host in iter {
      dir.insert(host);
    }
    dir
  }
}

impl From<Vec<Host>> for HostDirectory {
  fn from(hosts: Vec<Host>) -> Self { hosts.into_iter().collect() }
}

impl From<HostDirectory> for Vec<Host> {
  fn from(dir: HostDirectory) -> Self { dir.hosts.into_values().collect() }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn lookup_is_exact_after_trimming() {
    let dir = HostDirectory::from_iter([Host { name: "Smith".into(), cohort: None }]);
    assert!(dir.contains("Smith"));
    assert!(dir.contains(" Smith "));
    assert!(!dir.contains("smith"));
    assert!(!dir.contains("Nobody"));
  }

  #[test]
  fn padded_names_are_stored_trimmed() {
    let dir = HostDirectory::from_iter([Host { name: " Lee ".into(), cohort: None }]);
    assert_eq!(dir.get("Lee").unwrap().name, "Lee");
    assert_eq!(dir.iter().next().unwrap().name, "Lee");
  }

  #[test]
  fn later_insert_replaces_cohort() {
    let mut dir = HostDirectory::new();
    dir.insert(Host { name: "Lee".into(), cohort: Some("2025".into()) });
    dir.insert(Host { name: "Lee".into(), cohort: Some("2026".into()) });
    assert_eq!(dir.len(), 1);
    assert_eq!(dir.get("Lee").unwrap().cohort.as_deref(), Some("2026"));
  }

  #[test]
  fn serialises_as_a_list() {
    let dir = HostDirectory::from_iter([
      Host { name: "B".into(), cohort: None },
      Host { name: "A".into(), cohort: Some("2027".into()) },
    ]);
    let json = serde_json::to_value(&dir).unwrap();
    assert_eq!(json[0]["name"], "A");
    assert_eq!(json[1]["name"], "B");
  }
}
