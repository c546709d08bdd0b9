//! Application state machine and event dispatcher.
//!
//! The app owns its snapshot of the guest list and the current
//! [`SearchQuery`]. The visible list and the dashboard are recomputed from
//! those two on every frame; a toggle reaches the snapshot only once the
//! server has confirmed it.

use std::{collections::BTreeSet, sync::Arc};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use doorlist_core::{
  guest::{CampusStatus, Gender, GuestRecord, NewGuest},
  host::Host,
  query::{LocationFilter, SearchQuery, StatusFilter, filter},
  stats::DashboardStats,
};

use crate::client::ApiClient;

// ─── Mode ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
  /// Moving through the guest list.
  Browse,
  /// Typing into the search box.
  Search,
  /// Filling in the quick-add form.
  AddGuest,
}

// ─── Quick-add form ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
  Name,
  Host,
  Campus,
  Gender,
}

impl FormField {
  fn next(self) -> Self {
    match self {
      Self::Name => Self::Host,
      Self::Host => Self::Campus,
      Self::Campus => Self::Gender,
      Self::Gender => Self::Name,
    }
  }

  fn prev(self) -> Self {
    match self {
      Self::Name => Self::Gender,
      Self::Host => Self::Name,
      Self::Campus => Self::Host,
      Self::Gender => Self::Campus,
    }
  }
}

/// Fields of a walk-in guest being entered at the door.
#[derive(Debug, Clone)]
pub struct AddGuestForm {
  pub field:         FormField,
  pub name:          String,
  /// Index into [`App::hosts`].
  pub host_idx:      usize,
  pub campus_status: CampusStatus,
  pub gender:        Gender,
}

impl Default for AddGuestForm {
  fn default() -> Self {
    Self {
      field:         FormField::Name,
      name:          String::new(),
      host_idx:      0,
      campus_status: CampusStatus::OnCampus,
      gender:        Gender::F,
    }
  }
}

impl AddGuestForm {
  /// Step the selected choice field forwards (`delta = 1`) or back.
  fn cycle(&mut self, delta: isize, host_count: usize) {
    match self.field {
      FormField::Name => {}
      FormField::Host if host_count > 0 => {
        self.host_idx =
          (self.host_idx as isize + delta).rem_euclid(host_count as isize) as usize;
      }
      FormField::Host => {}
      FormField::Campus => {
        self.campus_status = match self.campus_status {
          CampusStatus::OnCampus => CampusStatus::OffCampus,
          CampusStatus::OffCampus => CampusStatus::OnCampus,
        };
      }
      FormField::Gender => {
        self.gender = match self.gender {
          Gender::F => Gender::M,
          Gender::M => Gender::F,
        };
      }
    }
  }

  /// The request body for this form, or `None` if no host is selectable.
  pub fn to_new_guest(&self, hosts: &[Host]) -> Option<NewGuest> {
    let host = hosts.get(self.host_idx)?;
    Some(NewGuest {
      name:          self.name.clone(),
      host_name:     host.name.clone(),
      campus_status: self.campus_status,
      gender:        self.gender,
    })
  }
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App {
  pub mode: Mode,

  /// Every guest as last returned by the server, in roster order.
  pub guests: Vec<GuestRecord>,

  /// Host directory, sorted by name. Drives the quick-add host picker.
  pub hosts: Vec<Host>,

  /// The query the visible list is filtered by.
  pub query: SearchQuery,

  /// Text being typed in [`Mode::Search`].
  pub search_input: String,

  /// Cursor position within the *visible* guest list.
  pub list_cursor: usize,

  pub form: AddGuestForm,

  /// One-line status message shown in the status bar.
  pub status_msg: String,

  pub client: Arc<ApiClient>,
}

impl App {
  pub fn new(client: ApiClient) -> Self {
    Self {
      mode: Mode::Browse,
      guests: Vec::new(),
      hosts: Vec::new(),
      query: SearchQuery::default(),
      search_input: String::new(),
      list_cursor: 0,
      form: AddGuestForm::default(),
      status_msg: String::new(),
      client: Arc::new(client),
    }
  }

  // ── Data loading ──────────────────────────────────────────────────────────

  /// Replace the snapshot with the server's current guests and hosts.
  pub async fn refresh(&mut self) -> anyhow::Result<()> {
    self.status_msg = "Loading guests…".into();
    let loaded = async {
      let guests = self.client.list_guests().await?;
      let hosts = self.client.list_hosts().await?;
      anyhow::Ok((guests, hosts))
    }
    .await;

    match loaded {
      Ok((guests, hosts)) => {
        self.guests = guests;
        self.hosts = hosts;
        self.clamp_cursor();
        self.status_msg = format!("Loaded {} guests", self.guests.len());
        Ok(())
      }
      Err(e) => {
        self.status_msg = format!("Error: {e}");
        Err(e)
      }
    }
  }

  // ── Derived views ─────────────────────────────────────────────────────────

  /// Guests matching the current query, in roster order.
  pub fn visible(&self) -> Vec<&GuestRecord> { filter(&self.guests, &self.query) }

  pub fn cursor_guest(&self) -> Option<&GuestRecord> {
    self.visible().get(self.list_cursor).copied()
  }

  /// Event-wide summary over the whole snapshot.
  pub fn stats(&self) -> DashboardStats { DashboardStats::compute(&self.guests) }

  /// Distinct cohorts present in the snapshot, sorted.
  pub fn cohorts(&self) -> Vec<String> {
    self
      .guests
      .iter()
      .filter_map(|g| g.cohort.clone())
      .collect::<BTreeSet<_>>()
      .into_iter()
      .collect()
  }

  fn clamp_cursor(&mut self) {
    let len = self.visible().len();
    self.list_cursor = self.list_cursor.min(len.saturating_sub(1));
  }

  // ── Query edits ───────────────────────────────────────────────────────────

  /// Build a fresh query from `search_input` and the given filter parts.
  fn rebuild_query(
    &mut self,
    status: StatusFilter,
    location: LocationFilter,
    cohort: Option<String>,
  ) {
    self.query =
      SearchQuery::with_cohort(self.search_input.clone(), status, location, cohort);
    self.list_cursor = 0;
  }

  fn set_text(&mut self) {
    self.rebuild_query(
      self.query.status_filter(),
      self.query.location_filter(),
      self.query.cohort().map(str::to_owned),
    );
  }

  fn cycle_status(&mut self) {
    self.rebuild_query(
      self.query.status_filter().cycle(),
      self.query.location_filter(),
      self.query.cohort().map(str::to_owned),
    );
  }

  fn cycle_location(&mut self) {
    self.rebuild_query(
      self.query.status_filter(),
      self.query.location_filter().cycle(),
      self.query.cohort().map(str::to_owned),
    );
  }

  /// All cohorts, then each known cohort in order.
  fn cycle_cohort(&mut self) {
    let cohorts = self.cohorts();
    let next = match self.query.cohort() {
      None => cohorts.first().cloned(),
      Some(current) => cohorts
        .iter()
        .position(|c| c == current)
        .and_then(|i| cohorts.get(i + 1))
        .cloned(),
    };
    self.rebuild_query(
      self.query.status_filter(),
      self.query.location_filter(),
      next,
    );
  }

  // ── Mutations ─────────────────────────────────────────────────────────────

  /// Swap the server-confirmed `record` into the snapshot.
  pub fn apply_confirmed(&mut self, record: GuestRecord) {
    match self.guests.iter_mut().find(|g| g.name == record.name) {
      Some(slot) => *slot = record,
      None => self.guests.push(record),
    }
    self.clamp_cursor();
  }

  async fn toggle_cursor(&mut self) {
    let Some((name, expected)) = self
      .cursor_guest()
      .map(|g| (g.name.clone(), g.check_in_status))
    else {
      return;
    };

    match self.client.toggle(&name, expected).await {
      Ok(record) => {
        self.status_msg = if record.is_checked_in() {
          format!("{} checked in", record.name)
        } else {
          format!("{} checked out", record.name)
        };
        self.apply_confirmed(record);
      }
      Err(e) => self.status_msg = format!("Error: {e}  (r to refresh)"),
    }
  }

  async fn submit_form(&mut self) {
    let Some(guest) = self.form.to_new_guest(&self.hosts) else {
      self.status_msg = "No hosts loaded; cannot add guests".into();
      return;
    };

    match self.client.add_guest(&guest).await {
      Ok(record) => {
        self.status_msg = format!("Added {}", record.name);
        self.apply_confirmed(record);
        self.form = AddGuestForm::default();
        self.mode = Mode::Browse;
      }
      Err(e) => self.status_msg = format!("Error: {e}"),
    }
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return Ok(false);
    }

    match self.mode {
      Mode::Browse => self.handle_browse_key(key).await,
      Mode::Search => Ok(self.handle_search_key(key)),
      Mode::AddGuest => self.handle_form_key(key).await,
    }
  }

  fn handle_search_key(&mut self, key: KeyEvent) -> bool {
    match key.code {
      KeyCode::Esc => {
        self.search_input.clear();
        self.set_text();
        self.mode = Mode::Browse;
      }
      KeyCode::Enter => self.mode = Mode::Browse,
      KeyCode::Backspace => {
        self.search_input.pop();
        self.set_text();
      }
      KeyCode::Char(c) => {
        self.search_input.push(c);
        self.set_text();
      }
      _ => {}
    }
    true
  }

  async fn handle_browse_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    match key.code {
      KeyCode::Char('q') => return Ok(false),

      // Navigation
      KeyCode::Down | KeyCode::Char('j') => {
        let len = self.visible().len();
        if len > 0 && self.list_cursor + 1 < len {
          self.list_cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.list_cursor = self.list_cursor.saturating_sub(1);
      }

      // Query
      KeyCode::Char('/') => self.mode = Mode::Search,
      KeyCode::Char('s') => self.cycle_status(),
      KeyCode::Char('l') => self.cycle_location(),
      KeyCode::Char('c') => self.cycle_cohort(),

      // Actions
      KeyCode::Char(' ') | KeyCode::Enter => self.toggle_cursor().await,
      KeyCode::Char('r') => {
        // Failure is already reported in the status bar.
        let _ = self.refresh().await;
      }
      KeyCode::Char('a') => {
        self.form = AddGuestForm::default();
        self.mode = Mode::AddGuest;
      }

      _ => {}
    }
    Ok(true)
  }

  async fn handle_form_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    let host_count = self.hosts.len();
    match key.code {
      KeyCode::Esc => self.mode = Mode::Browse,
      KeyCode::Enter => self.submit_form().await,
      KeyCode::Tab | KeyCode::Down => self.form.field = self.form.field.next(),
      KeyCode::BackTab | KeyCode::Up => self.form.field = self.form.field.prev(),
      KeyCode::Left => self.form.cycle(-1, host_count),
      KeyCode::Right => self.form.cycle(1, host_count),
      KeyCode::Backspace if self.form.field == FormField::Name => {
        self.form.name.pop();
      }
      KeyCode::Char(c) if self.form.field == FormField::Name => self.form.name.push(c),
      KeyCode::Char(' ') => self.form.cycle(1, host_count),
      _ => {}
    }
    Ok(true)
  }
}
