//! Guest list pane (left panel).

use doorlist_core::{
  guest::CampusStatus,
  query::{LocationFilter, StatusFilter},
};
use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::app::{App, Mode};

/// Render the guest list into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let visible = app.visible();
  let total = app.guests.len();

  let title = if app.query.is_unfiltered() {
    format!(" Guests ({total}) ")
  } else {
    format!(" Guests ({}/{total}) {}", visible.len(), filter_label(app))
  };

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  let items: Vec<ListItem> = visible
    .iter()
    .map(|guest| {
      let (mark, mark_style) = if guest.is_checked_in() {
        ("● ", Style::default().fg(Color::Green))
      } else {
        ("○ ", Style::default().fg(Color::DarkGray))
      };
      let campus = match guest.campus_status {
        CampusStatus::OnCampus => "on ",
        CampusStatus::OffCampus => "off",
      };
      let late = if guest.is_late_add { " +" } else { "" };

      ListItem::new(Line::from(vec![
        Span::styled(mark, mark_style),
        Span::raw(format!("{:<28}", guest.name)),
        Span::styled(
          format!("{:<16} {campus}", guest.host_name),
          Style::default().fg(Color::Gray),
        ),
        Span::styled(late, Style::default().fg(Color::Yellow)),
      ]))
    })
    .collect();

  let mut inner_area = block.inner(area);
  f.render_widget(block, area);

  // Search bar on the last inner row while typing or while a search is set.
  let searching = app.mode == Mode::Search || !app.search_input.is_empty();
  if searching && inner_area.height > 2 {
    let search_area = Rect {
      x:      inner_area.x,
      y:      inner_area.y + inner_area.height - 1,
      width:  inner_area.width,
      height: 1,
    };
    inner_area.height = inner_area.height.saturating_sub(1);

    let text = if app.mode == Mode::Search {
      format!("/{}_", app.search_input)
    } else {
      format!("/{}", app.search_input)
    };
    f.render_widget(
      Paragraph::new(text).style(Style::default().fg(Color::Yellow)),
      search_area,
    );
  }

  let mut state = ListState::default();
  state.select(if visible.is_empty() {
    None
  } else {
    Some(app.list_cursor)
  });

  f.render_stateful_widget(
    List::new(items).highlight_style(
      Style::default()
        .bg(Color::Blue)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD),
    ),
    inner_area,
    &mut state,
  );
}

/// Short description of the active categorical filters, e.g. `[in · on campus]`.
fn filter_label(app: &App) -> String {
  let mut parts = Vec::new();
  match app.query.status_filter() {
    StatusFilter::All => {}
    StatusFilter::CheckedIn => parts.push("in".to_owned()),
    StatusFilter::NotCheckedIn => parts.push("not in".to_owned()),
  }
  match app.query.location_filter() {
    LocationFilter::All => {}
    LocationFilter::OnCampus => parts.push("on campus".to_owned()),
    LocationFilter::OffCampus => parts.push("off campus".to_owned()),
  }
  if let Some(cohort) = app.query.cohort() {
    parts.push(format!("class of {cohort}"));
  }

  if parts.is_empty() {
    String::new()
  } else {
    format!("[{}] ", parts.join(" · "))
  }
}
