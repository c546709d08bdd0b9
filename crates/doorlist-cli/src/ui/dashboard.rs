//! Dashboard pane (right panel).

use chrono::Local;
use doorlist_core::stats::time_series;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Gauge, Paragraph},
};

use crate::app::App;

const TOP_HOSTS: usize = 5;

pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let stats = app.stats();

  let block = Block::default()
    .title(" Dashboard ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Length(1), Constraint::Min(0)])
    .split(inner);

  let gauge = Gauge::default()
    .gauge_style(Style::default().fg(Color::Green).bg(Color::Black))
    .ratio((stats.capacity_pct / 100.0).clamp(0.0, 1.0))
    .label(format!(
      "{}/{} in ({:.0}%)",
      stats.checked_in, stats.total, stats.capacity_pct
    ));
  f.render_widget(gauge, rows[0]);

  let heading = |text: &str| {
    Line::from(Span::styled(
      text.to_owned(),
      Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD),
    ))
  };
  let row = |label: &str, value: String| {
    Line::from(vec![
      Span::styled(format!("{label:<14}"), Style::default().fg(Color::Gray)),
      Span::raw(value),
    ])
  };

  let latest = time_series(&app.guests)
    .last()
    .map(|(at, _)| at.with_timezone(&Local).format("%H:%M").to_string())
    .unwrap_or_else(|| "—".to_owned());

  let mut lines = vec![
    Line::from(""),
    row("Remaining", stats.remaining.to_string()),
    row("Late adds", stats.late_adds.to_string()),
    row("Last in", latest),
    Line::from(""),
    heading("Inside"),
    row(
      "On campus",
      format!(
        "{} / off {} ({:.0}% on)",
        stats.checked_in_on_campus, stats.checked_in_off_campus, stats.on_campus_pct
      ),
    ),
    row(
      "Female",
      format!(
        "{} / male {} ({:.0}% F)",
        stats.checked_in_female, stats.checked_in_male, stats.female_pct
      ),
    ),
    Line::from(""),
    heading("Guests per host"),
  ];

  lines.extend(
    stats
      .by_host
      .iter()
      .take(TOP_HOSTS)
      .map(|(host, n)| row(host, n.to_string())),
  );
  if stats.by_host.len() > TOP_HOSTS {
    lines.push(row("…", format!("{} more", stats.by_host.len() - TOP_HOSTS)));
  }

  if !stats.by_cohort.is_empty() {
    lines.push(Line::from(""));
    lines.push(heading("By class"));
    lines.extend(stats.by_cohort.iter().map(|(cohort, n)| {
      row(cohort.as_deref().unwrap_or("(none)"), n.to_string())
    }));
  }

  f.render_widget(Paragraph::new(lines), rows[1]);
}
