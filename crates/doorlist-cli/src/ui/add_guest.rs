//! Quick-add popup for walk-in guests.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Clear, Paragraph},
};

use crate::app::{App, FormField};

pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let popup = centered(area, 50, 8);
  f.render_widget(Clear, popup);

  let block = Block::default()
    .title(" Add walk-in ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Cyan));
  let inner = block.inner(popup);
  f.render_widget(block, popup);

  let form = &app.form;
  let host = app
    .hosts
    .get(form.host_idx)
    .map(|h| h.name.as_str())
    .unwrap_or("(no hosts loaded)");
  let name = if form.field == FormField::Name {
    format!("{}_", form.name)
  } else {
    form.name.clone()
  };

  let field = |which: FormField, label: &str, value: String| {
    let focused = form.field == which;
    let label_style = if focused {
      Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
    } else {
      Style::default().fg(Color::Gray)
    };
    let value = if focused && which != FormField::Name {
      format!("‹ {value} ›")
    } else {
      value
    };
    Line::from(vec![
      Span::styled(format!("{label:<8}"), label_style),
      Span::raw(value),
    ])
  };

  let lines = vec![
    field(FormField::Name, "Name", name),
    field(FormField::Host, "Host", host.to_owned()),
    field(FormField::Campus, "Campus", form.campus_status.to_string()),
    field(FormField::Gender, "Gender", form.gender.to_string()),
    Line::from(""),
    Line::from(Span::styled(
      "Enter save  Esc cancel",
      Style::default().fg(Color::DarkGray),
    )),
  ];
  f.render_widget(Paragraph::new(lines), inner);
}

/// A `width` × `height` rectangle centred in `area`, shrunk to fit.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
  let width = width.min(area.width);
  let height = height.min(area.height);
  Rect {
    x: area.x + (area.width - width) / 2,
    y: area.y + (area.height - height) / 2,
    width,
    height,
  }
}
