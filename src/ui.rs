//! Terminal UI rendering.
//!
//! All drawing logic lives here, separated from application state ([`App`])
//! and input handling ([`crate::input`]).  The gallery is drawn as one
//! scrolled column of cards; the bottom row is a status bar.
//!
//! Drawing also refreshes [`App::viewport_height`], which the load
//! controller's look-ahead check depends on.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{App, LoadState};
use crate::window::MountedCard;

/// Draw the complete UI for one frame.
pub fn draw(app: &mut App, frame: &mut Frame) {
    let [gallery_area, status_area] = Layout::vertical([
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    app.viewport_height = gallery_area.height;

    draw_gallery(app, frame, gallery_area);
    draw_status_bar(app, frame, status_area);
}

/// Render the scrolled column of mounted cards.
fn draw_gallery(app: &App, frame: &mut Frame, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();
    for card in app.window.iter() {
        push_card(&mut lines, card, area.width);
    }

    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "Loading the gallery…",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let scroll = app.scroll.min(u32::from(u16::MAX)) as u16;
    let gallery = Paragraph::new(lines).scroll((scroll, 0));
    frame.render_widget(gallery, area);
}

/// One card: a rule, the text rows, a trailing blank line.  Keep in step
/// with [`MountedCard::height`].
fn push_card(lines: &mut Vec<Line<'_>>, card: &MountedCard, width: u16) {
    lines.push(Line::from(Span::styled(
        "─".repeat(width as usize),
        Style::default().fg(Color::DarkGray),
    )));
    lines.push(Line::from(Span::styled(
        card.title.clone(),
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(Span::styled(
        card.date_line.clone(),
        Style::default().fg(Color::DarkGray),
    )));
    lines.push(Line::from(Span::styled(
        card.media_line.clone(),
        Style::default().fg(Color::Cyan),
    )));
    if let Some(copyright) = &card.copyright_line {
        lines.push(Line::from(Span::styled(
            copyright.clone(),
            Style::default().fg(Color::DarkGray),
        )));
    }
    for body_line in &card.body {
        lines.push(Line::from(body_line.clone()));
    }
    lines.push(Line::default());
}

/// Render the bottom status bar.
fn draw_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    let buffered = app
        .buffered_len()
        .map(|n| n.to_string())
        .unwrap_or_else(|| "…".into());

    let status = Paragraph::new(Line::from(vec![
        Span::styled(
            format!(" {} ", state_label(app.state)),
            Style::default().fg(Color::Black).bg(Color::Cyan),
        ),
        Span::raw(" "),
        Span::styled(
            format!("{} in flight", app.in_flight()),
            Style::default().fg(Color::Magenta),
        ),
        Span::raw("  "),
        Span::styled(
            format!("{} mounted", app.window.len()),
            Style::default().fg(Color::Green),
        ),
        Span::raw("  "),
        Span::styled(
            format!("{buffered} buffered"),
            Style::default().fg(Color::Green),
        ),
        Span::raw("  "),
        Span::styled(
            format!("sort: {}", app.sort_label),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw("  "),
        Span::styled(&app.status, Style::default().fg(Color::Yellow)),
        Span::raw("  q: quit  ↑/↓: scroll  Home/End: jump"),
    ]));
    frame.render_widget(status, area);
}

fn state_label(state: LoadState) -> &'static str {
    match state {
        LoadState::Idle => "idle",
        LoadState::Evaluating => "evaluating",
        LoadState::Loading => "loading",
        LoadState::Deferred => "deferred",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
