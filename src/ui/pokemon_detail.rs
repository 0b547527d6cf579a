//! Pokémon detail screen UI
//!
//! Renders the full record for a single Pokémon: measurements, types,
//! abilities and base stats as bars. While the record is loading a
//! placeholder is shown, and a failed load offers a retry.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{display_name, type_color};
use crate::app::{App, DetailState};
use crate::data::PokemonDetail;

/// Width of a full stat bar in cells
const STAT_BAR_WIDTH: usize = 30;

/// Stat value that fills the whole bar
const STAT_BAR_MAX: u32 = 100;

/// Renders the detail screen
///
/// # Arguments
/// * `frame` - The ratatui frame to render into
/// * `app` - The application state
/// * `name` - Name of the Pokémon being shown
pub fn render(frame: &mut Frame, app: &App, name: &str) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            format!(" {} ", display_name(name)),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ));

    let lines = match &app.detail {
        Some(DetailState::Loaded(detail)) => detail_lines(detail),
        Some(DetailState::Failed(message)) => vec![
            Line::from(Span::styled(message.clone(), Style::default().fg(Color::Red))),
            Line::from(""),
            Line::from(Span::styled(
                "Press r to retry or Esc to go back.",
                Style::default().fg(Color::DarkGray),
            )),
        ],
        Some(DetailState::Loading) | None => vec![Line::from(Span::styled(
            "Loading details...",
            Style::default().fg(Color::Cyan),
        ))],
    };

    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((app.detail_scroll_offset, 0));
    frame.render_widget(paragraph, chunks[0]);

    render_footer(frame, app, chunks[1]);
}

fn section_header(title: &'static str) -> Line<'static> {
    Line::from(Span::styled(
        title,
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    ))
}

fn detail_lines(detail: &PokemonDetail) -> Vec<Line<'static>> {
    let mut lines = vec![
        section_header("INFO"),
        Line::from(vec![
            Span::styled("  Height  ", Style::default().fg(Color::Gray)),
            Span::raw(format!("{:.1} m", detail.height_m())),
        ]),
        Line::from(vec![
            Span::styled("  Weight  ", Style::default().fg(Color::Gray)),
            Span::raw(format!("{:.1} kg", detail.weight_kg())),
        ]),
    ];

    if let Some(url) = &detail.sprite_url {
        lines.push(Line::from(vec![
            Span::styled("  Sprite  ", Style::default().fg(Color::Gray)),
            Span::styled(url.clone(), Style::default().fg(Color::DarkGray)),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(section_header("TYPES"));
    let mut type_spans = vec![Span::raw("  ")];
    for type_name in &detail.types {
        type_spans.push(Span::styled(
            format!(" {} ", type_name),
            Style::default()
                .fg(Color::Black)
                .bg(type_color(type_name)),
        ));
        type_spans.push(Span::raw(" "));
    }
    lines.push(Line::from(type_spans));

    lines.push(Line::from(""));
    lines.push(section_header("ABILITIES"));
    for ability in &detail.abilities {
        lines.push(Line::from(format!("  • {}", ability)));
    }

    lines.push(Line::from(""));
    lines.push(section_header("BASE STATS"));
    for stat in &detail.stats {
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {:<16}", stat.name),
                Style::default().fg(Color::Gray),
            ),
            Span::raw(format!("{:>3} ", stat.base_stat)),
            Span::styled(stat_bar(stat.base_stat), Style::default().fg(stat_color(stat.base_stat))),
        ]));
    }

    lines
}

/// Bar proportional to `value`, full at 100 and capped there
pub fn stat_bar(value: u32) -> String {
    let filled = value.min(STAT_BAR_MAX) as usize * STAT_BAR_WIDTH / STAT_BAR_MAX as usize;
    format!(
        "{}{}",
        "█".repeat(filled),
        "░".repeat(STAT_BAR_WIDTH - filled)
    )
}

fn stat_color(value: u32) -> Color {
    if value >= 100 {
        Color::Green
    } else if value >= 60 {
        Color::Yellow
    } else {
        Color::Red
    }
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![
        Span::styled("Esc", Style::default().fg(Color::Yellow)),
        Span::raw(" Back  "),
        Span::styled("↑/↓", Style::default().fg(Color::Yellow)),
        Span::raw(" Scroll  "),
    ];
    if matches!(app.detail, Some(DetailState::Failed(_))) {
        spans.push(Span::styled("r", Style::default().fg(Color::Yellow)));
        spans.push(Span::raw(" Retry  "));
    }
    spans.push(Span::styled("q", Style::default().fg(Color::Yellow)));
    spans.push(Span::raw(" Quit"));

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}
