//! Pokémon list screen rendering
//!
//! Renders the search box, the type carousel and the filtered list, plus
//! offline and error banners and a loading footer while a page is fetched.

use std::ops::Range;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{display_name, type_color};
use crate::app::{App, InputMode};
use crate::data::Pokemon;

/// Renders the list screen
///
/// # Arguments
/// * `frame` - The ratatui Frame to render to
/// * `app` - The application state containing the filtered list and selection
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let banner_height = if app.is_offline() || app.error_message.is_some() {
        1
    } else {
        0
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),             // Title
            Constraint::Length(banner_height), // Offline / error banner
            Constraint::Length(3),             // Search box
            Constraint::Length(1),             // Type carousel
            Constraint::Min(3),                // List
            Constraint::Length(1),             // Footer
        ])
        .split(area);

    render_title(frame, app, chunks[0]);
    render_banner(frame, app, chunks[1]);
    render_search(frame, app, chunks[2]);
    render_types(frame, app, chunks[3]);
    render_list(frame, app, chunks[4]);
    render_footer(frame, app, chunks[5]);
}

fn render_title(frame: &mut Frame, app: &App, area: Rect) {
    let line = Line::from(vec![
        Span::styled(
            "POKÉDEX",
            Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            format!("{} shown / {} loaded", app.visible().len(), app.all_items().len()),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

fn render_banner(frame: &mut Frame, app: &App, area: Rect) {
    if area.height == 0 {
        return;
    }

    // A load error is more specific than the offline notice
    let line = match (&app.error_message, app.is_offline()) {
        (Some(message), _) => Line::from(Span::styled(
            format!(" {} ", message),
            Style::default().fg(Color::White).bg(Color::Red),
        )),
        (None, true) => Line::from(Span::styled(
            " Offline - showing cached data ",
            Style::default().fg(Color::Black).bg(Color::Yellow),
        )),
        (None, false) => return,
    };

    frame.render_widget(Paragraph::new(line), area);
}

fn render_search(frame: &mut Frame, app: &App, area: Rect) {
    let editing = app.input_mode == InputMode::Search;
    let border_color = if editing { Color::Yellow } else { Color::DarkGray };

    let content = if app.query().is_empty() && !editing {
        Line::from(Span::styled(
            "Press / to search",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        let mut spans = vec![Span::raw(app.query().to_string())];
        if editing {
            spans.push(Span::styled("█", Style::default().fg(Color::Yellow)));
        }
        Line::from(spans)
    };

    let block = Block::default()
        .title(" Search ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    frame.render_widget(Paragraph::new(content).block(block), area);
}

/// Renders "All" followed by every type, highlighting the active one
fn render_types(frame: &mut Frame, app: &App, area: Rect) {
    let selected = app.category();
    let mut spans = vec![type_chip("All", None, selected.is_none())];

    for type_name in &app.types {
        spans.push(Span::raw(" "));
        spans.push(type_chip(
            type_name,
            Some(type_color(type_name)),
            selected == Some(type_name.as_str()),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn type_chip(label: &str, color: Option<Color>, active: bool) -> Span<'static> {
    let color = color.unwrap_or(Color::White);
    let style = if active {
        Style::default()
            .fg(Color::Black)
            .bg(color)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(color)
    };
    Span::styled(format!(" {} ", label), style)
}

/// Rows of `len` items to show so that `selected` stays on screen
pub fn list_window(selected: usize, len: usize, rows: usize) -> Range<usize> {
    if rows == 0 || len == 0 {
        return 0..0;
    }
    let start = selected.saturating_sub(rows - 1).min(len.saturating_sub(rows));
    start..(start + rows).min(len)
}

fn render_list(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Pokémon ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let visible = app.visible();
    if visible.is_empty() {
        let message = if app.is_loading() {
            "Loading..."
        } else if app.is_filtering() {
            "Searching..."
        } else if app.all_items().is_empty() {
            "Nothing loaded yet. Press r to retry."
        } else {
            "No Pokémon match your filters."
        };
        let paragraph = Paragraph::new(Span::styled(
            message,
            Style::default().fg(Color::DarkGray),
        ))
        .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let rows = area.height.saturating_sub(2) as usize;
    let lines: Vec<Line> = list_window(app.selected_index, visible.len(), rows)
        .map(|index| pokemon_line(&visible[index], index == app.selected_index))
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn pokemon_line(pokemon: &Pokemon, is_selected: bool) -> Line<'static> {
    let cursor = if is_selected { "\u{25B8} " } else { "  " }; // ▸ or space
    let name_style = if is_selected {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };

    let mut spans = vec![
        Span::styled(cursor, Style::default().fg(Color::Cyan)),
        Span::styled(format!("{:<16}", display_name(&pokemon.name)), name_style),
    ];

    match &pokemon.types {
        Some(types) if !types.is_empty() => {
            for type_name in types {
                spans.push(Span::raw(" "));
                spans.push(Span::styled(
                    type_name.clone(),
                    Style::default().fg(type_color(type_name)),
                ));
            }
        }
        Some(_) => spans.push(Span::styled(" -", Style::default().fg(Color::DarkGray))),
        None => spans.push(Span::styled(" ?", Style::default().fg(Color::DarkGray))),
    }

    Line::from(spans)
}

/// Renders the loading indicator or the key hints
fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let line = if app.is_loading() {
        Line::from(Span::styled(
            "Loading more Pokémon...",
            Style::default().fg(Color::Yellow),
        ))
    } else if app.input_mode == InputMode::Search {
        Line::from(vec![
            Span::styled("Esc/Enter", Style::default().fg(Color::Yellow)),
            Span::raw(" Done  "),
            Span::styled("Backspace", Style::default().fg(Color::Yellow)),
            Span::raw(" Delete"),
        ])
    } else {
        Line::from(vec![
            Span::styled("↑/↓", Style::default().fg(Color::Yellow)),
            Span::raw(" Navigate  "),
            Span::styled("Enter", Style::default().fg(Color::Yellow)),
            Span::raw(" Details  "),
            Span::styled("/", Style::default().fg(Color::Yellow)),
            Span::raw(" Search  "),
            Span::styled("←/→", Style::default().fg(Color::Yellow)),
            Span::raw(" Type  "),
            Span::styled("?", Style::default().fg(Color::Yellow)),
            Span::raw(" Help  "),
            Span::styled("q", Style::default().fg(Color::Yellow)),
            Span::raw(" Quit"),
        ])
    };

    let paragraph = Paragraph::new(line).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{loaded_app, settle, test_app_with, FakeCatalog};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::{backend::TestBackend, Terminal};

    fn render_to_string(app: &App, width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_list_window_keeps_selection_visible() {
        assert_eq!(list_window(0, 50, 10), 0..10);
        assert_eq!(list_window(9, 50, 10), 0..10);
        assert_eq!(list_window(10, 50, 10), 1..11);
        assert_eq!(list_window(49, 50, 10), 40..50);
    }

    #[test]
    fn test_list_window_short_list() {
        assert_eq!(list_window(2, 4, 10), 0..4);
        assert_eq!(list_window(0, 0, 10), 0..0);
        assert_eq!(list_window(3, 5, 0), 0..0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_render_shows_items_and_types() {
        let app = loaded_app().await;

        let content = render_to_string(&app, 80, 24);

        assert!(content.contains("POKÉDEX"));
        assert!(content.contains("Mon-0"));
        assert!(content.contains("grass"));
        assert!(content.contains("All"));
        assert!(content.contains("20 shown / 20 loaded"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_selected_item_is_highlighted() {
        let app = loaded_app().await;

        let content = render_to_string(&app, 80, 24);

        assert!(
            content.contains("\u{25B8} Mon-0"),
            "Selected item should have cursor indicator"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_offline_without_cache_shows_message() {
        let mut app = test_app_with(FakeCatalog::new(100), false);
        app.load_initial().await;
        settle(&mut app).await;

        let content = render_to_string(&app, 80, 24);

        assert!(content.contains("You are offline and no cached data is available."));
        assert!(content.contains("Nothing loaded yet"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_text_is_rendered() {
        let mut app = loaded_app().await;
        app.handle_key(KeyEvent::new(KeyCode::Char('/'), KeyModifiers::NONE));
        app.handle_key(KeyEvent::new(KeyCode::Char('9'), KeyModifiers::NONE));
        settle(&mut app).await;

        let content = render_to_string(&app, 80, 24);

        assert!(content.contains("9█"));
        assert!(content.contains("Mon-9"));
        assert!(content.contains("Mon-19"));
        assert!(!content.contains("Mon-0 "));
        assert!(content.contains("Backspace"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_match_message() {
        let mut app = loaded_app().await;
        app.handle_key(KeyEvent::new(KeyCode::Char('/'), KeyModifiers::NONE));
        for c in "zzz".chars() {
            app.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        }
        settle(&mut app).await;

        let content = render_to_string(&app, 80, 24);

        assert!(content.contains("No Pokémon match your filters."));
    }

    #[test]
    fn test_unresolved_and_failed_types_render_markers() {
        let unresolved = Pokemon {
            name: "ditto".to_string(),
            url: String::new(),
            types: None,
        };
        let failed = Pokemon {
            types: Some(Vec::new()),
            ..unresolved.clone()
        };

        let text = |line: Line| -> String { line.spans.iter().map(|s| s.content.as_ref()).collect() };

        assert!(text(pokemon_line(&unresolved, false)).ends_with(" ?"));
        assert!(text(pokemon_line(&failed, false)).ends_with(" -"));
    }
}
