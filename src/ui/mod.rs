//! UI rendering module for the Pokédex
//!
//! This module contains all the rendering logic for the terminal user interface,
//! using the ratatui library for TUI components.

pub mod help_overlay;
pub mod pokemon_detail;
pub mod pokemon_list;

pub use help_overlay::render as render_help_overlay;
pub use pokemon_detail::render as render_pokemon_detail;
pub use pokemon_list::render as render_pokemon_list;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

use crate::app::{App, AppState};

/// Renders the screen for the current application state
pub fn render(frame: &mut Frame, app: &App) {
    match &app.state {
        AppState::Loading => render_loading(frame),
        AppState::PokemonList => render_pokemon_list(frame, app),
        AppState::PokemonDetail(name) => render_pokemon_detail(frame, app, name),
    }

    if app.show_help {
        render_help_overlay(frame);
    }
}

/// Renders a loading message while the first page is fetched
fn render_loading(frame: &mut Frame) {
    let area = frame.area();

    // Center the loading message vertically
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Length(3),
            Constraint::Percentage(45),
        ])
        .split(area);

    let loading_text = Paragraph::new("Loading Pokémon...")
        .style(Style::default().fg(Color::Cyan))
        .alignment(Alignment::Center);

    frame.render_widget(loading_text, chunks[1]);
}

/// Badge color for a Pokémon type
pub fn type_color(type_name: &str) -> Color {
    match type_name {
        "normal" => Color::Rgb(0xA8, 0xA7, 0x7A),
        "fire" => Color::Rgb(0xEE, 0x81, 0x30),
        "water" => Color::Rgb(0x63, 0x90, 0xF0),
        "electric" => Color::Rgb(0xF7, 0xD0, 0x2C),
        "grass" => Color::Rgb(0x7A, 0xC7, 0x4C),
        "ice" => Color::Rgb(0x96, 0xD9, 0xD6),
        "fighting" => Color::Rgb(0xC2, 0x2E, 0x28),
        "poison" => Color::Rgb(0xA3, 0x3E, 0xA1),
        "ground" => Color::Rgb(0xE2, 0xBF, 0x65),
        "flying" => Color::Rgb(0xA9, 0x8F, 0xF3),
        "psychic" => Color::Rgb(0xF9, 0x55, 0x87),
        "bug" => Color::Rgb(0xA6, 0xB9, 0x1A),
        "rock" => Color::Rgb(0xB6, 0xA1, 0x36),
        "ghost" => Color::Rgb(0x73, 0x57, 0x97),
        "dragon" => Color::Rgb(0x6F, 0x35, 0xFC),
        "dark" => Color::Rgb(0x70, 0x57, 0x46),
        "steel" => Color::Rgb(0xB7, 0xB7, 0xCE),
        "fairy" => Color::Rgb(0xD6, 0x85, 0xAD),
        _ => Color::Gray,
    }
}

/// Capitalizes the first letter of an API name (`mr-mime` -> `Mr-mime`)
pub fn display_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{test_app_with, FakeCatalog};
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_type_colors() {
        assert_eq!(type_color("fire"), Color::Rgb(0xEE, 0x81, 0x30));
        assert_eq!(type_color("water"), Color::Rgb(0x63, 0x90, 0xF0));
        assert_eq!(type_color("fairy"), Color::Rgb(0xD6, 0x85, 0xAD));
        assert_eq!(type_color("shadow"), Color::Gray);
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("pikachu"), "Pikachu");
        assert_eq!(display_name("mr-mime"), "Mr-mime");
        assert_eq!(display_name(""), "");
    }

    #[test]
    fn test_loading_state_renders_message() {
        let app = test_app_with(FakeCatalog::new(10), true);
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();

        terminal.draw(|frame| render(frame, &app)).unwrap();

        let buffer = terminal.backend().buffer();
        let content: String = buffer.content().iter().map(|cell| cell.symbol()).collect();
        assert!(content.contains("Loading"), "Should show loading message");
    }

    #[test]
    fn test_help_overlay_drawn_on_top() {
        let mut app = test_app_with(FakeCatalog::new(10), true);
        app.show_help = true;
        let backend = TestBackend::new(80, 30);
        let mut terminal = Terminal::new(backend).unwrap();

        terminal.draw(|frame| render(frame, &app)).unwrap();

        let buffer = terminal.backend().buffer();
        let content: String = buffer.content().iter().map(|cell| cell.symbol()).collect();
        assert!(content.contains("Keyboard Shortcuts"));
    }
}
