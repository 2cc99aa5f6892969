//! Header toolbar with the drawer menu button
//!
//! The menu button mirrors the drawer state; pressing `m` calls
//! `App::toggle_drawer` with the inverted state.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;

use super::search_input;

/// Renders the header toolbar
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(12), // Menu button
            Constraint::Length(24), // Search box
            Constraint::Min(10),    // Status
        ])
        .split(area);

    render_menu_button(frame, app.drawer_open, chunks[0]);
    search_input::render(frame, chunks[1]);
    render_status(frame, app, chunks[2]);
}

/// Renders the menu button, highlighted while the drawer is open
fn render_menu_button(frame: &mut Frame, drawer_open: bool, area: Rect) {
    let style = if drawer_open {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };

    let block = Block::default().borders(Borders::ALL).border_style(style);
    let line = Line::from(Span::styled("\u{2261} Menu", style)); // ≡

    frame.render_widget(Paragraph::new(line).block(block), area);
}

/// Renders the app name, map center and search activity
fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![
        Span::styled(
            "NEARBY",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            format!("{:.5}, {:.5}", app.position.lat, app.position.lng),
            Style::default().fg(Color::White),
        ),
        Span::raw("  "),
        Span::styled(
            format!("{} places", app.places.len()),
            Style::default().fg(Color::Gray),
        ),
    ];

    if app.searching {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            "Searching...",
            Style::default().fg(Color::Yellow),
        ));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    fn draw(app: &App) -> String {
        let backend = TestBackend::new(100, 3);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                render(frame, app, area);
            })
            .unwrap();
        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_header_renders_menu_and_search() {
        let app = App::default();
        let content = draw(&app);
        assert!(content.contains("Menu"));
        assert!(content.contains("Search"));
        assert!(content.contains("NEARBY"));
        assert!(content.contains("121.56734"));
    }

    #[test]
    fn test_header_shows_searching_indicator() {
        let mut app = App::default();
        assert!(!draw(&app).contains("Searching"));
        app.on_map_ready();
        assert!(draw(&app).contains("Searching..."));
    }
}
