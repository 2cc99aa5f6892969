//! UI rendering module for the nearby restaurant finder
//!
//! This module contains all the rendering logic for the terminal user interface,
//! using the ratatui library. The screen is a header toolbar, an optional
//! drawer on the left holding the places table, the map canvas, and a one-line
//! key hint at the bottom.

pub mod data_table;
pub mod header;
pub mod help_overlay;
pub mod map_view;
pub mod search_input;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{App, Focus};

/// Width of the table drawer in cells
const DRAWER_WIDTH: u16 = 64;

/// Renders the whole screen for the current application state
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header toolbar
            Constraint::Min(3),    // Drawer + map
            Constraint::Length(1), // Key hints
        ])
        .split(area);

    header::render(frame, app, chunks[0]);

    if app.drawer_open {
        let drawer_width = DRAWER_WIDTH.min(chunks[1].width.saturating_mul(3) / 5);
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(drawer_width), Constraint::Min(10)])
            .split(chunks[1]);
        data_table::render(frame, app, body[0]);
        map_view::render(frame, app, body[1]);
    } else {
        map_view::render(frame, app, chunks[1]);
    }

    render_key_hints(frame, app, chunks[2]);

    if app.show_help {
        help_overlay::render(frame);
    }
}

/// Renders the key hint line for the focused pane
fn render_key_hints(frame: &mut Frame, app: &App, area: Rect) {
    let hints = match app.focus {
        Focus::Table => "↑↓ select  Enter expand  1-4 sort  Tab map  m menu  ? help  q quit",
        Focus::Map => "←↑↓→ pan  +/- zoom  [ ] marker  Enter open  Tab table  m menu  ? help  q quit",
    };
    let line = Line::from(Span::styled(hints, Style::default().fg(Color::DarkGray)));
    frame.render_widget(Paragraph::new(line), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    fn draw(app: &App) -> String {
        let backend = TestBackend::new(120, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_render_with_drawer_open_shows_table() {
        let app = App::default();
        let content = draw(&app);
        assert!(content.contains("Restaurants"), "drawer title should render");
        assert!(content.contains("Map"), "map title should render");
    }

    #[test]
    fn test_render_with_drawer_closed_hides_table() {
        let mut app = App::default();
        app.toggle_drawer(false, None);
        let content = draw(&app);
        assert!(!content.contains("Restaurants"));
        assert!(content.contains("Map"));
    }

    #[test]
    fn test_key_hints_follow_focus() {
        let mut app = App::default();
        assert!(draw(&app).contains("1-4 sort"));
        app.focus = Focus::Map;
        assert!(draw(&app).contains("+/- zoom"));
    }

    #[test]
    fn test_help_overlay_renders_on_top() {
        let mut app = App::default();
        app.show_help = true;
        assert!(draw(&app).contains("Keyboard Shortcuts"));
    }
}
