//! Places table shown in the drawer
//!
//! Renders the sort header, one row per place and, below every row whose
//! detail state is not `Collapsed`, an expanded panel with address, phone and
//! opening hours.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, Focus};
use crate::data::{price_symbols, DetailState, Place};
use crate::table::{SortColumn, SortOrder, SortState};

/// Color scheme for the table
mod colors {
    use ratatui::style::Color;

    /// Border and header text
    pub const HEADER: Color = Color::Cyan;
    /// Row text
    pub const PRIMARY: Color = Color::White;
    /// Panel text
    pub const SECONDARY: Color = Color::Gray;
    /// Selected row background
    pub const SELECTED_BG: Color = Color::DarkGray;
    /// Active sort indicator
    pub const SORTED: Color = Color::Yellow;
    /// Open now
    pub const OPEN: Color = Color::Green;
    /// Closed now
    pub const CLOSED: Color = Color::Red;
}

/// Widths of the fixed columns (distance, rating, price)
const DISTANCE_WIDTH: usize = 12;
const RATING_WIDTH: usize = 7;
const PRICE_WIDTH: usize = 6;

/// Width of the chevron column
const CHEVRON_WIDTH: usize = 2;

/// Renders the table drawer
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::Table;
    let border_color = if focused { colors::HEADER } else { Color::DarkGray };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(Span::styled(
            " Restaurants ",
            Style::default()
                .fg(colors::PRIMARY)
                .add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(area);
    let name_width = name_column_width(inner.width as usize);

    let mut lines = vec![sort_head(&app.sort, name_width)];
    let mut selected_line = 0;

    if app.places.is_empty() {
        let message = if app.searching {
            "Searching for restaurants..."
        } else {
            "No restaurants found"
        };
        lines.push(Line::from(Span::styled(
            message,
            Style::default().fg(colors::SECONDARY),
        )));
    }

    for (i, place) in app.places.iter().enumerate() {
        let state = app.details.get(&place.place_id);
        let selected = focused && i == app.selected_row;
        if i == app.selected_row {
            selected_line = lines.len();
        }
        lines.push(row_line(place, state, name_width, selected));
        lines.extend(detail_lines(place, state));
    }

    // Keep the selected row on screen
    let visible = inner.height as usize;
    let scroll = if selected_line >= visible {
        selected_line + 1 - visible
    } else {
        0
    };

    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((scroll.min(u16::MAX as usize) as u16, 0));

    frame.render_widget(paragraph, area);
}

/// Width left for the name column in a table `inner_width` cells wide
fn name_column_width(inner_width: usize) -> usize {
    inner_width
        .saturating_sub(CHEVRON_WIDTH + DISTANCE_WIDTH + RATING_WIDTH + PRICE_WIDTH + 3)
        .max(8)
}

/// Arrow shown next to the active sort column
fn sort_indicator(order: Option<SortOrder>) -> &'static str {
    match order {
        Some(SortOrder::Desc) => "\u{25BC}", // ▼
        Some(SortOrder::Asc) => "\u{25B2}",  // ▲
        None => " ",
    }
}

/// Header line with column labels and the sort arrow
fn sort_head(sort: &SortState, name_width: usize) -> Line<'static> {
    let widths = [name_width, DISTANCE_WIDTH, RATING_WIDTH, PRICE_WIDTH];
    let mut spans = vec![Span::raw(" ".repeat(CHEVRON_WIDTH))];

    for (i, (column, width)) in SortColumn::ALL.iter().zip(widths).enumerate() {
        let order = sort.order_for(*column);
        let label = format!("{}{}", column.label(), sort_indicator(order));
        let style = if order.is_some() {
            Style::default()
                .fg(colors::SORTED)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
                .fg(colors::HEADER)
                .add_modifier(Modifier::BOLD)
        };
        spans.push(Span::styled(fit(&label, width), style));
        if i + 1 < SortColumn::ALL.len() {
            spans.push(Span::raw(" "));
        }
    }

    Line::from(spans)
}

/// Display strings for a row: name, distance, rating and price
pub fn row_cells(place: &Place) -> [String; 4] {
    [
        place.name.clone(),
        format!("{:.2}", place.distance_km),
        place
            .rating
            .map(|rating| format!("{:.1}", rating))
            .unwrap_or_default(),
        price_symbols(place.price_level),
    ]
}

/// One table row with its expand chevron
fn row_line(place: &Place, state: &DetailState, name_width: usize, selected: bool) -> Line<'static> {
    let [name, distance, rating, price] = row_cells(place);
    let chevron = if state.is_open() {
        "\u{25BE} " // ▾
    } else {
        "\u{25B8} " // ▸
    };

    let mut style = Style::default().fg(colors::PRIMARY);
    if selected {
        style = style.bg(colors::SELECTED_BG).add_modifier(Modifier::BOLD);
    }

    Line::from(vec![
        Span::styled(chevron, style),
        Span::styled(fit(&name, name_width), style),
        Span::styled(" ", style),
        Span::styled(fit(&distance, DISTANCE_WIDTH), style),
        Span::styled(" ", style),
        Span::styled(fit(&rating, RATING_WIDTH), style),
        Span::styled(" ", style),
        Span::styled(fit(&price, PRICE_WIDTH), style.fg(Color::Green)),
    ])
}

/// Lines of the expanded panel under a row (none when collapsed)
pub fn detail_lines(place: &Place, state: &DetailState) -> Vec<Line<'static>> {
    let indent = " ".repeat(CHEVRON_WIDTH + 1);
    let secondary = Style::default().fg(colors::SECONDARY);

    match state {
        DetailState::Collapsed => Vec::new(),
        DetailState::Loading => vec![
            Line::from(Span::styled(
                format!("{}{}", indent, place.name),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(format!("{}Loading details...", indent), secondary)),
        ],
        DetailState::Loaded(detail) => {
            let mut lines = vec![Line::from(Span::styled(
                format!("{}{}", indent, place.name),
                Style::default().add_modifier(Modifier::BOLD),
            ))];

            if let Some(address) = &detail.formatted_address {
                lines.push(Line::from(Span::styled(
                    format!("{}{}", indent, address),
                    secondary,
                )));
            }
            if let Some(phone) = &detail.formatted_phone_number {
                lines.push(Line::from(Span::styled(
                    format!("{}{}", indent, phone),
                    secondary,
                )));
            }

            if let Some(hours) = &detail.opening_hours {
                let (label, color) = if hours.is_open_now() {
                    ("Open now", colors::OPEN)
                } else {
                    ("Closed now", colors::CLOSED)
                };
                lines.push(Line::from(vec![
                    Span::styled(format!("{}Opening hours  ", indent), secondary),
                    Span::styled(label, Style::default().fg(color)),
                ]));
                for day in &hours.weekday_text {
                    lines.push(Line::from(Span::styled(
                        format!("{}  {}", indent, day),
                        secondary,
                    )));
                }
            }

            lines.push(Line::from(""));
            lines
        }
    }
}

/// Pads or truncates `text` to exactly `width` display cells
fn fit(text: &str, width: usize) -> String {
    let full = Span::raw(text).width();
    if full <= width {
        return format!("{}{}", text, " ".repeat(width - full));
    }

    // Leave one cell for the ellipsis
    let budget = width.saturating_sub(1);
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = Span::raw(c.to_string()).width();
        if used + w > budget {
            break;
        }
        out.push(c);
        used += w;
    }
    if width > 0 {
        out.push('\u{2026}'); // …
        used += 1;
    }

    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}
