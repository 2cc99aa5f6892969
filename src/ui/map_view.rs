//! Map canvas with the current position and one marker per place
//!
//! Markers of places whose detail panel is open (loading or loaded) are drawn
//! with the active glyph; the marker picked with `[`/`]` gets a name label.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::Span,
    widgets::{
        canvas::{Canvas, Points},
        Block, Borders,
    },
    Frame,
};

use crate::app::{App, Focus};
use crate::data::Position;
use crate::details::DetailMap;
use crate::map::MapViewport;

/// Glyph for the search center
const POSITION_GLYPH: &str = "\u{25CE}"; // ◎
/// Glyph for an inactive place
const LOCATION_GLYPH: &str = "\u{25CF}"; // ●
/// Glyph for a place with an open detail panel
const ACTIVE_LOCATION_GLYPH: &str = "\u{25C9}"; // ◉

/// Points used to draw the search radius ring
const RING_SEGMENTS: usize = 120;

/// Whether a place's marker shows as active
pub fn is_location_active(details: &DetailMap, place_id: &str) -> bool {
    details.is_open(place_id)
}

/// Points on the search radius ring around `center`
///
/// Longitude degrees shrink toward the poles, so the ring is widened by
/// `1 / cos(lat)` to stay round on screen.
fn radius_ring(center: Position, radius_meters: u32) -> Vec<(f64, f64)> {
    let d_lat = MapViewport::meters_to_lat_degrees(f64::from(radius_meters));
    let d_lng = d_lat / center.lat.to_radians().cos().max(0.01);

    (0..RING_SEGMENTS)
        .map(|i| {
            let angle = i as f64 / RING_SEGMENTS as f64 * std::f64::consts::TAU;
            (center.lng + d_lng * angle.cos(), center.lat + d_lat * angle.sin())
        })
        .collect()
}

/// Renders the map pane
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::Map;
    let border_color = if focused { Color::Cyan } else { Color::DarkGray };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(Span::styled(
            format!(" Map \u{00B7} zoom {} ", app.viewport.zoom),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(area);
    let (x_bounds, y_bounds) = app.viewport.bounds(inner.width, inner.height);
    let ring = radius_ring(app.position, app.radius_meters());
    let selected = app.selected_marker;

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds(x_bounds)
        .y_bounds(y_bounds)
        .paint(|ctx| {
            ctx.draw(&Points {
                coords: &ring,
                color: Color::DarkGray,
            });
            ctx.layer();

            ctx.print(
                app.position.lng,
                app.position.lat,
                Span::styled(
                    POSITION_GLYPH,
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
            );

            for (i, place) in app.places.iter().enumerate() {
                let active = is_location_active(&app.details, &place.place_id);
                let is_selected = selected == Some(i);

                let (glyph, color) = if active {
                    (ACTIVE_LOCATION_GLYPH, Color::LightRed)
                } else {
                    (LOCATION_GLYPH, Color::Red)
                };
                let mut style = Style::default().fg(color);
                if is_selected {
                    style = style.fg(Color::Yellow).add_modifier(Modifier::BOLD);
                }

                let (x, y) = (place.location.lng, place.location.lat);
                ctx.print(x, y, Span::styled(glyph, style));

                if is_selected || active {
                    // Label starts one cell right of the marker
                    let cell = (x_bounds[1] - x_bounds[0]) / f64::from(inner.width.max(1));
                    ctx.print(
                        x + cell,
                        y,
                        Span::styled(format!(" {}", place.name), style),
                    );
                }
            }
        });

    frame.render_widget(canvas, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{DetailState, Place, PlaceDetail};
    use crate::worker::ApiEvent;
    use ratatui::{backend::TestBackend, Terminal};

    fn place(id: &str, name: &str, lat_offset: f64, lng_offset: f64) -> Place {
        Place {
            place_id: id.to_string(),
            name: name.to_string(),
            location: Position::new(
                Position::DEFAULT.lat + lat_offset,
                Position::DEFAULT.lng + lng_offset,
            ),
            rating: None,
            price_level: None,
            distance_km: 0.1,
        }
    }

    fn app_with(places: Vec<Place>) -> App {
        let mut app = App::default();
        app.on_map_ready();
        app.apply_event(ApiEvent::SearchFinished {
            generation: 1,
            result: Ok(places),
        });
        app
    }

    fn draw(app: &App) -> String {
        let backend = TestBackend::new(60, 20);
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
    fn test_marker_active_follows_detail_state() {
        let mut details = DetailMap::collapsed_for(&[place("a", "A", 0.0, 0.0)]);
        assert!(!is_location_active(&details, "a"));

        details.set("a", DetailState::Loading);
        assert!(is_location_active(&details, "a"));

        details.set("a", DetailState::Loaded(PlaceDetail::default()));
        assert!(is_location_active(&details, "a"));

        details.set("a", DetailState::Collapsed);
        assert!(!is_location_active(&details, "a"));
    }

    #[test]
    fn test_unknown_place_is_inactive() {
        assert!(!is_location_active(&DetailMap::default(), "nope"));
    }

    #[test]
    fn test_radius_ring_is_centered() {
        let ring = radius_ring(Position::DEFAULT, 2000);
        assert_eq!(ring.len(), RING_SEGMENTS);

        let north = ring
            .iter()
            .map(|(_, lat)| *lat)
            .fold(f64::MIN, f64::max);
        let meters = Position::DEFAULT.distance_meters(&Position::new(north, Position::DEFAULT.lng));
        assert!((meters - 2000.0).abs() < 20.0, "got {}", meters);
    }

    #[test]
    fn test_render_shows_position_and_markers() {
        let app = app_with(vec![place("a", "Noodle Bar", 0.001, 0.001)]);
        let content = draw(&app);
        assert!(content.contains("Map"));
        assert!(content.contains(POSITION_GLYPH));
        assert!(content.contains(LOCATION_GLYPH));
        assert!(!content.contains(ACTIVE_LOCATION_GLYPH));
    }

    #[test]
    fn test_render_open_detail_uses_active_marker() {
        let mut app = app_with(vec![place("a", "Noodle Bar", 0.001, 0.001)]);
        app.handle_open_detail("a", true);
        let content = draw(&app);
        assert!(content.contains(ACTIVE_LOCATION_GLYPH));
        assert!(content.contains("Noodle Bar"));
    }

    #[test]
    fn test_render_selected_marker_label() {
        let mut app = app_with(vec![place("a", "Noodle Bar", -0.001, -0.001)]);
        assert!(!draw(&app).contains("Noodle Bar"));
        app.selected_marker = Some(0);
        assert!(draw(&app).contains("Noodle Bar"));
    }
}
