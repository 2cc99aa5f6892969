//! Map viewport for the terminal canvas
//!
//! Tracks the center and zoom level of the map and converts a terminal area
//! into longitude/latitude bounds using a Web Mercator style scale.

use crate::data::Position;

/// Lowest zoom level (continent scale)
pub const MIN_ZOOM: u8 = 3;

/// Highest zoom level (building scale)
pub const MAX_ZOOM: u8 = 20;

/// Default zoom level (street scale)
pub const DEFAULT_ZOOM: u8 = 16;

/// Size of a map tile in pixels at every zoom level
const TILE_SIZE: f64 = 256.0;

/// Approximate pixel size of a terminal cell
const CELL_WIDTH_PX: f64 = 8.0;
const CELL_HEIGHT_PX: f64 = 16.0;

/// Distance moved by one pan step, in pixels
const PAN_STEP_PX: f64 = 64.0;

/// Direction of a pan step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanDirection {
    North,
    South,
    East,
    West,
}

/// The visible part of the map
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapViewport {
    pub center: Position,
    pub zoom: u8,
}

impl MapViewport {
    pub fn new(center: Position, zoom: u8) -> Self {
        Self {
            center,
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
        }
    }

    /// Degrees of longitude covered by one pixel at the current zoom
    pub fn degrees_per_pixel(&self) -> f64 {
        360.0 / (TILE_SIZE * 2f64.powi(i32::from(self.zoom)))
    }

    /// Latitude degrees per pixel, shrunk by the Mercator scale factor
    fn lat_degrees_per_pixel(&self) -> f64 {
        self.degrees_per_pixel() * self.center.lat.to_radians().cos()
    }

    /// Longitude and latitude bounds of a `cols` x `rows` cell area
    ///
    /// Returns `([west, east], [south, north])`, ready for a canvas.
    pub fn bounds(&self, cols: u16, rows: u16) -> ([f64; 2], [f64; 2]) {
        let half_width = f64::from(cols) * CELL_WIDTH_PX * self.degrees_per_pixel() / 2.0;
        let half_height = f64::from(rows) * CELL_HEIGHT_PX * self.lat_degrees_per_pixel() / 2.0;
        (
            [self.center.lng - half_width, self.center.lng + half_width],
            [self.center.lat - half_height, self.center.lat + half_height],
        )
    }

    /// Moves the center one step and returns the new center
    pub fn pan(&mut self, direction: PanDirection) -> Position {
        let d_lng = PAN_STEP_PX * self.degrees_per_pixel();
        let d_lat = PAN_STEP_PX * self.lat_degrees_per_pixel();

        match direction {
            PanDirection::North => self.center.lat = (self.center.lat + d_lat).min(85.0),
            PanDirection::South => self.center.lat = (self.center.lat - d_lat).max(-85.0),
            PanDirection::East => self.center.lng = wrap_longitude(self.center.lng + d_lng),
            PanDirection::West => self.center.lng = wrap_longitude(self.center.lng - d_lng),
        }

        self.center
    }

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom + 1).min(MAX_ZOOM);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = self.zoom.saturating_sub(1).max(MIN_ZOOM);
    }

    /// Converts a distance in meters to degrees of latitude
    pub fn meters_to_lat_degrees(meters: f64) -> f64 {
        meters / 111_320.0
    }
}

impl Default for MapViewport {
    fn default() -> Self {
        Self::new(Position::DEFAULT, DEFAULT_ZOOM)
    }
}

/// Keeps a longitude in -180..=180
fn wrap_longitude(lng: f64) -> f64 {
    if lng > 180.0 {
        lng - 360.0
    } else if lng < -180.0 {
        lng + 360.0
    } else {
        lng
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clamps_zoom() {
        assert_eq!(MapViewport::new(Position::DEFAULT, 1).zoom, MIN_ZOOM);
        assert_eq!(MapViewport::new(Position::DEFAULT, 30).zoom, MAX_ZOOM);
    }

    #[test]
    fn test_bounds_are_centered() {
        let viewport = MapViewport::default();
        let (x, y) = viewport.bounds(80, 24);
        assert!(((x[0] + x[1]) / 2.0 - viewport.center.lng).abs() < 1e-9);
        assert!(((y[0] + y[1]) / 2.0 - viewport.center.lat).abs() < 1e-9);
        assert!(x[0] < x[1]);
        assert!(y[0] < y[1]);
    }

    #[test]
    fn test_zoom_in_halves_span() {
        let mut viewport = MapViewport::default();
        let (before, _) = viewport.bounds(80, 24);
        viewport.zoom_in();
        let (after, _) = viewport.bounds(80, 24);
        let ratio = (before[1] - before[0]) / (after[1] - after[0]);
        assert!((ratio - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_limits() {
        let mut viewport = MapViewport::new(Position::DEFAULT, MAX_ZOOM);
        viewport.zoom_in();
        assert_eq!(viewport.zoom, MAX_ZOOM);

        let mut viewport = MapViewport::new(Position::DEFAULT, MIN_ZOOM);
        viewport.zoom_out();
        assert_eq!(viewport.zoom, MIN_ZOOM);
    }

    #[test]
    fn test_zoom_does_not_move_center() {
        let mut viewport = MapViewport::default();
        let center = viewport.center;
        viewport.zoom_in();
        viewport.zoom_out();
        assert_eq!(viewport.center, center);
    }

    #[test]
    fn test_pan_moves_center() {
        let mut viewport = MapViewport::default();
        let start = viewport.center;

        let north = viewport.pan(PanDirection::North);
        assert!(north.lat > start.lat);
        assert_eq!(north.lng, start.lng);

        let back = viewport.pan(PanDirection::South);
        assert!((back.lat - start.lat).abs() < 1e-9);

        let east = viewport.pan(PanDirection::East);
        assert!(east.lng > start.lng);
    }

    #[test]
    fn test_pan_step_at_default_zoom_is_street_scale() {
        let mut viewport = MapViewport::default();
        let start = viewport.center;
        let moved = viewport.pan(PanDirection::East);
        let meters = start.distance_meters(&moved);
        assert!(meters > 100.0 && meters < 300.0, "got {}", meters);
    }

    #[test]
    fn test_wrap_longitude() {
        assert_eq!(wrap_longitude(181.0), -179.0);
        assert_eq!(wrap_longitude(-181.0), 179.0);
        assert_eq!(wrap_longitude(12.5), 12.5);
    }
}
