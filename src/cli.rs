//! Command-line interface parsing for the nearby restaurant finder
//!
//! This module handles parsing of CLI arguments using clap and validating
//! them into the `StartupConfig` the application is built from. The API key
//! can also come from the `GOOGLE_MAPS_API_KEY` environment variable.

use clap::Parser;
use thiserror::Error;

use crate::data::Position;
use crate::map::{MAX_ZOOM, MIN_ZOOM};

/// Largest search radius accepted by the places service, in meters
const MAX_RADIUS_METERS: u32 = 50_000;

/// Error types for CLI argument validation
#[derive(Debug, Error)]
pub enum CliError {
    /// The API key is empty
    #[error("API key must not be empty")]
    EmptyApiKey,

    /// Latitude outside -90..=90
    #[error("Invalid latitude: {0}. Expected a value between -90 and 90")]
    InvalidLatitude(f64),

    /// Longitude outside -180..=180
    #[error("Invalid longitude: {0}. Expected a value between -180 and 180")]
    InvalidLongitude(f64),

    /// Zoom level outside the supported range
    #[error("Invalid zoom: {0}. Expected a value between 3 and 20")]
    InvalidZoom(u8),

    /// Radius of zero or above the service limit
    #[error("Invalid radius: {0}. Expected 1 to 50000 meters")]
    InvalidRadius(u32),
}

/// Nearby - browse restaurants around a point on a terminal map
#[derive(Parser, Debug)]
#[command(name = "nearby")]
#[command(about = "Terminal map and table of nearby restaurants")]
#[command(version)]
pub struct Cli {
    /// Google Maps Platform API key with the Places API enabled
    #[arg(long, env = "GOOGLE_MAPS_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Latitude of the initial map center
    #[arg(long, default_value_t = Position::DEFAULT.lat, allow_negative_numbers = true)]
    pub lat: f64,

    /// Longitude of the initial map center
    #[arg(long, default_value_t = Position::DEFAULT.lng, allow_negative_numbers = true)]
    pub lng: f64,

    /// Initial zoom level
    #[arg(long, default_value_t = crate::map::DEFAULT_ZOOM)]
    pub zoom: u8,

    /// Search radius in meters
    #[arg(long, default_value_t = 2000)]
    pub radius: u32,

    /// Minimum distance in meters the map center must move before searching again (0 searches on every move)
    #[arg(long, value_name = "METERS", default_value_t = 100.0, allow_negative_numbers = true)]
    pub min_move: f64,

    /// Log filter directive, e.g. "debug" or "nearby=trace"
    #[arg(long, env = "NEARBY_LOG", default_value = "info")]
    pub log_level: String,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone, PartialEq)]
pub struct StartupConfig {
    /// Key passed to the places client
    pub api_key: String,
    /// Initial map center
    pub center: Position,
    /// Initial zoom level
    pub zoom: u8,
    /// Nearby search radius in meters
    pub radius_meters: u32,
    /// Re-search threshold in meters
    pub min_move_meters: f64,
    /// Log filter directive
    pub log_level: String,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            center: Position::DEFAULT,
            zoom: crate::map::DEFAULT_ZOOM,
            radius_meters: 2000,
            min_move_meters: 100.0,
            log_level: "info".to_string(),
        }
    }
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Arguments
    /// * `cli` - The parsed CLI struct
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with validated settings
    /// * `Err(CliError)` if any value is out of range
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let api_key = cli.api_key.trim();
        if api_key.is_empty() {
            return Err(CliError::EmptyApiKey);
        }
        if !(-90.0..=90.0).contains(&cli.lat) {
            return Err(CliError::InvalidLatitude(cli.lat));
        }
        if !(-180.0..=180.0).contains(&cli.lng) {
            return Err(CliError::InvalidLongitude(cli.lng));
        }
        if !(MIN_ZOOM..=MAX_ZOOM).contains(&cli.zoom) {
            return Err(CliError::InvalidZoom(cli.zoom));
        }
        if cli.radius == 0 || cli.radius > MAX_RADIUS_METERS {
            return Err(CliError::InvalidRadius(cli.radius));
        }

        Ok(StartupConfig {
            api_key: api_key.to_string(),
            center: Position::new(cli.lat, cli.lng),
            zoom: cli.zoom,
            radius_meters: cli.radius,
            min_move_meters: cli.min_move.max(0.0),
            log_level: cli.log_level.clone(),
        })
    }
}
