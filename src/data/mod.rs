//! Core data models for the nearby restaurant finder
//!
//! This module contains the view-state types shared by the orchestrator, the
//! map viewport and the table: positions, places, place details and the
//! per-place detail state.

pub mod places;

pub use places::{NearbySearchRequest, PlacesClient, PlacesError};

use chrono::{Datelike, NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

/// Mean earth radius in meters, used for great-circle distances
const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Minutes in one week, used to wrap opening periods around Saturday night
const MINUTES_PER_WEEK: u32 = 7 * 24 * 60;

/// A geographic coordinate (the map center or a place location)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lng: f64,
}

impl Position {
    /// Default center: Taipei City Hall
    pub const DEFAULT: Position = Position {
        lat: 25.038705,
        lng: 121.567338,
    };

    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Great-circle distance to `other` in meters (haversine formula)
    pub fn distance_meters(&self, other: &Position) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lng = (other.lng - self.lng).to_radians();
        let a = (d_lat / 2.0).sin().powi(2)
            + self.lat.to_radians().cos() * other.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_METERS * a.sqrt().asin()
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A restaurant returned by a nearby search
///
/// Places are immutable once received; a new search replaces the whole list.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    /// Unique identifier assigned by the places provider
    pub place_id: String,
    /// Display name
    pub name: String,
    /// Location of the place
    pub location: Position,
    /// Average user rating (1.0-5.0), if the provider has one
    pub rating: Option<f64>,
    /// Price level from 0 (free) to 4 (very expensive), if known
    pub price_level: Option<u8>,
    /// Distance from the search center in kilometers
    pub distance_km: f64,
}

/// Extended fields for one place, fetched on demand
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct PlaceDetail {
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub formatted_phone_number: Option<String>,
    #[serde(default)]
    pub opening_hours: Option<OpeningHours>,
}

/// Weekly opening hours as reported by the places provider
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct OpeningHours {
    /// Provider's own "open right now" flag, valid at fetch time only
    #[serde(default)]
    pub open_now: Option<bool>,
    /// Opening periods, one per contiguous open interval
    #[serde(default)]
    pub periods: Vec<OpeningPeriod>,
    /// Human-readable hours, one line per weekday starting Monday
    #[serde(default)]
    pub weekday_text: Vec<String>,
}

/// A single open interval within the week
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OpeningPeriod {
    pub open: DayTime,
    /// Missing close means the place never closes
    #[serde(default)]
    pub close: Option<DayTime>,
}

/// Day of week (0 = Sunday) and 24h time as "HHMM"
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DayTime {
    pub day: u8,
    pub time: String,
}

impl DayTime {
    /// Minutes since Sunday 00:00, or None if the time string is malformed
    fn minute_of_week(&self) -> Option<u32> {
        if self.day > 6 || self.time.len() != 4 {
            return None;
        }
        let hours: u32 = self.time.get(0..2)?.parse().ok()?;
        let minutes: u32 = self.time.get(2..4)?.parse().ok()?;
        if hours > 24 || minutes > 59 {
            return None;
        }
        Some(u32::from(self.day) * 24 * 60 + hours * 60 + minutes)
    }
}

impl OpeningHours {
    /// Whether the place is open at the given weekday and local time.
    ///
    /// Uses the weekly periods when present (overnight periods and periods
    /// wrapping from Saturday to Sunday included) and otherwise falls back to
    /// the provider's `open_now` flag.
    pub fn is_open_at(&self, weekday: Weekday, time: NaiveTime) -> bool {
        if self.periods.is_empty() {
            return self.open_now.unwrap_or(false);
        }

        let now = weekday.num_days_from_sunday() * 24 * 60 + time.hour() * 60 + time.minute();

        self.periods.iter().any(|period| {
            let Some(open) = period.open.minute_of_week() else {
                return false;
            };
            let Some(close) = period.close.as_ref() else {
                // Always open
                return true;
            };
            let Some(close) = close.minute_of_week() else {
                return false;
            };
            let close = close % MINUTES_PER_WEEK;

            if open <= close {
                (open..close).contains(&now)
            } else {
                now >= open || now < close
            }
        })
    }

    /// Whether the place is open right now
    ///
    /// The provider's `open_now` flag is computed in the place's own time
    /// zone, so it wins when present. The periods are checked against the
    /// local clock only when the flag is missing.
    pub fn is_open_now(&self) -> bool {
        if let Some(open_now) = self.open_now {
            return open_now;
        }
        let now = chrono::Local::now();
        self.is_open_at(now.weekday(), now.time())
    }
}

/// Expand/collapse state of one place's detail panel
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DetailState {
    /// Panel closed
    #[default]
    Collapsed,
    /// Panel open, details request in flight
    Loading,
    /// Panel open with fetched details
    Loaded(PlaceDetail),
}

impl DetailState {
    /// Any state other than `Collapsed` counts as open
    pub fn is_open(&self) -> bool {
        !matches!(self, DetailState::Collapsed)
    }
}

/// Renders a price level as repeated currency symbols ("$$$" for 3)
pub fn price_symbols(price_level: Option<u8>) -> String {
    "$".repeat(usize::from(price_level.unwrap_or(0)))
}
