//! Google Places Web Service client
//!
//! Issues nearby searches and place-detail requests and maps the JSON
//! envelopes into our Place and PlaceDetail structures. Any status other than
//! "OK" is reported as `PlacesError::Status`.

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use super::{Place, PlaceDetail, Position};

/// Base URL for the Google Maps web services
const GOOGLE_MAPS_BASE_URL: &str = "https://maps.googleapis.com";

/// Path of the nearby search endpoint
const NEARBY_SEARCH_PATH: &str = "/maps/api/place/nearbysearch/json";

/// Path of the place details endpoint
const DETAILS_PATH: &str = "/maps/api/place/details/json";

/// Fields requested from the details endpoint
pub const DETAIL_FIELDS: &str = "formatted_address,formatted_phone_number,opening_hours";

/// The only status treated as success
const STATUS_OK: &str = "OK";

/// Errors that can occur when talking to the places service
#[derive(Debug, Error)]
pub enum PlacesError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// The service answered with a status other than OK
    #[error("Places service returned {status}")]
    Status {
        status: String,
        message: Option<String>,
    },
}

/// Parameters of a nearby search
#[derive(Debug, Clone, PartialEq)]
pub struct NearbySearchRequest {
    /// Search center
    pub location: Position,
    /// Place category, e.g. "restaurant"
    pub place_type: String,
    /// Maximum distance from the center in meters
    pub radius_meters: u32,
}

impl NearbySearchRequest {
    /// Restaurants ranked by distance around `location`
    pub fn restaurants(location: Position, radius_meters: u32) -> Self {
        Self {
            location,
            place_type: "restaurant".to_string(),
            radius_meters,
        }
    }
}

/// Client for the nearby search and place details endpoints
#[derive(Debug, Clone)]
pub struct PlacesClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl PlacesClient {
    /// Create a client for the production service using the given API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, GOOGLE_MAPS_BASE_URL)
    }

    /// Create a client pointed at a custom base URL (mock servers in tests)
    pub fn with_base_url(api_key: impl Into<String>, base_url: &str) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Run a nearby search ranked by distance
    ///
    /// The service does not accept a radius together with distance ranking,
    /// so the radius is applied to the results after they arrive. Each
    /// returned place carries its distance from the search center.
    ///
    /// # Returns
    /// * `Ok(Vec<Place>)` - Places within the radius, nearest first
    /// * `Err(PlacesError)` - On transport, parse or non-OK status errors
    pub async fn nearby_search(
        &self,
        request: &NearbySearchRequest,
    ) -> Result<Vec<Place>, PlacesError> {
        let url = format!("{}{}", self.base_url, NEARBY_SEARCH_PATH);
        let location = format!("{},{}", request.location.lat, request.location.lng);

        tracing::debug!(%location, place_type = %request.place_type, "nearby search");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("location", location.as_str()),
                ("type", request.place_type.as_str()),
                ("rankby", "distance"),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;
        let text = response.text().await?;
        let envelope: NearbySearchResponse = serde_json::from_str(&text)?;

        check_status(&envelope.status, envelope.error_message)?;

        Ok(parse_places(envelope.results, request))
    }

    /// Fetch address, phone and opening hours for one place
    pub async fn place_details(&self, place_id: &str) -> Result<PlaceDetail, PlacesError> {
        let url = format!("{}{}", self.base_url, DETAILS_PATH);

        tracing::debug!(place_id, "place details");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("place_id", place_id),
                ("fields", DETAIL_FIELDS),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;
        let text = response.text().await?;
        let envelope: DetailsResponse = serde_json::from_str(&text)?;

        check_status(&envelope.status, envelope.error_message)?;

        Ok(envelope.result.unwrap_or_default())
    }
}

/// Map any status other than OK to an error
fn check_status(status: &str, message: Option<String>) -> Result<(), PlacesError> {
    if status == STATUS_OK {
        Ok(())
    } else {
        Err(PlacesError::Status {
            status: status.to_string(),
            message,
        })
    }
}

/// Convert raw search results, computing distances and applying the radius
fn parse_places(results: Vec<RawPlace>, request: &NearbySearchRequest) -> Vec<Place> {
    let radius = f64::from(request.radius_meters);

    results
        .into_iter()
        .filter_map(|raw| {
            let location = Position::new(raw.geometry.location.lat, raw.geometry.location.lng);
            let distance = request.location.distance_meters(&location);
            if distance > radius {
                return None;
            }
            Some(Place {
                place_id: raw.place_id,
                name: raw.name,
                location,
                rating: raw.rating,
                price_level: raw.price_level.map(|level| level.min(4)),
                distance_km: distance / 1000.0,
            })
        })
        .collect()
}

/// Nearby search response envelope
#[derive(Debug, Deserialize)]
struct NearbySearchResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    results: Vec<RawPlace>,
}

/// Place details response envelope
#[derive(Debug, Deserialize)]
struct DetailsResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    result: Option<PlaceDetail>,
}

/// A search result as sent by the service
#[derive(Debug, Deserialize)]
struct RawPlace {
    place_id: String,
    name: String,
    geometry: RawGeometry,
    #[serde(default)]
    rating: Option<f64>,
    #[serde(default)]
    price_level: Option<u8>,
}

#[derive(Debug, Deserialize)]
struct RawGeometry {
    location: RawLatLng,
}

#[derive(Debug, Deserialize)]
struct RawLatLng {
    lat: f64,
    lng: f64,
}
