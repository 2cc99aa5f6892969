//! Integration tests for `PlacesClient` using wiremock HTTP mocks.

use nearby::data::{NearbySearchRequest, PlacesClient, PlacesError, Position};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> PlacesClient {
    PlacesClient::with_base_url("test-key", base_url)
}

fn taipei_request() -> NearbySearchRequest {
    NearbySearchRequest::restaurants(Position::DEFAULT, 2000)
}

#[tokio::test]
async fn nearby_search_sends_distance_ranked_restaurant_query() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "status": "OK",
        "results": [
            {
                "place_id": "ChIJ-din",
                "name": "Din Tai Fung",
                "geometry": { "location": { "lat": 25.0392, "lng": 121.5676 } },
                "rating": 4.6,
                "price_level": 2
            }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/maps/api/place/nearbysearch/json"))
        .and(query_param("location", "25.038705,121.567338"))
        .and(query_param("type", "restaurant"))
        .and(query_param("rankby", "distance"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let places = test_client(&server.uri())
        .nearby_search(&taipei_request())
        .await
        .expect("search should succeed");

    assert_eq!(places.len(), 1);
    assert_eq!(places[0].place_id, "ChIJ-din");
    assert_eq!(places[0].name, "Din Tai Fung");
    assert_eq!(places[0].rating, Some(4.6));
    assert_eq!(places[0].price_level, Some(2));
    assert!(places[0].distance_km < 0.1);
}

#[tokio::test]
async fn nearby_search_drops_places_outside_radius() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "status": "OK",
        "results": [
            {
                "place_id": "inside",
                "name": "Corner Cafe",
                "geometry": { "location": { "lat": 25.0450, "lng": 121.5673 } }
            },
            {
                "place_id": "outside",
                "name": "Harbor Grill",
                "geometry": { "location": { "lat": 25.1500, "lng": 121.5673 } }
            }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/maps/api/place/nearbysearch/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let places = test_client(&server.uri())
        .nearby_search(&taipei_request())
        .await
        .expect("search should succeed");

    assert_eq!(places.len(), 1);
    assert_eq!(places[0].place_id, "inside");
    // About 700 m north of the center
    assert!(places[0].distance_km > 0.6 && places[0].distance_km < 0.8);
}

#[tokio::test]
async fn nearby_search_zero_results_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/maps/api/place/nearbysearch/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "ZERO_RESULTS",
            "results": []
        })))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .nearby_search(&taipei_request())
        .await
        .unwrap_err();

    assert!(matches!(err, PlacesError::Status { ref status, .. } if status == "ZERO_RESULTS"));
}

#[tokio::test]
async fn nearby_search_request_denied_keeps_message() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/maps/api/place/nearbysearch/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "REQUEST_DENIED",
            "error_message": "The provided API key is invalid.",
            "results": []
        })))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .nearby_search(&taipei_request())
        .await
        .unwrap_err();

    match err {
        PlacesError::Status { status, message } => {
            assert_eq!(status, "REQUEST_DENIED");
            assert_eq!(message.as_deref(), Some("The provided API key is invalid."));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn nearby_search_malformed_body_is_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/maps/api/place/nearbysearch/json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .nearby_search(&taipei_request())
        .await
        .unwrap_err();

    assert!(matches!(err, PlacesError::ParseError(_)));
}

#[tokio::test]
async fn place_details_requests_fields_and_parses_hours() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "status": "OK",
        "result": {
            "formatted_address": "No. 194, Section 2, Xinyi Rd, Da'an District, Taipei City",
            "formatted_phone_number": "02 2321 8928",
            "opening_hours": {
                "open_now": true,
                "periods": [
                    { "open": { "day": 1, "time": "1100" }, "close": { "day": 1, "time": "2100" } }
                ],
                "weekday_text": ["Monday: 11:00 AM – 9:00 PM"]
            }
        }
    });

    Mock::given(method("GET"))
        .and(path("/maps/api/place/details/json"))
        .and(query_param("place_id", "ChIJ-din"))
        .and(query_param(
            "fields",
            "formatted_address,formatted_phone_number,opening_hours",
        ))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let detail = test_client(&server.uri())
        .place_details("ChIJ-din")
        .await
        .expect("details should parse");

    assert_eq!(detail.formatted_phone_number.as_deref(), Some("02 2321 8928"));
    assert!(detail
        .formatted_address
        .as_deref()
        .is_some_and(|a| a.starts_with("No. 194")));
    let hours = detail.opening_hours.expect("hours should be present");
    assert_eq!(hours.periods.len(), 1);
    assert_eq!(hours.weekday_text.len(), 1);
}

#[tokio::test]
async fn place_details_not_found_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/maps/api/place/details/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "NOT_FOUND"
        })))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .place_details("missing")
        .await
        .unwrap_err();

    assert!(matches!(err, PlacesError::Status { ref status, .. } if status == "NOT_FOUND"));
}

#[tokio::test]
async fn unreachable_server_is_request_error() {
    // Port 9 (discard) is closed on test machines
    let err = test_client("http://127.0.0.1:9")
        .place_details("any")
        .await
        .unwrap_err();

    assert!(matches!(err, PlacesError::RequestFailed(_)));
}
