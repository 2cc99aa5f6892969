//! Background execution of places requests
//!
//! The application never awaits network calls. It emits `Command`s, which the
//! `ApiWorker` runs as tokio tasks; results come back as `ApiEvent`s on a
//! channel that the event loop drains once per frame.

use tokio::sync::mpsc;

use crate::data::{NearbySearchRequest, Place, PlaceDetail, PlacesClient, PlacesError};

/// Capacity of the result channel
const CHANNEL_CAPACITY: usize = 32;

/// A request the application wants executed
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Nearby search tagged with the search generation it belongs to
    NearbySearch {
        generation: u64,
        request: NearbySearchRequest,
    },
    /// Detail fetch tagged with the detail generation it belongs to
    PlaceDetails { generation: u64, place_id: String },
}

/// Result of a finished request
#[derive(Debug)]
pub enum ApiEvent {
    SearchFinished {
        generation: u64,
        result: Result<Vec<Place>, PlacesError>,
    },
    DetailsFinished {
        generation: u64,
        place_id: String,
        result: Result<PlaceDetail, PlacesError>,
    },
}

/// Spawns request tasks and collects their results
pub struct ApiWorker {
    client: PlacesClient,
    sender: mpsc::Sender<ApiEvent>,
    /// Channel for receiving finished requests
    pub receiver: mpsc::Receiver<ApiEvent>,
}

impl ApiWorker {
    pub fn new(client: PlacesClient) -> Self {
        let (sender, receiver) = mpsc::channel(CHANNEL_CAPACITY);
        Self {
            client,
            sender,
            receiver,
        }
    }

    /// Runs a command in the background
    ///
    /// Must be called from within a tokio runtime. Requests are never
    /// cancelled; stale results are discarded by the application.
    pub fn dispatch(&self, command: Command) {
        let client = self.client.clone();
        let tx = self.sender.clone();

        tokio::spawn(async move {
            let event = match command {
                Command::NearbySearch {
                    generation,
                    request,
                } => ApiEvent::SearchFinished {
                    generation,
                    result: client.nearby_search(&request).await,
                },
                Command::PlaceDetails {
                    generation,
                    place_id,
                } => {
                    let result = client.place_details(&place_id).await;
                    ApiEvent::DetailsFinished {
                        generation,
                        place_id,
                        result,
                    }
                }
            };
            // The receiver is gone only when the app is shutting down
            let _ = tx.send(event).await;
        });
    }
}

/// Checks for a finished request without blocking
///
/// # Returns
/// * `Some(ApiEvent)` if a result was available
/// * `None` if nothing is pending
pub fn try_recv(worker: &mut ApiWorker) -> Option<ApiEvent> {
    worker.receiver.try_recv().ok()
}
