//! Application state management for the nearby restaurant finder
//!
//! `App` owns every piece of view state (map center, result list, detail
//! states, drawer, sort) and turns user input and request results into state
//! changes. Network work is never done here: handlers return `Command`s that
//! the event loop hands to the `ApiWorker`, and results come back through
//! `apply_event`.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, ModifierKeyCode};

use crate::cli::StartupConfig;
use crate::data::{DetailState, NearbySearchRequest, Place, PlaceDetail, Position};
use crate::details::DetailMap;
use crate::map::{MapViewport, PanDirection};
use crate::table::{SortColumn, SortState};
use crate::worker::{ApiEvent, Command};

/// Which pane receives navigation keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Map,
    Table,
}

/// An in-flight detail fetch
#[derive(Debug, Clone, PartialEq)]
struct PendingDetail {
    generation: u64,
    /// State to restore if the fetch fails
    previous: DetailState,
}

/// Main application struct managing state and data
pub struct App {
    /// Center used for searches, updated from the viewport
    pub position: Position,
    /// The map widget's own center and zoom
    pub viewport: MapViewport,
    /// Current result set in display order
    pub places: Vec<Place>,
    /// Detail state per place
    pub details: DetailMap,
    /// Whether the table drawer is visible
    pub drawer_open: bool,
    /// Table sort column and direction
    pub sort: SortState,
    /// Pane receiving navigation keys
    pub focus: Focus,
    /// Highlighted table row
    pub selected_row: usize,
    /// Highlighted map marker, as an index into `places`
    pub selected_marker: Option<usize>,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    /// Flag to show help overlay
    pub show_help: bool,
    /// Set once the map is ready; searches only run after that
    pub api_loaded: bool,
    /// Whether the latest search is still in flight
    pub searching: bool,
    radius_meters: u32,
    min_move_meters: f64,
    search_generation: u64,
    last_search_center: Option<Position>,
    detail_generation: u64,
    pending_details: HashMap<String, PendingDetail>,
    fetched_details: HashMap<String, PlaceDetail>,
}

impl App {
    /// Creates a new App from the startup configuration
    pub fn new(config: &StartupConfig) -> Self {
        Self {
            position: config.center,
            viewport: MapViewport::new(config.center, config.zoom),
            places: Vec::new(),
            details: DetailMap::default(),
            drawer_open: true,
            sort: SortState::default(),
            focus: Focus::Table,
            selected_row: 0,
            selected_marker: None,
            should_quit: false,
            show_help: false,
            api_loaded: false,
            searching: false,
            radius_meters: config.radius_meters,
            min_move_meters: config.min_move_meters,
            search_generation: 0,
            last_search_center: None,
            detail_generation: 0,
            pending_details: HashMap::new(),
            fetched_details: HashMap::new(),
        }
    }

    /// Called once the map is laid out and the places client exists
    pub fn on_map_ready(&mut self) -> Option<Command> {
        self.api_loaded = true;
        self.search_effect()
    }

    /// Called when the map widget reports a new center
    ///
    /// Re-searches unless the center is closer than the configured minimum
    /// distance to where the last search was issued. After a failed search
    /// any move searches again.
    pub fn on_center_changed(&mut self, center: Position) -> Option<Command> {
        self.position = center;
        self.search_effect()
    }

    /// Issues a nearby search around the current position, if allowed
    fn search_effect(&mut self) -> Option<Command> {
        if !self.api_loaded {
            return None;
        }
        if let Some(last) = self.last_search_center {
            let moved = last.distance_meters(&self.position);
            if moved < self.min_move_meters {
                tracing::trace!(moved, "center moved below search threshold");
                return None;
            }
        }

        self.search_generation += 1;
        self.last_search_center = Some(self.position);
        self.searching = true;

        tracing::info!(
            generation = self.search_generation,
            lat = self.position.lat,
            lng = self.position.lng,
            "issuing nearby search"
        );

        Some(Command::NearbySearch {
            generation: self.search_generation,
            request: NearbySearchRequest::restaurants(self.position, self.radius_meters),
        })
    }

    /// Opens or closes the detail panel of one place
    ///
    /// Closing is synchronous and issues no request. Opening a place whose
    /// details were already fetched for this result set is immediate;
    /// otherwise the panel shows `Loading` and a details request is returned.
    /// Ids outside the current result set are ignored.
    pub fn handle_open_detail(&mut self, place_id: &str, is_open: bool) -> Option<Command> {
        if !self.details.contains(place_id) {
            return None;
        }

        if !is_open {
            self.pending_details.remove(place_id);
            self.details.set(place_id, DetailState::Collapsed);
            return None;
        }

        if let Some(detail) = self.fetched_details.get(place_id) {
            self.details.set(place_id, DetailState::Loaded(detail.clone()));
            self.drawer_open = true;
            return None;
        }

        let previous = match self.pending_details.get(place_id) {
            Some(pending) => pending.previous.clone(),
            None => self.details.get(place_id).clone(),
        };
        self.detail_generation += 1;
        self.pending_details.insert(
            place_id.to_string(),
            PendingDetail {
                generation: self.detail_generation,
                previous,
            },
        );
        self.details.set(place_id, DetailState::Loading);

        Some(Command::PlaceDetails {
            generation: self.detail_generation,
            place_id: place_id.to_string(),
        })
    }

    /// Flips a place between collapsed and open (row click or marker click)
    pub fn toggle_detail(&mut self, place_id: &str) -> Option<Command> {
        let is_open = !self.details.is_open(place_id);
        self.handle_open_detail(place_id, is_open)
    }

    /// Sets the drawer state, ignoring Tab and Shift key events
    pub fn toggle_drawer(&mut self, open: bool, key: Option<&KeyEvent>) {
        if let Some(key) = key {
            if matches!(
                key.code,
                KeyCode::Tab
                    | KeyCode::BackTab
                    | KeyCode::Modifier(ModifierKeyCode::LeftShift)
                    | KeyCode::Modifier(ModifierKeyCode::RightShift)
            ) {
                return;
            }
        }
        self.drawer_open = open;
        if !open {
            self.focus = Focus::Map;
        }
    }

    /// Sorts the table by `column`, cycling descending and ascending
    ///
    /// The table cursor stays on the same place.
    pub fn handle_sort(&mut self, column: SortColumn) {
        let order = self.sort.handle_sort(column);
        tracing::debug!(?column, ?order, "sorting table");

        let selected_id = self.selected_place().map(|place| place.place_id.clone());
        self.places = self.sort.apply(&self.places);

        if let Some(id) = selected_id {
            if let Some(row) = self.places.iter().position(|place| place.place_id == id) {
                self.selected_row = row;
            }
        }
    }

    /// Applies a finished request to the state
    ///
    /// Results of superseded requests are dropped. Failures leave every piece
    /// of visible state as it was before the request was issued.
    pub fn apply_event(&mut self, event: ApiEvent) {
        match event {
            ApiEvent::SearchFinished { generation, result } => {
                if generation != self.search_generation {
                    tracing::debug!(generation, latest = self.search_generation, "dropping stale search");
                    return;
                }
                self.searching = false;

                match result {
                    Ok(places) => {
                        tracing::info!(count = places.len(), "search results received");
                        self.details = DetailMap::collapsed_for(&places);
                        self.places = self.sort.apply(&places);
                        self.pending_details.clear();
                        self.fetched_details.clear();
                        self.selected_row = self.selected_row.min(self.places.len().saturating_sub(1));
                        self.selected_marker = None;
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "nearby search failed");
                        // The next move searches again, however small
                        self.last_search_center = None;
                    }
                }
            }
            ApiEvent::DetailsFinished {
                generation,
                place_id,
                result,
            } => {
                let Some(pending) = self.pending_details.get(&place_id) else {
                    tracing::debug!(%place_id, "dropping details with no pending request");
                    return;
                };
                if pending.generation != generation {
                    tracing::debug!(%place_id, generation, "dropping stale details");
                    return;
                }
                let Some(pending) = self.pending_details.remove(&place_id) else {
                    return;
                };

                match result {
                    Ok(detail) => {
                        self.fetched_details.insert(place_id.clone(), detail.clone());
                        self.details.set(&place_id, DetailState::Loaded(detail));
                        self.drawer_open = true;
                    }
                    Err(e) => {
                        tracing::warn!(%place_id, error = %e, "place details failed");
                        self.details.set(&place_id, pending.previous);
                    }
                }
            }
        }
    }

    /// Search radius in meters
    pub fn radius_meters(&self) -> u32 {
        self.radius_meters
    }

    /// The place under the table cursor
    pub fn selected_place(&self) -> Option<&Place> {
        self.places.get(self.selected_row)
    }

    /// The place under the map marker cursor
    pub fn selected_marker_place(&self) -> Option<&Place> {
        self.selected_marker.and_then(|i| self.places.get(i))
    }

    /// Handles keyboard input and updates state accordingly
    ///
    /// # Arguments
    /// * `key_event` - The keyboard event to handle
    ///
    /// # Returns
    /// A request to execute, if the key triggered one
    ///
    /// # Key Bindings
    /// - `q`: Quit the application
    /// - `?`: Toggle help
    /// - `Tab`: Switch focus between map and table
    /// - `m`: Toggle the drawer (header menu button)
    /// - Map: arrows/`hjkl` pan, `+`/`-` zoom, `[`/`]` pick marker, `Enter` open marker
    /// - Table: `Up`/`k`, `Down`/`j` move, `Enter`/`Space` expand row, `1`-`4` sort
    pub fn handle_key(&mut self, key_event: KeyEvent) -> Option<Command> {
        // Handle help overlay - intercepts all keys when shown
        if self.show_help {
            match key_event.code {
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => {
                    self.show_help = false;
                }
                _ => {}
            }
            return None;
        }

        match key_event.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                return None;
            }
            KeyCode::Char('?') => {
                self.show_help = true;
                return None;
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.switch_focus();
                return None;
            }
            KeyCode::Char('m') => {
                self.toggle_drawer(!self.drawer_open, Some(&key_event));
                return None;
            }
            _ => {}
        }

        match self.focus {
            Focus::Table => self.handle_table_key(key_event),
            Focus::Map => self.handle_map_key(key_event),
        }
    }

    fn handle_table_key(&mut self, key_event: KeyEvent) -> Option<Command> {
        match key_event.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.move_row_up();
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.move_row_down();
                None
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                let place_id = self.selected_place()?.place_id.clone();
                self.toggle_detail(&place_id)
            }
            KeyCode::Char(c @ '1'..='4') => {
                let index = (c as usize) - ('1' as usize);
                self.handle_sort(SortColumn::ALL[index]);
                None
            }
            _ => None,
        }
    }

    fn handle_map_key(&mut self, key_event: KeyEvent) -> Option<Command> {
        let direction = match key_event.code {
            KeyCode::Up | KeyCode::Char('k') => Some(PanDirection::North),
            KeyCode::Down | KeyCode::Char('j') => Some(PanDirection::South),
            KeyCode::Left | KeyCode::Char('h') => Some(PanDirection::West),
            KeyCode::Right | KeyCode::Char('l') => Some(PanDirection::East),
            _ => None,
        };
        if let Some(direction) = direction {
            let center = self.viewport.pan(direction);
            return self.on_center_changed(center);
        }

        match key_event.code {
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.viewport.zoom_in();
                None
            }
            KeyCode::Char('-') => {
                self.viewport.zoom_out();
                None
            }
            KeyCode::Char(']') => {
                self.next_marker();
                None
            }
            KeyCode::Char('[') => {
                self.previous_marker();
                None
            }
            KeyCode::Enter => {
                let place_id = self.selected_marker_place()?.place_id.clone();
                self.toggle_detail(&place_id)
            }
            _ => None,
        }
    }

    /// Switches focus; the table only takes focus while the drawer is open
    fn switch_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Map if self.drawer_open => Focus::Table,
            _ => Focus::Map,
        };
    }

    /// Moves the table cursor up, wrapping to bottom if at top
    fn move_row_up(&mut self) {
        let count = self.places.len();
        if count == 0 {
            return;
        }
        if self.selected_row == 0 {
            self.selected_row = count - 1;
        } else {
            self.selected_row -= 1;
        }
    }

    /// Moves the table cursor down, wrapping to top if at bottom
    fn move_row_down(&mut self) {
        let count = self.places.len();
        if count == 0 {
            return;
        }
        self.selected_row = (self.selected_row + 1) % count;
    }

    fn next_marker(&mut self) {
        let count = self.places.len();
        if count == 0 {
            return;
        }
        self.selected_marker = Some(match self.selected_marker {
            Some(i) => (i + 1) % count,
            None => 0,
        });
    }

    fn previous_marker(&mut self) {
        let count = self.places.len();
        if count == 0 {
            return;
        }
        self.selected_marker = Some(match self.selected_marker {
            Some(0) | None => count - 1,
            Some(i) => i - 1,
        });
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(&StartupConfig::default())
    }
}
