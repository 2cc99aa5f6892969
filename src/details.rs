//! Per-place detail state, addressed by place id

use std::collections::HashMap;

use crate::data::{DetailState, Place};

/// Detail states keyed by `place_id`
///
/// Lookups for ids with no entry (including places from an earlier result
/// set) read as `Collapsed`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailMap {
    states: HashMap<String, DetailState>,
}

static COLLAPSED: DetailState = DetailState::Collapsed;

impl DetailMap {
    /// A map with exactly one `Collapsed` entry per place
    pub fn collapsed_for(places: &[Place]) -> Self {
        Self {
            states: places
                .iter()
                .map(|place| (place.place_id.clone(), DetailState::Collapsed))
                .collect(),
        }
    }

    pub fn get(&self, place_id: &str) -> &DetailState {
        self.states.get(place_id).unwrap_or(&COLLAPSED)
    }

    pub fn set(&mut self, place_id: &str, state: DetailState) {
        self.states.insert(place_id.to_string(), state);
    }

    /// Whether the place's panel (and its map marker) is active
    pub fn is_open(&self, place_id: &str) -> bool {
        self.get(place_id).is_open()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn contains(&self, place_id: &str) -> bool {
        self.states.contains_key(place_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{PlaceDetail, Position};

    fn place(id: &str) -> Place {
        Place {
            place_id: id.to_string(),
            name: id.to_uppercase(),
            location: Position::DEFAULT,
            rating: None,
            price_level: None,
            distance_km: 0.1,
        }
    }

    #[test]
    fn test_collapsed_for_has_one_entry_per_place() {
        let map = DetailMap::collapsed_for(&[place("p1"), place("p2")]);
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("p1"), &DetailState::Collapsed);
        assert_eq!(map.get("p2"), &DetailState::Collapsed);
    }

    #[test]
    fn test_missing_entry_reads_as_collapsed() {
        let map = DetailMap::default();
        assert!(map.is_empty());
        assert_eq!(map.get("unknown"), &DetailState::Collapsed);
        assert!(!map.is_open("unknown"));
    }

    #[test]
    fn test_set_and_is_open() {
        let mut map = DetailMap::collapsed_for(&[place("p1")]);
        map.set("p1", DetailState::Loading);
        assert!(map.is_open("p1"));
        map.set("p1", DetailState::Loaded(PlaceDetail::default()));
        assert!(map.is_open("p1"));
        map.set("p1", DetailState::Collapsed);
        assert!(!map.is_open("p1"));
    }
}
