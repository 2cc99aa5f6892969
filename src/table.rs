//! Table sorting for the places list
//!
//! Sorting never mutates the list it is given: `sorted` returns a new vector
//! ordered by an explicit column and direction using a stable sort.

use std::cmp::Ordering;

use crate::data::Place;

/// Sortable table columns, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortColumn {
    Name,
    Distance,
    Rating,
    PriceLevel,
}

impl SortColumn {
    /// All columns in display order
    pub const ALL: [SortColumn; 4] = [
        SortColumn::Name,
        SortColumn::Distance,
        SortColumn::Rating,
        SortColumn::PriceLevel,
    ];

    /// Column header label
    pub fn label(&self) -> &'static str {
        match self {
            SortColumn::Name => "Name",
            SortColumn::Distance => "Distance km",
            SortColumn::Rating => "Rating",
            SortColumn::PriceLevel => "Price",
        }
    }

    /// Extracts the value of this column from a place
    fn key<'a>(&self, place: &'a Place) -> SortKey<'a> {
        match self {
            SortColumn::Name => SortKey::Text(&place.name),
            SortColumn::Distance => SortKey::Number(Some(place.distance_km)),
            SortColumn::Rating => SortKey::Number(place.rating),
            SortColumn::PriceLevel => SortKey::Number(place.price_level.map(f64::from)),
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// A single cell value as seen by the comparator
enum SortKey<'a> {
    Text(&'a str),
    Number(Option<f64>),
}

impl SortKey<'_> {
    /// Missing, zero and empty values sort below everything else
    fn is_falsy(&self) -> bool {
        match self {
            SortKey::Text(s) => s.is_empty(),
            SortKey::Number(None) => true,
            SortKey::Number(Some(n)) => *n == 0.0 || n.is_nan(),
        }
    }
}

/// Compares two places by a column in ascending order
///
/// Text is compared case-insensitively. A falsy value (missing, zero or empty)
/// is less than any present value and equal to another falsy value.
pub fn sort_compare(a: &Place, b: &Place, column: SortColumn) -> Ordering {
    let x = column.key(a);
    let y = column.key(b);

    match (x.is_falsy(), y.is_falsy()) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        (false, false) => {}
    }

    match (x, y) {
        (SortKey::Text(x), SortKey::Text(y)) => x.to_uppercase().cmp(&y.to_uppercase()),
        (SortKey::Number(Some(x)), SortKey::Number(Some(y))) => x.total_cmp(&y),
        _ => Ordering::Equal,
    }
}

/// Returns a copy of `places` ordered by `column` in the given direction
///
/// The sort is stable in both directions: places that compare equal keep
/// their relative order.
pub fn sorted(places: &[Place], column: SortColumn, order: SortOrder) -> Vec<Place> {
    let mut out = places.to_vec();
    match order {
        SortOrder::Asc => out.sort_by(|a, b| sort_compare(a, b, column)),
        SortOrder::Desc => out.sort_by(|a, b| sort_compare(b, a, column)),
    }
    out
}

/// Which column the table is sorted by, and in which direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortState {
    pub column: Option<SortColumn>,
    pub order: Option<SortOrder>,
}

impl SortState {
    /// Advances the sort state after a click on a column header
    ///
    /// A new column, an unset order or an ascending order switch to
    /// descending; clicking the descending column again switches to
    /// ascending. Returns the new order.
    pub fn handle_sort(&mut self, column: SortColumn) -> SortOrder {
        let order = if self.column == Some(column) && self.order == Some(SortOrder::Desc) {
            SortOrder::Asc
        } else {
            SortOrder::Desc
        };
        self.column = Some(column);
        self.order = Some(order);
        order
    }

    /// Applies the current sort (if any) to a list of places
    pub fn apply(&self, places: &[Place]) -> Vec<Place> {
        match (self.column, self.order) {
            (Some(column), Some(order)) => sorted(places, column, order),
            _ => places.to_vec(),
        }
    }

    /// Direction shown on a column header, if that column is active
    pub fn order_for(&self, column: SortColumn) -> Option<SortOrder> {
        if self.column == Some(column) {
            self.order
        } else {
            None
        }
    }
}
