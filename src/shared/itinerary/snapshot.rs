//! State Snapshot
//!
//! The full set of collections visible to the caller, as returned by
//! `GET /api/state` and as persisted in local-only mode.

use crate::shared::itinerary::{
    Accommodation, Activity, Attraction, Document, Expense, Flight, PinnedPlace, ShoppingItem,
    Trip,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub trips: Vec<Trip>,
    #[serde(default)]
    pub activities: Vec<Activity>,
    #[serde(default)]
    pub accommodations: Vec<Accommodation>,
    #[serde(default)]
    pub attractions: Vec<Attraction>,
    #[serde(default)]
    pub shopping_items: Vec<ShoppingItem>,
    #[serde(default)]
    pub documents: Vec<Document>,
    #[serde(default)]
    pub expenses: Vec<Expense>,
    #[serde(default)]
    pub pinned_places: Vec<PinnedPlace>,
    #[serde(default)]
    pub flights: Vec<Flight>,
}

impl Snapshot {
    /// Total number of records across all collections
    pub fn record_count(&self) -> usize {
        self.trips.len()
            + self.activities.len()
            + self.accommodations.len()
            + self.attractions.len()
            + self.shopping_items.len()
            + self.documents.len()
            + self.expenses.len()
            + self.pinned_places.len()
            + self.flights.len()
    }
}
