//! Activity Data Structure
//!
//! An activity is a scheduled item on one day of a trip. Activities sharing
//! the same `(trip_id, day_index)` are displayed sorted by `order`.

use crate::shared::error::{require_text, SharedError};
use crate::shared::itinerary::entity::{
    entity_accessors, merge_fields, EntityKind, EntityPatch, TripEntity,
};
use serde::{Deserialize, Serialize};

/// A scheduled activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub trip_id: String,
    pub day_index: u32,
    pub title: String,
    /// Free-form time of day, e.g. "09:30"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
    /// Sort key within the day; need not be contiguous
    #[serde(default)]
    pub order: i64,
}

/// Input for creating an activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewActivity {
    pub trip_id: String,
    pub day_index: u32,
    pub title: String,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    /// Explicit position; appended after the last activity of the day when absent
    #[serde(default)]
    pub order: Option<i64>,
}

impl NewActivity {
    pub fn new(trip_id: impl Into<String>, day_index: u32, title: impl Into<String>) -> Self {
        Self {
            trip_id: trip_id.into(),
            day_index,
            title: title.into(),
            time: None,
            description: None,
            address: None,
            lat: None,
            lng: None,
            order: None,
        }
    }

    pub fn into_activity(self, id: String, order: i64) -> Activity {
        Activity {
            id,
            trip_id: self.trip_id,
            day_index: self.day_index,
            title: self.title,
            time: self.time,
            description: self.description,
            address: self.address,
            lat: self.lat,
            lng: self.lng,
            order: self.order.unwrap_or(order),
        }
    }
}

/// Partial update for an activity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_index: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

impl ActivityPatch {
    /// Patch that only moves the activity within its day
    pub fn order(order: i64) -> Self {
        Self {
            order: Some(order),
            ..Default::default()
        }
    }
}

impl EntityPatch<Activity> for ActivityPatch {
    fn apply_to(&self, target: &mut Activity) {
        merge_fields!(self, target; day_index, title, order; optional time, description, address, lat, lng);
    }
}

impl TripEntity for Activity {
    type Patch = ActivityPatch;
    const KIND: EntityKind = EntityKind::Activity;
    const COLLECTION: &'static str = "activities";

    entity_accessors!();

    fn validate(&self) -> Result<(), SharedError> {
        require_text("title", &self.title)
    }
}
