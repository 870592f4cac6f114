//! Pinned Map Places

use crate::shared::error::{require_text, SharedError};
use crate::shared::itinerary::entity::{
    entity_accessors, merge_fields, EntityKind, EntityPatch, TripEntity,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A location the user pinned on the trip map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinnedPlace {
    pub id: String,
    pub trip_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPinnedPlace {
    pub trip_id: String,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
}

impl NewPinnedPlace {
    pub fn new(trip_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            trip_id: trip_id.into(),
            name: name.into(),
            address: None,
            lat: None,
            lng: None,
        }
    }

    pub fn at(mut self, lat: f64, lng: f64) -> Self {
        self.lat = Some(lat);
        self.lng = Some(lng);
        self
    }

    pub fn into_place(self, id: String, now: DateTime<Utc>) -> PinnedPlace {
        PinnedPlace {
            id,
            trip_id: self.trip_id,
            name: self.name,
            address: self.address,
            lat: self.lat,
            lng: self.lng,
            created_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinnedPlacePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
}

impl EntityPatch<PinnedPlace> for PinnedPlacePatch {
    fn apply_to(&self, target: &mut PinnedPlace) {
        merge_fields!(self, target; name; optional address, lat, lng);
    }
}

impl TripEntity for PinnedPlace {
    type Patch = PinnedPlacePatch;
    const KIND: EntityKind = EntityKind::PinnedPlace;
    const COLLECTION: &'static str = "places";

    entity_accessors!();

    fn validate(&self) -> Result<(), SharedError> {
        require_text("name", &self.name)
    }
}
