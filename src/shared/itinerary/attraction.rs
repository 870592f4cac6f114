//! Attraction Data Structure
//!
//! Attractions are points of interest that may be relevant to several days
//! of a trip at once.

use crate::shared::error::{require_text, SharedError};
use crate::shared::itinerary::entity::{
    entity_accessors, merge_fields, EntityKind, EntityPatch, TripEntity,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attraction {
    pub id: String,
    pub trip_id: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
    /// Days this attraction is planned for
    #[serde(default)]
    pub day_indexes: BTreeSet<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAttraction {
    pub trip_id: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub day_indexes: BTreeSet<u32>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub rating: Option<f32>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
}

impl NewAttraction {
    pub fn new(trip_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            trip_id: trip_id.into(),
            name: name.into(),
            address: String::new(),
            day_indexes: BTreeSet::new(),
            description: None,
            category: None,
            image_url: None,
            rating: None,
            lat: None,
            lng: None,
        }
    }

    pub fn on_days(mut self, days: impl IntoIterator<Item = u32>) -> Self {
        self.day_indexes.extend(days);
        self
    }

    pub fn into_attraction(self, id: String) -> Attraction {
        Attraction {
            id,
            trip_id: self.trip_id,
            name: self.name,
            address: self.address,
            day_indexes: self.day_indexes,
            description: self.description,
            category: self.category,
            image_url: self.image_url,
            rating: self.rating,
            lat: self.lat,
            lng: self.lng,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttractionPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_indexes: Option<BTreeSet<u32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
}

impl EntityPatch<Attraction> for AttractionPatch {
    fn apply_to(&self, target: &mut Attraction) {
        merge_fields!(self, target; name, address, day_indexes; optional description, category, image_url, rating, lat, lng);
    }
}

impl TripEntity for Attraction {
    type Patch = AttractionPatch;
    const KIND: EntityKind = EntityKind::Attraction;
    const COLLECTION: &'static str = "attractions";

    entity_accessors!();

    fn validate(&self) -> Result<(), SharedError> {
        require_text("name", &self.name)
    }
}
