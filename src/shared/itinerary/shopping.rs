//! Shopping List Items

use crate::shared::error::{require_text, SharedError};
use crate::shared::itinerary::entity::{
    entity_accessors, merge_fields, EntityKind, EntityPatch, TripEntity,
};
use serde::{Deserialize, Serialize};

/// One line of a trip's shopping/packing list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingItem {
    pub id: String,
    pub trip_id: String,
    pub text: String,
    #[serde(default)]
    pub done: bool,
    /// Same ordering contract as `Activity::order`
    #[serde(default)]
    pub order: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewShoppingItem {
    pub trip_id: String,
    pub text: String,
    #[serde(default)]
    pub category: Option<String>,
}

impl NewShoppingItem {
    pub fn new(trip_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            trip_id: trip_id.into(),
            text: text.into(),
            category: None,
        }
    }

    pub fn into_item(self, id: String, order: i64) -> ShoppingItem {
        ShoppingItem {
            id,
            trip_id: self.trip_id,
            text: self.text,
            done: false,
            order,
            category: self.category,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingItemPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub done: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl EntityPatch<ShoppingItem> for ShoppingItemPatch {
    fn apply_to(&self, target: &mut ShoppingItem) {
        merge_fields!(self, target; text, done, order; optional category);
    }
}

impl TripEntity for ShoppingItem {
    type Patch = ShoppingItemPatch;
    const KIND: EntityKind = EntityKind::ShoppingItem;
    const COLLECTION: &'static str = "shopping";

    entity_accessors!();

    fn validate(&self) -> Result<(), SharedError> {
        require_text("text", &self.text)
    }
}
