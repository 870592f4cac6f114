//! Expense Data Structure

use crate::shared::error::{require_amount, require_text, SharedError};
use crate::shared::itinerary::entity::{
    entity_accessors, merge_fields, EntityKind, EntityPatch, TripEntity,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    pub trip_id: String,
    pub description: String,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExpense {
    pub trip_id: String,
    pub description: String,
    pub amount: f64,
    #[serde(default)]
    pub category: Option<String>,
}

impl NewExpense {
    pub fn new(trip_id: impl Into<String>, description: impl Into<String>, amount: f64) -> Self {
        Self {
            trip_id: trip_id.into(),
            description: description.into(),
            amount,
            category: None,
        }
    }

    pub fn into_expense(self, id: String, now: DateTime<Utc>) -> Expense {
        Expense {
            id,
            trip_id: self.trip_id,
            description: self.description,
            amount: self.amount,
            category: self.category,
            created_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpensePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl EntityPatch<Expense> for ExpensePatch {
    fn apply_to(&self, target: &mut Expense) {
        merge_fields!(self, target; description, amount; optional category);
    }
}

impl TripEntity for Expense {
    type Patch = ExpensePatch;
    const KIND: EntityKind = EntityKind::Expense;
    const COLLECTION: &'static str = "expenses";

    entity_accessors!();

    fn validate(&self) -> Result<(), SharedError> {
        require_text("description", &self.description)?;
        require_amount("amount", self.amount)
    }
}
