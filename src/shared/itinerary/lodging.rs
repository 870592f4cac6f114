//! Accommodation Data Structure

use crate::shared::error::{require_text, SharedError};
use crate::shared::itinerary::entity::{
    entity_accessors, merge_fields, EntityKind, EntityPatch, TripEntity,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A place to stay, covering an inclusive date range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Accommodation {
    pub id: String,
    pub trip_id: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
}

impl Accommodation {
    /// Whether `date` falls inside `[check_in_date, check_out_date]`
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.check_in_date <= date && date <= self.check_out_date
    }
}

/// Input for creating an accommodation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccommodation {
    pub trip_id: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub booking_url: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
}

impl NewAccommodation {
    pub fn new(
        trip_id: impl Into<String>,
        name: impl Into<String>,
        check_in_date: NaiveDate,
        check_out_date: NaiveDate,
    ) -> Self {
        Self {
            trip_id: trip_id.into(),
            name: name.into(),
            address: String::new(),
            check_in_date,
            check_out_date,
            notes: None,
            booking_url: None,
            lat: None,
            lng: None,
        }
    }

    pub fn into_accommodation(self, id: String) -> Accommodation {
        Accommodation {
            id,
            trip_id: self.trip_id,
            name: self.name,
            address: self.address,
            check_in_date: self.check_in_date,
            check_out_date: self.check_out_date,
            notes: self.notes,
            booking_url: self.booking_url,
            lat: self.lat,
            lng: self.lng,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccommodationPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_in_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_out_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
}

impl EntityPatch<Accommodation> for AccommodationPatch {
    fn apply_to(&self, target: &mut Accommodation) {
        merge_fields!(self, target; name, address, check_in_date, check_out_date; optional notes, booking_url, lat, lng);
    }
}

impl TripEntity for Accommodation {
    type Patch = AccommodationPatch;
    const KIND: EntityKind = EntityKind::Accommodation;
    const COLLECTION: &'static str = "accommodations";

    entity_accessors!();

    fn validate(&self) -> Result<(), SharedError> {
        require_text("name", &self.name)?;
        if self.check_out_date < self.check_in_date {
            return Err(SharedError::validation(
                "checkOutDate",
                "must not precede checkInDate",
            ));
        }
        Ok(())
    }
}
