//! Flight Data Structure
//!
//! Every descriptive field is optional; a flight only has to belong to a trip.

use crate::shared::itinerary::entity::{
    entity_accessors, merge_fields, EntityKind, EntityPatch, TripEntity,
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flight_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub airline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub departure_airport: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrival_airport: Option<String>,
    /// Local time at the departure airport
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub departure_time: Option<NaiveDateTime>,
    /// Local time at the arrival airport
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrival_time: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seat: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cabin_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flight {
    pub id: String,
    pub trip_id: String,
    #[serde(flatten)]
    pub details: FlightDetails,
}

impl Flight {
    pub fn new(id: String, trip_id: String, details: FlightDetails) -> Self {
        Self { id, trip_id, details }
    }
}

/// Partial update for a flight; absent fields keep their current value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlightPatch(pub FlightDetails);

impl EntityPatch<Flight> for FlightPatch {
    fn apply_to(&self, target: &mut Flight) {
        let patch = &self.0;
        let details = &mut target.details;
        merge_fields!(patch, details; ; optional flight_number, airline, departure_airport,
            arrival_airport, departure_time, arrival_time, gate, seat, cabin_class,
            ticket_number, booking_reference, notes);
    }
}

impl TripEntity for Flight {
    type Patch = FlightPatch;
    const KIND: EntityKind = EntityKind::Flight;
    const COLLECTION: &'static str = "flights";

    entity_accessors!();
}
