//! Trip Data Structure
//!
//! A trip is the root record of the itinerary. Its date range defines the
//! sequence of [`Day`]s that every other record is arranged around.

use crate::shared::error::{require_amount, require_text, SharedError};
use crate::shared::itinerary::entity::{merge_fields, EntityPatch};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The current user's permission on a trip, as reported by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TripRole {
    Owner,
    Participant,
    Viewer,
}

impl TripRole {
    /// Whether this role may change trip content
    pub fn can_edit(&self) -> bool {
        matches!(self, TripRole::Owner | TripRole::Participant)
    }
}

/// A planned trip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: String,
    /// Owning user
    pub user_id: String,
    pub name: String,
    /// First day, inclusive
    pub start_date: NaiveDate,
    /// Last day, inclusive
    pub end_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Only present on trips fetched from the backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<TripRole>,
}

/// Input for creating a trip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTrip {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
}

impl NewTrip {
    pub fn new(name: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            start_date,
            end_date,
            destination: None,
            tags: BTreeSet::new(),
            budget: None,
        }
    }

    pub fn validate(&self) -> Result<(), SharedError> {
        validate_trip_fields(&self.name, self.start_date, self.end_date, self.budget)
    }

    /// Materialize the optimistic record for this input
    pub fn into_trip(self, id: String, user_id: String, now: DateTime<Utc>) -> Trip {
        Trip {
            id,
            user_id,
            name: self.name,
            start_date: self.start_date,
            end_date: self.end_date,
            destination: self.destination,
            tags: self.tags,
            budget: self.budget,
            created_at: now,
            updated_at: now,
            role: None,
        }
    }
}

/// Partial update for a trip
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeSet<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
}

impl EntityPatch<Trip> for TripPatch {
    fn apply_to(&self, target: &mut Trip) {
        merge_fields!(self, target; name, start_date, end_date, tags; optional destination, budget);
    }
}

fn validate_trip_fields(
    name: &str,
    start_date: NaiveDate,
    end_date: NaiveDate,
    budget: Option<f64>,
) -> Result<(), SharedError> {
    require_text("name", name)?;
    if end_date < start_date {
        return Err(SharedError::validation("endDate", "must not precede startDate"));
    }
    if let Some(budget) = budget {
        require_amount("budget", budget)?;
    }
    Ok(())
}

impl Trip {
    pub fn validate(&self) -> Result<(), SharedError> {
        validate_trip_fields(&self.name, self.start_date, self.end_date, self.budget)
    }

    /// Number of calendar days covered, both ends inclusive
    pub fn day_count(&self) -> usize {
        let span = (self.end_date - self.start_date).num_days();
        if span < 0 {
            0
        } else {
            span as usize + 1
        }
    }

    /// The ordered day sequence of this trip
    pub fn days(&self) -> Days {
        Days {
            trip_id: self.id.clone(),
            start: self.start_date,
            len: self.day_count(),
            next: 0,
        }
    }

    /// Calendar date of `day_index`, if it falls inside the trip
    pub fn date_of(&self, day_index: u32) -> Option<NaiveDate> {
        if (day_index as usize) >= self.day_count() {
            return None;
        }
        self.start_date
            .checked_add_signed(Duration::days(i64::from(day_index)))
    }

    /// Whether the current user may change this trip.
    ///
    /// Trips without a role were created locally and are always editable.
    pub fn can_edit(&self) -> bool {
        self.role.map_or(true, |role| role.can_edit())
    }

    /// Whether the current user owns this trip
    pub fn is_owner(&self) -> bool {
        self.role.map_or(true, |role| role == TripRole::Owner)
    }
}

/// One calendar day of a trip. Derived from the trip, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Day {
    pub trip_id: String,
    pub date: NaiveDate,
    /// Zero-based position in date order
    pub day_index: u32,
}

/// Iterator over the days of a trip
#[derive(Debug, Clone)]
pub struct Days {
    trip_id: String,
    start: NaiveDate,
    len: usize,
    next: usize,
}

impl Iterator for Days {
    type Item = Day;

    fn next(&mut self) -> Option<Day> {
        if self.next >= self.len {
            return None;
        }
        let date = self
            .start
            .checked_add_signed(Duration::days(self.next as i64))?;
        let day = Day {
            trip_id: self.trip_id.clone(),
            date,
            day_index: self.next as u32,
        };
        self.next += 1;
        Some(day)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Days {}
