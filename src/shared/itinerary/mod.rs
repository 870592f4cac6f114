//! Itinerary Module
//!
//! This module contains all the records a trip is made of:
//!
//! - `Trip` - the root record, plus the derived `Day` sequence
//! - `Activity` - scheduled items on a single day
//! - `Accommodation` - stays covering a date range
//! - `Attraction` - points of interest spanning several days
//! - `ShoppingItem`, `Document`, `Expense`, `PinnedPlace`, `Flight`
//! - `Snapshot` - every collection at once
//! - `TripMember`, `InviteToken`, `ShareLink`, `SharedTrip` - collaboration
//!
//! # Usage
//!
//! ```rust
//! use tripmate::shared::itinerary::{NewTrip, Trip};
//! use chrono::NaiveDate;
//!
//! let start = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
//! let end = NaiveDate::from_ymd_opt(2025, 6, 3).unwrap();
//! let trip = NewTrip::new("Lisbon", start, end)
//!     .into_trip("t1".into(), "u1".into(), chrono::Utc::now());
//! assert_eq!(trip.days().count(), 3);
//! ```

pub mod entity;
pub mod trip;
pub mod activity;
pub mod lodging;
pub mod attraction;
pub mod shopping;
pub mod document;
pub mod expense;
pub mod place;
pub mod flight;
pub mod snapshot;
pub mod member;

// Re-export all types
pub use entity::{EntityKind, EntityPatch, TripEntity};
pub use trip::{Day, Days, NewTrip, Trip, TripPatch, TripRole};
pub use activity::{Activity, ActivityPatch, NewActivity};
pub use lodging::{Accommodation, AccommodationPatch, NewAccommodation};
pub use attraction::{Attraction, AttractionPatch, NewAttraction};
pub use shopping::{NewShoppingItem, ShoppingItem, ShoppingItemPatch};
pub use document::{Document, DocumentPatch, DocumentType, NewDocument};
pub use expense::{Expense, ExpensePatch, NewExpense};
pub use place::{NewPinnedPlace, PinnedPlace, PinnedPlacePatch};
pub use flight::{Flight, FlightDetails, FlightPatch};
pub use snapshot::Snapshot;
pub use member::{
    CreateInviteRequest, InviteMemberRequest, InviteToken, ShareLink, SharedTrip, TripMember,
    UpdateRoleRequest,
};
