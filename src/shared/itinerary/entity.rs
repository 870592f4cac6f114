//! Entity Traits
//!
//! Every record that hangs off a trip implements [`TripEntity`], which lets
//! the store, the REST client and the persistence layer handle all eight
//! dependent collections with one set of generic routines.

use crate::shared::error::SharedError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Kinds of records managed by the Trip Store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityKind {
    Trip,
    Activity,
    Accommodation,
    Attraction,
    ShoppingItem,
    Document,
    Expense,
    PinnedPlace,
    Flight,
}

impl EntityKind {
    /// Every kind, trips first
    pub const ALL: [EntityKind; 9] = [
        EntityKind::Trip,
        EntityKind::Activity,
        EntityKind::Accommodation,
        EntityKind::Attraction,
        EntityKind::ShoppingItem,
        EntityKind::Document,
        EntityKind::Expense,
        EntityKind::PinnedPlace,
        EntityKind::Flight,
    ];

    /// Human-readable name used in logs and errors
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Trip => "trip",
            EntityKind::Activity => "activity",
            EntityKind::Accommodation => "accommodation",
            EntityKind::Attraction => "attraction",
            EntityKind::ShoppingItem => "shopping item",
            EntityKind::Document => "document",
            EntityKind::Expense => "expense",
            EntityKind::PinnedPlace => "pinned place",
            EntityKind::Flight => "flight",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Partial update for a record of type `T`.
///
/// Every field of a patch is optional; `apply_to` overwrites only the
/// fields that are present.
pub trait EntityPatch<T>:
    Serialize + DeserializeOwned + Clone + Debug + Default + Send + Sync + 'static
{
    /// Merge this patch into `target`
    fn apply_to(&self, target: &mut T);
}

/// A record that belongs to exactly one trip
pub trait TripEntity:
    Serialize + DeserializeOwned + Clone + Debug + PartialEq + Send + Sync + 'static
{
    /// Partial-update payload for this record
    type Patch: EntityPatch<Self>;

    /// Kind tag used by the rollback policy and logs
    const KIND: EntityKind;

    /// REST collection segment (`/api/trips/:tripId/<collection>`, `/api/<collection>/:id`)
    const COLLECTION: &'static str;

    fn id(&self) -> &str;

    fn set_id(&mut self, id: String);

    fn trip_id(&self) -> &str;

    fn set_trip_id(&mut self, trip_id: String);

    /// Check field-level invariants
    fn validate(&self) -> Result<(), SharedError> {
        Ok(())
    }
}

/// Copy every present field of a patch onto its target.
///
/// Fields listed after `optional` are `Option<T>` on the target.
macro_rules! merge_fields {
    ($patch:expr, $target:expr; $($field:ident),* $(; optional $($opt:ident),*)?) => {
        $(
            if let Some(value) = &$patch.$field {
                $target.$field = value.clone();
            }
        )*
        $($(
            if let Some(value) = &$patch.$opt {
                $target.$opt = Some(value.clone());
            }
        )*)?
    };
}

/// Implement the id/trip-id accessors of [`TripEntity`].
macro_rules! entity_accessors {
    () => {
        fn id(&self) -> &str {
            &self.id
        }

        fn set_id(&mut self, id: String) {
            self.id = id;
        }

        fn trip_id(&self) -> &str {
            &self.trip_id
        }

        fn set_trip_id(&mut self, trip_id: String) {
            self.trip_id = trip_id;
        }
    };
}

pub(crate) use entity_accessors;
pub(crate) use merge_fields;
