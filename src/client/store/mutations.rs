//! Per-entity mutators.
//!
//! Each one validates, applies the change in memory, and hands the backend
//! request to the store's write plumbing. Only trip and activity writes
//! carry an offline queue operation.

use super::state::{Collection, TripState};
use super::{Dispatch, StoreResult, TripStore};
use crate::client::api::TripBackend;
use crate::client::offline::QueuedOp;
use crate::shared::error::SharedError;
use crate::shared::itinerary::{
    Accommodation, AccommodationPatch, Activity, ActivityPatch, Attraction, AttractionPatch,
    Document, DocumentPatch, EntityKind, EntityPatch, Expense, ExpensePatch, Flight,
    FlightDetails, FlightPatch, NewAccommodation, NewActivity, NewAttraction, NewDocument,
    NewExpense, NewPinnedPlace, NewShoppingItem, NewTrip, PinnedPlace, PinnedPlacePatch,
    ShoppingItem, ShoppingItemPatch, Trip, TripEntity, TripPatch,
};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

impl<B: TripBackend> TripStore<B> {
    // ---- trips ----

    /// Create a trip.
    ///
    /// Online, this waits for the backend and returns the reconciled trip
    /// (which may carry a server-assigned id). Offline or on failure the
    /// optimistic trip is returned.
    pub async fn add_trip(&self, input: NewTrip) -> StoreResult<Trip> {
        input.validate()?;
        let id = new_id();
        let owner = self.current_user().unwrap_or_else(|| "local".to_string());
        let trip = input.clone().into_trip(id.clone(), owner, Utc::now());
        self.inner.write_state().insert_trip(trip.clone());

        let queued = QueuedOp::CreateTrip {
            optimistic_id: id.clone(),
            input: input.clone(),
        };
        match self.dispatch(Some(queued)) {
            Dispatch::Persist => self.inner.persist_local().await,
            Dispatch::Queue(op) => self.inner.enqueue(op).await,
            Dispatch::Send(backend) => match backend.create_trip(&input).await {
                Ok(server) => {
                    tracing::debug!(optimistic_id = %id, server_id = %server.id, "Trip created");
                    self.inner.write_state().replace_trip(&id, server.clone());
                    return Ok(server);
                }
                Err(e) => {
                    if self.inner.policy.rollback_on_failure(EntityKind::Trip) {
                        self.inner.write_state().remove_trip(&id);
                    }
                    tracing::warn!(trip_id = %id, "Trip create not synced: {}", e);
                }
            },
        }
        Ok(trip)
    }

    pub async fn update_trip(&self, id: &str, patch: TripPatch) -> StoreResult<()> {
        self.ensure_editable(id)?;
        {
            let mut state = self.inner.write_state();
            let trip = state
                .trip_mut(id)
                .ok_or_else(|| SharedError::not_found("trip", id))?;
            let mut updated = trip.clone();
            patch.apply_to(&mut updated);
            updated.validate()?;
            updated.updated_at = Utc::now();
            *trip = updated;
        }

        let queued = QueuedOp::UpdateTrip {
            id: id.to_string(),
            patch: patch.clone(),
        };
        let id = id.to_string();
        self.commit(Some(queued), move |store, backend| {
            let inner = Arc::clone(&store.inner);
            store.spawn(async move {
                match backend.update_trip(&id, &patch).await {
                    Ok(mut server) => {
                        let mut state = inner.write_state();
                        if server.role.is_none() {
                            server.role = state.trip(&id).and_then(|trip| trip.role);
                        }
                        state.replace_trip(&id, server);
                    }
                    Err(e) => tracing::warn!(trip_id = %id, "Trip update not synced: {}", e),
                }
            });
        })
        .await;
        Ok(())
    }

    /// Delete a trip and every record that belongs to it
    pub async fn delete_trip(&self, id: &str) -> StoreResult<()> {
        if self.inner.read_state().trip(id).is_none() {
            return Ok(());
        }
        self.ensure_editable(id)?;
        self.inner.write_state().remove_trip(id);

        let queued = QueuedOp::DeleteTrip { id: id.to_string() };
        let id = id.to_string();
        self.commit(Some(queued), move |store, backend| {
            store.spawn(async move {
                if let Err(e) = backend.delete_trip(&id).await {
                    tracing::warn!(trip_id = %id, "Trip delete not synced: {}", e);
                }
            });
        })
        .await;
        Ok(())
    }

    // ---- activities ----

    /// Add an activity; without an explicit `order` it goes to the end of its day
    pub async fn add_activity(&self, input: NewActivity) -> StoreResult<Activity> {
        self.ensure_day(&input.trip_id, input.day_index)?;
        let order = self
            .inner
            .read_state()
            .next_activity_order(&input.trip_id, input.day_index);
        let activity = input.into_activity(new_id(), order);
        let queued = QueuedOp::CreateActivity {
            activity: activity.clone(),
        };
        self.create_record(activity, Some(queued)).await
    }

    pub async fn update_activity(&self, id: &str, patch: ActivityPatch) -> StoreResult<()> {
        let queued = QueuedOp::UpdateActivity {
            id: id.to_string(),
            patch: patch.clone(),
        };
        self.update_record::<Activity>(id, patch, Some(queued)).await
    }

    pub async fn delete_activity(&self, id: &str) -> StoreResult<()> {
        let queued = QueuedOp::DeleteActivity { id: id.to_string() };
        self.delete_record::<Activity>(id, Some(queued)).await
    }

    /// Move an activity to the end of another day
    pub async fn move_activity(&self, id: &str, day_index: u32) -> StoreResult<()> {
        let trip_id = self
            .inner
            .read_state()
            .get::<Activity>(id)
            .map(|activity| activity.trip_id.clone())
            .ok_or_else(|| SharedError::not_found("activity", id))?;
        self.ensure_day(&trip_id, day_index)?;
        let order = self.inner.read_state().next_activity_order(&trip_id, day_index);
        let patch = ActivityPatch {
            day_index: Some(day_index),
            order: Some(order),
            ..Default::default()
        };
        self.update_activity(id, patch).await
    }

    /// Reject day indexes past the last day of the trip
    fn ensure_day(&self, trip_id: &str, day_index: u32) -> StoreResult<()> {
        let state = self.inner.read_state();
        let trip = state
            .trip(trip_id)
            .ok_or_else(|| SharedError::not_found("trip", trip_id))?;
        if trip.date_of(day_index).is_none() {
            return Err(SharedError::validation("dayIndex", "outside the trip's days").into());
        }
        Ok(())
    }

    /// Give the activities of one day the order of `ordered_ids` (0..n-1).
    /// Activities left out of the list keep their relative order after it.
    pub async fn reorder_activities(
        &self,
        trip_id: &str,
        day_index: u32,
        ordered_ids: &[String],
    ) -> StoreResult<()> {
        self.ensure_editable(trip_id)?;
        let changed = self
            .inner
            .write_state()
            .reorder_activities(trip_id, day_index, ordered_ids);

        if !self.is_api_backed() {
            self.inner.persist_local().await;
            return Ok(());
        }
        for (id, order) in changed {
            self.sync_order::<Activity>(
                id.clone(),
                ActivityPatch::order(order),
                Some(QueuedOp::UpdateActivity {
                    id,
                    patch: ActivityPatch::order(order),
                }),
            )
            .await;
        }
        Ok(())
    }

    /// Send an order change that was already applied in memory
    async fn sync_order<E>(&self, id: String, patch: E::Patch, queued: Option<QueuedOp>)
    where
        E: TripEntity,
        TripState: Collection<E>,
    {
        self.commit(queued, move |store, backend| {
            let inner = Arc::clone(&store.inner);
            store.spawn(async move {
                match backend.update_entity::<E>(&id, &patch).await {
                    Ok(server) => {
                        inner.write_state().replace(&id, server);
                    }
                    Err(e) => tracing::warn!(kind = %E::KIND, id = %id, "Reorder not synced: {}", e),
                }
            });
        })
        .await;
    }

    // ---- accommodations ----

    pub async fn add_accommodation(&self, input: NewAccommodation) -> StoreResult<Accommodation> {
        self.create_record(input.into_accommodation(new_id()), None)
            .await
    }

    pub async fn update_accommodation(
        &self,
        id: &str,
        patch: AccommodationPatch,
    ) -> StoreResult<()> {
        self.update_record::<Accommodation>(id, patch, None).await
    }

    pub async fn delete_accommodation(&self, id: &str) -> StoreResult<()> {
        self.delete_record::<Accommodation>(id, None).await
    }

    // ---- attractions ----

    pub async fn add_attraction(&self, input: NewAttraction) -> StoreResult<Attraction> {
        self.create_record(input.into_attraction(new_id()), None).await
    }

    pub async fn update_attraction(&self, id: &str, patch: AttractionPatch) -> StoreResult<()> {
        self.update_record::<Attraction>(id, patch, None).await
    }

    pub async fn delete_attraction(&self, id: &str) -> StoreResult<()> {
        self.delete_record::<Attraction>(id, None).await
    }

    // ---- shopping list ----

    /// Add an item to the end of the list
    pub async fn add_shopping_item(&self, input: NewShoppingItem) -> StoreResult<ShoppingItem> {
        let order = self.inner.read_state().next_shopping_order(&input.trip_id);
        self.create_record(input.into_item(new_id(), order), None).await
    }

    pub async fn update_shopping_item(
        &self,
        id: &str,
        patch: ShoppingItemPatch,
    ) -> StoreResult<()> {
        self.update_record::<ShoppingItem>(id, patch, None).await
    }

    pub async fn toggle_shopping_item(&self, id: &str) -> StoreResult<()> {
        let done = self
            .inner
            .read_state()
            .get::<ShoppingItem>(id)
            .map(|item| item.done)
            .ok_or_else(|| SharedError::not_found("shopping item", id))?;
        let patch = ShoppingItemPatch {
            done: Some(!done),
            ..Default::default()
        };
        self.update_shopping_item(id, patch).await
    }

    pub async fn delete_shopping_item(&self, id: &str) -> StoreResult<()> {
        self.delete_record::<ShoppingItem>(id, None).await
    }

    pub async fn reorder_shopping_items(
        &self,
        trip_id: &str,
        ordered_ids: &[String],
    ) -> StoreResult<()> {
        self.ensure_editable(trip_id)?;
        let changed = self
            .inner
            .write_state()
            .reorder_shopping_items(trip_id, ordered_ids);

        if !self.is_api_backed() {
            self.inner.persist_local().await;
            return Ok(());
        }
        for (id, order) in changed {
            let patch = ShoppingItemPatch {
                order: Some(order),
                ..Default::default()
            };
            self.sync_order::<ShoppingItem>(id, patch, None).await;
        }
        Ok(())
    }

    // ---- documents ----

    /// Add a document and wait for the upload.
    ///
    /// A backend failure is returned to the caller; the local record is kept.
    pub async fn add_document(&self, input: NewDocument) -> StoreResult<Document> {
        let document = input.into_document(new_id());
        self.ensure_editable(&document.trip_id)?;
        document.validate()?;
        self.inner.write_state().insert(document.clone());

        match self.dispatch(None) {
            Dispatch::Send(backend) => {
                let synced = self.inner.sync_create(backend, document).await?;
                Ok(synced)
            }
            Dispatch::Persist | Dispatch::Queue(_) => {
                self.inner.persist_local().await;
                Ok(document)
            }
        }
    }

    pub async fn update_document(&self, id: &str, patch: DocumentPatch) -> StoreResult<()> {
        self.update_record::<Document>(id, patch, None).await
    }

    pub async fn delete_document(&self, id: &str) -> StoreResult<()> {
        self.delete_record::<Document>(id, None).await
    }

    // ---- expenses ----

    pub async fn add_expense(&self, input: NewExpense) -> StoreResult<Expense> {
        self.create_record(input.into_expense(new_id(), Utc::now()), None)
            .await
    }

    pub async fn update_expense(&self, id: &str, patch: ExpensePatch) -> StoreResult<()> {
        self.update_record::<Expense>(id, patch, None).await
    }

    pub async fn delete_expense(&self, id: &str) -> StoreResult<()> {
        self.delete_record::<Expense>(id, None).await
    }

    // ---- pinned places ----

    pub async fn add_pinned_place(&self, input: NewPinnedPlace) -> StoreResult<PinnedPlace> {
        self.create_record(input.into_place(new_id(), Utc::now()), None)
            .await
    }

    pub async fn update_pinned_place(&self, id: &str, patch: PinnedPlacePatch) -> StoreResult<()> {
        self.update_record::<PinnedPlace>(id, patch, None).await
    }

    pub async fn delete_pinned_place(&self, id: &str) -> StoreResult<()> {
        self.delete_record::<PinnedPlace>(id, None).await
    }

    // ---- flights ----

    pub async fn add_flight(&self, trip_id: &str, details: FlightDetails) -> StoreResult<Flight> {
        let flight = Flight::new(new_id(), trip_id.to_string(), details);
        self.create_record(flight, None).await
    }

    pub async fn update_flight(&self, id: &str, details: FlightDetails) -> StoreResult<()> {
        self.update_record::<Flight>(id, FlightPatch(details), None)
            .await
    }

    pub async fn delete_flight(&self, id: &str) -> StoreResult<()> {
        self.delete_record::<Flight>(id, None).await
    }
}
