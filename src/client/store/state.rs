//! In-memory trip collections.
//!
//! Pure data operations only; the store wraps this in a lock and decides
//! what to send to the backend.

use crate::client::local_db::strip_oversized_documents;
use crate::shared::itinerary::{
    Accommodation, Activity, Attraction, Day, Document, Expense, Flight, PinnedPlace,
    ShoppingItem, Snapshot, Trip, TripEntity,
};

/// Access to the collection holding records of type `E`
pub(crate) trait Collection<E> {
    fn records(&self) -> &Vec<E>;

    fn records_mut(&mut self) -> &mut Vec<E>;
}

macro_rules! collection {
    ($ty:ty, $field:ident) => {
        impl Collection<$ty> for TripState {
            fn records(&self) -> &Vec<$ty> {
                &self.data.$field
            }

            fn records_mut(&mut self) -> &mut Vec<$ty> {
                &mut self.data.$field
            }
        }
    };
}

/// Every collection the store owns
#[derive(Debug, Default, Clone)]
pub(crate) struct TripState {
    data: Snapshot,
}

collection!(Activity, activities);
collection!(Accommodation, accommodations);
collection!(Attraction, attractions);
collection!(ShoppingItem, shopping_items);
collection!(Document, documents);
collection!(Expense, expenses);
collection!(PinnedPlace, pinned_places);
collection!(Flight, flights);

fn retain_other_trips<E: TripEntity>(records: &mut Vec<E>, trip_id: &str) {
    records.retain(|record| record.trip_id() != trip_id);
}

fn repoint<E: TripEntity>(records: &mut [E], from: &str, to: &str) {
    for record in records.iter_mut().filter(|record| record.trip_id() == from) {
        record.set_trip_id(to.to_string());
    }
}

impl TripState {
    pub fn from_snapshot(data: Snapshot) -> Self {
        Self { data }
    }

    pub fn snapshot(&self) -> Snapshot {
        self.data.clone()
    }

    /// Copy suitable for on-device persistence
    pub fn persisted(&self) -> Snapshot {
        let mut data = self.data.clone();
        strip_oversized_documents(&mut data.documents);
        data
    }

    pub fn replace_all(&mut self, data: Snapshot) {
        self.data = data;
    }

    pub fn trips(&self) -> &[Trip] {
        &self.data.trips
    }

    pub fn trip(&self, id: &str) -> Option<&Trip> {
        self.data.trips.iter().find(|trip| trip.id == id)
    }

    pub fn trip_mut(&mut self, id: &str) -> Option<&mut Trip> {
        self.data.trips.iter_mut().find(|trip| trip.id == id)
    }

    pub fn insert_trip(&mut self, trip: Trip) {
        self.data.trips.push(trip);
    }

    /// Replace the trip stored as `id` wholesale.
    ///
    /// When the replacement carries a different id, every dependent record
    /// is re-pointed at it. Returns false if `id` is unknown.
    pub fn replace_trip(&mut self, id: &str, trip: Trip) -> bool {
        let Some(slot) = self.trip_mut(id) else {
            return false;
        };
        let new_id = trip.id.clone();
        *slot = trip;
        if new_id != id {
            self.repoint_trip(id, &new_id);
        }
        true
    }

    /// Give the trip stored as `id` the identity the server assigned.
    ///
    /// Field values stay as they are in memory, so edits still waiting in
    /// the queue remain visible. Only id, owner, role and timestamps come
    /// from `server`. Returns false if `id` is unknown.
    pub fn adopt_trip(&mut self, id: &str, server: Trip) -> bool {
        let Some(slot) = self.trip_mut(id) else {
            return false;
        };
        slot.id = server.id.clone();
        slot.user_id = server.user_id;
        slot.created_at = server.created_at;
        slot.updated_at = server.updated_at;
        if server.role.is_some() {
            slot.role = server.role;
        }
        if server.id != id {
            self.repoint_trip(id, &server.id);
        }
        true
    }

    fn repoint_trip(&mut self, from: &str, to: &str) {
        let data = &mut self.data;
        repoint(&mut data.activities, from, to);
        repoint(&mut data.accommodations, from, to);
        repoint(&mut data.attractions, from, to);
        repoint(&mut data.shopping_items, from, to);
        repoint(&mut data.documents, from, to);
        repoint(&mut data.expenses, from, to);
        repoint(&mut data.pinned_places, from, to);
        repoint(&mut data.flights, from, to);
    }

    /// Remove a trip and everything that belongs to it
    pub fn remove_trip(&mut self, id: &str) -> Option<Trip> {
        let position = self.data.trips.iter().position(|trip| trip.id == id)?;
        let trip = self.data.trips.remove(position);
        let data = &mut self.data;
        retain_other_trips(&mut data.activities, id);
        retain_other_trips(&mut data.accommodations, id);
        retain_other_trips(&mut data.attractions, id);
        retain_other_trips(&mut data.shopping_items, id);
        retain_other_trips(&mut data.documents, id);
        retain_other_trips(&mut data.expenses, id);
        retain_other_trips(&mut data.pinned_places, id);
        retain_other_trips(&mut data.flights, id);
        Some(trip)
    }

    pub fn days(&self, trip_id: &str) -> Vec<Day> {
        self.trip(trip_id)
            .map(|trip| trip.days().collect())
            .unwrap_or_default()
    }

    pub fn get<E: TripEntity>(&self, id: &str) -> Option<&E>
    where
        Self: Collection<E>,
    {
        self.records().iter().find(|record| record.id() == id)
    }

    pub fn get_mut<E: TripEntity>(&mut self, id: &str) -> Option<&mut E>
    where
        Self: Collection<E>,
    {
        self.records_mut().iter_mut().find(|record| record.id() == id)
    }

    pub fn for_trip<E: TripEntity>(&self, trip_id: &str) -> Vec<E>
    where
        Self: Collection<E>,
    {
        self.records()
            .iter()
            .filter(|record| record.trip_id() == trip_id)
            .cloned()
            .collect()
    }

    pub fn insert<E: TripEntity>(&mut self, record: E)
    where
        Self: Collection<E>,
    {
        self.records_mut().push(record);
    }

    /// Overwrite the record stored as `id`; false if it is gone
    pub fn replace<E: TripEntity>(&mut self, id: &str, record: E) -> bool
    where
        Self: Collection<E>,
    {
        match self.get_mut::<E>(id) {
            Some(slot) => {
                *slot = record;
                true
            }
            None => false,
        }
    }

    /// Rename the record stored as `id`, leaving its fields alone
    pub fn adopt_id<E: TripEntity>(&mut self, id: &str, server_id: &str) -> bool
    where
        Self: Collection<E>,
    {
        match self.get_mut::<E>(id) {
            Some(slot) => {
                slot.set_id(server_id.to_string());
                true
            }
            None => false,
        }
    }

    pub fn remove<E: TripEntity>(&mut self, id: &str) -> Option<E>
    where
        Self: Collection<E>,
    {
        let records = self.records_mut();
        let position = records.iter().position(|record| record.id() == id)?;
        Some(records.remove(position))
    }

    pub fn activities_for_day(&self, trip_id: &str, day_index: u32) -> Vec<Activity> {
        let mut activities: Vec<Activity> = self
            .data
            .activities
            .iter()
            .filter(|a| a.trip_id == trip_id && a.day_index == day_index)
            .cloned()
            .collect();
        activities.sort_by_key(|a| a.order);
        activities
    }

    /// First accommodation, in insertion order, whose stay covers the day
    pub fn accommodation_for_day(&self, trip_id: &str, day_index: u32) -> Option<Accommodation> {
        let date = self.trip(trip_id)?.date_of(day_index)?;
        self.data
            .accommodations
            .iter()
            .find(|stay| stay.trip_id == trip_id && stay.covers(date))
            .cloned()
    }

    pub fn attractions_for_day(&self, trip_id: &str, day_index: u32) -> Vec<Attraction> {
        self.data
            .attractions
            .iter()
            .filter(|a| a.trip_id == trip_id && a.day_indexes.contains(&day_index))
            .cloned()
            .collect()
    }

    pub fn shopping_items_for_trip(&self, trip_id: &str) -> Vec<ShoppingItem> {
        let mut items = self.for_trip::<ShoppingItem>(trip_id);
        items.sort_by_key(|item| item.order);
        items
    }

    pub fn expense_total(&self, trip_id: &str) -> f64 {
        self.data
            .expenses
            .iter()
            .filter(|e| e.trip_id == trip_id)
            .map(|e| e.amount)
            .sum()
    }

    /// Order value that appends to the end of a day
    pub fn next_activity_order(&self, trip_id: &str, day_index: u32) -> i64 {
        self.data
            .activities
            .iter()
            .filter(|a| a.trip_id == trip_id && a.day_index == day_index)
            .map(|a| a.order + 1)
            .max()
            .unwrap_or(0)
    }

    pub fn next_shopping_order(&self, trip_id: &str) -> i64 {
        self.data
            .shopping_items
            .iter()
            .filter(|item| item.trip_id == trip_id)
            .map(|item| item.order + 1)
            .max()
            .unwrap_or(0)
    }

    /// Renumber a day's activities to `0..n-1`.
    ///
    /// Listed ids come first in the given order; activities of that day left
    /// out of the list follow in their current order. Ids not on that day
    /// are ignored. Returns the `(id, order)` pairs that actually changed.
    pub fn reorder_activities(
        &mut self,
        trip_id: &str,
        day_index: u32,
        ordered_ids: &[String],
    ) -> Vec<(String, i64)> {
        let members = self
            .data
            .activities
            .iter()
            .enumerate()
            .filter(|(_, a)| a.trip_id == trip_id && a.day_index == day_index)
            .map(|(index, a)| (index, a.id.clone(), a.order))
            .collect();

        let mut changed = Vec::new();
        for (position, index) in renumbered(members, ordered_ids).into_iter().enumerate() {
            let activity = &mut self.data.activities[index];
            let position = position as i64;
            if activity.order != position {
                activity.order = position;
                changed.push((activity.id.clone(), position));
            }
        }
        changed
    }

    /// Renumber a trip's shopping list the same way as
    /// [`reorder_activities`](Self::reorder_activities)
    pub fn reorder_shopping_items(
        &mut self,
        trip_id: &str,
        ordered_ids: &[String],
    ) -> Vec<(String, i64)> {
        let members = self
            .data
            .shopping_items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.trip_id == trip_id)
            .map(|(index, item)| (index, item.id.clone(), item.order))
            .collect();

        let mut changed = Vec::new();
        for (position, index) in renumbered(members, ordered_ids).into_iter().enumerate() {
            let item = &mut self.data.shopping_items[index];
            let position = position as i64;
            if item.order != position {
                item.order = position;
                changed.push((item.id.clone(), position));
            }
        }
        changed
    }
}

/// Final sequence of `(index, id, order)` members as indexes: the ids of
/// `ordered_ids` first, then everyone else by current order
fn renumbered(mut members: Vec<(usize, String, i64)>, ordered_ids: &[String]) -> Vec<usize> {
    members.sort_by_key(|(_, _, order)| *order);
    let mut sequence = Vec::with_capacity(members.len());
    for id in ordered_ids {
        if let Some(position) = members.iter().position(|(_, member, _)| member == id) {
            sequence.push(members.remove(position).0);
        }
    }
    sequence.extend(members.into_iter().map(|(index, _, _)| index));
    sequence
}
