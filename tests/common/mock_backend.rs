//! Scripted in-process backend
//!
//! Behaves like the trip service closely enough for store tests: it assigns
//! `srv-N` ids, cascades trip deletes, keeps members and invites, and logs
//! every request as `"<METHOD> <path>"` using the same routes as
//! `HttpBackend`. Connectivity loss and per-collection failures can be
//! switched on and off.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use tripmate::client::api::{ApiError, ApiResult, TripBackend};
use tripmate::shared::itinerary::{
    InviteToken, NewTrip, ShareLink, SharedTrip, Snapshot, Trip, TripEntity, TripMember,
    TripPatch, TripRole,
};

/// The signed-in user as seen by the mock
pub const MOCK_USER: &str = "user-1";

const TRIPS: &str = "trips";

/// Snapshot key holding records of a REST collection
fn snapshot_key(collection: &str) -> &'static str {
    match collection {
        "activities" => "activities",
        "accommodations" => "accommodations",
        "attractions" => "attractions",
        "shopping" => "shoppingItems",
        "documents" => "documents",
        "expenses" => "expenses",
        "places" => "pinnedPlaces",
        "flights" => "flights",
        other => panic!("unknown collection '{}'", other),
    }
}

const DEPENDENT_KEYS: [&str; 8] = [
    "activities",
    "accommodations",
    "attractions",
    "shoppingItems",
    "documents",
    "expenses",
    "pinnedPlaces",
    "flights",
];

#[derive(Default)]
struct ServerState {
    /// Records by snapshot key, stored as the JSON the client would receive
    collections: BTreeMap<&'static str, Vec<Value>>,
    members: Vec<TripMember>,
    /// Invite token to (trip id, granted role)
    invites: HashMap<String, (String, TripRole)>,
    /// Trips not yet visible to the caller, joinable through an invite
    invitable: HashMap<String, Trip>,
}

impl ServerState {
    fn records(&mut self, key: &'static str) -> &mut Vec<Value> {
        self.collections.entry(key).or_default()
    }

    fn find(&mut self, key: &'static str, id: &str) -> Option<&mut Value> {
        self.records(key).iter_mut().find(|record| record["id"] == id)
    }

    fn has_trip(&self, id: &str) -> bool {
        self.collections
            .get(TRIPS)
            .map_or(false, |trips| trips.iter().any(|trip| trip["id"] == id))
    }

    fn remove_trip(&mut self, id: &str) -> bool {
        let trips = self.records(TRIPS);
        let before = trips.len();
        trips.retain(|trip| trip["id"] != id);
        let removed = trips.len() != before;
        for key in DEPENDENT_KEYS {
            self.records(key).retain(|record| record["tripId"] != id);
        }
        removed
    }

    fn snapshot(&self) -> ApiResult<Snapshot> {
        let mut body = Map::new();
        for (key, records) in &self.collections {
            body.insert(key.to_string(), Value::Array(records.clone()));
        }
        decode(Value::Object(body))
    }
}

/// In-process [`TripBackend`] with failure injection
pub struct MockBackend {
    server: Mutex<ServerState>,
    calls: Mutex<Vec<String>>,
    failing: Mutex<HashSet<String>>,
    reachable: AtomicBool,
    next_id: AtomicUsize,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            server: Mutex::new(ServerState::default()),
            calls: Mutex::new(Vec::new()),
            failing: Mutex::new(HashSet::new()),
            reachable: AtomicBool::new(true),
            next_id: AtomicUsize::new(1),
        }
    }

    /// Simulate losing (or regaining) the connection: every call fails
    /// with a network error while unreachable
    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }

    /// Reject every request touching `collection` ("trips", "state",
    /// "share", "members", or an entity collection) with a 500
    pub fn fail(&self, collection: &str) {
        self.failing.lock().unwrap().insert(collection.to_string());
    }

    pub fn recover(&self, collection: &str) {
        self.failing.lock().unwrap().remove(collection);
    }

    /// Every request so far, oldest first
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of requests whose log line starts with `prefix`
    pub fn call_count(&self, prefix: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.starts_with(prefix))
            .count()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Put a trip on the server as-is
    pub fn seed_trip(&self, trip: Trip) {
        let value = serde_json::to_value(trip).unwrap();
        self.server.lock().unwrap().records(TRIPS).push(value);
    }

    /// Put a dependent record on the server as-is
    pub fn seed<E: TripEntity>(&self, record: E) {
        let value = serde_json::to_value(record).unwrap();
        self.server
            .lock()
            .unwrap()
            .records(snapshot_key(E::COLLECTION))
            .push(value);
    }

    /// Stage a trip the caller cannot see yet and return an invite for it
    pub fn seed_invite(&self, trip: Trip, role: TripRole) -> String {
        let token = format!("invite-{}", self.fresh_id());
        let mut server = self.server.lock().unwrap();
        server
            .invites
            .insert(token.clone(), (trip.id.clone(), role));
        server.invitable.insert(trip.id.clone(), trip);
        token
    }

    pub fn server_trips(&self) -> Vec<Trip> {
        let mut server = self.server.lock().unwrap();
        server
            .records(TRIPS)
            .iter()
            .map(|value| serde_json::from_value(value.clone()).unwrap())
            .collect()
    }

    pub fn server_records<E: TripEntity>(&self) -> Vec<E> {
        let mut server = self.server.lock().unwrap();
        server
            .records(snapshot_key(E::COLLECTION))
            .iter()
            .map(|value| serde_json::from_value(value.clone()).unwrap())
            .collect()
    }

    fn fresh_id(&self) -> String {
        format!("srv-{}", self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    /// Log the request and apply connectivity and failure injection
    fn gate(&self, call: String, collection: &str) -> ApiResult<()> {
        self.calls.lock().unwrap().push(call);
        if !self.reachable.load(Ordering::SeqCst) {
            return Err(ApiError::Network("connection refused".to_string()));
        }
        if self.failing.lock().unwrap().contains(collection) {
            return Err(ApiError::Status {
                status: 500,
                message: "Internal Server Error".to_string(),
            });
        }
        Ok(())
    }
}

fn not_found(what: &str, id: &str) -> ApiError {
    ApiError::Status {
        status: 404,
        message: format!("{} '{}' not found", what, id),
    }
}

fn decode<T: serde::de::DeserializeOwned>(value: Value) -> ApiResult<T> {
    serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}

fn encode<T: serde::Serialize>(value: &T) -> ApiResult<Value> {
    serde_json::to_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Copy every field present in `patch` onto `target`
fn merge(target: &mut Value, patch: Value) {
    if let (Value::Object(target), Value::Object(patch)) = (target, patch) {
        for (key, value) in patch {
            target.insert(key, value);
        }
    }
}

#[async_trait]
impl TripBackend for MockBackend {
    async fn fetch_state(&self) -> ApiResult<Snapshot> {
        self.gate("GET /api/state".to_string(), "state")?;
        self.server.lock().unwrap().snapshot()
    }

    async fn create_trip(&self, input: &NewTrip) -> ApiResult<Trip> {
        self.gate("POST /api/trips".to_string(), TRIPS)?;
        let mut trip = input.clone().into_trip(
            self.fresh_id(),
            MOCK_USER.to_string(),
            chrono::Utc::now(),
        );
        trip.role = Some(TripRole::Owner);

        let mut server = self.server.lock().unwrap();
        server.records(TRIPS).push(encode(&trip)?);
        server.members.push(TripMember {
            user_id: MOCK_USER.to_string(),
            trip_id: trip.id.clone(),
            role: TripRole::Owner,
            email: None,
            display_name: None,
        });
        Ok(trip)
    }

    async fn update_trip(&self, id: &str, patch: &TripPatch) -> ApiResult<Trip> {
        self.gate(format!("PUT /api/trips/{}", id), TRIPS)?;
        let patch = encode(patch)?;
        let mut server = self.server.lock().unwrap();
        let trip = server.find(TRIPS, id).ok_or_else(|| not_found("trip", id))?;
        merge(trip, patch);
        decode(trip.clone())
    }

    async fn delete_trip(&self, id: &str) -> ApiResult<()> {
        self.gate(format!("DELETE /api/trips/{}", id), TRIPS)?;
        if self.server.lock().unwrap().remove_trip(id) {
            Ok(())
        } else {
            Err(not_found("trip", id))
        }
    }

    async fn create_entity<E: TripEntity>(&self, trip_id: &str, entity: &E) -> ApiResult<E> {
        self.gate(
            format!("POST /api/trips/{}/{}", trip_id, E::COLLECTION),
            E::COLLECTION,
        )?;
        let mut server = self.server.lock().unwrap();
        if !server.has_trip(trip_id) {
            return Err(not_found("trip", trip_id));
        }
        let mut record = entity.clone();
        record.set_id(self.fresh_id());
        record.set_trip_id(trip_id.to_string());
        server
            .records(snapshot_key(E::COLLECTION))
            .push(encode(&record)?);
        Ok(record)
    }

    async fn update_entity<E: TripEntity>(&self, id: &str, patch: &E::Patch) -> ApiResult<E> {
        self.gate(format!("PUT /api/{}/{}", E::COLLECTION, id), E::COLLECTION)?;
        let patch = encode(patch)?;
        let mut server = self.server.lock().unwrap();
        let record = server
            .find(snapshot_key(E::COLLECTION), id)
            .ok_or_else(|| not_found(E::KIND.as_str(), id))?;
        merge(record, patch);
        decode(record.clone())
    }

    async fn delete_entity<E: TripEntity>(&self, id: &str) -> ApiResult<()> {
        self.gate(format!("DELETE /api/{}/{}", E::COLLECTION, id), E::COLLECTION)?;
        let mut server = self.server.lock().unwrap();
        let records = server.records(snapshot_key(E::COLLECTION));
        let before = records.len();
        records.retain(|record| record["id"] != id);
        if records.len() == before {
            return Err(not_found(E::KIND.as_str(), id));
        }
        Ok(())
    }

    async fn create_share_link(&self, trip_id: &str) -> ApiResult<ShareLink> {
        self.gate(format!("POST /api/trips/{}/share", trip_id), "share")?;
        if !self.server.lock().unwrap().has_trip(trip_id) {
            return Err(not_found("trip", trip_id));
        }
        Ok(ShareLink {
            token: format!("share-{}", trip_id),
        })
    }

    async fn fetch_shared_trip(&self, token: &str) -> ApiResult<SharedTrip> {
        self.gate(format!("GET /api/shared/{}", token), "share")?;
        let trip_id = token
            .strip_prefix("share-")
            .ok_or_else(|| not_found("share link", token))?;
        let mut content = self.server.lock().unwrap().snapshot()?;
        let trip = content
            .trips
            .iter()
            .find(|trip| trip.id == trip_id)
            .cloned()
            .ok_or_else(|| not_found("share link", token))?;
        content.trips.clear();
        content.activities.retain(|r| r.trip_id == trip_id);
        content.accommodations.retain(|r| r.trip_id == trip_id);
        content.attractions.retain(|r| r.trip_id == trip_id);
        content.shopping_items.retain(|r| r.trip_id == trip_id);
        content.documents.retain(|r| r.trip_id == trip_id);
        content.expenses.retain(|r| r.trip_id == trip_id);
        content.pinned_places.retain(|r| r.trip_id == trip_id);
        content.flights.retain(|r| r.trip_id == trip_id);
        Ok(SharedTrip { trip, content })
    }

    async fn list_members(&self, trip_id: &str) -> ApiResult<Vec<TripMember>> {
        self.gate(format!("GET /api/trips/{}/members", trip_id), "members")?;
        let server = self.server.lock().unwrap();
        Ok(server
            .members
            .iter()
            .filter(|member| member.trip_id == trip_id)
            .cloned()
            .collect())
    }

    async fn invite_member(
        &self,
        trip_id: &str,
        email: &str,
        role: TripRole,
    ) -> ApiResult<TripMember> {
        self.gate(format!("POST /api/trips/{}/members", trip_id), "members")?;
        let member = TripMember {
            user_id: format!("user-{}", email),
            trip_id: trip_id.to_string(),
            role,
            email: Some(email.to_string()),
            display_name: None,
        };
        self.server.lock().unwrap().members.push(member.clone());
        Ok(member)
    }

    async fn create_invite(&self, trip_id: &str, role: TripRole) -> ApiResult<InviteToken> {
        self.gate(format!("POST /api/trips/{}/invites", trip_id), "members")?;
        let token = format!("invite-{}", self.fresh_id());
        self.server
            .lock()
            .unwrap()
            .invites
            .insert(token.clone(), (trip_id.to_string(), role));
        Ok(InviteToken { token, role })
    }

    async fn accept_invite(&self, token: &str) -> ApiResult<Trip> {
        self.gate(format!("POST /api/invites/{}/accept", token), "members")?;
        let mut server = self.server.lock().unwrap();
        let (trip_id, role) = server
            .invites
            .remove(token)
            .ok_or_else(|| not_found("invite", token))?;

        let mut trip = match server.invitable.remove(&trip_id) {
            Some(trip) => trip,
            None => {
                let value = server
                    .find(TRIPS, &trip_id)
                    .cloned()
                    .ok_or_else(|| not_found("trip", &trip_id))?;
                server.remove_trip(&trip_id);
                decode(value)?
            }
        };
        trip.role = Some(role);
        server.records(TRIPS).push(encode(&trip)?);
        server.members.push(TripMember {
            user_id: MOCK_USER.to_string(),
            trip_id: trip_id.clone(),
            role,
            email: None,
            display_name: None,
        });
        Ok(trip)
    }

    async fn update_member_role(
        &self,
        trip_id: &str,
        user_id: &str,
        role: TripRole,
    ) -> ApiResult<TripMember> {
        self.gate(
            format!("PUT /api/trips/{}/members/{}", trip_id, user_id),
            "members",
        )?;
        let mut server = self.server.lock().unwrap();
        let member = server
            .members
            .iter_mut()
            .find(|member| member.trip_id == trip_id && member.user_id == user_id)
            .ok_or_else(|| not_found("member", user_id))?;
        member.role = role;
        Ok(member.clone())
    }

    async fn remove_member(&self, trip_id: &str, user_id: &str) -> ApiResult<()> {
        self.gate(
            format!("DELETE /api/trips/{}/members/{}", trip_id, user_id),
            "members",
        )?;
        let mut server = self.server.lock().unwrap();
        let before = server.members.len();
        server
            .members
            .retain(|member| !(member.trip_id == trip_id && member.user_id == user_id));
        if server.members.len() == before {
            return Err(not_found("member", user_id));
        }
        // single caller: leaving hides the trip entirely
        if user_id == MOCK_USER {
            server.remove_trip(trip_id);
        }
        Ok(())
    }
}
