//! # Trip Backend Interface
//!
//! The request/response surface the Trip Store consumes. The store never
//! talks HTTP directly; it goes through [`TripBackend`], which keeps the
//! sync logic testable against scripted backends.
//!
//! ## Key Components
//!
//! - `TripBackend`: snapshot fetch, per-entity CRUD and collaboration calls
//! - `HttpBackend`: `reqwest` implementation of the REST endpoints
//! - `ApiError`: transport, status and decode failures

pub mod http;

pub use http::HttpBackend;

use crate::shared::itinerary::{
    InviteToken, NewTrip, ShareLink, SharedTrip, Snapshot, Trip, TripEntity, TripMember,
    TripPatch, TripRole,
};
use async_trait::async_trait;
use thiserror::Error;

/// Errors returned by a backend call
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApiError {
    /// No bearer token is available for an authenticated endpoint
    #[error("Not authenticated")]
    NotAuthenticated,

    /// The request never produced a response
    #[error("Network error: {0}")]
    Network(String),

    /// The backend answered with a non-success status
    #[error("Request failed: {status} - {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body or reason phrase
        message: String,
    },

    /// The response body did not match the expected shape
    #[error("Failed to parse response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Whether the failure looks like lost connectivity rather than a rejection
    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type for backend calls
pub type ApiResult<T> = Result<T, ApiError>;

/// Backend Trip Service as seen by the client.
///
/// Every response is authoritative; every error leaves local state to the
/// caller's failure policy.
#[async_trait]
pub trait TripBackend: Send + Sync + 'static {
    /// All collections for every trip visible to the caller
    async fn fetch_state(&self) -> ApiResult<Snapshot>;

    async fn create_trip(&self, input: &NewTrip) -> ApiResult<Trip>;

    async fn update_trip(&self, id: &str, patch: &TripPatch) -> ApiResult<Trip>;

    async fn delete_trip(&self, id: &str) -> ApiResult<()>;

    /// Create `entity` under `trip_id`; the returned record may carry a new id
    async fn create_entity<E: TripEntity>(&self, trip_id: &str, entity: &E) -> ApiResult<E>;

    async fn update_entity<E: TripEntity>(&self, id: &str, patch: &E::Patch) -> ApiResult<E>;

    async fn delete_entity<E: TripEntity>(&self, id: &str) -> ApiResult<()>;

    /// Create (or fetch the existing) public read-only link
    async fn create_share_link(&self, trip_id: &str) -> ApiResult<ShareLink>;

    /// Public snapshot of one trip, no authentication required
    async fn fetch_shared_trip(&self, token: &str) -> ApiResult<SharedTrip>;

    async fn list_members(&self, trip_id: &str) -> ApiResult<Vec<TripMember>>;

    async fn invite_member(&self, trip_id: &str, email: &str, role: TripRole)
        -> ApiResult<TripMember>;

    async fn create_invite(&self, trip_id: &str, role: TripRole) -> ApiResult<InviteToken>;

    /// Join the trip behind an invite token
    async fn accept_invite(&self, token: &str) -> ApiResult<Trip>;

    async fn update_member_role(
        &self,
        trip_id: &str,
        user_id: &str,
        role: TripRole,
    ) -> ApiResult<TripMember>;

    async fn remove_member(&self, trip_id: &str, user_id: &str) -> ApiResult<()>;
}
