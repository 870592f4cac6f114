//! Sharing and membership.
//!
//! Thin pass-throughs to the backend plus the role checks that gate
//! editing on the client.

use super::{StoreError, StoreResult, TripStore};
use crate::client::api::TripBackend;
use crate::shared::itinerary::{InviteToken, ShareLink, SharedTrip, Trip, TripMember, TripRole};
use std::sync::Arc;

impl<B: TripBackend> TripStore<B> {
    fn backend(&self) -> StoreResult<Arc<B>> {
        self.inner.backend.clone().ok_or(StoreError::LocalOnly)
    }

    /// The current user's role on a trip; `None` for local trips
    pub fn role(&self, trip_id: &str) -> Option<TripRole> {
        self.inner.read_state().trip(trip_id).and_then(|trip| trip.role)
    }

    /// Local trips, owners and participants may edit
    pub fn can_edit(&self, trip_id: &str) -> bool {
        self.inner
            .read_state()
            .trip(trip_id)
            .map_or(false, Trip::can_edit)
    }

    pub fn is_owner(&self, trip_id: &str) -> bool {
        self.inner
            .read_state()
            .trip(trip_id)
            .map_or(false, Trip::is_owner)
    }

    /// Public read-only link for a trip
    pub async fn create_share_link(&self, trip_id: &str) -> StoreResult<ShareLink> {
        Ok(self.backend()?.create_share_link(trip_id).await?)
    }

    /// Read-only view of a shared trip; not merged into local state
    pub async fn fetch_shared_trip(&self, token: &str) -> StoreResult<SharedTrip> {
        Ok(self.backend()?.fetch_shared_trip(token).await?)
    }

    pub async fn list_members(&self, trip_id: &str) -> StoreResult<Vec<TripMember>> {
        Ok(self.backend()?.list_members(trip_id).await?)
    }

    pub async fn invite_member(
        &self,
        trip_id: &str,
        email: &str,
        role: TripRole,
    ) -> StoreResult<TripMember> {
        let backend = self.backend()?;
        let member = backend.invite_member(trip_id, email, role).await?;
        tracing::info!(trip_id, user_id = %member.user_id, ?role, "Member invited");
        Ok(member)
    }

    pub async fn create_invite(&self, trip_id: &str, role: TripRole) -> StoreResult<InviteToken> {
        Ok(self.backend()?.create_invite(trip_id, role).await?)
    }

    /// Join a trip through an invite token, then reload everything so the
    /// joined trip and its records appear
    pub async fn accept_invite(&self, token: &str) -> StoreResult<Trip> {
        let trip = self.backend()?.accept_invite(token).await?;
        tracing::info!(trip_id = %trip.id, "Invite accepted");
        self.load().await?;
        Ok(trip)
    }

    pub async fn update_member_role(
        &self,
        trip_id: &str,
        user_id: &str,
        role: TripRole,
    ) -> StoreResult<TripMember> {
        Ok(self
            .backend()?
            .update_member_role(trip_id, user_id, role)
            .await?)
    }

    /// Remove a member. Removing yourself drops the trip locally.
    pub async fn remove_member(&self, trip_id: &str, user_id: &str) -> StoreResult<()> {
        self.backend()?.remove_member(trip_id, user_id).await?;
        if self.current_user().as_deref() == Some(user_id) {
            self.inner.write_state().remove_trip(trip_id);
        }
        Ok(())
    }

    /// Leave a trip shared with the current user
    pub async fn leave_trip(&self, trip_id: &str) -> StoreResult<()> {
        let user_id = self
            .current_user()
            .ok_or_else(|| crate::shared::SharedError::validation("userId", "no signed-in user"))?;
        self.remove_member(trip_id, &user_id).await
    }
}
