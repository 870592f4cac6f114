//! REST Trip Backend Client
//!
//! `reqwest` implementation of [`TripBackend`]. Every call is JSON over
//! HTTP with a bearer token; non-success statuses are turned into
//! [`ApiError::Status`] carrying the response body.

use crate::client::api::{ApiError, ApiResult, TripBackend};
use crate::client::config::Config;
use crate::shared::itinerary::{
    CreateInviteRequest, InviteMemberRequest, InviteToken, NewTrip, ShareLink, SharedTrip,
    Snapshot, Trip, TripEntity, TripMember, TripPatch, TripRole, UpdateRoleRequest,
};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::sync::RwLock;

/// HTTP client for the trip backend
#[derive(Debug)]
pub struct HttpBackend {
    base_url: String,
    client: Client,
    token: RwLock<Option<String>>,
}

impl HttpBackend {
    pub fn new(config: &Config) -> Self {
        Self::with_base_url(config.server_url().unwrap_or_default(), config.get_token().cloned())
    }

    pub fn with_base_url(base_url: impl Into<String>, token: Option<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
            token: RwLock::new(token),
        }
    }

    /// Replace the bearer token (login, logout, refresh)
    pub fn set_token(&self, token: Option<String>) {
        let mut guard = self.token.write().unwrap_or_else(|e| e.into_inner());
        *guard = token;
    }

    pub fn has_token(&self) -> bool {
        self.current_token().is_some()
    }

    fn current_token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> ApiResult<RequestBuilder> {
        let token = self.current_token().ok_or(ApiError::NotAuthenticated)?;
        Ok(request.bearer_auth(token))
    }

    async fn send(request: RequestBuilder) -> ApiResult<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response
                .text()
                .await
                .ok()
                .filter(|body| !body.is_empty())
                .unwrap_or_else(|| status.to_string());
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> ApiResult<T> {
        Self::send(request)
            .await?
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn send_empty(request: RequestBuilder) -> ApiResult<()> {
        Self::send(request).await.map(|_| ())
    }
}

#[async_trait]
impl TripBackend for HttpBackend {
    async fn fetch_state(&self) -> ApiResult<Snapshot> {
        tracing::debug!("GET /api/state");
        let request = self.authorized(self.client.get(self.url("/api/state")))?;
        Self::send_json(request).await
    }

    async fn create_trip(&self, input: &NewTrip) -> ApiResult<Trip> {
        tracing::debug!("POST /api/trips");
        let request = self.authorized(self.client.post(self.url("/api/trips")))?;
        Self::send_json(request.json(input)).await
    }

    async fn update_trip(&self, id: &str, patch: &TripPatch) -> ApiResult<Trip> {
        tracing::debug!(trip_id = id, "PUT /api/trips/:id");
        let request = self.authorized(self.client.put(self.url(&format!("/api/trips/{}", id))))?;
        Self::send_json(request.json(patch)).await
    }

    async fn delete_trip(&self, id: &str) -> ApiResult<()> {
        tracing::debug!(trip_id = id, "DELETE /api/trips/:id");
        let request =
            self.authorized(self.client.delete(self.url(&format!("/api/trips/{}", id))))?;
        Self::send_empty(request).await
    }

    async fn create_entity<E: TripEntity>(&self, trip_id: &str, entity: &E) -> ApiResult<E> {
        let path = format!("/api/trips/{}/{}", trip_id, E::COLLECTION);
        tracing::debug!(kind = %E::KIND, "POST {}", path);
        let request = self.authorized(self.client.post(self.url(&path)))?;
        Self::send_json(request.json(entity)).await
    }

    async fn update_entity<E: TripEntity>(&self, id: &str, patch: &E::Patch) -> ApiResult<E> {
        let path = format!("/api/{}/{}", E::COLLECTION, id);
        tracing::debug!(kind = %E::KIND, "PUT {}", path);
        let request = self.authorized(self.client.put(self.url(&path)))?;
        Self::send_json(request.json(patch)).await
    }

    async fn delete_entity<E: TripEntity>(&self, id: &str) -> ApiResult<()> {
        let path = format!("/api/{}/{}", E::COLLECTION, id);
        tracing::debug!(kind = %E::KIND, "DELETE {}", path);
        let request = self.authorized(self.client.delete(self.url(&path)))?;
        Self::send_empty(request).await
    }

    async fn create_share_link(&self, trip_id: &str) -> ApiResult<ShareLink> {
        let path = format!("/api/trips/{}/share", trip_id);
        let request = self.authorized(self.client.post(self.url(&path)))?;
        Self::send_json(request).await
    }

    async fn fetch_shared_trip(&self, token: &str) -> ApiResult<SharedTrip> {
        let request = self.client.get(self.url(&format!("/api/shared/{}", token)));
        Self::send_json(request).await
    }

    async fn list_members(&self, trip_id: &str) -> ApiResult<Vec<TripMember>> {
        let path = format!("/api/trips/{}/members", trip_id);
        let request = self.authorized(self.client.get(self.url(&path)))?;
        Self::send_json(request).await
    }

    async fn invite_member(
        &self,
        trip_id: &str,
        email: &str,
        role: TripRole,
    ) -> ApiResult<TripMember> {
        let path = format!("/api/trips/{}/members", trip_id);
        let body = InviteMemberRequest {
            email: email.to_string(),
            role,
        };
        let request = self.authorized(self.client.post(self.url(&path)))?;
        Self::send_json(request.json(&body)).await
    }

    async fn create_invite(&self, trip_id: &str, role: TripRole) -> ApiResult<InviteToken> {
        let path = format!("/api/trips/{}/invites", trip_id);
        let request = self.authorized(self.client.post(self.url(&path)))?;
        Self::send_json(request.json(&CreateInviteRequest { role })).await
    }

    async fn accept_invite(&self, token: &str) -> ApiResult<Trip> {
        let path = format!("/api/invites/{}/accept", token);
        let request = self.authorized(self.client.post(self.url(&path)))?;
        Self::send_json(request).await
    }

    async fn update_member_role(
        &self,
        trip_id: &str,
        user_id: &str,
        role: TripRole,
    ) -> ApiResult<TripMember> {
        let path = format!("/api/trips/{}/members/{}", trip_id, user_id);
        let request = self.authorized(self.client.put(self.url(&path)))?;
        Self::send_json(request.json(&UpdateRoleRequest { role })).await
    }

    async fn remove_member(&self, trip_id: &str, user_id: &str) -> ApiResult<()> {
        let path = format!("/api/trips/{}/members/{}", trip_id, user_id);
        let request = self.authorized(self.client.delete(self.url(&path)))?;
        Self::send_empty(request).await
    }
}
