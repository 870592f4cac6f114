//! Trip Collaboration Types
//!
//! Request and response bodies for sharing a trip and managing its members.

use crate::shared::itinerary::{Snapshot, Trip, TripRole};
use serde::{Deserialize, Serialize};

/// A user with access to a trip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripMember {
    pub user_id: String,
    pub trip_id: String,
    pub role: TripRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteMemberRequest {
    pub email: String,
    pub role: TripRole,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoleRequest {
    pub role: TripRole,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInviteRequest {
    pub role: TripRole,
}

/// Shareable invite granting `role` to whoever accepts it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteToken {
    pub token: String,
    pub role: TripRole,
}

/// Public read-only link to a trip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareLink {
    pub token: String,
}

/// Read-only view of one trip, fetched by share token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedTrip {
    pub trip: Trip,
    #[serde(flatten)]
    pub content: Snapshot,
}
