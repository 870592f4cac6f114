//! REST client against a local `wiremock` server
//!
//! Checks routes, bearer authentication, request bodies and the mapping of
//! failures onto `ApiError`.

#[macro_use]
mod common;

use assert_matches::assert_matches;
use pretty_assertions::assert_eq;
use serde_json::json;
use tripmate::client::api::{ApiError, HttpBackend, TripBackend};
use tripmate::client::auth;
use tripmate::client::config::Config;
use tripmate::shared::config::AppConfig;
use tripmate::shared::itinerary::{
    Activity, ActivityPatch, NewPinnedPlace, PinnedPlace, TripRole,
};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

const TOKEN: &str = "test-jwt";

async fn backend() -> (MockServer, HttpBackend) {
    let server = MockServer::start().await;
    let backend = HttpBackend::with_base_url(server.uri(), Some(TOKEN.to_string()));
    (server, backend)
}

fn trip_json(id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "userId": "user-1",
        "name": "Lisbon",
        "startDate": "2025-06-01",
        "endDate": "2025-06-03",
        "createdAt": "2025-05-01T10:00:00Z",
        "updatedAt": "2025-05-01T10:00:00Z",
        "role": "owner"
    })
}

#[tokio::test]
async fn test_fetch_state_sends_bearer_token() {
    let (server, backend) = backend().await;
    Mock::given(method("GET"))
        .and(path("/api/state"))
        .and(header("authorization", "Bearer test-jwt"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "trips": [trip_json("t1")],
            "activities": [
                { "id": "a1", "tripId": "t1", "dayIndex": 0, "title": "Castle", "order": 0 }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let snapshot = assert_ok!(backend.fetch_state().await);
    assert_eq!(snapshot.trips.len(), 1);
    assert_eq!(snapshot.trips[0].role, Some(TripRole::Owner));
    assert_eq!(snapshot.activities[0].title, "Castle");
    // Collections the server left out come back empty
    assert!(snapshot.flights.is_empty());
}

#[tokio::test]
async fn test_create_entity_posts_under_trip() {
    let (server, backend) = backend().await;
    Mock::given(method("POST"))
        .and(path("/api/trips/t1/places"))
        .respond_with(|request: &Request| {
            let mut body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
            body["id"] = json!("srv-7");
            ResponseTemplate::new(201).set_body_json(body)
        })
        .expect(1)
        .mount(&server)
        .await;

    let place = NewPinnedPlace::new("t1", "Miradouro")
        .at(38.71, -9.13)
        .into_place("tmp-1".into(), chrono::Utc::now());
    let created: PinnedPlace = assert_ok!(backend.create_entity("t1", &place).await);
    assert_eq!(created.id, "srv-7");
    assert_eq!(created.name, "Miradouro");
    assert_eq!(created.lat, Some(38.71));
}

#[tokio::test]
async fn test_update_entity_sends_only_present_fields() {
    let (server, backend) = backend().await;
    Mock::given(method("PUT"))
        .and(path("/api/activities/a1"))
        .and(body_json(json!({ "order": 3 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "a1", "tripId": "t1", "dayIndex": 0, "title": "Castle", "order": 3
        })))
        .expect(1)
        .mount(&server)
        .await;

    let updated: Activity = assert_ok!(
        backend
            .update_entity::<Activity>("a1", &ActivityPatch::order(3))
            .await
    );
    assert_eq!(updated.order, 3);
}

#[tokio::test]
async fn test_delete_accepts_empty_response() {
    let (server, backend) = backend().await;
    Mock::given(method("DELETE"))
        .and(path("/api/trips/t1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    assert_ok!(backend.delete_trip("t1").await);
}

#[tokio::test]
async fn test_error_status_carries_body() {
    let (server, backend) = backend().await;
    Mock::given(method("DELETE"))
        .and(path("/api/activities/gone"))
        .respond_with(ResponseTemplate::new(404).set_body_string("activity not found"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/trips/t1/members"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    assert_eq!(
        backend.delete_entity::<Activity>("gone").await,
        Err(ApiError::Status {
            status: 404,
            message: "activity not found".to_string()
        })
    );
    let error = backend.list_members("t1").await.unwrap_err();
    assert_eq!(error.status(), Some(403));
    assert_eq!(error.to_string(), "Request failed: 403 - Forbidden");
}

#[tokio::test]
async fn test_malformed_body_is_a_decode_error() {
    let (server, backend) = backend().await;
    Mock::given(method("GET"))
        .and(path("/api/state"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy login</html>"))
        .mount(&server)
        .await;

    assert_matches!(backend.fetch_state().await, Err(ApiError::Decode(_)));
}

#[tokio::test]
async fn test_unreachable_server_is_a_network_error() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let backend = HttpBackend::with_base_url(uri, Some(TOKEN.to_string()));
    let error = backend.fetch_state().await.unwrap_err();
    assert!(error.is_network(), "unexpected error: {:?}", error);
}

#[tokio::test]
async fn test_shared_trip_needs_no_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/shared/share-abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "trip": trip_json("t1"),
            "activities": [
                { "id": "a1", "tripId": "t1", "dayIndex": 1, "title": "Belém" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let backend = HttpBackend::with_base_url(server.uri(), None);
    let shared = assert_ok!(backend.fetch_shared_trip("share-abc").await);
    assert_eq!(shared.trip.id, "t1");
    assert_eq!(shared.content.activities[0].day_index, 1);

    // Everything else still requires a token
    assert_eq!(
        backend.list_members("t1").await,
        Err(ApiError::NotAuthenticated)
    );
}

#[tokio::test]
async fn test_member_role_update_body() {
    let (server, backend) = backend().await;
    Mock::given(method("PUT"))
        .and(path("/api/trips/t1/members/u2"))
        .and(body_json(json!({ "role": "viewer" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "userId": "u2", "tripId": "t1", "role": "viewer"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let member = assert_ok!(
        backend
            .update_member_role("t1", "u2", TripRole::Viewer)
            .await
    );
    assert_eq!(member.role, TripRole::Viewer);
}

#[tokio::test]
async fn test_login_returns_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({ "email": "ana@example.com", "password": "hunter22" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": { "id": "u1", "email": "ana@example.com" },
            "token": "fresh-jwt"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .respond_with(ResponseTemplate::new(409).set_body_string("email already registered"))
        .mount(&server)
        .await;

    let config = Config::with_builder(AppConfig::builder().server_url(server.uri())).unwrap();
    let response = assert_ok!(
        auth::login(&config, "ana@example.com".into(), "hunter22".into()).await
    );
    assert_eq!(response.token, "fresh-jwt");
    assert_eq!(response.user.id, "u1");

    let conflict = auth::register(
        &config,
        "ana@example.com".into(),
        "hunter22".into(),
        Some("Ana".into()),
    )
    .await;
    assert_matches!(conflict, Err(ApiError::Status { status: 409, .. }));
}
