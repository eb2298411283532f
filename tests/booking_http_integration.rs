//! Integration tests for booking HTTP endpoints.
//!
//! Drives the full router (auth middleware, booking routes, error mapping)
//! over the in-memory store, in-memory event bus and mock token validator.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use garage_workshop::adapters::http::{api_router, BookingHandlers};
use garage_workshop::adapters::{InMemoryBookingStore, InMemoryEventBus, MockSessionValidator};

const STAFF: &str = "staff-token";
const ADMIN: &str = "admin-token";

// =============================================================================
// Test Infrastructure
// =============================================================================

struct TestApp {
    router: Router,
    events: Arc<InMemoryEventBus>,
}

impl TestApp {
    fn new() -> Self {
        let store = Arc::new(InMemoryBookingStore::new());
        let events = Arc::new(InMemoryEventBus::new());
        let validator = Arc::new(
            MockSessionValidator::new()
                .with_staff(STAFF, "staff-1")
                .with_admin(ADMIN, "admin-1"),
        );
        let handlers = BookingHandlers::from_ports(store.clone(), store, events.clone());
        Self {
            router: api_router(handlers, validator),
            events,
        }
    }

    async fn send(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    async fn create_booking(&self) -> String {
        let (status, body) = self
            .send(Method::POST, "/api/bookings", Some(STAFF), Some(booking_body()))
            .await;
        assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
        body["id"].as_str().unwrap().to_string()
    }

    async fn set_status(&self, id: &str, status: &str) -> (StatusCode, Value) {
        self.send(
            Method::PATCH,
            &format!("/api/bookings/{id}/status"),
            Some(STAFF),
            Some(json!({ "status": status })),
        )
        .await
    }
}

fn booking_body() -> Value {
    json!({
        "vehicle_reg_no": "AB12 CDE",
        "make_model": "Ford Focus",
        "owner_name": "Jo Bloggs",
        "owner_postal_code": "AB1 2CD",
        "scheduled_date": "2026-11-02T09:00:00Z",
        "prebooking_labour_cost": 200,
        "prebooking_parts_cost": 80,
        "prebooking_booking_price": 300
    })
}

// =============================================================================
// Auth
// =============================================================================

#[tokio::test]
async fn health_needs_no_token() {
    let app = TestApp::new();
    let (status, body) = app.send(Method::GET, "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn bookings_require_authentication() {
    let app = TestApp::new();
    let (status, _) = app.send(Method::GET, "/api/bookings", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .send(Method::GET, "/api/bookings", Some("forged"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// =============================================================================
// Bookings
// =============================================================================

#[tokio::test]
async fn create_then_get_booking() {
    let app = TestApp::new();
    let id = app.create_booking().await;

    let (status, body) = app
        .send(Method::GET, &format!("/api/bookings/{id}"), Some(STAFF), None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "pending");
    assert_eq!(body["created_by"], "staff-1");
    assert_eq!(body["totals"]["booking_price"], 300);
    assert_eq!(body["totals"]["total_expense"], 280);
    assert_eq!(body["totals"]["profit"], 20);
    assert!(app.events.has_event("booking.created.v1"));
}

#[tokio::test]
async fn unknown_and_malformed_ids() {
    let app = TestApp::new();

    let (status, _) = app
        .send(Method::GET, "/api/bookings/not-a-uuid", Some(STAFF), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .send(
            Method::GET,
            "/api/bookings/00000000-0000-4000-8000-000000000000",
            Some(STAFF),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn create_rejects_negative_amount() {
    let app = TestApp::new();
    let mut body = booking_body();
    body["prebooking_parts_cost"] = json!(-5);

    let (status, body) = app
        .send(Method::POST, "/api/bookings", Some(STAFF), Some(body))
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "VALIDATION_FAILED");
}

#[tokio::test]
async fn create_rejects_malformed_reference() {
    let app = TestApp::new();
    let mut body = booking_body();
    body["confirmed_services"] = json!(["oil-change"]);

    let (status, body) = app
        .send(Method::POST, "/api/bookings", Some(STAFF), Some(body))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_REFERENCE");
    assert_eq!(body["details"]["value"], "oil-change");
}

#[tokio::test]
async fn lifecycle_and_invalid_transition() {
    let app = TestApp::new();
    let id = app.create_booking().await;

    let (status, body) = app.set_status(&id, "arrived").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["arrived_by"], "staff-1");
    assert!(body["arrived_at"].is_string());

    let (status, _) = app.set_status(&id, "completed").await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.set_status(&id, "arrived").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "INVALID_STATE_TRANSITION");
    assert_eq!(body["details"]["from"], "completed");

    let (status, _) = app.set_status(&id, "teleported").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn edit_guard_on_completed_booking() {
    let app = TestApp::new();
    let id = app.create_booking().await;
    app.set_status(&id, "arrived").await;
    app.set_status(&id, "completed").await;
    let uri = format!("/api/bookings/{id}");

    // Staff cannot change a protected field, even when asking for override.
    let (status, body) = app
        .send(
            Method::PUT,
            &uri,
            Some(STAFF),
            Some(json!({ "vehicle_reg_no": "XY99 ZZZ", "override_guard": true })),
        )
        .await;
    assert_eq!(status, StatusCode::LOCKED);
    assert_eq!(body["details"]["fields"], json!(["vehicle_reg_no"]));

    // Remarks stay editable.
    let (status, body) = app
        .send(Method::PUT, &uri, Some(STAFF), Some(json!({ "remarks": "Collected" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["changed_fields"], json!(["remarks"]));

    // Admin override goes through and keeps the status.
    let (status, body) = app
        .send(
            Method::PUT,
            &uri,
            Some(ADMIN),
            Some(json!({ "vehicle_reg_no": "XY99 ZZZ", "override_guard": true })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["booking"]["vehicle_reg_no"], "XY99 ZZZ");
    assert_eq!(body["booking"]["status"], "completed");
    assert_eq!(body["booking"]["updated_by"], "admin-1");
}

#[tokio::test]
async fn empty_update_is_rejected() {
    let app = TestApp::new();
    let id = app.create_booking().await;

    let (status, _) = app
        .send(Method::PUT, &format!("/api/bookings/{id}"), Some(STAFF), Some(json!({})))
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

// =============================================================================
// Upsells
// =============================================================================

#[tokio::test]
async fn upsell_add_update_remove_round_trip() {
    let app = TestApp::new();
    let id = app.create_booking().await;
    app.set_status(&id, "arrived").await;

    let (status, body) = app
        .send(
            Method::POST,
            &format!("/api/bookings/{id}/upsells"),
            Some(STAFF),
            Some(json!({ "labour_cost": 50, "parts_cost": 20, "upsell_price": 100 })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let upsell_id = body["upsell_id"].as_str().unwrap().to_string();
    assert_eq!(body["booking"]["totals"]["labour_cost"], 250);
    assert_eq!(body["booking"]["totals"]["parts_cost"], 100);
    assert_eq!(body["booking"]["totals"]["booking_price"], 400);

    let upsell_uri = format!("/api/bookings/{id}/upsells/{upsell_id}");
    let (status, body) = app
        .send(Method::PUT, &upsell_uri, Some(STAFF), Some(json!({ "upsell_price": 150 })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totals"]["booking_price"], 450);
    assert_eq!(body["upsells"][0]["labour_cost"], 50);

    let (status, body) = app.send(Method::DELETE, &upsell_uri, Some(STAFF), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totals"]["labour_cost"], 200);
    assert_eq!(body["totals"]["parts_cost"], 80);
    assert_eq!(body["totals"]["booking_price"], 300);
    assert_eq!(body["upsells"], json!([]));

    let (status, _) = app.send(Method::DELETE, &upsell_uri, Some(STAFF), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    assert_eq!(app.events.events_for_aggregate(&id).len(), 5);
}

#[tokio::test]
async fn upsell_on_cancelled_booking_needs_admin_override() {
    let app = TestApp::new();
    let id = app.create_booking().await;
    app.set_status(&id, "cancelled").await;
    let uri = format!("/api/bookings/{id}/upsells");
    let upsell = json!({ "labour_cost": 10, "parts_cost": 0, "upsell_price": 20, "override_guard": true });

    let (status, _) = app
        .send(Method::POST, &uri, Some(STAFF), Some(upsell.clone()))
        .await;
    assert_eq!(status, StatusCode::LOCKED);

    let (status, body) = app.send(Method::POST, &uri, Some(ADMIN), Some(upsell)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["booking"]["totals"]["booking_price"], 320);
}

// =============================================================================
// Listing
// =============================================================================

#[tokio::test]
async fn list_filters_sorts_and_paginates() {
    let app = TestApp::new();
    let first = app.create_booking().await;
    let _second = app.create_booking().await;
    let _third = app.create_booking().await;
    app.set_status(&first, "arrived").await;

    let (status, body) = app
        .send(Method::GET, "/api/bookings?status=pending&limit=1&page=2&sort_dir=asc", Some(STAFF), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);
    assert_eq!(body["total_pages"], 2);
    assert_eq!(body["items"].as_array().unwrap().len(), 1);

    let (status, body) = app
        .send(Method::GET, "/api/bookings?owner_name=bLoG&vehicle_reg_no=ab12%20cde", Some(STAFF), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 3);

    let (status, _) = app
        .send(Method::GET, "/api/bookings?limit=1000", Some(STAFF), None)
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = app
        .send(Method::GET, "/api/bookings?sort_by=price", Some(STAFF), None)
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}
