//! API router assembly.
//!
//! ```text
//! /api/health            → health (no auth required)
//! /api/bookings/...      → booking_routes (RequireAuth)
//! ```

use std::time::Duration;

use axum::{
    http::{HeaderValue, Method, StatusCode},
    middleware,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use super::booking::{booking_routes, BookingHandlers};
use super::middleware::{auth_middleware, AuthState};

/// Builds the API router with bearer auth applied to every route.
pub fn api_router(bookings: BookingHandlers, auth: AuthState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .nest("/api/bookings", booking_routes(bookings))
        .layer(middleware::from_fn_with_state(auth, auth_middleware))
}

/// Wraps a router with tracing, timeout and CORS layers.
///
/// An empty origin list allows any origin.
pub fn with_http_layers(router: Router, request_timeout: Duration, cors_origins: &[String]) -> Router {
    router
        .layer(cors_layer(cors_origins))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers(Any);

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring malformed CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        base.allow_origin(Any)
    } else {
        base.allow_origin(AllowOrigin::list(origins))
    }
}

async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "ok",
            "version": env!("CARGO_PKG_VERSION"),
        })),
    )
}
