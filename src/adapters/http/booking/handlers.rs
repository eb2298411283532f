//! HTTP handlers for booking endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::adapters::http::middleware::RequireAuth;
use crate::application::handlers::booking::{
    CreateBookingCommand, CreateBookingHandler, GetBookingHandler, GetBookingQuery,
    ListBookingsHandler, ListBookingsQuery as ListBookingsAppQuery, TransitionStatusCommand,
    TransitionStatusHandler, UpdateBookingCommand, UpdateBookingHandler,
};
use crate::application::handlers::upsell::{
    AddUpsellCommand, AddUpsellHandler, RemoveUpsellCommand, RemoveUpsellHandler,
    UpdateUpsellCommand, UpdateUpsellHandler,
};
use crate::domain::booking::{BookingError, BookingStatus};
use crate::domain::foundation::{AuthenticatedUser, BookingId, CommandMetadata, UpsellId};
use crate::ports::{BookingReader, BookingRepository, EventPublisher};

use super::dto::{
    AddUpsellRequest, AddUpsellResponse, BookingListResponse, BookingResponse,
    CreateBookingRequest, ErrorResponse, ListBookingsQuery, OverrideQuery,
    TransitionStatusRequest, UpdateBookingRequest, UpdateBookingResponse, UpdateUpsellRequest,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct BookingHandlers {
    create_handler: Arc<CreateBookingHandler>,
    update_handler: Arc<UpdateBookingHandler>,
    transition_handler: Arc<TransitionStatusHandler>,
    get_handler: Arc<GetBookingHandler>,
    list_handler: Arc<ListBookingsHandler>,
    add_upsell_handler: Arc<AddUpsellHandler>,
    update_upsell_handler: Arc<UpdateUpsellHandler>,
    remove_upsell_handler: Arc<RemoveUpsellHandler>,
}

impl BookingHandlers {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        create_handler: Arc<CreateBookingHandler>,
        update_handler: Arc<UpdateBookingHandler>,
        transition_handler: Arc<TransitionStatusHandler>,
        get_handler: Arc<GetBookingHandler>,
        list_handler: Arc<ListBookingsHandler>,
        add_upsell_handler: Arc<AddUpsellHandler>,
        update_upsell_handler: Arc<UpdateUpsellHandler>,
        remove_upsell_handler: Arc<RemoveUpsellHandler>,
    ) -> Self {
        Self {
            create_handler,
            update_handler,
            transition_handler,
            get_handler,
            list_handler,
            add_upsell_handler,
            update_upsell_handler,
            remove_upsell_handler,
        }
    }

    /// Builds every handler over one repository, reader and publisher.
    pub fn from_ports(
        repository: Arc<dyn BookingRepository>,
        reader: Arc<dyn BookingReader>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        let repo = || repository.clone();
        let publisher = || event_publisher.clone();
        Self::new(
            Arc::new(CreateBookingHandler::new(repo(), publisher())),
            Arc::new(UpdateBookingHandler::new(repo(), publisher())),
            Arc::new(TransitionStatusHandler::new(repo(), publisher())),
            Arc::new(GetBookingHandler::new(repo())),
            Arc::new(ListBookingsHandler::new(reader)),
            Arc::new(AddUpsellHandler::new(repo(), publisher())),
            Arc::new(UpdateUpsellHandler::new(repo(), publisher())),
            Arc::new(RemoveUpsellHandler::new(repo(), publisher())),
        )
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Booking endpoints
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/bookings - Create a booking
pub async fn create_booking(
    State(handlers): State<BookingHandlers>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<CreateBookingRequest>,
) -> Response {
    let cmd = CreateBookingCommand { input: req.into() };

    match handlers.create_handler.handle(cmd, metadata_for(user)).await {
        Ok(result) => {
            let response = BookingResponse::from(&result.booking);
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => handle_booking_error(e),
    }
}

/// GET /api/bookings - List bookings
pub async fn list_bookings(
    State(handlers): State<BookingHandlers>,
    RequireAuth(_user): RequireAuth,
    Query(params): Query<ListBookingsQuery>,
) -> Response {
    let options = match params.into_options() {
        Ok(options) => options,
        Err(e) => return handle_booking_error(e.into()),
    };

    match handlers
        .list_handler
        .handle(ListBookingsAppQuery { options })
        .await
    {
        Ok(list) => {
            let response: BookingListResponse = list.into();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_booking_error(e),
    }
}

/// GET /api/bookings/:id - Get booking details
pub async fn get_booking(
    State(handlers): State<BookingHandlers>,
    RequireAuth(_user): RequireAuth,
    Path(booking_id): Path<String>,
) -> Response {
    let booking_id = match booking_id.parse::<BookingId>() {
        Ok(id) => id,
        Err(_) => return invalid_id("booking"),
    };

    match handlers.get_handler.handle(GetBookingQuery { booking_id }).await {
        Ok(booking) => (StatusCode::OK, Json(BookingResponse::from(&booking))).into_response(),
        Err(e) => handle_booking_error(e),
    }
}

/// PUT /api/bookings/:id - Update booking fields
pub async fn update_booking(
    State(handlers): State<BookingHandlers>,
    RequireAuth(user): RequireAuth,
    Path(booking_id): Path<String>,
    Json(req): Json<UpdateBookingRequest>,
) -> Response {
    let booking_id = match booking_id.parse::<BookingId>() {
        Ok(id) => id,
        Err(_) => return invalid_id("booking"),
    };

    let (patch, override_requested) = req.into_patch();
    let cmd = UpdateBookingCommand {
        booking_id,
        patch,
        override_requested,
    };

    match handlers.update_handler.handle(cmd, metadata_for(user)).await {
        Ok(result) => {
            let response = UpdateBookingResponse {
                changed_fields: result
                    .changed_fields
                    .iter()
                    .map(|f| f.as_str().to_string())
                    .collect(),
                booking: BookingResponse::from(&result.booking),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_booking_error(e),
    }
}

/// PATCH /api/bookings/:id/status - Move a booking through its lifecycle
pub async fn transition_status(
    State(handlers): State<BookingHandlers>,
    RequireAuth(user): RequireAuth,
    Path(booking_id): Path<String>,
    Json(req): Json<TransitionStatusRequest>,
) -> Response {
    let booking_id = match booking_id.parse::<BookingId>() {
        Ok(id) => id,
        Err(_) => return invalid_id("booking"),
    };
    let target = match req.status.parse::<BookingStatus>() {
        Ok(status) => status,
        Err(e) => return handle_booking_error(e.into()),
    };

    let cmd = TransitionStatusCommand { booking_id, target };

    match handlers.transition_handler.handle(cmd, metadata_for(user)).await {
        Ok(result) => {
            (StatusCode::OK, Json(BookingResponse::from(&result.booking))).into_response()
        }
        Err(e) => handle_booking_error(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Upsell endpoints
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/bookings/:id/upsells - Add an upsell
pub async fn add_upsell(
    State(handlers): State<BookingHandlers>,
    RequireAuth(user): RequireAuth,
    Path(booking_id): Path<String>,
    Json(req): Json<AddUpsellRequest>,
) -> Response {
    let booking_id = match booking_id.parse::<BookingId>() {
        Ok(id) => id,
        Err(_) => return invalid_id("booking"),
    };

    let (input, override_requested) = req.into_input();
    let cmd = AddUpsellCommand {
        booking_id,
        input,
        override_requested,
    };

    match handlers.add_upsell_handler.handle(cmd, metadata_for(user)).await {
        Ok(result) => {
            let response = AddUpsellResponse {
                upsell_id: result.upsell_id.to_string(),
                booking: BookingResponse::from(&result.booking),
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => handle_booking_error(e),
    }
}

/// PUT /api/bookings/:id/upsells/:upsell_id - Update an upsell
pub async fn update_upsell(
    State(handlers): State<BookingHandlers>,
    RequireAuth(user): RequireAuth,
    Path((booking_id, upsell_id)): Path<(String, String)>,
    Json(req): Json<UpdateUpsellRequest>,
) -> Response {
    let (booking_id, upsell_id) = match parse_upsell_path(&booking_id, &upsell_id) {
        Ok(ids) => ids,
        Err(response) => return response,
    };

    let (patch, override_requested) = req.into_patch();
    let cmd = UpdateUpsellCommand {
        booking_id,
        upsell_id,
        patch,
        override_requested,
    };

    match handlers.update_upsell_handler.handle(cmd, metadata_for(user)).await {
        Ok(result) => {
            (StatusCode::OK, Json(BookingResponse::from(&result.booking))).into_response()
        }
        Err(e) => handle_booking_error(e),
    }
}

/// DELETE /api/bookings/:id/upsells/:upsell_id - Remove an upsell
pub async fn remove_upsell(
    State(handlers): State<BookingHandlers>,
    RequireAuth(user): RequireAuth,
    Path((booking_id, upsell_id)): Path<(String, String)>,
    Query(params): Query<OverrideQuery>,
) -> Response {
    let (booking_id, upsell_id) = match parse_upsell_path(&booking_id, &upsell_id) {
        Ok(ids) => ids,
        Err(response) => return response,
    };

    let cmd = RemoveUpsellCommand {
        booking_id,
        upsell_id,
        override_requested: params.override_guard,
    };

    match handlers.remove_upsell_handler.handle(cmd, metadata_for(user)).await {
        Ok(result) => {
            (StatusCode::OK, Json(BookingResponse::from(&result.booking))).into_response()
        }
        Err(e) => handle_booking_error(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helpers
// ════════════════════════════════════════════════════════════════════════════

fn metadata_for(user: AuthenticatedUser) -> CommandMetadata {
    CommandMetadata::new(user.id, user.role)
        .with_correlation_id("http-request")
        .with_source("http")
}

fn invalid_id(kind: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::bad_request(format!("Invalid {} ID", kind))),
    )
        .into_response()
}

fn parse_upsell_path(booking_id: &str, upsell_id: &str) -> Result<(BookingId, UpsellId), Response> {
    let booking_id = booking_id
        .parse::<BookingId>()
        .map_err(|_| invalid_id("booking"))?;
    let upsell_id = upsell_id
        .parse::<UpsellId>()
        .map_err(|_| invalid_id("upsell"))?;
    Ok((booking_id, upsell_id))
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn handle_booking_error(error: BookingError) -> Response {
    let code = error.code().to_string();
    let message = error.message();

    match error {
        BookingError::NotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::not_found("Booking", &id.to_string())),
        )
            .into_response(),
        BookingError::UpsellNotFound { upsell_id, .. } => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::not_found("Upsell", &upsell_id.to_string())),
        )
            .into_response(),
        BookingError::InvalidTransition { from, to } => (
            StatusCode::CONFLICT,
            Json(
                ErrorResponse::new(code, message)
                    .with_details(json!({ "from": from, "to": to })),
            ),
        )
            .into_response(),
        BookingError::Conflict(_) => {
            (StatusCode::CONFLICT, Json(ErrorResponse::new(code, message))).into_response()
        }
        BookingError::EditForbidden { status, fields } => {
            let fields: Vec<&str> = fields.iter().map(|f| f.as_str()).collect();
            (
                StatusCode::LOCKED,
                Json(
                    ErrorResponse::new(code, message)
                        .with_details(json!({ "status": status, "fields": fields })),
                ),
            )
                .into_response()
        }
        BookingError::InvalidReference { field, value } => (
            StatusCode::BAD_REQUEST,
            Json(
                ErrorResponse::new(code, message)
                    .with_details(json!({ "field": field, "value": value })),
            ),
        )
            .into_response(),
        BookingError::ValidationFailed { field, .. } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse::new(code, message).with_details(json!({ "field": field }))),
        )
            .into_response(),
        BookingError::Infrastructure(msg) => {
            tracing::error!(error = %msg, "Booking request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal("Internal server error")),
            )
                .into_response()
        }
    }
}
