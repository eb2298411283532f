//! Booking-specific error types.

use crate::domain::foundation::{
    BookingId, DomainError, ErrorCode, InvalidTransition, UpsellId, ValidationError,
};

use super::{BookingField, BookingStatus};

/// Errors returned by booking operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingError {
    /// Booking was not found.
    NotFound(BookingId),
    /// The booking exists but has no upsell with this id.
    UpsellNotFound {
        booking_id: BookingId,
        upsell_id: UpsellId,
    },
    /// Requested status change is not in the lifecycle table.
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },
    /// Protected fields of a closed booking were touched without override.
    EditForbidden {
        status: BookingStatus,
        fields: Vec<BookingField>,
    },
    /// A service or part reference is not a well-formed identifier.
    InvalidReference { field: String, value: String },
    /// Validation failed.
    ValidationFailed { field: String, message: String },
    /// The booking changed status between read and write.
    Conflict(String),
    /// Infrastructure error.
    Infrastructure(String),
}

impl BookingError {
    pub fn not_found(id: BookingId) -> Self {
        BookingError::NotFound(id)
    }
    pub fn upsell_not_found(booking_id: BookingId, upsell_id: UpsellId) -> Self {
        BookingError::UpsellNotFound {
            booking_id,
            upsell_id,
        }
    }
    pub fn invalid_reference(field: impl Into<String>, value: impl Into<String>) -> Self {
        BookingError::InvalidReference {
            field: field.into(),
            value: value.into(),
        }
    }
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        BookingError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }
    pub fn conflict(message: impl Into<String>) -> Self {
        BookingError::Conflict(message.into())
    }
    pub fn infrastructure(message: impl Into<String>) -> Self {
        BookingError::Infrastructure(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            BookingError::NotFound(_) => ErrorCode::BookingNotFound,
            BookingError::UpsellNotFound { .. } => ErrorCode::UpsellNotFound,
            BookingError::InvalidTransition { .. } => ErrorCode::InvalidStateTransition,
            BookingError::EditForbidden { .. } => ErrorCode::EditForbidden,
            BookingError::InvalidReference { .. } => ErrorCode::InvalidReference,
            BookingError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            BookingError::Conflict(_) => ErrorCode::ConcurrentModification,
            BookingError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    pub fn message(&self) -> String {
        match self {
            BookingError::NotFound(id) => format!("Booking not found: {}", id),
            BookingError::UpsellNotFound {
                booking_id,
                upsell_id,
            } => format!("Upsell {} not found on booking {}", upsell_id, booking_id),
            BookingError::InvalidTransition { from, to } => {
                format!("Invalid status transition: {} -> {}", from, to)
            }
            BookingError::EditForbidden { status, fields } => {
                let names: Vec<&str> = fields.iter().map(BookingField::as_str).collect();
                format!(
                    "Booking is {}; cannot modify protected fields: {}",
                    status,
                    names.join(", ")
                )
            }
            BookingError::InvalidReference { field, value } => {
                format!("Invalid reference in '{}': '{}'", field, value)
            }
            BookingError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            BookingError::Conflict(msg) => format!("Conflict: {}", msg),
            BookingError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for BookingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for BookingError {}

impl From<DomainError> for BookingError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::BookingNotFound => match err
                .details
                .get("booking_id")
                .and_then(|id| id.parse::<BookingId>().ok())
            {
                Some(id) => BookingError::NotFound(id),
                None => BookingError::Infrastructure(err.to_string()),
            },
            ErrorCode::ConcurrentModification => BookingError::Conflict(err.message),
            ErrorCode::ValidationFailed => BookingError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            _ => BookingError::Infrastructure(err.to_string()),
        }
    }
}

impl From<ValidationError> for BookingError {
    fn from(err: ValidationError) -> Self {
        BookingError::ValidationFailed {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<InvalidTransition<BookingStatus>> for BookingError {
    fn from(err: InvalidTransition<BookingStatus>) -> Self {
        BookingError::InvalidTransition {
            from: err.from,
            to: err.to,
        }
    }
}
