//! PostgreSQL implementation of BookingRepository and BookingReader.
//!
//! Each booking is stored as one JSONB document. The columns used for
//! filtering and sorting are copied out next to it so list queries can use
//! indexes.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};

use crate::domain::booking::{Booking, BookingStatus};
use crate::domain::foundation::{BookingId, DomainError, ErrorCode};
use crate::ports::{
    BookingList, BookingListOptions, BookingReader, BookingRepository, BookingSortField,
    SortDirection,
};

/// PostgreSQL implementation of the booking ports.
#[derive(Clone)]
pub struct PostgresBookingRepository {
    pool: PgPool,
}

impl PostgresBookingRepository {
    /// Creates a new PostgresBookingRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for PostgresBookingRepository {
    async fn save(&self, booking: &Booking) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO bookings (
                id, status, vehicle_reg_no, owner_name, scheduled_date,
                created_at, updated_at, document
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(booking.id().as_uuid())
        .bind(booking.status().as_str())
        .bind(&booking.details().vehicle_reg_no)
        .bind(&booking.details().owner_name)
        .bind(booking.details().scheduled_date.as_datetime())
        .bind(booking.created_at().as_datetime())
        .bind(booking.updated_at().as_datetime())
        .bind(Json(booking))
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to insert booking", e))?;

        tracing::debug!(booking_id = %booking.id(), "Booking inserted");
        Ok(())
    }

    async fn update(
        &self,
        booking: &Booking,
        expected_status: BookingStatus,
    ) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE bookings SET
                status = $3,
                vehicle_reg_no = $4,
                owner_name = $5,
                scheduled_date = $6,
                updated_at = $7,
                document = $8
            WHERE id = $1 AND status = $2
            "#,
        )
        .bind(booking.id().as_uuid())
        .bind(expected_status.as_str())
        .bind(booking.status().as_str())
        .bind(&booking.details().vehicle_reg_no)
        .bind(&booking.details().owner_name)
        .bind(booking.details().scheduled_date.as_datetime())
        .bind(booking.updated_at().as_datetime())
        .bind(Json(booking))
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to update booking", e))?;

        if result.rows_affected() > 0 {
            tracing::debug!(booking_id = %booking.id(), "Booking updated");
            return Ok(());
        }

        // Nothing matched: either the row is gone or its status moved on.
        let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM bookings WHERE id = $1)")
            .bind(booking.id().as_uuid())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to check booking existence", e))?;

        if exists.0 {
            Err(DomainError::new(
                ErrorCode::ConcurrentModification,
                format!(
                    "Booking {} changed status since it was read as {}",
                    booking.id(),
                    expected_status
                ),
            ))
        } else {
            Err(DomainError::new(
                ErrorCode::BookingNotFound,
                format!("Booking not found: {}", booking.id()),
            )
            .with_detail("booking_id", booking.id().to_string()))
        }
    }

    async fn find_by_id(&self, id: &BookingId) -> Result<Option<Booking>, DomainError> {
        let row = sqlx::query("SELECT document FROM bookings WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to fetch booking", e))?;

        row.map(row_to_booking).transpose()
    }
}

#[async_trait]
impl BookingReader for PostgresBookingRepository {
    async fn list(&self, options: &BookingListOptions) -> Result<BookingList, DomainError> {
        let mut count_query: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM bookings WHERE TRUE");
        push_filters(&mut count_query, options);
        let total: i64 = count_query
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to count bookings", e))?;

        let mut list_query: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT document FROM bookings WHERE TRUE");
        push_filters(&mut list_query, options);
        list_query
            .push(" ORDER BY ")
            .push(sort_column(options.sort_by))
            .push(sort_keyword(options.sort_dir))
            .push(", id")
            .push(sort_keyword(options.sort_dir))
            .push(" LIMIT ")
            .push_bind(i64::from(options.limit))
            .push(" OFFSET ")
            .push_bind(options.offset() as i64);

        let rows = list_query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to list bookings", e))?;

        let items = rows
            .into_iter()
            .map(row_to_booking)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(BookingList::new(
            items,
            total.max(0) as u64,
            options.page,
            options.limit,
        ))
    }
}

fn push_filters(query: &mut QueryBuilder<'_, Postgres>, options: &BookingListOptions) {
    if let Some(status) = options.status {
        query.push(" AND status = ").push_bind(status.as_str());
    }
    if let Some(reg_no) = &options.vehicle_reg_no {
        query
            .push(" AND LOWER(vehicle_reg_no) = LOWER(")
            .push_bind(reg_no.trim().to_string())
            .push(")");
    }
    if let Some(name) = &options.owner_name {
        query
            .push(" AND owner_name ILIKE ")
            .push_bind(format!("%{}%", escape_like(name.trim())));
    }
}

fn escape_like(raw: &str) -> String {
    raw.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

fn sort_column(field: BookingSortField) -> &'static str {
    match field {
        BookingSortField::CreatedAt => "created_at",
        BookingSortField::UpdatedAt => "updated_at",
        BookingSortField::ScheduledDate => "scheduled_date",
        BookingSortField::OwnerName => "LOWER(owner_name)",
        BookingSortField::VehicleRegNo => "LOWER(vehicle_reg_no)",
        BookingSortField::Status => "status",
    }
}

fn sort_keyword(direction: SortDirection) -> &'static str {
    match direction {
        SortDirection::Asc => " ASC",
        SortDirection::Desc => " DESC",
    }
}

fn row_to_booking(row: PgRow) -> Result<Booking, DomainError> {
    let Json(booking): Json<Booking> = row
        .try_get("document")
        .map_err(|e| DomainError::database("Failed to decode booking document", e))?;
    Ok(booking)
}
