//! ListBookingsHandler - Query handler for paged booking lists.

use std::sync::Arc;

use crate::domain::booking::BookingError;
use crate::ports::{BookingList, BookingListOptions, BookingReader};

/// Query to list bookings.
#[derive(Debug, Clone, Default)]
pub struct ListBookingsQuery {
    pub options: BookingListOptions,
}

/// Handler for listing bookings.
pub struct ListBookingsHandler {
    reader: Arc<dyn BookingReader>,
}

impl ListBookingsHandler {
    pub fn new(reader: Arc<dyn BookingReader>) -> Self {
        Self { reader }
    }

    pub async fn handle(&self, query: ListBookingsQuery) -> Result<BookingList, BookingError> {
        query.options.validate()?;
        let list = self.reader.list(&query.options).await?;
        tracing::debug!(total = list.total, page = list.page, "Bookings listed");
        Ok(list)
    }
}
