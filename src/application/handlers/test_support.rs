//! Fixtures shared by handler tests.

use std::sync::Arc;

use crate::adapters::events::InMemoryEventBus;
use crate::adapters::memory::InMemoryBookingStore;
use crate::domain::booking::{Booking, BookingInput, BookingStatus, UpsellInput};
use crate::domain::foundation::{CommandMetadata, StaffRole, Timestamp, UserId};
use crate::ports::BookingRepository;

pub fn staff_id() -> UserId {
    UserId::new("staff-1").unwrap()
}

pub fn admin_id() -> UserId {
    UserId::new("admin-1").unwrap()
}

pub fn staff_metadata() -> CommandMetadata {
    CommandMetadata::new(staff_id(), StaffRole::Staff).with_correlation_id("test-correlation")
}

pub fn admin_metadata() -> CommandMetadata {
    CommandMetadata::new(admin_id(), StaffRole::Admin).with_correlation_id("test-correlation")
}

pub fn booking_input(labour: i64, parts: i64, price: i64) -> BookingInput {
    BookingInput {
        vehicle_reg_no: "AB12 CDE".to_string(),
        make_model: "Ford Focus".to_string(),
        owner_name: "Jo Bloggs".to_string(),
        owner_address: Some("1 High Street".to_string()),
        owner_postal_code: Some("AB1 2CD".to_string()),
        owner_contact: Some("07700 900000".to_string()),
        scheduled_date: Timestamp::now().add_days(1),
        remarks: None,
        prebooking_services: vec![],
        confirmed_services: vec![],
        confirmed_parts: vec![],
        prebooking_labour_cost: labour,
        prebooking_parts_cost: parts,
        prebooking_booking_price: price,
    }
}

pub fn upsell_input(labour: i64, parts: i64, price: i64) -> UpsellInput {
    UpsellInput {
        labour_cost: labour,
        parts_cost: parts,
        upsell_price: price,
        description: Some("Extra work".to_string()),
        ..Default::default()
    }
}

pub fn store_and_bus() -> (Arc<InMemoryBookingStore>, Arc<InMemoryEventBus>) {
    (
        Arc::new(InMemoryBookingStore::new()),
        Arc::new(InMemoryEventBus::new()),
    )
}

/// Saves a booking with the 200/80/300 estimate, walked to `status`.
pub async fn seed_booking(store: &InMemoryBookingStore, status: BookingStatus) -> Booking {
    let mut booking = Booking::create(booking_input(200, 80, 300), &staff_id()).unwrap();
    let path: &[BookingStatus] = match status {
        BookingStatus::Pending => &[],
        BookingStatus::Arrived => &[BookingStatus::Arrived],
        BookingStatus::Completed => &[BookingStatus::Arrived, BookingStatus::Completed],
        BookingStatus::Cancelled => &[BookingStatus::Cancelled],
    };
    for next in path {
        booking.transition_to(*next, &staff_id()).unwrap();
    }
    store.save(&booking).await.unwrap();
    booking
}
