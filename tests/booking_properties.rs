//! Property-based tests for booking aggregation and lifecycle.
//!
//! Invariants tested:
//! - Stored totals always equal a fresh aggregation
//! - Labour, parts and price are the estimate plus every upsell
//! - Service and part unions hold each id once
//! - Only the four lifecycle edges are accepted
//! - Adding then removing an upsell restores the totals exactly
//! - Amounts above the limit are rejected before they reach the totals
//! - Closed bookings reject upsell changes without an override

use std::collections::HashSet;

use proptest::prelude::*;
use uuid::Uuid;

use garage_workshop::domain::booking::{
    totals, Booking, BookingError, BookingInput, BookingStatus, EditOverride, UpsellInput,
};
use garage_workshop::domain::foundation::{Timestamp, UserId, MAX_AMOUNT_CENTS};

fn booking_config() -> ProptestConfig {
    ProptestConfig {
        cases: 64,
        max_shrink_iters: 256,
        ..ProptestConfig::default()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// STRATEGIES
// ═══════════════════════════════════════════════════════════════════════════

/// Small pool of ids so generated lists overlap and repeat.
fn reference_strategy() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec(0u128..6, 0..5).prop_map(|picks| {
        picks
            .into_iter()
            .map(|n| Uuid::from_u128(n + 1).to_string())
            .collect()
    })
}

fn amount_strategy() -> impl Strategy<Value = i64> {
    prop_oneof![
        0i64..1_000_000,
        Just(MAX_AMOUNT_CENTS),
        (MAX_AMOUNT_CENTS - 1_000_000)..=MAX_AMOUNT_CENTS,
    ]
}

fn booking_input_strategy() -> impl Strategy<Value = BookingInput> {
    (
        amount_strategy(),
        amount_strategy(),
        amount_strategy(),
        reference_strategy(),
        reference_strategy(),
        reference_strategy(),
    )
        .prop_map(
            |(labour, parts, price, prebooking_services, confirmed_services, confirmed_parts)| {
                BookingInput {
                    vehicle_reg_no: "AB12 CDE".to_string(),
                    make_model: "Ford Focus".to_string(),
                    owner_name: "Jo Bloggs".to_string(),
                    owner_address: None,
                    owner_postal_code: None,
                    owner_contact: None,
                    scheduled_date: Timestamp::now().add_days(1),
                    remarks: None,
                    prebooking_services,
                    confirmed_services,
                    confirmed_parts,
                    prebooking_labour_cost: labour,
                    prebooking_parts_cost: parts,
                    prebooking_booking_price: price,
                }
            },
        )
}

fn upsell_input_strategy() -> impl Strategy<Value = UpsellInput> {
    (
        amount_strategy(),
        amount_strategy(),
        amount_strategy(),
        reference_strategy(),
        reference_strategy(),
    )
        .prop_map(|(labour_cost, parts_cost, upsell_price, services, parts)| UpsellInput {
            services,
            parts,
            labour_cost,
            parts_cost,
            upsell_price,
            description: None,
        })
}

fn status_strategy() -> impl Strategy<Value = BookingStatus> {
    prop_oneof![
        Just(BookingStatus::Pending),
        Just(BookingStatus::Arrived),
        Just(BookingStatus::Completed),
        Just(BookingStatus::Cancelled),
    ]
}

fn actor() -> UserId {
    UserId::new("staff-1").unwrap()
}

fn walk_to(booking: &mut Booking, status: BookingStatus) {
    let path: &[BookingStatus] = match status {
        BookingStatus::Pending => &[],
        BookingStatus::Arrived => &[BookingStatus::Arrived],
        BookingStatus::Completed => &[BookingStatus::Arrived, BookingStatus::Completed],
        BookingStatus::Cancelled => &[BookingStatus::Cancelled],
    };
    for next in path {
        booking.transition_to(*next, &actor()).unwrap();
    }
}

fn with_upsells(input: BookingInput, upsells: Vec<UpsellInput>) -> Booking {
    let mut booking = Booking::create(input, &actor()).unwrap();
    for upsell in upsells {
        booking
            .add_upsell(upsell, &actor(), EditOverride::None)
            .unwrap();
    }
    booking
}

// ═══════════════════════════════════════════════════════════════════════════
// AGGREGATION
// ═══════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(booking_config())]

    #[test]
    fn sums_are_estimate_plus_upsells(
        input in booking_input_strategy(),
        upsells in proptest::collection::vec(upsell_input_strategy(), 0..5),
    ) {
        let labour: i64 = input.prebooking_labour_cost
            + upsells.iter().map(|u| u.labour_cost).sum::<i64>();
        let parts: i64 = input.prebooking_parts_cost
            + upsells.iter().map(|u| u.parts_cost).sum::<i64>();
        let price: i64 = input.prebooking_booking_price
            + upsells.iter().map(|u| u.upsell_price).sum::<i64>();

        let booking = with_upsells(input, upsells);
        let totals = booking.totals();

        prop_assert_eq!(totals.labour_cost.cents(), labour);
        prop_assert_eq!(totals.parts_cost.cents(), parts);
        prop_assert_eq!(totals.booking_price.cents(), price);
        prop_assert_eq!(totals.total_expense().cents(), labour + parts);
        prop_assert_eq!(totals.profit(), price - labour - parts);
    }

    #[test]
    fn stored_totals_match_fresh_aggregation(
        input in booking_input_strategy(),
        upsells in proptest::collection::vec(upsell_input_strategy(), 0..5),
        status in status_strategy(),
    ) {
        let mut booking = with_upsells(input, upsells);
        walk_to(&mut booking, status);

        let fresh = totals::recompute(&booking);
        prop_assert!(booking.totals_are_consistent());
        prop_assert_eq!(&totals::recompute(&booking), &fresh);
    }

    #[test]
    fn unions_hold_each_reference_once(
        input in booking_input_strategy(),
        upsells in proptest::collection::vec(upsell_input_strategy(), 0..5),
    ) {
        let mut expected_services: HashSet<String> = HashSet::new();
        expected_services.extend(input.prebooking_services.iter().cloned());
        expected_services.extend(input.confirmed_services.iter().cloned());
        let mut expected_parts: HashSet<String> =
            input.confirmed_parts.iter().cloned().collect();
        for upsell in &upsells {
            expected_services.extend(upsell.services.iter().cloned());
            expected_parts.extend(upsell.parts.iter().cloned());
        }

        let booking = with_upsells(input, upsells);
        let totals = booking.totals();

        let services: HashSet<String> = totals.services.iter().map(ToString::to_string).collect();
        let parts: HashSet<String> = totals.parts.iter().map(ToString::to_string).collect();

        prop_assert_eq!(services.len(), totals.services.len());
        prop_assert_eq!(parts.len(), totals.parts.len());
        prop_assert_eq!(totals.total_services, totals.services.len());
        prop_assert_eq!(totals.total_parts, totals.parts.len());
        prop_assert_eq!(services, expected_services);
        prop_assert_eq!(parts, expected_parts);
    }

    #[test]
    fn add_then_remove_upsell_restores_totals(
        input in booking_input_strategy(),
        existing in proptest::collection::vec(upsell_input_strategy(), 0..3),
        extra in upsell_input_strategy(),
    ) {
        let mut booking = with_upsells(input, existing);
        let before = booking.totals().clone();

        let upsell_id = booking.add_upsell(extra, &actor(), EditOverride::None).unwrap();
        booking.remove_upsell(&upsell_id, &actor(), EditOverride::None).unwrap();

        prop_assert_eq!(booking.totals(), &before);
    }

    #[test]
    fn oversized_upsell_amount_leaves_booking_untouched(
        input in booking_input_strategy(),
        excess in (MAX_AMOUNT_CENTS + 1)..=i64::MAX,
        which in 0usize..3,
    ) {
        let mut booking = Booking::create(input, &actor()).unwrap();
        let before = booking.clone();
        let mut upsell = UpsellInput::default();
        match which {
            0 => upsell.labour_cost = excess,
            1 => upsell.parts_cost = excess,
            _ => upsell.upsell_price = excess,
        }

        let result = booking.add_upsell(upsell, &actor(), EditOverride::None);
        let is_validation = matches!(result, Err(BookingError::ValidationFailed { .. }));
        prop_assert!(is_validation);
        prop_assert_eq!(&booking, &before);
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// LIFECYCLE AND EDIT GUARD
// ═══════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(booking_config())]

    #[test]
    fn only_lifecycle_edges_are_accepted(
        input in booking_input_strategy(),
        from in status_strategy(),
        to in status_strategy(),
    ) {
        use BookingStatus::*;
        let allowed = matches!(
            (from, to),
            (Pending, Arrived) | (Pending, Cancelled) | (Arrived, Completed) | (Arrived, Cancelled)
        );

        let mut booking = Booking::create(input, &actor()).unwrap();
        walk_to(&mut booking, from);
        let untouched = booking.clone();

        match booking.transition_to(to, &actor()) {
            Ok(previous) => {
                prop_assert!(allowed);
                prop_assert_eq!(previous, from);
                prop_assert_eq!(booking.status(), to);
            }
            Err(err) => {
                prop_assert!(!allowed);
                let is_invalid_transition = matches!(err, BookingError::InvalidTransition { .. });
                prop_assert!(is_invalid_transition);
                prop_assert_eq!(&booking, &untouched);
            }
        }
    }

    #[test]
    fn closed_bookings_reject_upsells_without_override(
        input in booking_input_strategy(),
        upsell in upsell_input_strategy(),
        closed in prop_oneof![Just(BookingStatus::Completed), Just(BookingStatus::Cancelled)],
    ) {
        let mut booking = Booking::create(input, &actor()).unwrap();
        walk_to(&mut booking, closed);
        let untouched = booking.clone();

        let result = booking.add_upsell(upsell.clone(), &actor(), EditOverride::None);
        let is_forbidden = matches!(result, Err(BookingError::EditForbidden { .. }));
        prop_assert!(is_forbidden);
        prop_assert_eq!(&booking, &untouched);

        let granted = booking.add_upsell(upsell, &actor(), EditOverride::Granted);
        prop_assert!(granted.is_ok());
        prop_assert_eq!(booking.status(), closed);
        prop_assert!(booking.totals_are_consistent());
    }
}
