//! Cost aggregation for bookings.
//!
//! The derived totals on a booking are a pure function of its pre-booking
//! estimate, its confirmed references and its upsells. `recompute` is the
//! only place they are calculated.
//!
//! The customer price is never derived from labour + parts: labour and parts
//! are internal costs, while `booking_price` and `upsell_price` are what the
//! customer is charged.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::domain::foundation::{Money, PartId, ServiceId};

use super::references::union_into;
use super::{Booking, Upsell};

/// Cost figures captured when the booking was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CostEstimate {
    pub labour_cost: Money,
    pub parts_cost: Money,
    pub booking_price: Money,
}

/// Authoritative totals written back onto a booking.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RecomputedTotals {
    pub labour_cost: Money,
    pub parts_cost: Money,
    pub booking_price: Money,
    /// Union of pre-booking, confirmed and upsell services.
    pub services: Vec<ServiceId>,
    /// Union of confirmed and upsell parts.
    pub parts: Vec<PartId>,
    pub total_services: usize,
    pub total_parts: usize,
}

impl RecomputedTotals {
    /// Labour plus parts.
    pub fn total_expense(&self) -> Money {
        self.labour_cost + self.parts_cost
    }

    /// Price minus expense, in minor units. Negative when the job ran at a loss.
    pub fn profit(&self) -> i64 {
        self.booking_price.cents() - self.total_expense().cents()
    }

    /// Profit as a percentage of price; 0 when nothing was charged.
    pub fn profit_percentage(&self) -> f64 {
        if self.booking_price.is_zero() {
            return 0.0;
        }
        self.profit() as f64 / self.booking_price.cents() as f64 * 100.0
    }
}

/// Recomputes the derived totals of a booking.
pub fn recompute(booking: &Booking) -> RecomputedTotals {
    compute(
        booking.prebooking(),
        booking.prebooking_services(),
        booking.confirmed_services(),
        booking.confirmed_parts(),
        booking.upsells(),
    )
}

/// Aggregates totals from their raw inputs.
///
/// Unions keep first-seen order: pre-booking, then confirmed, then upsells
/// in list order.
pub fn compute(
    prebooking: &CostEstimate,
    prebooking_services: &[ServiceId],
    confirmed_services: &[ServiceId],
    confirmed_parts: &[PartId],
    upsells: &[Upsell],
) -> RecomputedTotals {
    let labour_cost =
        prebooking.labour_cost + upsells.iter().map(|u| u.labour_cost).sum::<Money>();
    let parts_cost = prebooking.parts_cost + upsells.iter().map(|u| u.parts_cost).sum::<Money>();
    let booking_price =
        prebooking.booking_price + upsells.iter().map(|u| u.upsell_price).sum::<Money>();

    let mut services = Vec::new();
    let mut seen_services = HashSet::new();
    union_into(&mut services, &mut seen_services, prebooking_services);
    union_into(&mut services, &mut seen_services, confirmed_services);

    let mut parts = Vec::new();
    let mut seen_parts = HashSet::new();
    union_into(&mut parts, &mut seen_parts, confirmed_parts);

    for upsell in upsells {
        union_into(&mut services, &mut seen_services, &upsell.services);
        union_into(&mut parts, &mut seen_parts, &upsell.parts);
    }

    RecomputedTotals {
        labour_cost,
        parts_cost,
        booking_price,
        total_services: services.len(),
        total_parts: parts.len(),
        services,
        parts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{Timestamp, UpsellId, UserId};

    fn money(cents: i64) -> Money {
        Money::from_cents(cents).unwrap()
    }

    fn estimate(labour: i64, parts: i64, price: i64) -> CostEstimate {
        CostEstimate {
            labour_cost: money(labour),
            parts_cost: money(parts),
            booking_price: money(price),
        }
    }

    fn upsell(labour: i64, parts: i64, price: i64) -> Upsell {
        let actor = UserId::new("staff-1").unwrap();
        let now = Timestamp::now();
        Upsell {
            id: UpsellId::new(),
            services: vec![],
            parts: vec![],
            labour_cost: money(labour),
            parts_cost: money(parts),
            upsell_price: money(price),
            description: None,
            created_by: actor.clone(),
            updated_by: actor,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn no_upsells_yields_estimate() {
        let totals = compute(&estimate(200, 80, 300), &[], &[], &[], &[]);
        assert_eq!(totals.labour_cost, money(200));
        assert_eq!(totals.parts_cost, money(80));
        assert_eq!(totals.booking_price, money(300));
        assert_eq!(totals.total_services, 0);
    }

    #[test]
    fn upsell_amounts_are_added_per_column() {
        let totals = compute(
            &estimate(200, 80, 300),
            &[],
            &[],
            &[],
            &[upsell(50, 20, 100)],
        );
        assert_eq!(totals.labour_cost, money(250));
        assert_eq!(totals.parts_cost, money(100));
        assert_eq!(totals.booking_price, money(400));
    }

    #[test]
    fn price_is_not_derived_from_costs() {
        let totals = compute(&estimate(0, 0, 0), &[], &[], &[], &[upsell(500, 500, 0)]);
        assert_eq!(totals.booking_price, Money::ZERO);
        assert_eq!(totals.total_expense(), money(1000));
    }

    #[test]
    fn unions_dedup_across_sources() {
        let oil = ServiceId::new();
        let tyres = ServiceId::new();
        let filter = PartId::new();

        let mut extra = upsell(0, 0, 0);
        extra.services = vec![tyres, oil];
        extra.parts = vec![filter];

        let totals = compute(
            &CostEstimate::default(),
            &[oil],
            &[oil, tyres],
            &[filter],
            &[extra],
        );

        assert_eq!(totals.services, vec![oil, tyres]);
        assert_eq!(totals.parts, vec![filter]);
        assert_eq!(totals.total_services, 2);
        assert_eq!(totals.total_parts, 1);
    }

    #[test]
    fn profit_figures() {
        let totals = compute(&estimate(200, 100, 400), &[], &[], &[], &[]);
        assert_eq!(totals.total_expense(), money(300));
        assert_eq!(totals.profit(), 100);
        assert!((totals.profit_percentage() - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn loss_is_negative_profit_and_zero_price_is_zero_percent() {
        let loss = compute(&estimate(300, 0, 200), &[], &[], &[], &[]);
        assert_eq!(loss.profit(), -100);

        let free = compute(&estimate(300, 0, 0), &[], &[], &[], &[]);
        assert_eq!(free.profit_percentage(), 0.0);
    }

    #[test]
    fn compute_is_idempotent() {
        let upsells = vec![upsell(10, 20, 30), upsell(1, 2, 3)];
        let first = compute(&estimate(5, 5, 5), &[], &[], &[], &upsells);
        let second = compute(&estimate(5, 5, 5), &[], &[], &[], &upsells);
        assert_eq!(first, second);
    }
}
