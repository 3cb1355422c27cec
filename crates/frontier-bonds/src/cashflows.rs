//! Coupon cash-flow schedules.

use frontier_core::types::Date;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single coupon payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coupon {
    /// Payment date.
    pub date: Date,
    /// Payment amount per bond, in currency units.
    pub amount: Decimal,
}

impl Coupon {
    /// Creates a coupon.
    #[must_use]
    pub fn new(date: Date, amount: Decimal) -> Self {
        Self { date, amount }
    }
}

/// An ordered schedule of future coupon payments.
///
/// Schedules are always constructed relative to a valuation date; coupons
/// already paid are dropped, never carried. An empty schedule is valid -
/// a bond in its final coupon period degenerates to a single discounted
/// nominal cash flow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouponSchedule {
    coupons: Vec<Coupon>,
}

impl CouponSchedule {
    /// Builds the schedule of coupons payable on or after `as_of`.
    ///
    /// Input order does not matter; the schedule is sorted by date.
    #[must_use]
    pub fn future_of(coupons: impl IntoIterator<Item = Coupon>, as_of: Date) -> Self {
        let mut coupons: Vec<Coupon> = coupons
            .into_iter()
            .filter(|coupon| coupon.date >= as_of)
            .collect();
        coupons.sort_by_key(|coupon| coupon.date);
        Self { coupons }
    }

    /// Iterates over the scheduled coupons, earliest first.
    pub fn iter(&self) -> impl Iterator<Item = &Coupon> {
        self.coupons.iter()
    }

    /// Number of scheduled coupons.
    #[must_use]
    pub fn len(&self) -> usize {
        self.coupons.len()
    }

    /// Returns true if no coupons remain.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.coupons.is_empty()
    }

    /// Sum of all scheduled coupon amounts.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.coupons.iter().map(|coupon| coupon.amount).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(month: u32, day: u32) -> Date {
        Date::from_ymd(2025, month, day).unwrap()
    }

    #[test]
    fn test_past_coupons_dropped() {
        let schedule = CouponSchedule::future_of(
            vec![
                Coupon::new(date(1, 15), dec!(25)),
                Coupon::new(date(7, 15), dec!(25)),
                Coupon::new(date(4, 15), dec!(25)),
            ],
            date(3, 1),
        );

        assert_eq!(schedule.len(), 2);
        assert_eq!(schedule.total(), dec!(50));
        let dates: Vec<Date> = schedule.iter().map(|c| c.date).collect();
        assert_eq!(dates, vec![date(4, 15), date(7, 15)]);
    }

    #[test]
    fn test_coupon_on_valuation_date_kept() {
        let schedule =
            CouponSchedule::future_of(vec![Coupon::new(date(3, 1), dec!(25))], date(3, 1));
        assert_eq!(schedule.len(), 1);
    }

    #[test]
    fn test_empty_schedule() {
        let schedule = CouponSchedule::future_of(vec![], date(1, 1));
        assert!(schedule.is_empty());
        assert_eq!(schedule.total(), Decimal::ZERO);
    }
}
