//! Immutable bond records with derived yields.

use frontier_core::types::{Date, Sector};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cashflows::{Coupon, CouponSchedule};
use crate::error::{BondError, BondResult};
use crate::pricing::{CashflowTimeline, YieldSolver};

/// Raw instrument terms, as delivered by the data collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BondTerms {
    /// Issuer display name.
    pub name: String,
    /// Exchange ticker.
    pub ticker: String,
    /// Provider sector code, mapped to [`Sector`] at construction.
    pub sector_code: String,
    /// Redemption date.
    pub maturity: Date,
    /// Redemption value, in currency units.
    pub nominal: Decimal,
    /// Accrued coupon interest since the last coupon date.
    pub accrued_interest: Decimal,
    /// Latest traded clean price, in currency units.
    pub clean_price: Decimal,
}

/// A bond with all derived figures resolved.
///
/// Constructed once per data refresh and immutable afterwards; the two
/// yield figures are used downstream purely for ranking and band
/// filtering, never re-derived.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BondRecord {
    /// Issuer display name.
    pub name: String,
    /// Exchange ticker.
    pub ticker: String,
    /// Issuer sector.
    pub sector: Sector,
    /// Redemption date.
    pub maturity: Date,
    /// Redemption value, in currency units.
    pub nominal: Decimal,
    /// Accrued coupon interest.
    pub accrued_interest: Decimal,
    /// Latest traded clean price.
    pub clean_price: Decimal,
    /// Remaining coupon schedule as of the valuation date.
    pub schedule: CouponSchedule,
    /// Pre-tax yield to maturity, percent.
    pub ytm_pct: f64,
    /// After-tax yield to maturity, percent.
    pub after_tax_ytm_pct: f64,
}

impl BondRecord {
    /// Builds a record and solves both yield figures.
    ///
    /// Past coupons in `coupons` are dropped; the schedule the record
    /// carries is already relative to `as_of`.
    ///
    /// # Errors
    ///
    /// * [`BondError::Matured`] if the bond matures on or before `as_of`
    /// * [`BondError::InvalidTerms`] for non-positive nominal or price, or
    ///   negative accrued interest or coupon amounts
    /// * [`BondError::YieldSolve`] if either yield cannot be bracketed
    pub fn new(terms: BondTerms, coupons: Vec<Coupon>, as_of: Date) -> BondResult<Self> {
        if terms.maturity <= as_of {
            return Err(BondError::Matured {
                ticker: terms.ticker,
                maturity: terms.maturity,
                as_of,
            });
        }
        if terms.nominal <= Decimal::ZERO {
            return Err(BondError::invalid_terms(&terms.ticker, "non-positive nominal"));
        }
        if terms.clean_price <= Decimal::ZERO {
            return Err(BondError::invalid_terms(
                &terms.ticker,
                "non-positive clean price",
            ));
        }
        if terms.accrued_interest < Decimal::ZERO {
            return Err(BondError::invalid_terms(
                &terms.ticker,
                "negative accrued interest",
            ));
        }

        let schedule = CouponSchedule::future_of(coupons, as_of);

        let mut coupon_times = Vec::with_capacity(schedule.len());
        for coupon in schedule.iter() {
            if coupon.amount < Decimal::ZERO {
                return Err(BondError::invalid_terms(
                    &terms.ticker,
                    format!("negative coupon at {}", coupon.date),
                ));
            }
            let years = year_fraction(&terms.ticker, as_of, coupon.date)?;
            coupon_times.push((years, decimal_to_f64(&terms.ticker, coupon.amount)?));
        }

        let maturity_years = year_fraction(&terms.ticker, as_of, terms.maturity)?;
        let nominal = decimal_to_f64(&terms.ticker, terms.nominal)?;
        let accrued = decimal_to_f64(&terms.ticker, terms.accrued_interest)?;
        let dirty_price = decimal_to_f64(&terms.ticker, terms.clean_price)? + accrued;

        let timeline =
            CashflowTimeline::new(coupon_times, nominal, maturity_years, accrued, dirty_price);

        // PV nets out accrued interest, so the solve targets the clean
        // price: discounted cash flows then equal the dirty price paid.
        let solver = YieldSolver::new();
        let pre_tax = solver
            .solve(|rate| timeline.present_value(rate), timeline.clean_price())
            .map_err(|source| BondError::YieldSolve {
                ticker: terms.ticker.clone(),
                source,
            })?;
        let after_tax = solver
            .solve(
                |rate| timeline.after_tax_present_value(rate),
                timeline.clean_price(),
            )
            .map_err(|source| BondError::YieldSolve {
                ticker: terms.ticker.clone(),
                source,
            })?;

        tracing::debug!(
            ticker = %terms.ticker,
            ytm_pct = pre_tax.yield_pct,
            after_tax_ytm_pct = after_tax.yield_pct,
            "Bond yields resolved"
        );

        Ok(Self {
            name: terms.name,
            ticker: terms.ticker,
            sector: Sector::from_code(&terms.sector_code),
            maturity: terms.maturity,
            nominal: terms.nominal,
            accrued_interest: terms.accrued_interest,
            clean_price: terms.clean_price,
            schedule,
            ytm_pct: pre_tax.yield_pct,
            after_tax_ytm_pct: after_tax.yield_pct,
        })
    }

    /// Clean price plus accrued interest - what one unit actually costs.
    #[must_use]
    pub fn dirty_price(&self) -> Decimal {
        self.clean_price + self.accrued_interest
    }
}

/// ACT/365F year fraction from the valuation date to a cash-flow date.
fn year_fraction(ticker: &str, from: Date, to: Date) -> BondResult<f64> {
    from.year_fraction_365(&to).map_err(|_| {
        BondError::invalid_terms(
            ticker,
            format!("cash flow at {to} precedes valuation date {from}"),
        )
    })
}

fn decimal_to_f64(ticker: &str, value: Decimal) -> BondResult<f64> {
    value
        .to_f64()
        .ok_or_else(|| BondError::invalid_terms(ticker, format!("unrepresentable value {value}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn as_of() -> Date {
        Date::from_ymd(2025, 1, 15).unwrap()
    }

    /// Annual coupons at exact 365-day offsets from the valuation date.
    fn annual_coupons(amount: Decimal, years: u32) -> Vec<Coupon> {
        (1..=years)
            .map(|y| Coupon::new(as_of().add_days(i64::from(y) * 365), amount))
            .collect()
    }

    fn terms(clean_price: Decimal, accrued: Decimal, maturity_years: u32) -> BondTerms {
        BondTerms {
            name: "Test Issuer".to_string(),
            ticker: "TEST01".to_string(),
            sector_code: "financial".to_string(),
            maturity: as_of().add_days(i64::from(maturity_years) * 365),
            nominal: dec!(1000),
            accrued_interest: accrued,
            clean_price,
        }
    }

    #[test]
    fn test_three_year_discount_bond() {
        // Coupon 50 annually for 3 years, nominal 1000, dirty price 950.
        let record = BondRecord::new(
            terms(dec!(950), dec!(0), 3),
            annual_coupons(dec!(50), 3),
            as_of(),
        )
        .unwrap();

        assert!(record.ytm_pct > record.after_tax_ytm_pct);
        assert!(record.ytm_pct > -10.0 && record.ytm_pct < 10_000.0);
        assert!(record.after_tax_ytm_pct > -10.0 && record.after_tax_ytm_pct < 10_000.0);
        // Below par with a 5% coupon: pre-tax yield above the coupon rate.
        assert!(record.ytm_pct > 5.0);
        assert_eq!(record.dirty_price(), dec!(950));
        assert_eq!(record.sector, Sector::Financials);
    }

    #[test]
    fn test_past_coupons_excluded() {
        let mut coupons = annual_coupons(dec!(50), 2);
        coupons.push(Coupon::new(as_of().add_days(-100), dec!(50)));

        let record =
            BondRecord::new(terms(dec!(980), dec!(10), 2), coupons, as_of()).unwrap();

        assert_eq!(record.schedule.len(), 2);
    }

    #[test]
    fn test_zero_coupon_resolves() {
        let record = BondRecord::new(terms(dec!(900), dec!(0), 1), vec![], as_of()).unwrap();

        // 1000 / 900 over one exact year.
        assert!((record.ytm_pct - 100.0 / 9.0).abs() < 1e-2);
    }

    #[test]
    fn test_accrued_interest_counted_once_in_yields() {
        // Zero coupon, nominal 1000 one year out, clean 900 plus 50
        // accrued: the buyer pays 950 for the 1000 redemption.
        let record = BondRecord::new(terms(dec!(900), dec!(50), 1), vec![], as_of()).unwrap();

        assert!((record.ytm_pct - 100.0 * (1000.0 / 950.0 - 1.0)).abs() < 1e-2);
        // Gain 50 taxed at 13%: 993.5 net redemption against the same 950.
        assert!((record.after_tax_ytm_pct - 100.0 * (993.5 / 950.0 - 1.0)).abs() < 1e-2);
        assert!(record.after_tax_ytm_pct < record.ytm_pct);
    }

    #[test]
    fn test_matured_bond_rejected() {
        let mut t = terms(dec!(950), dec!(0), 1);
        t.maturity = as_of();

        let result = BondRecord::new(t, vec![], as_of());

        assert!(matches!(result, Err(BondError::Matured { .. })));
    }

    #[test]
    fn test_invalid_terms_rejected() {
        let mut t = terms(dec!(950), dec!(0), 1);
        t.nominal = dec!(0);
        assert!(matches!(
            BondRecord::new(t, vec![], as_of()),
            Err(BondError::InvalidTerms { .. })
        ));

        let mut t = terms(dec!(950), dec!(0), 1);
        t.accrued_interest = dec!(-1);
        assert!(matches!(
            BondRecord::new(t, vec![], as_of()),
            Err(BondError::InvalidTerms { .. })
        ));
    }

    #[test]
    fn test_dirty_price_includes_accrued() {
        let record = BondRecord::new(
            terms(dec!(950), dec!(20), 2),
            annual_coupons(dec!(50), 2),
            as_of(),
        )
        .unwrap();

        assert_eq!(record.dirty_price(), dec!(970));
    }
}
