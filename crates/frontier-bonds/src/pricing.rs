//! Present value and yield-to-maturity.
//!
//! Discounting uses an annualized nominal rate quoted in percent and
//! ACT/365F year fractions:
//!
//! ```text
//! D(payment, t) = payment * (1 / (1 + rate_pct / 100)) ^ (days(t) / 365)
//! ```
//!
//! The pre-tax present value of a bond is the discounted nominal plus all
//! discounted future coupons, minus accrued interest (already owed to the
//! seller). The after-tax variant withholds a fixed tax on every coupon and
//! on the redemption capital gain, if any.
//!
//! PV is strictly decreasing in the rate, so the yield solve brackets the
//! clean price between a deeply negative and an absurdly high rate and
//! bisects; since PV already nets out accrued interest, equating it to the
//! clean price makes the discounted cash flows equal the dirty price the
//! buyer actually pays. The bracket width and tolerance bound the solve at
//! about 24 iterations regardless of the instrument.

use frontier_math::{bisection, MathResult, SolverConfig};

/// Withholding tax applied to coupon income and redemption gains, percent.
pub const TAX_RATE_PCT: f64 = 13.0;

/// Search floor for the yield solve, percent.
pub const RATE_LOWER_BOUND_PCT: f64 = -10.0;

/// Search ceiling for the yield solve, percent.
pub const RATE_UPPER_BOUND_PCT: f64 = 10_000.0;

/// Bracket-width tolerance for the yield solve, percentage points.
pub const RATE_EPS_PCT: f64 = 0.001;

/// Result of a yield solve.
#[derive(Debug, Clone, Copy)]
pub struct YieldResult {
    /// The solved yield, in percent.
    pub yield_pct: f64,
    /// Bisection iterations used.
    pub iterations: u32,
}

/// A bond's cash flows resolved into solver space.
///
/// Year fractions are computed once at construction; the present-value
/// functions are then pure `f64` and cheap enough to evaluate dozens of
/// times inside the bisection loop.
#[derive(Debug, Clone)]
pub(crate) struct CashflowTimeline {
    /// Future coupons as `(year_fraction, amount)` pairs.
    coupons: Vec<(f64, f64)>,
    nominal: f64,
    maturity_years: f64,
    accrued: f64,
    dirty_price: f64,
}

impl CashflowTimeline {
    pub(crate) fn new(
        coupons: Vec<(f64, f64)>,
        nominal: f64,
        maturity_years: f64,
        accrued: f64,
        dirty_price: f64,
    ) -> Self {
        Self {
            coupons,
            nominal,
            maturity_years,
            accrued,
            dirty_price,
        }
    }

    pub(crate) fn dirty_price(&self) -> f64 {
        self.dirty_price
    }

    /// The yield solve target: PV nets accrued, so matching the clean
    /// price equates discounted cash flows with the dirty price.
    pub(crate) fn clean_price(&self) -> f64 {
        self.dirty_price - self.accrued
    }

    fn discount(payment: f64, years: f64, rate_pct: f64) -> f64 {
        let factor = 1.0 / (1.0 + rate_pct / 100.0);
        payment * factor.powf(years)
    }

    /// Pre-tax present value at the given rate.
    ///
    /// `D(nominal) - accrued + sum D(coupon)`
    pub(crate) fn present_value(&self, rate_pct: f64) -> f64 {
        let mut value = Self::discount(self.nominal, self.maturity_years, rate_pct) - self.accrued;
        for &(years, amount) in &self.coupons {
            value += Self::discount(amount, years, rate_pct);
        }
        value
    }

    /// After-tax present value at the given rate.
    ///
    /// `D(nominal) - accrued + (1 - tax) * sum D(coupon)
    ///  - tax * D(max(0, nominal - dirty_price))`
    pub(crate) fn after_tax_present_value(&self, rate_pct: f64) -> f64 {
        let tax = TAX_RATE_PCT / 100.0;
        let mut value = -self.accrued;
        for &(years, amount) in &self.coupons {
            value += (1.0 - tax) * Self::discount(amount, years, rate_pct);
        }
        value += Self::discount(self.nominal, self.maturity_years, rate_pct);
        let redemption_gain = (self.nominal - self.dirty_price).max(0.0);
        value -= Self::discount(tax * redemption_gain, self.maturity_years, rate_pct);
        value
    }
}

/// Yield-to-maturity solver.
///
/// Bisects `PV(rate) - clean_price` over a bounded rate domain. The domain
/// is wide enough for any instrument the upstream eligibility filter lets
/// through; a bond whose price cannot be matched inside it is a data
/// error, surfaced as a solver failure.
#[derive(Debug, Clone, Copy)]
pub struct YieldSolver {
    lower_bound_pct: f64,
    upper_bound_pct: f64,
    eps_pct: f64,
}

impl Default for YieldSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl YieldSolver {
    /// Creates a solver with the default domain `[-10%, 10000%]` and
    /// tolerance of 0.001 percentage points.
    #[must_use]
    pub fn new() -> Self {
        Self {
            lower_bound_pct: RATE_LOWER_BOUND_PCT,
            upper_bound_pct: RATE_UPPER_BOUND_PCT,
            eps_pct: RATE_EPS_PCT,
        }
    }

    /// Sets the search domain, in percent.
    #[must_use]
    pub fn with_bounds(mut self, lower_pct: f64, upper_pct: f64) -> Self {
        self.lower_bound_pct = lower_pct;
        self.upper_bound_pct = upper_pct;
        self
    }

    /// Sets the bracket-width tolerance, in percentage points.
    #[must_use]
    pub fn with_tolerance(mut self, eps_pct: f64) -> Self {
        self.eps_pct = eps_pct;
        self
    }

    /// Solves `present_value(rate) == target` for the rate, in percent.
    pub fn solve<F>(&self, present_value: F, target: f64) -> MathResult<YieldResult>
    where
        F: Fn(f64) -> f64,
    {
        let config = SolverConfig::new(self.eps_pct, 64);
        let result = bisection(
            |rate_pct| present_value(rate_pct) - target,
            self.lower_bound_pct,
            self.upper_bound_pct,
            &config,
        )?;
        Ok(YieldResult {
            yield_pct: result.root,
            iterations: result.iterations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// 3-year bond, nominal 1000, annual coupon 50, no accrued interest.
    fn three_year_bond(dirty_price: f64) -> CashflowTimeline {
        CashflowTimeline::new(
            vec![(1.0, 50.0), (2.0, 50.0), (3.0, 50.0)],
            1000.0,
            3.0,
            0.0,
            dirty_price,
        )
    }

    #[test]
    fn test_present_value_at_zero_rate() {
        let bond = three_year_bond(950.0);
        // At 0% every cash flow is worth face value.
        assert_relative_eq!(bond.present_value(0.0), 1150.0, epsilon = 1e-9);
    }

    #[test]
    fn test_present_value_decreasing_in_rate() {
        let bond = three_year_bond(950.0);
        let mut previous = bond.present_value(-5.0);
        for rate in [0.0, 5.0, 10.0, 50.0, 100.0, 1000.0] {
            let value = bond.present_value(rate);
            assert!(value < previous, "PV must decrease as rate rises");
            previous = value;
        }
    }

    #[test]
    fn test_par_bond_yields_coupon_rate() {
        // Coupon 6% paid at whole-year offsets, price = nominal: YTM = 6%.
        let bond = CashflowTimeline::new(
            vec![(1.0, 60.0), (2.0, 60.0), (3.0, 60.0)],
            1000.0,
            3.0,
            0.0,
            1000.0,
        );

        let result = YieldSolver::new()
            .solve(|r| bond.present_value(r), 1000.0)
            .unwrap();

        assert_relative_eq!(result.yield_pct, 6.0, epsilon = 1e-3);
    }

    #[test]
    fn test_discount_bond_residual() {
        let bond = three_year_bond(950.0);

        let result = YieldSolver::new()
            .solve(|r| bond.present_value(r), 950.0)
            .unwrap();

        // Discount bond: yield above the 5% coupon rate.
        assert!(result.yield_pct > 5.0);
        // PV at the solved yield matches the dirty price to within a cent.
        assert!((bond.present_value(result.yield_pct) - 950.0).abs() < 0.01);
    }

    #[test]
    fn test_zero_coupon_bond() {
        // 1000 nominal, one year out, priced at 900: yield = 1000/900 - 1.
        let bond = CashflowTimeline::new(vec![], 1000.0, 1.0, 0.0, 900.0);

        let result = YieldSolver::new()
            .solve(|r| bond.present_value(r), 900.0)
            .unwrap();

        assert_relative_eq!(result.yield_pct, 100.0 / 9.0, epsilon = 1e-3);
    }

    #[test]
    fn test_yield_solve_targets_clean_price() {
        // Nominal 1000 one year out, accrued 50, dirty 950: the solved
        // yield discounts the redemption to the 950 actually paid.
        let bond = CashflowTimeline::new(vec![], 1000.0, 1.0, 50.0, 950.0);

        let result = YieldSolver::new()
            .solve(|r| bond.present_value(r), bond.clean_price())
            .unwrap();

        assert_relative_eq!(result.yield_pct, 100.0 * (1000.0 / 950.0 - 1.0), epsilon = 1e-3);
        assert!((bond.present_value(result.yield_pct) - bond.clean_price()).abs() < 0.01);
    }

    #[test]
    fn test_after_tax_below_pre_tax() {
        let bond = three_year_bond(950.0);

        let pre = YieldSolver::new()
            .solve(|r| bond.present_value(r), 950.0)
            .unwrap();
        let post = YieldSolver::new()
            .solve(|r| bond.after_tax_present_value(r), 950.0)
            .unwrap();

        // Tax strictly reduces realized coupon and gain value.
        assert!(pre.yield_pct > post.yield_pct);
        assert!(pre.yield_pct > RATE_LOWER_BOUND_PCT && pre.yield_pct < RATE_UPPER_BOUND_PCT);
        assert!(post.yield_pct > RATE_LOWER_BOUND_PCT && post.yield_pct < RATE_UPPER_BOUND_PCT);
    }

    #[test]
    fn test_after_tax_premium_bond_has_no_gain_tax() {
        // Dirty price above nominal: the capital-gain term is floored at
        // zero, only coupons are taxed.
        let bond = CashflowTimeline::new(vec![(1.0, 80.0)], 1000.0, 1.0, 0.0, 1050.0);

        let tax = TAX_RATE_PCT / 100.0;
        let expected = CashflowTimeline::discount(1000.0, 1.0, 5.0)
            + (1.0 - tax) * CashflowTimeline::discount(80.0, 1.0, 5.0);
        assert_relative_eq!(bond.after_tax_present_value(5.0), expected, epsilon = 1e-9);
    }

    #[test]
    fn test_accrued_interest_offsets_value() {
        let without = three_year_bond(950.0);
        let with = CashflowTimeline::new(
            vec![(1.0, 50.0), (2.0, 50.0), (3.0, 50.0)],
            1000.0,
            3.0,
            20.0,
            970.0,
        );

        assert_relative_eq!(
            with.present_value(7.0),
            without.present_value(7.0) - 20.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_solver_iteration_budget() {
        let bond = three_year_bond(950.0);
        let result = YieldSolver::new()
            .solve(|r| bond.present_value(r), 950.0)
            .unwrap();
        // ceil(log2(10010 / 0.001)) = 24
        assert!(result.iterations <= 24);
    }
}
