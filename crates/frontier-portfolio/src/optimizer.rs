//! Mean-variance optimization over the bond-augmented universe.
//!
//! The fixed-income share enters the Markowitz program as one synthetic
//! asset with tier-calibrated annual return and volatility, placed first in
//! the augmented universe. Annual percentages are brought onto the daily
//! scale of the return statistics before solving:
//!
//! ```text
//! daily mean = annual_pct / 252 / 100
//! daily std  = annual_pct / 100 / sqrt(252)
//! ```
//!
//! Simple division, not geometric compounding; the same convention the
//! statistics use for gap normalization.

use frontier_core::types::{RiskTier, BOND_EQUITY_CORRELATION};
use frontier_math::{MathError, TargetReturnQp};
use frontier_stats::{ReturnStatistics, TRADING_DAYS_PER_YEAR};
use nalgebra::{DMatrix, DVector};

use crate::error::{PortfolioError, PortfolioResult};
use crate::weights::Weights;

/// Converts an annualized return in percent to a mean daily return.
#[must_use]
pub fn daily_mean_from_annual_pct(annual_pct: f64) -> f64 {
    annual_pct / TRADING_DAYS_PER_YEAR as f64 / 100.0
}

/// Converts an annualized return standard deviation in percent to a daily
/// standard deviation.
#[must_use]
pub fn daily_std_from_annual_pct(annual_pct: f64) -> f64 {
    annual_pct / 100.0 / (TRADING_DAYS_PER_YEAR as f64).sqrt()
}

/// The synthetic bond asset the optimizer blends with equities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BondAssumptions {
    /// Assumed annual return, percent.
    pub annual_return_pct: f64,
    /// Assumed annual return standard deviation, percent.
    pub annual_std_pct: f64,
    /// Assumed correlation with every equity.
    pub equity_correlation: f64,
}

impl BondAssumptions {
    /// The calibrated assumptions for a risk tier.
    #[must_use]
    pub fn for_tier(tier: RiskTier) -> Self {
        Self {
            annual_return_pct: tier.bond_return_pct(),
            annual_std_pct: tier.bond_std_pct(),
            equity_correlation: BOND_EQUITY_CORRELATION,
        }
    }
}

/// Minimum-variance weight solver for a fixed annual return target.
#[derive(Debug, Clone, Default)]
pub struct MeanVarianceOptimizer {
    qp: TargetReturnQp,
}

impl MeanVarianceOptimizer {
    /// Creates an optimizer with default solver configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Solves for portfolio weights hitting `target_annual_pct` with
    /// minimum variance.
    ///
    /// The universe is the synthetic bond asset plus every equity in the
    /// statistics. Tiny negative weights from the solver are clipped to
    /// zero without renormalizing; the result is then verified against the
    /// budget, box, and return constraints.
    ///
    /// # Errors
    ///
    /// * [`PortfolioError::InvalidRequest`] for malformed bond assumptions
    /// * [`PortfolioError::InfeasibleTarget`] if the solver cannot meet the
    ///   target with this universe
    /// * [`PortfolioError::VerificationFailed`] if the solver produced
    ///   weights violating a constraint it was supposed to enforce
    pub fn optimize(
        &self,
        statistics: &ReturnStatistics,
        bond: &BondAssumptions,
        target_annual_pct: f64,
    ) -> PortfolioResult<Weights> {
        if !bond.annual_std_pct.is_finite() || bond.annual_std_pct < 0.0 {
            return Err(PortfolioError::invalid_request(format!(
                "bond std must be non-negative, got {}",
                bond.annual_std_pct
            )));
        }
        if !(-1.0..=1.0).contains(&bond.equity_correlation) {
            return Err(PortfolioError::invalid_request(format!(
                "bond correlation must lie in [-1, 1], got {}",
                bond.equity_correlation
            )));
        }

        let n = statistics.n_assets();
        let m = n + 1;
        let target = daily_mean_from_annual_pct(target_annual_pct);
        let bond_mean = daily_mean_from_annual_pct(bond.annual_return_pct);
        let bond_std = daily_std_from_annual_pct(bond.annual_std_pct);

        let mut returns = DVector::<f64>::zeros(m);
        returns[0] = bond_mean;
        for (i, &mean) in statistics.mean_returns().iter().enumerate() {
            returns[i + 1] = mean;
        }

        let mut covariance = DMatrix::<f64>::zeros(m, m);
        covariance[(0, 0)] = bond_std * bond_std;
        for (i, &std) in statistics.std_returns().iter().enumerate() {
            let cross = bond.equity_correlation * bond_std * std;
            covariance[(0, i + 1)] = cross;
            covariance[(i + 1, 0)] = cross;
        }
        for i in 0..n {
            for j in 0..n {
                covariance[(i + 1, j + 1)] = statistics.covariance()[(i, j)];
            }
        }

        let solution = self
            .qp
            .solve(&covariance, &returns, target)
            .map_err(|source| self.infeasible(bond, target_annual_pct, n, source))?;

        // Clip solver noise below zero; never renormalize, the verification
        // below decides whether the distortion is tolerable.
        let weights: Vec<f64> = solution.weights.iter().map(|w| w.max(0.0)).collect();
        self.verify(&weights, &returns, target)?;

        tracing::debug!(
            n_assets = n,
            target_annual_pct,
            bond_weight = weights[0],
            iterations = solution.iterations,
            "Mean-variance weights solved"
        );

        let equities = statistics
            .tickers()
            .iter()
            .zip(weights[1..].iter())
            .map(|(ticker, &w)| (ticker.clone(), w))
            .collect();
        Ok(Weights::new(weights[0], equities))
    }

    fn infeasible(
        &self,
        bond: &BondAssumptions,
        target_annual_pct: f64,
        n_assets: usize,
        source: MathError,
    ) -> PortfolioError {
        PortfolioError::InfeasibleTarget {
            target_annual_pct,
            n_assets,
            bond_return_pct: bond.annual_return_pct,
            bond_std_pct: bond.annual_std_pct,
            source,
        }
    }

    /// Post-solve constraint verification.
    fn verify(&self, weights: &[f64], returns: &DVector<f64>, target: f64) -> PortfolioResult<()> {
        let tol = 1e-6;
        let sum: f64 = weights.iter().sum();
        if (sum - 1.0).abs() > tol {
            return Err(PortfolioError::VerificationFailed {
                check: format!("weights sum to {sum}, expected 1"),
            });
        }
        for (i, &w) in weights.iter().enumerate() {
            if !(0.0..=1.0 + tol).contains(&w) {
                return Err(PortfolioError::VerificationFailed {
                    check: format!("weight {w} at index {i} outside [0, 1]"),
                });
            }
        }
        let achieved: f64 = weights
            .iter()
            .zip(returns.iter())
            .map(|(w, r)| w * r)
            .sum();
        if (achieved - target).abs() > tol {
            return Err(PortfolioError::VerificationFailed {
                check: format!("achieved return {achieved}, target {target}"),
            });
        }
        Ok(())
    }
}
