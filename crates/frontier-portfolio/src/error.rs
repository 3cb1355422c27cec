//! Error types for portfolio construction.

use frontier_bonds::BondError;
use frontier_math::MathError;
use frontier_stats::error::StatsError;
use thiserror::Error;

/// A specialized Result type for portfolio operations.
pub type PortfolioResult<T> = Result<T, PortfolioError>;

/// Errors that can occur while constructing a portfolio.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PortfolioError {
    /// Market statistics are missing, corrupt, or too shallow.
    #[error("Market statistics error")]
    Statistics(#[from] StatsError),

    /// A bond in the snapshot failed valuation.
    #[error("Bond valuation error")]
    Bond(#[from] BondError),

    /// The tier's return target cannot be met with the current universe.
    ///
    /// Reported with the parameters that were attempted, so the caller can
    /// see which contract the market data could not honor. This is an
    /// expected outcome for aggressive tiers over defensive universes, not
    /// a defect.
    #[error(
        "Cannot reach a {target_annual_pct}% annual return with {n_assets} equities \
         and a bond at {bond_return_pct}% (std {bond_std_pct}%)"
    )]
    InfeasibleTarget {
        /// The annualized return target, percent.
        target_annual_pct: f64,
        /// Number of equities in the universe (excluding the bond asset).
        n_assets: usize,
        /// Assumed annual bond return, percent.
        bond_return_pct: f64,
        /// Assumed annual bond return standard deviation, percent.
        bond_std_pct: f64,
        /// The underlying solver error.
        #[source]
        source: MathError,
    },

    /// The request itself is malformed.
    #[error("Invalid portfolio request: {reason}")]
    InvalidRequest {
        /// What is wrong with the request.
        reason: String,
    },

    /// A ticker in the statistics has no matching instrument metadata.
    #[error("No instrument metadata for ticker '{ticker}'")]
    MissingEquityInfo {
        /// The orphaned ticker.
        ticker: String,
    },

    /// Optimizer output failed a post-solve verification check.
    ///
    /// Indicates a defect in the solver, never bad user input.
    #[error("Optimizer output failed verification: {check}")]
    VerificationFailed {
        /// The check that failed.
        check: String,
    },
}

impl PortfolioError {
    /// Creates an invalid request error.
    #[must_use]
    pub fn invalid_request(reason: impl Into<String>) -> Self {
        Self::InvalidRequest {
            reason: reason.into(),
        }
    }
}
