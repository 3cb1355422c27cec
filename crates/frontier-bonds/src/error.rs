//! Error types for bond valuation.

use frontier_core::types::Date;
use frontier_math::MathError;
use thiserror::Error;

/// A specialized Result type for bond operations.
pub type BondResult<T> = Result<T, BondError>;

/// Errors that can occur during bond valuation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BondError {
    /// The bond terms fail basic validation.
    #[error("Invalid bond terms for '{ticker}': {reason}")]
    InvalidTerms {
        /// The offending bond's ticker.
        ticker: String,
        /// What is wrong with the terms.
        reason: String,
    },

    /// The bond matured on or before the valuation date.
    #[error("Bond '{ticker}' matured {maturity}, on or before valuation date {as_of}")]
    Matured {
        /// The offending bond's ticker.
        ticker: String,
        /// The maturity date.
        maturity: Date,
        /// The valuation date.
        as_of: Date,
    },

    /// The yield solve failed.
    #[error("Yield solve failed for '{ticker}'")]
    YieldSolve {
        /// The offending bond's ticker.
        ticker: String,
        /// The underlying solver error.
        #[source]
        source: MathError,
    },
}

impl BondError {
    /// Creates an invalid terms error.
    #[must_use]
    pub fn invalid_terms(ticker: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTerms {
            ticker: ticker.into(),
            reason: reason.into(),
        }
    }
}
