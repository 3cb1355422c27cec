//! Error types for return statistics.

use frontier_core::types::Date;
use thiserror::Error;

/// A specialized Result type for statistics operations.
pub type StatsResult<T> = Result<T, StatsError>;

/// Errors that can occur while building price tables or return statistics.
///
/// Every variant here is a data-integrity failure: the inputs violate a
/// structural invariant and continuing would produce silently wrong
/// financial output, so these abort the request rather than being patched
/// over.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    /// The price table has no tickers.
    #[error("Price table has no tickers")]
    EmptyTable,

    /// A ticker has no price observations at all.
    #[error("Empty price history for '{ticker}'")]
    EmptyHistory {
        /// The ticker with no data.
        ticker: String,
    },

    /// A ticker has fewer valid observations than required.
    #[error("Insufficient history for '{ticker}': need at least {required} observations, got {actual}")]
    InsufficientHistory {
        /// The offending ticker.
        ticker: String,
        /// Minimum required observations.
        required: usize,
        /// Actual valid observations.
        actual: usize,
    },

    /// Two tickers share fewer than two overlapping observations.
    #[error("Insufficient overlap between '{ticker_a}' and '{ticker_b}'")]
    InsufficientOverlap {
        /// First ticker of the pair.
        ticker_a: String,
        /// Second ticker of the pair.
        ticker_b: String,
    },

    /// Price series dates are not strictly increasing.
    #[error("Dates for '{ticker}' not strictly increasing at {date}")]
    NonIncreasingDates {
        /// The offending ticker.
        ticker: String,
        /// The date at which ordering breaks.
        date: Date,
    },

    /// A price observation is non-positive or non-finite.
    #[error("Invalid price for '{ticker}' at {date}: {value}")]
    InvalidPrice {
        /// The offending ticker.
        ticker: String,
        /// The observation date.
        date: Date,
        /// The invalid value.
        value: f64,
    },

    /// The same ticker appears twice in one table.
    #[error("Duplicate ticker '{ticker}'")]
    DuplicateTicker {
        /// The duplicated ticker.
        ticker: String,
    },

    /// A ticker's normalized returns have zero variance.
    #[error("Zero return variance for '{ticker}': correlation undefined")]
    ZeroVariance {
        /// The offending ticker.
        ticker: String,
    },

    /// A derived matrix violates a structural invariant.
    #[error("Statistics integrity violation: {check}")]
    IntegrityViolation {
        /// Which invariant check failed.
        check: String,
    },
}
