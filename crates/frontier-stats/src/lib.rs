//! # Frontier Stats
//!
//! Return statistics from daily close price tables.
//!
//! This crate turns a ragged table of daily closes (one column per ticker,
//! missing values where an instrument did not trade) into the immutable
//! [`ReturnStatistics`] snapshot the optimizer consumes: per-ticker mean and
//! standard deviation of gap-normalized returns, the full covariance and
//! correlation matrices, and last observed prices.
//!
//! ## Gap normalization
//!
//! Illiquid tickers skip trading days. A naive period return over a
//! three-day gap would overstate short-interval volatility, so every simple
//! return is divided by the number of **calendar days** it spans before any
//! moment is computed. The same convention must be applied by anyone
//! converting annual figures to per-day figures for comparison against
//! these statistics.
//!
//! ## Snapshot semantics
//!
//! [`ReturnStatistics`] is computed once per data refresh and is immutable
//! afterwards; it is safe to share by reference across concurrent
//! portfolio-construction calls.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::unreadable_literal)]

pub mod error;
mod returns;
pub mod statistics;
pub mod table;

pub use error::{StatsError, StatsResult};
pub use statistics::{ReturnStatistics, StatisticsConfig, TRADING_DAYS_PER_YEAR};
pub use table::PriceTable;
