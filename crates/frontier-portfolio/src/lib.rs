//! # Frontier Portfolio
//!
//! Portfolio construction for the Frontier library: mean-variance
//! optimization over a bond-augmented equity universe, followed by
//! discrete allocation into exchange lots and bond units.
//!
//! The public entry point is [`build_portfolio`]:
//!
//! ```rust,ignore
//! let snapshot = MarketSnapshot::new(statistics, equities, bonds)?;
//! let request = PortfolioRequest::new(100_000.0, RiskTier::Medium);
//! let portfolio = build_portfolio(&snapshot, &request)?;
//! ```
//!
//! Construction is a pure function of the snapshot and the request; the
//! snapshot is immutable and safe to share across concurrent calls.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::unreadable_literal)]

pub mod allocator;
mod builder;
pub mod error;
pub mod optimizer;
pub mod portfolio;
pub mod request;
pub mod snapshot;
pub mod weights;

pub use allocator::DiscreteAllocator;
pub use builder::build_portfolio;
pub use error::{PortfolioError, PortfolioResult};
pub use optimizer::{BondAssumptions, MeanVarianceOptimizer};
pub use portfolio::{BondPosition, Portfolio, StockPosition};
pub use request::PortfolioRequest;
pub use snapshot::{EquityInfo, MarketSnapshot};
pub use weights::Weights;
