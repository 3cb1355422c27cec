//! # Frontier Bonds
//!
//! Bond valuation for the Frontier portfolio construction library.
//!
//! A [`BondRecord`] is built once per data refresh from instrument terms, a
//! coupon schedule, and the latest traded price, and is immutable
//! afterwards. Construction resolves both yield figures - pre-tax and
//! after-tax - by bisection on the present-value function; nothing
//! downstream ever re-derives them.
//!
//! Money enters this crate as `rust_decimal::Decimal` (exact at the data
//! boundary) and is converted once into `f64` for solver space, following
//! the same split the rest of the library uses.
//!
//! ## Eligibility is upstream's problem
//!
//! The data collaborator pre-filters bonds to plain-vanilla eligibility
//! (fixed coupon, non-perpetual, non-amortizing, local currency, bounded
//! maturity). This crate trusts that filter and only validates what its own
//! math depends on: positive nominal and price, a non-matured instrument,
//! and no cash flow before the valuation date.

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

pub mod cashflows;
pub mod error;
pub mod pricing;
pub mod record;

pub use cashflows::{Coupon, CouponSchedule};
pub use error::{BondError, BondResult};
pub use pricing::{YieldResult, YieldSolver, TAX_RATE_PCT};
pub use record::{BondRecord, BondTerms};
