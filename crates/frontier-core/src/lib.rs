//! # Frontier Core
//!
//! Core types shared across the Frontier portfolio construction library.
//!
//! This crate provides the foundational building blocks used throughout
//! Frontier:
//!
//! - **Dates**: a financial [`types::Date`] newtype over `chrono::NaiveDate`
//! - **Risk tiers**: the user-facing risk categories and their calibration
//!   constants
//! - **Sectors**: the fixed sector vocabulary positions are reported under
//!
//! ## Design Philosophy
//!
//! - **Type Safety**: newtypes and enums prevent mixing incompatible values
//! - **Immutable Snapshots**: derived data is computed once at construction
//! - **Explicit Over Implicit**: calibration constants live on the types that
//!   own them, not in free-floating tables

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::unreadable_literal)]

pub mod error;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::types::{Date, RiskTier, Sector, YieldBand};
}

pub use error::{CoreError, CoreResult};
pub use types::{Date, RiskTier, Sector, YieldBand};
