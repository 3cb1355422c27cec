//! Core domain types.

mod date;
mod risk;
mod sector;

pub use date::{Date, DAYS_PER_YEAR};
pub use risk::{RiskTier, YieldBand, BOND_EQUITY_CORRELATION};
pub use sector::Sector;
