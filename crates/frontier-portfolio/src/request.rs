//! Portfolio construction requests.

use frontier_core::types::RiskTier;
use serde::{Deserialize, Serialize};

use crate::error::{PortfolioError, PortfolioResult};

/// What a caller asks for: capital, a risk tier, and an optional cap on the
/// number of distinct instruments.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PortfolioRequest {
    /// Capital to invest, in currency units.
    pub capital: f64,
    /// Risk tolerance; fixes the return target and bond assumptions.
    pub risk: RiskTier,
    /// Upper bound on distinct instruments across both asset classes.
    ///
    /// `None` leaves instrument count to the allocator.
    pub max_instruments: Option<usize>,
}

impl PortfolioRequest {
    /// Creates a request.
    #[must_use]
    pub fn new(capital: f64, risk: RiskTier) -> Self {
        Self {
            capital,
            risk,
            max_instruments: None,
        }
    }

    /// Caps the number of distinct instruments.
    #[must_use]
    pub fn with_max_instruments(mut self, max_instruments: usize) -> Self {
        self.max_instruments = Some(max_instruments);
        self
    }

    /// Validates the request fields.
    ///
    /// # Errors
    ///
    /// [`PortfolioError::InvalidRequest`] if the capital is not a positive
    /// finite amount.
    pub fn validate(&self) -> PortfolioResult<()> {
        if !self.capital.is_finite() || self.capital <= 0.0 {
            return Err(PortfolioError::invalid_request(format!(
                "capital must be positive and finite, got {}",
                self.capital
            )));
        }
        Ok(())
    }

    /// Splits the instrument cap into `(max_stocks, max_bonds)`.
    ///
    /// Stocks get the floor half, bonds the remainder; an uncapped request
    /// places no limit on either class.
    #[must_use]
    pub fn instrument_limits(&self) -> (usize, usize) {
        match self.max_instruments {
            Some(max) => {
                let max_stocks = max / 2;
                (max_stocks, max - max_stocks)
            }
            None => (usize::MAX, usize::MAX),
        }
    }
}
