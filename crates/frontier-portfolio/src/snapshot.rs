//! Point-in-time view of the investable universe.

use std::collections::HashMap;

use frontier_bonds::BondRecord;
use frontier_stats::ReturnStatistics;
use serde::{Deserialize, Serialize};

use crate::error::{PortfolioError, PortfolioResult};

/// Exchange metadata for one equity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquityInfo {
    /// Issuer display name.
    pub name: String,
    /// Shares per exchange lot; purchases are whole lots only.
    pub lot: u32,
    /// Provider sector code.
    pub sector_code: String,
}

/// Everything portfolio construction needs about the market, frozen at one
/// valuation instant.
///
/// Built once per data refresh. Bonds are held sorted by descending
/// after-tax yield so allocation can take the best-yielding eligible bonds
/// by simple truncation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSnapshot {
    statistics: ReturnStatistics,
    equities: HashMap<String, EquityInfo>,
    bonds: Vec<BondRecord>,
}

impl MarketSnapshot {
    /// Builds a snapshot, checking that every statistics ticker has
    /// matching equity metadata.
    ///
    /// # Errors
    ///
    /// * [`PortfolioError::MissingEquityInfo`] if a ticker in the
    ///   statistics has no metadata entry
    /// * [`PortfolioError::InvalidRequest`] if a lot size is zero
    pub fn new(
        statistics: ReturnStatistics,
        equities: HashMap<String, EquityInfo>,
        mut bonds: Vec<BondRecord>,
    ) -> PortfolioResult<Self> {
        for ticker in statistics.tickers() {
            let info = equities
                .get(ticker)
                .ok_or_else(|| PortfolioError::MissingEquityInfo {
                    ticker: ticker.clone(),
                })?;
            if info.lot == 0 {
                return Err(PortfolioError::invalid_request(format!(
                    "zero lot size for ticker '{ticker}'"
                )));
            }
        }

        // Solved yields are always finite, so the ordering is total.
        bonds.sort_by(|a, b| {
            b.after_tax_ytm_pct
                .partial_cmp(&a.after_tax_ytm_pct)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        tracing::debug!(
            n_equities = statistics.n_assets(),
            n_bonds = bonds.len(),
            "Market snapshot assembled"
        );

        Ok(Self {
            statistics,
            equities,
            bonds,
        })
    }

    /// Return statistics of the equity universe.
    #[must_use]
    pub fn statistics(&self) -> &ReturnStatistics {
        &self.statistics
    }

    /// Metadata for one equity, if known.
    #[must_use]
    pub fn equity(&self, ticker: &str) -> Option<&EquityInfo> {
        self.equities.get(ticker)
    }

    /// Bonds, sorted by descending after-tax yield.
    #[must_use]
    pub fn bonds(&self) -> &[BondRecord] {
        &self.bonds
    }
}
