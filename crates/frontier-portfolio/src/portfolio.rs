//! Constructed portfolios and their positions.

use frontier_core::types::Sector;
use serde::{Deserialize, Serialize};

/// A purchased equity position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockPosition {
    /// Exchange ticker.
    pub ticker: String,
    /// Issuer display name.
    pub name: String,
    /// Issuer sector.
    pub sector: Sector,
    /// Shares purchased; always a whole multiple of the lot size.
    pub quantity: u64,
    /// Shares per exchange lot.
    pub lot: u32,
    /// Price per share at allocation time.
    pub price: f64,
    /// Invested amount, `quantity * price`.
    pub value: f64,
    /// Share of the equity class value.
    pub weight: f64,
}

/// A purchased bond position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BondPosition {
    /// Exchange ticker.
    pub ticker: String,
    /// Issuer display name.
    pub name: String,
    /// Issuer sector.
    pub sector: Sector,
    /// Units purchased.
    pub quantity: u64,
    /// Dirty price per unit at allocation time.
    pub dirty_price: f64,
    /// After-tax yield to maturity, percent.
    pub after_tax_ytm_pct: f64,
    /// Invested amount, `quantity * dirty_price`.
    pub value: f64,
    /// Share of the bond class value.
    pub weight: f64,
}

/// A fully constructed portfolio.
///
/// Invariants, checked by the allocator's tests rather than at runtime:
/// invested value never exceeds capital, leftover cash is non-negative,
/// and `stocks_value() + bonds_value() + leftover == total_capital`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    /// Capital the request asked to invest.
    pub total_capital: f64,
    /// Equity positions, grouped by sector.
    pub stocks: Vec<StockPosition>,
    /// Bond positions, grouped by sector.
    pub bonds: Vec<BondPosition>,
    /// Uninvested remainder.
    pub leftover: f64,
}

impl Portfolio {
    /// Assembles a portfolio from raw positions.
    ///
    /// Fills per-class weights from invested values, computes the
    /// leftover, and groups positions by sector (tickers ordered within
    /// each sector).
    pub(crate) fn assemble(
        total_capital: f64,
        mut stocks: Vec<StockPosition>,
        mut bonds: Vec<BondPosition>,
    ) -> Self {
        let stocks_value: f64 = stocks.iter().map(|p| p.value).sum();
        let bonds_value: f64 = bonds.iter().map(|p| p.value).sum();

        if stocks_value > 0.0 {
            for position in &mut stocks {
                position.weight = position.value / stocks_value;
            }
        }
        if bonds_value > 0.0 {
            for position in &mut bonds {
                position.weight = position.value / bonds_value;
            }
        }

        stocks.sort_by(|a, b| (a.sector, &a.ticker).cmp(&(b.sector, &b.ticker)));
        bonds.sort_by(|a, b| (a.sector, &a.ticker).cmp(&(b.sector, &b.ticker)));

        let leftover = total_capital - stocks_value - bonds_value;
        debug_assert!(leftover >= -1e-6, "allocation overspent the capital");

        Self {
            total_capital,
            stocks,
            bonds,
            leftover,
        }
    }

    /// Total invested in equities.
    #[must_use]
    pub fn stocks_value(&self) -> f64 {
        self.stocks.iter().map(|p| p.value).sum()
    }

    /// Total invested in bonds.
    #[must_use]
    pub fn bonds_value(&self) -> f64 {
        self.bonds.iter().map(|p| p.value).sum()
    }

    /// Total invested across both classes.
    #[must_use]
    pub fn invested(&self) -> f64 {
        self.stocks_value() + self.bonds_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn stock(ticker: &str, sector: Sector, value: f64) -> StockPosition {
        StockPosition {
            ticker: ticker.to_string(),
            name: ticker.to_string(),
            sector,
            quantity: 1,
            lot: 1,
            price: value,
            value,
            weight: 0.0,
        }
    }

    #[test]
    fn test_assemble_weights_and_leftover() {
        let portfolio = Portfolio::assemble(
            1000.0,
            vec![
                stock("AAA", Sector::Energy, 300.0),
                stock("BBB", Sector::Consumer, 300.0),
            ],
            vec![],
        );

        assert_relative_eq!(portfolio.leftover, 400.0, epsilon = 1e-9);
        for position in &portfolio.stocks {
            assert_relative_eq!(position.weight, 0.5, epsilon = 1e-12);
        }
        // Grouped by sector: Consumer sorts before Energy.
        assert_eq!(portfolio.stocks[0].ticker, "BBB");
    }

    #[test]
    fn test_empty_portfolio_keeps_all_capital() {
        let portfolio = Portfolio::assemble(500.0, vec![], vec![]);
        assert_relative_eq!(portfolio.leftover, 500.0);
        assert_relative_eq!(portfolio.invested(), 0.0);
    }
}
