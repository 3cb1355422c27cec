//! Discrete allocation of capital into exchange lots and bond units.
//!
//! The optimizer's weights are continuous; exchanges sell whole lots. The
//! equity pass greedily drops the ticker whose ideal lot count is smallest
//! until every surviving ticker affords at least one whole lot (and the
//! instrument cap holds), redistributing freed weight proportionally.
//! Greedy elimination is deliberate: it is deterministic, explainable
//! position by position, and its rounding loss is bounded by one lot per
//! ticker, which is negligible at the capital levels this library targets.
//!
//! Whatever the equity pass leaves unspent, plus the bond share itself,
//! goes to bonds: the best-yielding eligible bonds are bought one unit at a
//! time in rotation until none is affordable.

use frontier_bonds::BondRecord;
use frontier_core::types::{Sector, YieldBand};
use rust_decimal::prelude::ToPrimitive;

use crate::error::{PortfolioError, PortfolioResult};
use crate::portfolio::{BondPosition, Portfolio, StockPosition};
use crate::request::PortfolioRequest;
use crate::snapshot::MarketSnapshot;
use crate::weights::Weights;

/// A surviving equity candidate during greedy elimination.
#[derive(Debug, Clone)]
struct Candidate {
    ticker: String,
    weight: f64,
    price: f64,
    lot: f64,
}

impl Candidate {
    /// Ideal (fractional) number of lots at the current weight.
    fn ideal_lots(&self, capital: f64) -> f64 {
        capital * self.weight / (self.price * self.lot)
    }
}

/// Turns continuous weights into whole-lot purchases.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscreteAllocator;

impl DiscreteAllocator {
    /// Creates an allocator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Allocates the request's capital according to `weights`.
    ///
    /// # Errors
    ///
    /// * [`PortfolioError::InvalidRequest`] for non-positive capital or a
    ///   weight ticker absent from the statistics
    /// * [`PortfolioError::MissingEquityInfo`] if a weighted ticker has no
    ///   instrument metadata
    pub fn allocate(
        &self,
        snapshot: &MarketSnapshot,
        weights: &Weights,
        request: &PortfolioRequest,
    ) -> PortfolioResult<Portfolio> {
        request.validate()?;
        let (max_stocks, max_bonds) = request.instrument_limits();

        let stocks = self.allocate_stocks(snapshot, weights, request.capital, max_stocks)?;
        let stocks_value: f64 = stocks.iter().map(|p| p.value).sum();

        // Everything equities did not consume is available to bonds; the
        // bond share of the weights is implicit in that remainder.
        let bond_capital = request.capital - stocks_value;
        let bonds = self.allocate_bonds(
            snapshot.bonds(),
            bond_capital,
            request.risk.bond_yield_band(),
            max_bonds,
        );

        let portfolio = Portfolio::assemble(request.capital, stocks, bonds);
        tracing::info!(
            capital = request.capital,
            risk = %request.risk,
            n_stocks = portfolio.stocks.len(),
            n_bonds = portfolio.bonds.len(),
            leftover = portfolio.leftover,
            "Portfolio allocated"
        );
        Ok(portfolio)
    }

    fn allocate_stocks(
        &self,
        snapshot: &MarketSnapshot,
        weights: &Weights,
        capital: f64,
        max_stocks: usize,
    ) -> PortfolioResult<Vec<StockPosition>> {
        let stats = snapshot.statistics();

        let mut candidates = Vec::new();
        for (ticker, weight) in weights.equities() {
            if *weight <= 0.0 {
                continue;
            }
            let index = stats.index_of(ticker).ok_or_else(|| {
                PortfolioError::invalid_request(format!(
                    "weighted ticker '{ticker}' absent from statistics"
                ))
            })?;
            let info = snapshot
                .equity(ticker)
                .ok_or_else(|| PortfolioError::MissingEquityInfo {
                    ticker: ticker.clone(),
                })?;
            candidates.push(Candidate {
                ticker: ticker.clone(),
                weight: *weight,
                price: stats.last_prices()[index],
                lot: f64::from(info.lot),
            });
        }

        // The equity share of the capital stays fixed; elimination only
        // redistributes it among the survivors.
        let target_sum: f64 = candidates.iter().map(|c| c.weight).sum();
        let initial = candidates.len();

        while !candidates.is_empty() {
            let affordable = candidates.iter().all(|c| c.ideal_lots(capital) >= 1.0);
            if affordable && candidates.len() <= max_stocks {
                break;
            }

            let mut weakest = 0;
            for (k, candidate) in candidates.iter().enumerate() {
                if candidate.ideal_lots(capital) < candidates[weakest].ideal_lots(capital) {
                    weakest = k;
                }
            }
            candidates.remove(weakest);

            let remaining: f64 = candidates.iter().map(|c| c.weight).sum();
            if remaining <= 0.0 {
                candidates.clear();
                break;
            }
            let scale = target_sum / remaining;
            for candidate in &mut candidates {
                candidate.weight *= scale;
            }
        }

        if initial > candidates.len() {
            tracing::debug!(
                eliminated = initial - candidates.len(),
                surviving = candidates.len(),
                "Equity candidates eliminated"
            );
        }

        let mut positions = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            // The loop above guarantees at least one whole lot.
            let lots = candidate.ideal_lots(capital).floor();
            let quantity = (lots * candidate.lot) as u64;
            let value = lots * candidate.lot * candidate.price;
            let info = snapshot
                .equity(&candidate.ticker)
                .ok_or_else(|| PortfolioError::MissingEquityInfo {
                    ticker: candidate.ticker.clone(),
                })?;
            positions.push(StockPosition {
                ticker: candidate.ticker,
                name: info.name.clone(),
                sector: Sector::from_code(&info.sector_code),
                quantity,
                lot: info.lot,
                price: candidate.price,
                value,
                weight: 0.0,
            });
        }
        Ok(positions)
    }

    fn allocate_bonds(
        &self,
        bonds: &[BondRecord],
        capital: f64,
        band: YieldBand,
        max_bonds: usize,
    ) -> Vec<BondPosition> {
        // Input is sorted by descending after-tax yield, so truncation
        // keeps the best-yielding eligible bonds.
        let eligible: Vec<&BondRecord> = bonds
            .iter()
            .filter(|b| band.contains(b.after_tax_ytm_pct))
            .take(max_bonds)
            .collect();

        // Conversion cannot fail for prices that already round-tripped
        // through the yield solve; infinity just makes a unit unaffordable.
        let prices: Vec<f64> = eligible
            .iter()
            .map(|b| b.dirty_price().to_f64().unwrap_or(f64::INFINITY))
            .collect();

        let mut counts = vec![0u64; eligible.len()];
        let mut remaining = capital;
        loop {
            let mut bought = false;
            for (i, &price) in prices.iter().enumerate() {
                if price <= remaining {
                    counts[i] += 1;
                    remaining -= price;
                    bought = true;
                }
            }
            if !bought {
                break;
            }
        }

        eligible
            .iter()
            .zip(prices.iter())
            .zip(counts.iter())
            .filter(|(_, &count)| count > 0)
            .map(|((bond, &price), &count)| BondPosition {
                ticker: bond.ticker.clone(),
                name: bond.name.clone(),
                sector: bond.sector,
                quantity: count,
                dirty_price: price,
                after_tax_ytm_pct: bond.after_tax_ytm_pct,
                value: count as f64 * price,
                weight: 0.0,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use frontier_bonds::BondTerms;
    use frontier_core::types::{Date, RiskTier};
    use frontier_stats::{PriceTable, ReturnStatistics, StatisticsConfig};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn as_of() -> Date {
        Date::from_ymd(2025, 1, 15).unwrap()
    }

    /// Five consecutive closes ending exactly at `last`.
    fn priced_series(last: f64) -> Vec<(Date, f64)> {
        let factors = [0.99, 1.01, 0.995, 1.005, 1.0];
        factors
            .iter()
            .enumerate()
            .map(|(i, f)| (as_of().add_days(i as i64), last * f))
            .collect()
    }

    fn snapshot(
        equities: Vec<(&str, f64, u32)>,
        bonds: Vec<BondRecord>,
    ) -> MarketSnapshot {
        let series: Vec<(String, Vec<(Date, f64)>)> = equities
            .iter()
            .map(|(ticker, price, _)| ((*ticker).to_string(), priced_series(*price)))
            .collect();
        let table = PriceTable::from_series(series).unwrap();
        let stats = ReturnStatistics::compute(
            &table,
            &StatisticsConfig::default().with_min_observations(3),
        )
        .unwrap();

        let mut info = HashMap::new();
        for (ticker, _, lot) in equities {
            info.insert(
                ticker.to_string(),
                crate::snapshot::EquityInfo {
                    name: format!("{ticker} Corp"),
                    lot,
                    sector_code: "energy".to_string(),
                },
            );
        }
        MarketSnapshot::new(stats, info, bonds).unwrap()
    }

    /// One-year zero-coupon bond; its after-tax yield is
    /// `(nominal - 13% of gain) / clean - 1`.
    fn zero_coupon(ticker: &str, nominal: Decimal, clean: Decimal) -> BondRecord {
        BondRecord::new(
            BondTerms {
                name: format!("{ticker} Issue"),
                ticker: ticker.to_string(),
                sector_code: "government".to_string(),
                maturity: as_of().add_days(365),
                nominal,
                accrued_interest: dec!(0),
                clean_price: clean,
            },
            vec![],
            as_of(),
        )
        .unwrap()
    }

    fn request(capital: f64) -> PortfolioRequest {
        PortfolioRequest::new(capital, RiskTier::Medium)
    }

    #[test]
    fn test_whole_lot_purchase_and_bond_fill() {
        // Nominal 1110 at clean 1000: after-tax yield about 9.57%, inside
        // the medium band, dirty price exactly 1000.
        let snap = snapshot(
            vec![("XENG", 1000.0, 1)],
            vec![zero_coupon("GOV1", dec!(1110), dec!(1000))],
        );
        let weights = Weights::new(0.4, vec![("XENG".to_string(), 0.6)]);

        let portfolio = DiscreteAllocator::new()
            .allocate(&snap, &weights, &request(100_000.0))
            .unwrap();

        assert_eq!(portfolio.stocks.len(), 1);
        assert_eq!(portfolio.stocks[0].quantity, 60);
        assert_relative_eq!(portfolio.stocks[0].value, 60_000.0, epsilon = 1e-6);

        assert_eq!(portfolio.bonds.len(), 1);
        assert_eq!(portfolio.bonds[0].quantity, 40);
        assert_relative_eq!(portfolio.bonds[0].value, 40_000.0, epsilon = 1e-6);

        assert_relative_eq!(portfolio.leftover, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_unaffordable_ticker_dropped_and_weight_redistributed() {
        let snap = snapshot(vec![("CHEAP", 100.0, 1), ("DEAR", 100_000.0, 1)], vec![]);
        let weights = Weights::new(
            0.0,
            vec![("CHEAP".to_string(), 0.5), ("DEAR".to_string(), 0.5)],
        );

        let portfolio = DiscreteAllocator::new()
            .allocate(&snap, &weights, &request(10_000.0))
            .unwrap();

        assert_eq!(portfolio.stocks.len(), 1);
        assert_eq!(portfolio.stocks[0].ticker, "CHEAP");
        // DEAR's weight flowed back to CHEAP: the full equity share.
        assert_eq!(portfolio.stocks[0].quantity, 100);
        assert_relative_eq!(portfolio.leftover, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_lot_size_respected() {
        let snap = snapshot(vec![("LOTS", 10.0, 100)], vec![]);
        let weights = Weights::new(0.0, vec![("LOTS".to_string(), 1.0)]);

        let portfolio = DiscreteAllocator::new()
            .allocate(&snap, &weights, &request(2_500.0))
            .unwrap();

        // 2500 / (10 * 100) = 2.5 lots, floored to 2 lots of 100 shares.
        assert_eq!(portfolio.stocks[0].quantity, 200);
        assert_eq!(portfolio.stocks[0].quantity % 100, 0);
        assert_relative_eq!(portfolio.stocks[0].value, 2_000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_max_instruments_caps_stocks() {
        let snap = snapshot(
            vec![("AAA", 10.0, 1), ("BBB", 10.0, 1), ("CCC", 10.0, 1)],
            vec![],
        );
        let weights = Weights::new(
            0.0,
            vec![
                ("AAA".to_string(), 0.5),
                ("BBB".to_string(), 0.3),
                ("CCC".to_string(), 0.2),
            ],
        );

        let portfolio = DiscreteAllocator::new()
            .allocate(
                &snap,
                &weights,
                &request(10_000.0).with_max_instruments(4),
            )
            .unwrap();

        // Cap of 4 splits 2/2; the smallest ideal position (CCC) is cut.
        assert_eq!(portfolio.stocks.len(), 2);
        assert!(portfolio.stocks.iter().all(|p| p.ticker != "CCC"));
    }

    #[test]
    fn test_bond_round_robin() {
        // 1000/900 zero coupon: after-tax about 9.67%; 1110/1000: 9.57%.
        // Both in the medium band; the 900 bond sorts first on yield.
        let snap = snapshot(
            vec![("XENG", 1000.0, 1)],
            vec![
                zero_coupon("GOVA", dec!(1110), dec!(1000)),
                zero_coupon("GOVB", dec!(1000), dec!(900)),
            ],
        );
        let weights = Weights::new(1.0, vec![("XENG".to_string(), 0.0)]);

        let portfolio = DiscreteAllocator::new()
            .allocate(&snap, &weights, &request(2_500.0))
            .unwrap();

        // One rotation buys one of each (900 + 1000); the 600 remainder
        // affords neither.
        assert_eq!(portfolio.bonds.len(), 2);
        for position in &portfolio.bonds {
            assert_eq!(position.quantity, 1);
        }
        assert_relative_eq!(portfolio.leftover, 600.0, epsilon = 1e-6);
    }

    #[test]
    fn test_bond_band_filter() {
        // Nominal 1050 at clean 1000: after-tax about 4.35%, below the
        // medium band; excluded even though capital is ample.
        let snap = snapshot(
            vec![("XENG", 1000.0, 1)],
            vec![zero_coupon("GOVC", dec!(1050), dec!(1000))],
        );
        let weights = Weights::new(1.0, vec![("XENG".to_string(), 0.0)]);

        let portfolio = DiscreteAllocator::new()
            .allocate(&snap, &weights, &request(10_000.0))
            .unwrap();

        assert!(portfolio.bonds.is_empty());
        assert_relative_eq!(portfolio.leftover, 10_000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_no_affordable_equity_leaves_capital_to_bonds() {
        let snap = snapshot(
            vec![("DEAR", 1_000_000.0, 1)],
            vec![zero_coupon("GOV1", dec!(1110), dec!(1000))],
        );
        let weights = Weights::new(0.5, vec![("DEAR".to_string(), 0.5)]);

        let portfolio = DiscreteAllocator::new()
            .allocate(&snap, &weights, &request(10_000.0))
            .unwrap();

        assert!(portfolio.stocks.is_empty());
        // The whole capital, not just the bond share, flows into bonds.
        assert_eq!(portfolio.bonds[0].quantity, 10);
    }

    #[test]
    fn test_allocation_deterministic() {
        let snap = snapshot(
            vec![("AAA", 123.0, 10), ("BBB", 77.0, 1)],
            vec![zero_coupon("GOV1", dec!(1110), dec!(1000))],
        );
        let weights = Weights::new(
            0.3,
            vec![("AAA".to_string(), 0.4), ("BBB".to_string(), 0.3)],
        );

        let a = DiscreteAllocator::new()
            .allocate(&snap, &weights, &request(50_000.0))
            .unwrap();
        let b = DiscreteAllocator::new()
            .allocate(&snap, &weights, &request(50_000.0))
            .unwrap();

        assert_eq!(a, b);
    }
}
