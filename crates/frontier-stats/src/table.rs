//! Union-indexed daily close price table.

use std::collections::BTreeSet;

use frontier_core::types::Date;
use serde::{Deserialize, Serialize};

use crate::error::{StatsError, StatsResult};

/// A table of daily close prices, one column per ticker.
///
/// Rows are indexed by a shared, strictly increasing date index (the union
/// of every ticker's trading dates). A ticker that did not trade on a given
/// date holds `None` in that row; missing values stay missing and are never
/// interpolated.
///
/// The table is read-only once built. The upstream data collaborator is
/// responsible for deduplication, zero-volume filtering, and recency
/// filtering; this type only enforces the invariants the statistics layer
/// depends on (ordering, positive prices, unique tickers).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceTable {
    dates: Vec<Date>,
    tickers: Vec<String>,
    /// `columns[t][row]` is ticker `t`'s close on `dates[row]`.
    columns: Vec<Vec<Option<f64>>>,
}

impl PriceTable {
    /// Builds a table from per-ticker `(date, close)` series.
    ///
    /// Column order follows the input order. Each series must be non-empty,
    /// strictly increasing in date, and strictly positive in price.
    ///
    /// # Errors
    ///
    /// * [`StatsError::EmptyHistory`] for an empty series
    /// * [`StatsError::NonIncreasingDates`] for out-of-order or duplicate
    ///   dates
    /// * [`StatsError::InvalidPrice`] for non-positive or non-finite closes
    /// * [`StatsError::DuplicateTicker`] for a repeated ticker
    pub fn from_series(series: Vec<(String, Vec<(Date, f64)>)>) -> StatsResult<Self> {
        let mut seen = BTreeSet::new();
        for (ticker, observations) in &series {
            if !seen.insert(ticker.clone()) {
                return Err(StatsError::DuplicateTicker {
                    ticker: ticker.clone(),
                });
            }
            if observations.is_empty() {
                return Err(StatsError::EmptyHistory {
                    ticker: ticker.clone(),
                });
            }
            for window in observations.windows(2) {
                if window[1].0 <= window[0].0 {
                    return Err(StatsError::NonIncreasingDates {
                        ticker: ticker.clone(),
                        date: window[1].0,
                    });
                }
            }
            for &(date, close) in observations {
                if !close.is_finite() || close <= 0.0 {
                    return Err(StatsError::InvalidPrice {
                        ticker: ticker.clone(),
                        date,
                        value: close,
                    });
                }
            }
        }

        // Union date index across all tickers.
        let dates: Vec<Date> = series
            .iter()
            .flat_map(|(_, observations)| observations.iter().map(|(date, _)| *date))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut tickers = Vec::with_capacity(series.len());
        let mut columns = Vec::with_capacity(series.len());
        for (ticker, observations) in series {
            let mut column = vec![None; dates.len()];
            for (date, close) in observations {
                // Dates are unique per series, so binary search cannot miss.
                let row = dates
                    .binary_search(&date)
                    .expect("union index contains every observation date");
                column[row] = Some(close);
            }
            tickers.push(ticker);
            columns.push(column);
        }

        Ok(Self {
            dates,
            tickers,
            columns,
        })
    }

    /// Returns the shared date index.
    #[must_use]
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Returns the tickers, in column order.
    #[must_use]
    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    /// Returns the number of tickers.
    #[must_use]
    pub fn n_tickers(&self) -> usize {
        self.tickers.len()
    }

    /// Returns the number of rows in the date index.
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.dates.len()
    }

    /// Returns the close column for ticker index `t`.
    #[must_use]
    pub fn column(&self, t: usize) -> &[Option<f64>] {
        &self.columns[t]
    }

    /// Returns the number of valid (non-missing) observations for ticker
    /// index `t`.
    #[must_use]
    pub fn valid_observations(&self, t: usize) -> usize {
        self.columns[t].iter().filter(|c| c.is_some()).count()
    }

    /// Returns the last non-missing close for ticker index `t`.
    #[must_use]
    pub fn last_price(&self, t: usize) -> Option<f64> {
        self.columns[t].iter().rev().find_map(|c| *c)
    }
}
