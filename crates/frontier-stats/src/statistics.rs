//! Immutable return-statistics snapshot.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{StatsError, StatsResult};
use crate::returns::{
    mean, normalized_returns, pairwise_normalized_returns, sample_covariance, sample_variance,
};
use crate::table::PriceTable;

/// Trading days per year, used when converting annual figures to the daily
/// scale of these statistics.
pub const TRADING_DAYS_PER_YEAR: usize = 252;

/// Minimum historical depth, in trading years, required by default.
const MIN_TRADING_YEARS: usize = 8;

/// Configuration for statistics computation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StatisticsConfig {
    /// Minimum valid observations a ticker must have.
    ///
    /// The upstream loader applies the same threshold; it is re-checked
    /// here because statistics built from a too-short history are
    /// meaningless no matter who handed them in.
    pub min_observations: usize,
}

impl Default for StatisticsConfig {
    fn default() -> Self {
        Self {
            min_observations: TRADING_DAYS_PER_YEAR * MIN_TRADING_YEARS,
        }
    }
}

impl StatisticsConfig {
    /// Sets the minimum observation count.
    #[must_use]
    pub fn with_min_observations(mut self, min_observations: usize) -> Self {
        self.min_observations = min_observations;
        self
    }
}

/// Per-asset return moments and the full covariance structure of a price
/// table.
///
/// Built once per data refresh, verified at construction, and immutable
/// afterwards. The pairwise covariance loop is `O(n^2 * m)` for `n` tickers
/// and `m` overlapping observations; acceptable for universes up to the low
/// hundreds of tickers, which is what this library targets.
///
/// # Example
///
/// ```rust,ignore
/// let table = PriceTable::from_series(series)?;
/// let stats = ReturnStatistics::compute(&table, &StatisticsConfig::default())?;
/// let sigma = stats.covariance();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnStatistics {
    tickers: Vec<String>,
    last_prices: Vec<f64>,
    mean_returns: Vec<f64>,
    std_returns: Vec<f64>,
    covariance: Array2<f64>,
    correlation: Array2<f64>,
}

impl ReturnStatistics {
    /// Computes statistics for every ticker in the table.
    ///
    /// # Errors
    ///
    /// Any [`StatsError`]: short or empty histories, zero return variance,
    /// insufficient pairwise overlap, or a failed integrity check. All of
    /// these indicate upstream data corruption and abort the computation.
    pub fn compute(table: &PriceTable, config: &StatisticsConfig) -> StatsResult<Self> {
        let n = table.n_tickers();
        if n == 0 {
            return Err(StatsError::EmptyTable);
        }
        let tickers: Vec<String> = table.tickers().to_vec();

        // Variance of normalized returns needs at least two returns, hence
        // three observations, whatever the configured floor says.
        let required = config.min_observations.max(3);

        let mut last_prices = Vec::with_capacity(n);
        let mut mean_returns = Vec::with_capacity(n);
        let mut std_returns = Vec::with_capacity(n);
        let mut variances = Vec::with_capacity(n);

        for (t, ticker) in tickers.iter().enumerate() {
            let valid = table.valid_observations(t);
            if valid == 0 {
                return Err(StatsError::EmptyHistory {
                    ticker: ticker.clone(),
                });
            }
            if valid < required {
                return Err(StatsError::InsufficientHistory {
                    ticker: ticker.clone(),
                    required,
                    actual: valid,
                });
            }

            let returns = normalized_returns(table.dates(), table.column(t));
            let variance =
                sample_variance(&returns).ok_or_else(|| StatsError::InsufficientHistory {
                    ticker: ticker.clone(),
                    required,
                    actual: valid,
                })?;
            if variance <= 0.0 {
                return Err(StatsError::ZeroVariance {
                    ticker: ticker.clone(),
                });
            }

            last_prices.push(table.last_price(t).ok_or_else(|| StatsError::EmptyHistory {
                ticker: ticker.clone(),
            })?);
            mean_returns.push(mean(&returns));
            std_returns.push(variance.sqrt());
            variances.push(variance);
        }

        // Pairwise covariances over the NaN-tolerant pairwise alignment.
        let pair_indices: Vec<(usize, usize)> = (0..n)
            .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
            .collect();

        let compute_pair = |&(i, j): &(usize, usize)| -> StatsResult<f64> {
            let (ra, rb) =
                pairwise_normalized_returns(table.dates(), table.column(i), table.column(j));
            sample_covariance(&ra, &rb).ok_or_else(|| StatsError::InsufficientOverlap {
                ticker_a: tickers[i].clone(),
                ticker_b: tickers[j].clone(),
            })
        };

        #[cfg(feature = "parallel")]
        let pair_covariances: Vec<f64> = pair_indices
            .par_iter()
            .map(compute_pair)
            .collect::<StatsResult<Vec<_>>>()?;
        #[cfg(not(feature = "parallel"))]
        let pair_covariances: Vec<f64> = pair_indices
            .iter()
            .map(compute_pair)
            .collect::<StatsResult<Vec<_>>>()?;

        let mut covariance = Array2::<f64>::zeros((n, n));
        for (t, &variance) in variances.iter().enumerate() {
            covariance[(t, t)] = variance;
        }
        for (&(i, j), &value) in pair_indices.iter().zip(pair_covariances.iter()) {
            covariance[(i, j)] = value;
            covariance[(j, i)] = value;
        }

        let mut correlation = Array2::<f64>::zeros((n, n));
        for i in 0..n {
            for j in 0..n {
                correlation[(i, j)] = covariance[(i, j)] / (std_returns[i] * std_returns[j]);
            }
        }

        let stats = Self {
            tickers,
            last_prices,
            mean_returns,
            std_returns,
            covariance,
            correlation,
        };
        stats.verify_integrity()?;

        tracing::debug!(
            n_tickers = n,
            n_rows = table.n_rows(),
            "Return statistics computed"
        );
        Ok(stats)
    }

    /// Structural invariant checks, run once at construction.
    ///
    /// A violation means the computation above is corrupt and must surface
    /// as a hard failure, never be silently corrected.
    fn verify_integrity(&self) -> StatsResult<()> {
        let n = self.tickers.len();
        let tol = 1e-9;

        for i in 0..n {
            let diag = self.covariance[(i, i)];
            let variance = self.std_returns[i] * self.std_returns[i];
            if relative_error(diag, variance) > tol {
                return Err(StatsError::IntegrityViolation {
                    check: format!("covariance diagonal != variance for '{}'", self.tickers[i]),
                });
            }
            if (self.correlation[(i, i)] - 1.0).abs() > tol {
                return Err(StatsError::IntegrityViolation {
                    check: format!("correlation diagonal != 1 for '{}'", self.tickers[i]),
                });
            }
            for j in (i + 1)..n {
                if relative_error(self.covariance[(i, j)], self.covariance[(j, i)]) > tol {
                    return Err(StatsError::IntegrityViolation {
                        check: format!(
                            "covariance asymmetric at ('{}', '{}')",
                            self.tickers[i], self.tickers[j]
                        ),
                    });
                }
                if relative_error(self.correlation[(i, j)], self.correlation[(j, i)]) > tol {
                    return Err(StatsError::IntegrityViolation {
                        check: format!(
                            "correlation asymmetric at ('{}', '{}')",
                            self.tickers[i], self.tickers[j]
                        ),
                    });
                }
            }
        }
        Ok(())
    }

    /// Number of assets covered by the snapshot.
    #[must_use]
    pub fn n_assets(&self) -> usize {
        self.tickers.len()
    }

    /// Tickers, in matrix order.
    #[must_use]
    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    /// Column index of a ticker, if present.
    #[must_use]
    pub fn index_of(&self, ticker: &str) -> Option<usize> {
        self.tickers.iter().position(|t| t == ticker)
    }

    /// Last observed close per ticker.
    #[must_use]
    pub fn last_prices(&self) -> &[f64] {
        &self.last_prices
    }

    /// Mean gap-normalized daily return per ticker.
    #[must_use]
    pub fn mean_returns(&self) -> &[f64] {
        &self.mean_returns
    }

    /// Standard deviation of gap-normalized daily returns per ticker.
    #[must_use]
    pub fn std_returns(&self) -> &[f64] {
        &self.std_returns
    }

    /// Covariance matrix of gap-normalized daily returns.
    #[must_use]
    pub fn covariance(&self) -> &Array2<f64> {
        &self.covariance
    }

    /// Correlation matrix of gap-normalized daily returns.
    #[must_use]
    pub fn correlation(&self) -> &Array2<f64> {
        &self.correlation
    }
}

fn relative_error(a: f64, b: f64) -> f64 {
    let scale = a.abs().max(b.abs());
    if scale == 0.0 {
        0.0
    } else {
        (a - b).abs() / scale
    }
}
