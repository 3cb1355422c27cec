//! Target-return quadratic program.
//!
//! Solves the Markowitz subproblem
//!
//! ```text
//! minimize   (1/2) w' Sigma w
//! subject to sum(w) = 1
//!            r' w   = mu
//!            0 <= w_i <= 1
//! ```
//!
//! with a primal active-set method over the box bounds. Each working-set
//! iteration solves the equality-constrained KKT system by LU
//! factorization; variables that come out below zero (or above one) are
//! fixed at the bound, and KKT multiplier sign checks release bounds that
//! turn out not to bind. The asset universes this library sees are small
//! (tens to low hundreds), so dense factorizations are the right tool.
//!
//! Feasibility: weights are a convex combination, so the achievable
//! portfolio return is exactly `[min(r), max(r)]`. A target outside that
//! interval is rejected up front as [`MathError::Infeasible`] - the caller
//! declared a risk/return contract this universe cannot honor, and
//! substituting some other portfolio would silently break it.

use nalgebra::{DMatrix, DVector};

use crate::error::{MathError, MathResult};

/// Configuration for the active-set QP.
#[derive(Debug, Clone, Copy)]
pub struct QpConfig {
    /// Tolerance for bound violations and multiplier sign checks.
    pub bound_tolerance: f64,
    /// Maximum number of working-set changes.
    pub max_iterations: u32,
}

impl Default for QpConfig {
    fn default() -> Self {
        Self {
            bound_tolerance: 1e-9,
            max_iterations: 200,
        }
    }
}

/// Solution of a target-return QP.
#[derive(Debug, Clone)]
pub struct QpSolution {
    /// Optimal weights, same order as the input returns.
    pub weights: Vec<f64>,
    /// Objective value `(1/2) w' Sigma w` at the solution.
    pub objective: f64,
    /// Number of working-set iterations used.
    pub iterations: u32,
}

/// Bound status of a variable in the working set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bound {
    Free,
    AtZero,
    AtOne,
}

/// Minimum-variance solver for a fixed target return.
#[derive(Debug, Clone, Default)]
pub struct TargetReturnQp {
    config: QpConfig,
}

impl TargetReturnQp {
    /// Creates a solver with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a solver with the given configuration.
    #[must_use]
    pub fn with_config(config: QpConfig) -> Self {
        Self { config }
    }

    /// Solves for the minimum-variance weights achieving `target` return.
    ///
    /// # Arguments
    ///
    /// * `covariance` - n x n covariance matrix (symmetric PSD)
    /// * `returns` - expected return per asset, length n
    /// * `target` - required portfolio return, same units as `returns`
    ///
    /// # Errors
    ///
    /// * [`MathError::Infeasible`] if `target` lies outside the achievable
    ///   return range, or the working set degenerates to an inconsistent
    ///   vertex
    /// * [`MathError::SingularSystem`] if a KKT system cannot be factorized
    /// * [`MathError::ConvergenceFailed`] if the working set does not
    ///   settle within the iteration cap
    pub fn solve(
        &self,
        covariance: &DMatrix<f64>,
        returns: &DVector<f64>,
        target: f64,
    ) -> MathResult<QpSolution> {
        let n = returns.len();
        if covariance.nrows() != n || covariance.ncols() != n {
            return Err(MathError::DimensionMismatch {
                expected: n,
                actual: covariance.nrows().max(covariance.ncols()),
            });
        }
        if n == 0 {
            return Err(MathError::invalid_input("empty asset universe"));
        }
        if !target.is_finite() || returns.iter().any(|r| !r.is_finite()) {
            return Err(MathError::invalid_input("non-finite return input"));
        }

        let tol = self.config.bound_tolerance;
        let r_min = returns.iter().copied().fold(f64::INFINITY, f64::min);
        let r_max = returns.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if target < r_min - tol || target > r_max + tol {
            return Err(MathError::infeasible(format!(
                "target return {target:.6e} outside achievable range [{r_min:.6e}, {r_max:.6e}]"
            )));
        }

        // Single asset: the budget constraint pins w = 1.
        if n == 1 {
            let w = vec![1.0];
            return Ok(QpSolution {
                objective: 0.5 * covariance[(0, 0)],
                weights: w,
                iterations: 0,
            });
        }

        let mut status = vec![Bound::Free; n];

        for iteration in 0..self.config.max_iterations {
            let free: Vec<usize> = (0..n).filter(|&i| status[i] == Bound::Free).collect();
            let at_one: Vec<usize> = (0..n).filter(|&i| status[i] == Bound::AtOne).collect();

            if free.is_empty() {
                // Every variable sits on a bound; the equalities either
                // happen to hold (vertex solution) or the working set is
                // inconsistent.
                let weights: Vec<f64> = status
                    .iter()
                    .map(|s| if *s == Bound::AtOne { 1.0 } else { 0.0 })
                    .collect();
                let sum: f64 = weights.iter().sum();
                let ret: f64 = weights
                    .iter()
                    .zip(returns.iter())
                    .map(|(w, r)| w * r)
                    .sum();
                if (sum - 1.0).abs() <= tol.max(1e-9) && (ret - target).abs() <= tol.max(1e-9) {
                    return Ok(self.finish(covariance, weights, iteration));
                }
                return Err(MathError::infeasible(
                    "working set collapsed to an inconsistent vertex".to_string(),
                ));
            }

            let solved = self.solve_working_set(covariance, returns, target, &free, &at_one)?;
            let (w_free, lambda_budget, lambda_return) = solved;

            // Fix the worst bound violator, if any.
            let mut worst: Option<(usize, f64, Bound)> = None;
            for (k, &i) in free.iter().enumerate() {
                let w = w_free[k];
                if w < -tol {
                    let violation = -w;
                    if worst.map_or(true, |(_, v, _)| violation > v) {
                        worst = Some((i, violation, Bound::AtZero));
                    }
                } else if w > 1.0 + tol {
                    let violation = w - 1.0;
                    if worst.map_or(true, |(_, v, _)| violation > v) {
                        worst = Some((i, violation, Bound::AtOne));
                    }
                }
            }
            if let Some((i, _, bound)) = worst {
                status[i] = bound;
                continue;
            }

            // Feasible point; check multipliers of the fixed bounds.
            let mut weights = vec![0.0; n];
            for (k, &i) in free.iter().enumerate() {
                weights[i] = w_free[k].clamp(0.0, 1.0);
            }
            for &i in &at_one {
                weights[i] = 1.0;
            }

            let w_vec = DVector::from_column_slice(&weights);
            let gradient = covariance * &w_vec;

            let mut release: Option<(usize, f64)> = None;
            for i in 0..n {
                let stationarity = gradient[i] + lambda_budget + lambda_return * returns[i];
                let multiplier = match status[i] {
                    Bound::Free => continue,
                    Bound::AtZero => stationarity,
                    Bound::AtOne => -stationarity,
                };
                if multiplier < -tol && release.map_or(true, |(_, m)| multiplier < m) {
                    release = Some((i, multiplier));
                }
            }
            if let Some((i, _)) = release {
                status[i] = Bound::Free;
                continue;
            }

            tracing::debug!(
                n_assets = n,
                iterations = iteration + 1,
                "Active-set QP converged"
            );
            return Ok(self.finish(covariance, weights, iteration + 1));
        }

        Err(MathError::convergence_failed(
            self.config.max_iterations,
            f64::NAN,
        ))
    }

    /// Solves the equality-constrained subproblem on the free variables.
    ///
    /// Returns the free weights and the two equality multipliers.
    fn solve_working_set(
        &self,
        covariance: &DMatrix<f64>,
        returns: &DVector<f64>,
        target: f64,
        free: &[usize],
        at_one: &[usize],
    ) -> MathResult<(Vec<f64>, f64, f64)> {
        let nf = free.len();
        let m = nf + 2;

        let mut kkt = DMatrix::<f64>::zeros(m, m);
        let mut rhs = DVector::<f64>::zeros(m);

        for (a, &i) in free.iter().enumerate() {
            for (b, &j) in free.iter().enumerate() {
                kkt[(a, b)] = covariance[(i, j)];
            }
            kkt[(a, nf)] = 1.0;
            kkt[(a, nf + 1)] = returns[i];
            kkt[(nf, a)] = 1.0;
            kkt[(nf + 1, a)] = returns[i];

            // Cross terms from variables pinned at one.
            rhs[a] = -at_one.iter().map(|&j| covariance[(i, j)]).sum::<f64>();
        }
        rhs[nf] = 1.0 - at_one.len() as f64;
        rhs[nf + 1] = target - at_one.iter().map(|&j| returns[j]).sum::<f64>();

        let solution = kkt
            .lu()
            .solve(&rhs)
            .ok_or(MathError::SingularSystem { unknowns: m })?;

        let w_free = solution.as_slice()[..nf].to_vec();
        Ok((w_free, solution[nf], solution[nf + 1]))
    }

    fn finish(&self, covariance: &DMatrix<f64>, weights: Vec<f64>, iterations: u32) -> QpSolution {
        let w = DVector::from_column_slice(&weights);
        let objective = 0.5 * (covariance * &w).dot(&w);
        QpSolution {
            weights,
            objective,
            iterations,
        }
    }
}
