//! Root-finding algorithms.
//!
//! The bond valuation layer needs exactly one thing from this module: given
//! a monotone present-value function and a bracketing interval, find the
//! rate at which it crosses a target. Bisection is slow but its convergence
//! is guaranteed and its iteration count is bounded by the bracket width,
//! which is what a request/response service wants.

use crate::error::{MathError, MathResult};

/// Default bracket-width tolerance for root-finding.
pub const DEFAULT_TOLERANCE: f64 = 1e-10;

/// Default maximum iterations for root-finding.
pub const DEFAULT_MAX_ITERATIONS: u32 = 200;

/// Configuration for root-finding algorithms.
#[derive(Debug, Clone, Copy)]
pub struct SolverConfig {
    /// Convergence tolerance on the bracket width.
    pub tolerance: f64,
    /// Maximum number of iterations.
    pub max_iterations: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl SolverConfig {
    /// Creates a new solver configuration.
    #[must_use]
    pub fn new(tolerance: f64, max_iterations: u32) -> Self {
        Self {
            tolerance,
            max_iterations,
        }
    }

    /// Sets the tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the maximum iterations.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

/// Result of a root-finding run.
#[derive(Debug, Clone, Copy)]
pub struct SolverResult {
    /// The root found.
    pub root: f64,
    /// Number of iterations used.
    pub iterations: u32,
    /// Final residual (function value at the root).
    pub residual: f64,
}

/// Bisection root-finding.
///
/// A bracketing method that repeatedly halves the interval and keeps the
/// half containing the sign change. Converges when the bracket width falls
/// below `config.tolerance`, so the iteration count is bounded by
/// `log2((b - a) / tolerance)`.
///
/// Requires `f(a)` and `f(b)` to have opposite signs.
///
/// # Example
///
/// ```rust
/// use frontier_math::solvers::{bisection, SolverConfig};
///
/// // Find sqrt(2) as the root of x^2 - 2
/// let f = |x: f64| x * x - 2.0;
/// let result = bisection(f, 1.0, 2.0, &SolverConfig::default()).unwrap();
/// assert!((result.root - std::f64::consts::SQRT_2).abs() < 1e-9);
/// ```
pub fn bisection<F>(f: F, a: f64, b: f64, config: &SolverConfig) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
{
    let mut lo = a.min(b);
    let mut hi = a.max(b);

    let mut f_lo = f(lo);
    let f_hi = f(hi);

    if f_lo == 0.0 {
        return Ok(SolverResult {
            root: lo,
            iterations: 0,
            residual: 0.0,
        });
    }
    if f_hi == 0.0 {
        return Ok(SolverResult {
            root: hi,
            iterations: 0,
            residual: 0.0,
        });
    }
    if f_lo * f_hi > 0.0 {
        return Err(MathError::InvalidBracket {
            a: lo,
            b: hi,
            fa: f_lo,
            fb: f_hi,
        });
    }

    for iteration in 0..config.max_iterations {
        let mid = (lo + hi) / 2.0;
        let f_mid = f(mid);

        if f_mid == 0.0 {
            return Ok(SolverResult {
                root: mid,
                iterations: iteration,
                residual: 0.0,
            });
        }
        if hi - lo < config.tolerance {
            return Ok(SolverResult {
                root: mid,
                iterations: iteration,
                residual: f_mid,
            });
        }

        if f_mid * f_lo < 0.0 {
            hi = mid;
        } else {
            lo = mid;
            f_lo = f_mid;
        }
    }

    // The last halving may have brought the bracket inside tolerance.
    let mid = (lo + hi) / 2.0;
    if hi - lo < config.tolerance {
        return Ok(SolverResult {
            root: mid,
            iterations: config.max_iterations,
            residual: f(mid),
        });
    }
    Err(MathError::convergence_failed(
        config.max_iterations,
        f(mid).abs(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_sqrt_2() {
        let f = |x: f64| x * x - 2.0;

        let result = bisection(f, 1.0, 2.0, &SolverConfig::default()).unwrap();

        assert_relative_eq!(result.root, std::f64::consts::SQRT_2, epsilon = 1e-9);
    }

    #[test]
    fn test_reversed_bracket() {
        let f = |x: f64| x * x - 2.0;

        let result = bisection(f, 2.0, 1.0, &SolverConfig::default()).unwrap();

        assert_relative_eq!(result.root, std::f64::consts::SQRT_2, epsilon = 1e-9);
    }

    #[test]
    fn test_invalid_bracket() {
        let f = |x: f64| x * x - 2.0;

        let result = bisection(f, 2.0, 3.0, &SolverConfig::default());

        assert!(matches!(result, Err(MathError::InvalidBracket { .. })));
    }

    #[test]
    fn test_root_at_endpoint() {
        let f = |x: f64| x - 1.0;

        let result = bisection(f, 0.0, 1.0, &SolverConfig::default()).unwrap();

        assert_relative_eq!(result.root, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_decreasing_function() {
        // Present-value functions are monotone decreasing in the rate.
        let f = |x: f64| 10.0 - x;

        let result = bisection(f, -10.0, 10_000.0, &SolverConfig::new(1e-6, 64)).unwrap();

        assert_relative_eq!(result.root, 10.0, epsilon = 1e-5);
    }

    #[test]
    fn test_iteration_bound() {
        // Bracket width 10010, tolerance 0.001: must converge within
        // ceil(log2(10010 / 0.001)) = 24 iterations.
        let f = |x: f64| 42.0 - x;

        let result = bisection(f, -10.0, 10_000.0, &SolverConfig::new(1e-3, 24)).unwrap();

        assert!(result.iterations <= 24);
        assert!((result.root - 42.0).abs() < 1e-3);
    }

    #[test]
    fn test_max_iterations_exceeded() {
        // The root 1/3 is never an interval midpoint, so the bracket must
        // actually shrink below tolerance, which 3 iterations cannot do.
        let f = |x: f64| x - 1.0 / 3.0;

        let result = bisection(f, 0.0, 1.0, &SolverConfig::new(1e-12, 3));

        assert!(matches!(result, Err(MathError::ConvergenceFailed { .. })));
    }

    #[test]
    fn test_exact_midpoint_root() {
        let f = |x: f64| x - 0.5;

        let result = bisection(f, 0.0, 1.0, &SolverConfig::default()).unwrap();

        assert_relative_eq!(result.root, 0.5);
        assert_eq!(result.residual, 0.0);
    }

    proptest! {
        #[test]
        fn prop_finds_root_of_shifted_identity(root in -100.0f64..100.0) {
            let result =
                bisection(|x| x - root, -1000.0, 1000.0, &SolverConfig::default()).unwrap();
            prop_assert!((result.root - root).abs() < 1e-7);
        }
    }
}
