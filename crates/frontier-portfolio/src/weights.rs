//! Model portfolio weights.

use serde::{Deserialize, Serialize};

/// Continuous portfolio weights produced by the optimizer.
///
/// The bond weight covers the whole fixed-income share as a single
/// synthetic asset; equity weights are keyed by ticker in statistics
/// order. Weights are non-negative and sum to one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    bond: f64,
    equities: Vec<(String, f64)>,
}

impl Weights {
    /// Creates a weight vector.
    #[must_use]
    pub fn new(bond: f64, equities: Vec<(String, f64)>) -> Self {
        Self { bond, equities }
    }

    /// Weight of the fixed-income share.
    #[must_use]
    pub fn bond(&self) -> f64 {
        self.bond
    }

    /// Per-ticker equity weights, in statistics order.
    #[must_use]
    pub fn equities(&self) -> &[(String, f64)] {
        &self.equities
    }

    /// Sum of the equity weights.
    #[must_use]
    pub fn equity_sum(&self) -> f64 {
        self.equities.iter().map(|(_, w)| w).sum()
    }

    /// Sum of all weights, bond included.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.bond + self.equity_sum()
    }
}
