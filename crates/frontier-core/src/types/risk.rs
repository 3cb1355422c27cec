//! Risk tiers and their calibration constants.
//!
//! A risk tier is the single knob a caller turns: it fixes the target
//! annualized return of the optimization, the synthetic bond asset the
//! optimizer blends with equities, and the after-tax yield band bonds must
//! fall into to be eligible for allocation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Assumed correlation between the synthetic bond asset and every equity.
///
/// Tier-independent; fixed income co-moves only weakly with the equity
/// universe this library targets.
pub const BOND_EQUITY_CORRELATION: f64 = 0.1;

/// An inclusive band of after-tax yields, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YieldBand {
    /// Lower bound, percent.
    pub lower_pct: f64,
    /// Upper bound, percent.
    pub upper_pct: f64,
}

impl YieldBand {
    /// Returns true if `yield_pct` lies within the band (inclusive).
    #[must_use]
    pub fn contains(&self, yield_pct: f64) -> bool {
        self.lower_pct <= yield_pct && yield_pct <= self.upper_pct
    }
}

/// User-selected risk tolerance.
///
/// Each tier maps to a fixed set of calibration constants; callers never
/// supply raw targets directly, so a request is always internally
/// consistent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    /// High risk tolerance for high expected return.
    High,
    /// Medium risk tolerance for medium expected return.
    Medium,
    /// Low risk tolerance, modest expected return.
    Low,
}

impl RiskTier {
    /// All tiers, in descending order of risk.
    pub const ALL: [RiskTier; 3] = [RiskTier::High, RiskTier::Medium, RiskTier::Low];

    /// Target annualized portfolio return, in percent.
    #[must_use]
    pub fn target_return_pct(&self) -> f64 {
        match self {
            RiskTier::High => 30.0,
            RiskTier::Medium => 15.0,
            RiskTier::Low => 7.5,
        }
    }

    /// Assumed annual return of the synthetic bond asset, in percent.
    #[must_use]
    pub fn bond_return_pct(&self) -> f64 {
        match self {
            RiskTier::High => 13.0,
            RiskTier::Medium => 10.0,
            RiskTier::Low => 8.5,
        }
    }

    /// Assumed annual return standard deviation of the synthetic bond
    /// asset, in percent.
    #[must_use]
    pub fn bond_std_pct(&self) -> f64 {
        match self {
            RiskTier::High => 2.0,
            RiskTier::Medium => 1.0,
            RiskTier::Low => 0.5,
        }
    }

    /// After-tax yield band a bond must fall into to be eligible for this
    /// tier.
    #[must_use]
    pub fn bond_yield_band(&self) -> YieldBand {
        let (lower_pct, upper_pct) = match self {
            RiskTier::High => (11.0, 15.0),
            RiskTier::Medium => (9.0, 11.0),
            RiskTier::Low => (8.0, 9.0),
        };
        YieldBand {
            lower_pct,
            upper_pct,
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskTier::High => write!(f, "high"),
            RiskTier::Medium => write!(f, "medium"),
            RiskTier::Low => write!(f, "low"),
        }
    }
}

impl FromStr for RiskTier {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "high" => Ok(RiskTier::High),
            "medium" => Ok(RiskTier::Medium),
            "low" => Ok(RiskTier::Low),
            other => Err(CoreError::UnknownVariant {
                kind: "risk tier",
                value: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_constants_are_ordered() {
        // Higher risk tolerance means a higher return target and a wider,
        // higher yield band.
        assert!(RiskTier::High.target_return_pct() > RiskTier::Medium.target_return_pct());
        assert!(RiskTier::Medium.target_return_pct() > RiskTier::Low.target_return_pct());
        assert!(RiskTier::High.bond_std_pct() > RiskTier::Low.bond_std_pct());
        assert!(
            RiskTier::High.bond_yield_band().lower_pct >= RiskTier::Medium.bond_yield_band().upper_pct
        );
    }

    #[test]
    fn test_yield_band_contains() {
        let band = RiskTier::Medium.bond_yield_band();
        assert!(band.contains(9.0));
        assert!(band.contains(11.0));
        assert!(band.contains(10.5));
        assert!(!band.contains(8.99));
        assert!(!band.contains(11.01));
    }

    #[test]
    fn test_from_str_roundtrip() {
        for tier in RiskTier::ALL {
            assert_eq!(tier.to_string().parse::<RiskTier>().unwrap(), tier);
        }
        assert!("aggressive".parse::<RiskTier>().is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&RiskTier::Medium).unwrap(),
            "\"medium\""
        );
    }
}
