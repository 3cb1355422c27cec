//! Sector vocabulary for portfolio reporting.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Economic sector of an instrument's issuer.
///
/// A fixed vocabulary mapped from provider sector codes. Codes outside the
/// vocabulary degrade to [`Sector::Other`] with a warning; an unmapped
/// sector is a reporting blemish, never a reason to fail a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sector {
    /// Consumer goods and services.
    Consumer,
    /// Oil, gas, and power generation.
    Energy,
    /// Banks, insurers, exchanges.
    Financials,
    /// Sovereign and municipal issuers.
    Government,
    /// Pharmaceuticals and healthcare providers.
    HealthCare,
    /// Manufacturing and transport.
    Industrials,
    /// Mining, chemicals, raw materials.
    Materials,
    /// Property development and REITs.
    RealEstate,
    /// Telecommunications.
    Telecom,
    /// Water, gas, and electricity distribution.
    Utilities,
    /// Software and IT services.
    InformationTechnology,
    /// Fallback for unmapped sector codes.
    Other,
}

impl Sector {
    /// Maps a provider sector code onto the fixed vocabulary.
    ///
    /// Unknown codes are logged at `warn` level and mapped to
    /// [`Sector::Other`].
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code {
            "consumer" => Sector::Consumer,
            "energy" => Sector::Energy,
            "financial" => Sector::Financials,
            "government" => Sector::Government,
            "health_care" => Sector::HealthCare,
            "industrials" => Sector::Industrials,
            "materials" => Sector::Materials,
            "real_estate" => Sector::RealEstate,
            "telecom" => Sector::Telecom,
            "utilities" => Sector::Utilities,
            "it" => Sector::InformationTechnology,
            "other" => Sector::Other,
            unknown => {
                tracing::warn!(sector_code = unknown, "Unmapped sector code");
                Sector::Other
            }
        }
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Sector::Consumer => "Consumer",
            Sector::Energy => "Energy",
            Sector::Financials => "Financials",
            Sector::Government => "Government",
            Sector::HealthCare => "Health Care",
            Sector::Industrials => "Industrials",
            Sector::Materials => "Materials",
            Sector::RealEstate => "Real Estate",
            Sector::Telecom => "Telecom",
            Sector::Utilities => "Utilities",
            Sector::InformationTechnology => "Information Technology",
            Sector::Other => "Other",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes() {
        assert_eq!(Sector::from_code("energy"), Sector::Energy);
        assert_eq!(Sector::from_code("it"), Sector::InformationTechnology);
        assert_eq!(Sector::from_code("health_care"), Sector::HealthCare);
    }

    #[test]
    fn test_unknown_code_falls_back_to_other() {
        assert_eq!(Sector::from_code("space_mining"), Sector::Other);
        assert_eq!(Sector::from_code(""), Sector::Other);
    }

    #[test]
    fn test_sector_ordering_is_stable() {
        // Portfolio positions are grouped by sector; the derived ordering
        // must stay total.
        let mut sectors = vec![Sector::Other, Sector::Consumer, Sector::Energy];
        sectors.sort();
        assert_eq!(sectors[0], Sector::Consumer);
    }
}
