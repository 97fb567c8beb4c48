//! SLA evaluation engine.
//!
//! Scores a mower SLA from its service level and grass-length tolerance
//! band. The engine is pure: identical inputs always yield the identical
//! score, regardless of call order or prior ledger state. The SLA manager
//! recomputes the score through this engine whenever any input changes,
//! so a stored `AppraisedValue` is never stale.
//!
//! The exact arithmetic is a business policy, not part of the state
//! machine contract, and is therefore injectable: handlers take a
//! [`EvaluationPolicy`] and the crate ships [`BandPolicy`] as the default.

mod policy;

#[cfg(test)]
mod tests;

pub use policy::{BandPolicy, EvaluationPolicy};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An unknown service-level label arrived at the boundary.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown service level: {label:?}")]
pub struct UnknownServiceLevel {
    /// The label that did not match any level.
    pub label: String,
}

/// Service tier of a mower SLA.
///
/// Serialized by variant name, which is also the wire label
/// (`"Gold"`, `"Silver"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceLevel {
    Bronze,
    Silver,
    Gold,
    Platinum,
}

impl ServiceLevel {
    /// Scoring weight of this tier. Strictly increasing with the tier.
    #[must_use]
    pub const fn weight(self) -> i64 {
        match self {
            Self::Bronze => 1,
            Self::Silver => 2,
            Self::Gold => 3,
            Self::Platinum => 4,
        }
    }

    /// Wire label for this tier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bronze => "Bronze",
            Self::Silver => "Silver",
            Self::Gold => "Gold",
            Self::Platinum => "Platinum",
        }
    }
}

impl fmt::Display for ServiceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceLevel {
    type Err = UnknownServiceLevel;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        match label {
            "Bronze" => Ok(Self::Bronze),
            "Silver" => Ok(Self::Silver),
            "Gold" => Ok(Self::Gold),
            "Platinum" => Ok(Self::Platinum),
            other => Err(UnknownServiceLevel {
                label: other.to_owned(),
            }),
        }
    }
}

/// The four inputs of an SLA appraisal.
///
/// Lengths are in centimetres at wire precision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlaTerms {
    /// Service tier.
    pub service_level: ServiceLevel,

    /// Grass length the mower aims for.
    pub target_grass_length: f64,

    /// Upper bound of the tolerated band.
    pub max_grass_length: f64,

    /// Lower bound of the tolerated band.
    pub min_grass_length: f64,
}

impl SlaTerms {
    /// Whether the tolerance band is well-formed:
    /// `min <= target <= max`.
    #[must_use]
    pub fn interval_is_valid(&self) -> bool {
        self.min_grass_length <= self.target_grass_length
            && self.target_grass_length <= self.max_grass_length
    }
}
