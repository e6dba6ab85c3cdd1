//! Analyst-supplied parameters and the run configuration threaded through
//! the pipeline.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Crs, DEFAULT_TARGET_CRS};

/// Site name removed from every run unless the caller overrides it. Its
/// footprint dwarfs every other site and would flatten the rescaled factors.
pub const DEFAULT_EXCLUDED_SITE: &str = "Hudson River PCBs";

/// Tolerance used when checking whether the weights sum to one.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

const METRES_PER_KILOMETRE: f64 = 1000.0;

/// Proximity radii in kilometres.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Radii {
    /// Natural-area overlap radius.
    pub natural_km: f64,
    /// School count radius.
    pub school_km: f64,
    /// Population radius.
    pub population_km: f64,
}

impl Radii {
    /// Natural-area radius in metres.
    #[must_use]
    pub fn natural_m(&self) -> f64 {
        self.natural_km * METRES_PER_KILOMETRE
    }

    /// School radius in metres.
    #[must_use]
    pub fn school_m(&self) -> f64 {
        self.school_km * METRES_PER_KILOMETRE
    }

    /// Population radius in metres.
    #[must_use]
    pub fn population_m(&self) -> f64 {
        self.population_km * METRES_PER_KILOMETRE
    }
}

/// Relative importance of each factor in the final score.
///
/// Weights are taken as supplied. Nothing forces them to sum to one; see
/// [`Weights::sum_to_one`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Weights {
    /// Population weight.
    pub population: f64,
    /// School weight.
    pub school: f64,
    /// Natural-area weight.
    pub natural: f64,
    /// Severity weight.
    pub severity: f64,
}

impl Weights {
    /// Sum of the four weights.
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.population + self.school + self.natural + self.severity
    }

    /// Whether the weights sum to one within [`WEIGHT_SUM_TOLERANCE`].
    #[must_use]
    pub fn sum_to_one(&self) -> bool {
        (self.sum() - 1.0).abs() <= WEIGHT_SUM_TOLERANCE
    }
}

/// Errors raised while validating parameters.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ParameterError {
    /// A radius was zero, negative, or not finite.
    #[error("{name} must be a finite distance greater than zero (got {value})")]
    NonPositiveRadius {
        /// Parameter name.
        name: &'static str,
        /// Rejected value.
        value: f64,
    },
    /// A weight was negative or not finite.
    #[error("{name} must be a finite, non-negative number (got {value})")]
    InvalidWeight {
        /// Parameter name.
        name: &'static str,
        /// Rejected value.
        value: f64,
    },
    /// A degenerate-range policy name was not recognised.
    #[error("unknown degenerate range policy {value:?} (expected midpoint, minimum or reject)")]
    UnknownPolicy {
        /// Text that failed to parse.
        value: String,
    },
}

/// The validated seven-value parameter record.
///
/// # Examples
///
/// ```
/// use superfund_core::{Radii, ScoringParameters, Weights};
///
/// # fn main() -> Result<(), superfund_core::ParameterError> {
/// let params = ScoringParameters::new(
///     Radii { natural_km: 1.0, school_km: 1.0, population_km: 2.0 },
///     Weights { population: 0.4, school: 0.2, natural: 0.2, severity: 0.2 },
/// )?;
/// assert_eq!(params.radii().population_m(), 2000.0);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ScoringParameters {
    radii: Radii,
    weights: Weights,
}

impl ScoringParameters {
    /// Validate and construct the parameter record.
    ///
    /// # Errors
    /// Returns [`ParameterError::NonPositiveRadius`] when a radius is not a
    /// finite positive number and [`ParameterError::InvalidWeight`] when a
    /// weight is negative or not finite.
    pub fn new(radii: Radii, weights: Weights) -> Result<Self, ParameterError> {
        for (name, value) in [
            ("natural_radius_km", radii.natural_km),
            ("school_radius_km", radii.school_km),
            ("population_radius_km", radii.population_km),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ParameterError::NonPositiveRadius { name, value });
            }
        }
        for (name, value) in [
            ("population_weight", weights.population),
            ("school_weight", weights.school),
            ("natural_weight", weights.natural),
            ("severity_weight", weights.severity),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ParameterError::InvalidWeight { name, value });
            }
        }
        Ok(Self { radii, weights })
    }

    /// Proximity radii.
    #[must_use]
    pub const fn radii(&self) -> Radii {
        self.radii
    }

    /// Factor weights.
    #[must_use]
    pub const fn weights(&self) -> Weights {
        self.weights
    }

    /// Sum of the four weights.
    #[must_use]
    pub fn weight_sum(&self) -> f64 {
        self.weights.sum()
    }

    /// Whether the weights sum to one. The engine never enforces this.
    #[must_use]
    pub fn weights_sum_to_one(&self) -> bool {
        self.weights.sum_to_one()
    }
}

/// How to rescale a factor on which every site is tied.
///
/// Min-max rescaling divides by `max - min`, which is zero in that case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum DegeneratePolicy {
    /// Every site receives 50.5, the midpoint of `[1, 100]`.
    #[default]
    Midpoint,
    /// Every site receives 1, the bottom of the range.
    Minimum,
    /// Abort the run.
    Reject,
}

impl fmt::Display for DegeneratePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Midpoint => "midpoint",
            Self::Minimum => "minimum",
            Self::Reject => "reject",
        })
    }
}

impl FromStr for DegeneratePolicy {
    type Err = ParameterError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "midpoint" => Ok(Self::Midpoint),
            "minimum" | "min" => Ok(Self::Minimum),
            "reject" => Ok(Self::Reject),
            _ => Err(ParameterError::UnknownPolicy {
                value: value.to_owned(),
            }),
        }
    }
}

/// Everything a scoring run needs besides the layers themselves.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringConfig {
    /// Radii and weights.
    pub parameters: ScoringParameters,
    /// Planar metric frame for buffering and area computation.
    pub target_crs: Crs,
    /// Exact `Site Name` values removed before scoring.
    pub excluded_site_names: Vec<String>,
    /// Handling of zero-variance factors.
    pub degenerate_policy: DegeneratePolicy,
}

impl ScoringConfig {
    /// Configuration with the default frame, sentinel and policy.
    #[must_use]
    pub fn new(parameters: ScoringParameters) -> Self {
        Self {
            parameters,
            target_crs: DEFAULT_TARGET_CRS,
            excluded_site_names: vec![DEFAULT_EXCLUDED_SITE.to_owned()],
            degenerate_policy: DegeneratePolicy::default(),
        }
    }

    /// Replace the target reference system.
    #[must_use]
    pub const fn with_target_crs(mut self, crs: Crs) -> Self {
        self.target_crs = crs;
        self
    }

    /// Replace the excluded site names.
    #[must_use]
    pub fn with_excluded_site_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_site_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the degenerate-range policy.
    #[must_use]
    pub const fn with_degenerate_policy(mut self, policy: DegeneratePolicy) -> Self {
        self.degenerate_policy = policy;
        self
    }
}
