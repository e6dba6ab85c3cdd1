//! Min-max rescaling of raw factors onto the common `[1, 100]` scale.
#![forbid(unsafe_code)]

use std::fmt;

use serde::Serialize;
use superfund_core::DegeneratePolicy;

use crate::ScoringError;

/// Lowest rescaled score; given to the minimum raw value.
pub const SCORE_FLOOR: f64 = 1.0;
/// Highest rescaled score; given to the maximum raw value.
pub const SCORE_CEILING: f64 = 100.0;

/// The four scored factors, named after their raw output columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Factor {
    /// Natural-area overlap (`nature_int_area`).
    Nature,
    /// Population in range (`POPULATION`).
    Population,
    /// School count in range (`school_count`).
    School,
    /// Site severity (`Site Score`).
    Severity,
}

impl Factor {
    /// Every factor, in output column order.
    pub const ALL: [Self; 4] = [Self::Nature, Self::Population, Self::School, Self::Severity];

    /// Name of the raw column this factor reads.
    #[must_use]
    pub const fn raw_column(self) -> &'static str {
        match self {
            Self::Nature => "nature_int_area",
            Self::Population => "POPULATION",
            Self::School => "school_count",
            Self::Severity => "Site Score",
        }
    }

    /// Name of the rescaled output column.
    #[must_use]
    pub const fn score_column(self) -> &'static str {
        match self {
            Self::Nature => "nature_score",
            Self::Population => "pop_score",
            Self::School => "school_score",
            Self::Severity => "severity_score",
        }
    }
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.raw_column())
    }
}

/// Rescale `values` so the minimum maps to [`SCORE_FLOOR`] and the maximum
/// to [`SCORE_CEILING`], linearly in between.
///
/// Output order matches input order. An empty slice yields an empty vector.
/// When every value is equal the range is zero and `policy` decides the
/// outcome.
///
/// # Errors
/// Returns [`ScoringError::DegenerateRange`] when the range is zero and
/// `policy` is [`DegeneratePolicy::Reject`].
///
/// # Examples
///
/// ```
/// use superfund_core::DegeneratePolicy;
/// use superfund_scorer::{Factor, rescale};
///
/// # fn main() -> Result<(), superfund_scorer::ScoringError> {
/// let scores = rescale(&[0.0, 5.0, 10.0], Factor::School, DegeneratePolicy::Midpoint)?;
/// assert_eq!(scores, vec![1.0, 50.5, 100.0]);
/// # Ok(())
/// # }
/// ```
#[expect(
    clippy::float_arithmetic,
    reason = "min-max rescaling is floating-point interpolation"
)]
pub fn rescale(
    values: &[f64],
    factor: Factor,
    policy: DegeneratePolicy,
) -> Result<Vec<f64>, ScoringError> {
    let Some(&first) = values.first() else {
        return Ok(Vec::new());
    };
    let (min, max) = values
        .iter()
        .copied()
        .fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let range = max - min;
    if range <= 0.0 {
        return degenerate(values.len(), factor, min, policy);
    }
    let span = SCORE_CEILING - SCORE_FLOOR;
    Ok(values
        .iter()
        .map(|v| (SCORE_FLOOR + (v - min) / range * span).clamp(SCORE_FLOOR, SCORE_CEILING))
        .collect())
}

#[expect(
    clippy::float_arithmetic,
    reason = "the midpoint is the mean of the score bounds"
)]
fn degenerate(
    len: usize,
    factor: Factor,
    value: f64,
    policy: DegeneratePolicy,
) -> Result<Vec<f64>, ScoringError> {
    let fill = match policy {
        DegeneratePolicy::Midpoint => (SCORE_FLOOR + SCORE_CEILING) / 2.0,
        DegeneratePolicy::Minimum => SCORE_FLOOR,
        DegeneratePolicy::Reject => {
            return Err(ScoringError::DegenerateRange { factor, value });
        }
    };
    log::warn!("every site has {factor} = {value}; assigning {fill} under the {policy} policy");
    Ok(vec![fill; len])
}
