//! Weighted combination of the rescaled factors.

use superfund_core::Weights;

use crate::FactorScores;

/// Combine the four rescaled scores into one value:
/// `sqrt(nature*Wn + population*Wp + severity*Wsev + school*Wsc)`.
///
/// Weights are used as supplied. With weights summing to one the result lies
/// in `[1, 10]`; otherwise no bound holds.
///
/// # Examples
///
/// ```
/// use superfund_core::Weights;
/// use superfund_scorer::{FactorScores, final_score};
///
/// let scores = FactorScores { nature: 100.0, population: 100.0, school: 100.0, severity: 100.0 };
/// let weights = Weights { population: 0.25, school: 0.25, natural: 0.25, severity: 0.25 };
/// assert_eq!(final_score(&scores, &weights), 10.0);
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "the composite score is a weighted sum under a square root"
)]
pub fn final_score(scores: &FactorScores, weights: &Weights) -> f64 {
    let weighted = scores.nature * weights.natural
        + scores.population * weights.population
        + scores.severity * weights.severity
        + scores.school * weights.school;
    weighted.sqrt()
}
