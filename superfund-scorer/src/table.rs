//! The enriched site table returned by a scoring run.

use std::cmp::Ordering;

use serde::Serialize;
use superfund_core::{Crs, ScoringParameters, Site};

/// Raw factor values for one site, before rescaling.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct RawFactors {
    /// Natural-area overlap in square metres (`nature_int_area`).
    pub nature_int_area: f64,
    /// Residents of intersecting census blocks (`POPULATION`).
    #[serde(rename = "POPULATION")]
    pub population: u64,
    /// Schools inside the buffer (`school_count`).
    pub school_count: u64,
    /// Pre-existing severity (`Site Score`).
    #[serde(rename = "Site Score")]
    pub severity: f64,
}

/// Rescaled factor scores for one site, each in `[1, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FactorScores {
    /// `nature_score`.
    #[serde(rename = "nature_score")]
    pub nature: f64,
    /// `pop_score`.
    #[serde(rename = "pop_score")]
    pub population: f64,
    /// `school_score`.
    #[serde(rename = "school_score")]
    pub school: f64,
    /// `severity_score`.
    #[serde(rename = "severity_score")]
    pub severity: f64,
}

/// A site with every computed column attached.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredSite {
    /// The site in the scoring frame.
    pub site: Site,
    /// Raw factor values.
    pub raw: RawFactors,
    /// Rescaled factor values.
    pub scores: FactorScores,
    /// Weighted composite (`final_score`).
    pub final_score: f64,
}

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RunSummary {
    /// Sites that received a score.
    pub sites_scored: usize,
    /// Sites removed by the outlier filter.
    pub sites_excluded: usize,
    /// Sites with no natural-area overlap.
    pub empty_nature: usize,
    /// Sites with no intersecting population block.
    pub empty_population: usize,
    /// Sites with no school in range.
    pub empty_schools: usize,
}

/// A scored site together with its position in the priority order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedSite<'a> {
    /// 1-based rank; 1 is the highest priority.
    pub rank: usize,
    /// The scored site.
    pub site: &'a ScoredSite,
}

/// Output of [`score_sites`](crate::score_sites): the enriched sites in input
/// order plus the parameters and frame that produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredTable {
    parameters: ScoringParameters,
    crs: Crs,
    sites: Vec<ScoredSite>,
    summary: RunSummary,
}

impl ScoredTable {
    pub(crate) const fn new(
        parameters: ScoringParameters,
        crs: Crs,
        sites: Vec<ScoredSite>,
        summary: RunSummary,
    ) -> Self {
        Self {
            parameters,
            crs,
            sites,
            summary,
        }
    }

    /// The exact parameters used for this run.
    #[must_use]
    pub const fn parameters(&self) -> &ScoringParameters {
        &self.parameters
    }

    /// Reference system of every site geometry in the table.
    #[must_use]
    pub const fn crs(&self) -> Crs {
        self.crs
    }

    /// Scored sites in input order.
    #[must_use]
    pub fn sites(&self) -> &[ScoredSite] {
        &self.sites
    }

    /// Run counts.
    #[must_use]
    pub const fn summary(&self) -> RunSummary {
        self.summary
    }

    /// Number of scored sites.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sites.len()
    }

    /// Whether no site was scored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// Deterministic artifact name for this run; see [`artifact_name`].
    #[must_use]
    pub fn artifact_name(&self) -> String {
        artifact_name(&self.parameters)
    }

    /// Sites ordered by `final_score`, highest first. Ties are broken by
    /// `EPA_ID` ascending so the order is total and repeatable.
    #[must_use]
    pub fn ranked(&self) -> Vec<RankedSite<'_>> {
        let mut ordered: Vec<&ScoredSite> = self.sites.iter().collect();
        ordered.sort_by(|a, b| {
            b.final_score
                .partial_cmp(&a.final_score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.site.id.cmp(&b.site.id))
        });
        ordered
            .into_iter()
            .zip(1..)
            .map(|(site, rank)| RankedSite { rank, site })
            .collect()
    }
}

/// Encode all seven parameters into an artifact name:
/// `nat{N}_school{S}_pop{P}_weights_{Wpop}_{Wschool}_{Wnat}_{Wsev}`.
///
/// Numbers use the shortest form that round-trips and always carries a
/// decimal point, so `1` km prints as `1.0`.
///
/// # Examples
///
/// ```
/// use superfund_core::{Radii, ScoringParameters, Weights};
/// use superfund_scorer::artifact_name;
///
/// # fn main() -> Result<(), superfund_core::ParameterError> {
/// let params = ScoringParameters::new(
///     Radii { natural_km: 1.0, school_km: 0.5, population_km: 2.0 },
///     Weights { population: 0.4, school: 0.2, natural: 0.3, severity: 0.1 },
/// )?;
/// assert_eq!(
///     artifact_name(&params),
///     "nat1.0_school0.5_pop2.0_weights_0.4_0.2_0.3_0.1"
/// );
/// # Ok(())
/// # }
/// ```
#[must_use]
pub fn artifact_name(parameters: &ScoringParameters) -> String {
    let radii = parameters.radii();
    let weights = parameters.weights();
    format!(
        "nat{:?}_school{:?}_pop{:?}_weights_{:?}_{:?}_{:?}_{:?}",
        radii.natural_km,
        radii.school_km,
        radii.population_km,
        weights.population,
        weights.school,
        weights.natural,
        weights.severity,
    )
}
