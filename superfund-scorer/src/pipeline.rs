//! End-to-end scoring run over already-loaded layers.

use superfund_core::{Layers, ScoringConfig, Site, ensure_unique_ids};

use crate::factors::{
    FactorColumn, natural_area_overlap, population_in_range, school_count_in_range,
    severity_passthrough,
};
use crate::table::{FactorScores, RawFactors, RunSummary, ScoredSite, ScoredTable};
use crate::{Factor, ScoringError, exclude_sites, final_score, reproject_layers, rescale};

/// Score every site in `layers` under `config`.
///
/// Stages run in a fixed order: reprojection into the target frame, outlier
/// exclusion, the three exposure factors plus severity, per-factor rescaling
/// over the remaining sites, and weighted aggregation. Each stage builds new
/// values; `layers` is never modified.
///
/// An empty site set, before or after exclusion, produces an empty table.
///
/// # Errors
/// Returns [`ScoringError::Projection`] when a layer cannot be reprojected,
/// [`ScoringError::Site`] when two sites share an `EPA_ID`, and
/// [`ScoringError::DegenerateRange`] when a factor has zero range and the
/// configured policy rejects it.
pub fn score_sites(layers: &Layers, config: &ScoringConfig) -> Result<ScoredTable, ScoringError> {
    ensure_unique_ids(layers.sites.features())?;
    let target = config.target_crs;
    let projected = reproject_layers(layers, target)?;
    log::info!(
        "scoring {} sites against {} natural areas, {} population blocks and {} schools in {target}",
        projected.sites.len(),
        projected.natural_areas.len(),
        projected.population_blocks.len(),
        projected.schools.len(),
    );

    let sites = exclude_sites(projected.sites.features(), &config.excluded_site_names);
    let sites_excluded = projected.sites.len().saturating_sub(sites.len());
    if sites.is_empty() {
        log::warn!("no sites remain to score");
    }

    let radii = config.parameters.radii();
    let nature = natural_area_overlap(&sites, projected.natural_areas.features(), radii.natural_m());
    let population = population_in_range(
        &sites,
        projected.population_blocks.features(),
        radii.population_m(),
    );
    let schools = school_count_in_range(&sites, projected.schools.features(), radii.school_m());
    let severity = severity_passthrough(&sites);

    let raw = merge_columns(&sites, &nature, &population, &schools, &severity);
    let scores = rescale_all(&raw, config)?;

    let weights = config.parameters.weights();
    let scored: Vec<ScoredSite> = sites
        .into_iter()
        .zip(raw)
        .zip(scores)
        .map(|((site, raw_factors), factor_scores)| ScoredSite {
            final_score: final_score(&factor_scores, &weights),
            site,
            raw: raw_factors,
            scores: factor_scores,
        })
        .collect();

    let summary = summarise(&scored, sites_excluded);
    log::info!(
        "scored {} sites ({} excluded); empty results: {} natural area, {} population, {} school",
        summary.sites_scored,
        summary.sites_excluded,
        summary.empty_nature,
        summary.empty_population,
        summary.empty_schools,
    );
    Ok(ScoredTable::new(config.parameters, target, scored, summary))
}

/// Join the factor columns onto the sites by `EPA_ID`. A site missing from a
/// column takes that column's default.
fn merge_columns(
    sites: &[Site],
    nature: &FactorColumn<f64>,
    population: &FactorColumn<u64>,
    schools: &FactorColumn<u64>,
    severity: &FactorColumn<f64>,
) -> Vec<RawFactors> {
    sites
        .iter()
        .map(|site| RawFactors {
            nature_int_area: nature.get(&site.id).copied().unwrap_or_default(),
            population: population.get(&site.id).copied().unwrap_or_default(),
            school_count: schools.get(&site.id).copied().unwrap_or_default(),
            severity: severity.get(&site.id).copied().unwrap_or_default(),
        })
        .collect()
}

#[expect(
    clippy::cast_precision_loss,
    reason = "counts are rescaled as floating-point values"
)]
fn factor_values(raw: &[RawFactors], factor: Factor) -> Vec<f64> {
    raw.iter()
        .map(|r| match factor {
            Factor::Nature => r.nature_int_area,
            Factor::Population => r.population as f64,
            Factor::School => r.school_count as f64,
            Factor::Severity => r.severity,
        })
        .collect()
}

fn rescale_all(raw: &[RawFactors], config: &ScoringConfig) -> Result<Vec<FactorScores>, ScoringError> {
    let policy = config.degenerate_policy;
    let nature = rescale(&factor_values(raw, Factor::Nature), Factor::Nature, policy)?;
    let population = rescale(
        &factor_values(raw, Factor::Population),
        Factor::Population,
        policy,
    )?;
    let school = rescale(&factor_values(raw, Factor::School), Factor::School, policy)?;
    let severity = rescale(
        &factor_values(raw, Factor::Severity),
        Factor::Severity,
        policy,
    )?;
    Ok(nature
        .into_iter()
        .zip(population)
        .zip(school)
        .zip(severity)
        .map(|(((n, p), sc), sv)| FactorScores {
            nature: n,
            population: p,
            school: sc,
            severity: sv,
        })
        .collect())
}

fn summarise(scored: &[ScoredSite], sites_excluded: usize) -> RunSummary {
    RunSummary {
        sites_scored: scored.len(),
        sites_excluded,
        empty_nature: scored
            .iter()
            .filter(|s| s.raw.nature_int_area <= 0.0)
            .count(),
        empty_population: scored.iter().filter(|s| s.raw.population == 0).count(),
        empty_schools: scored.iter().filter(|s| s.raw.school_count == 0).count(),
    }
}
