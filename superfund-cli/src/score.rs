//! Score command implementation for the Superfund CLI.

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use superfund_core::{
    Crs, DegeneratePolicy, Radii, ScoringConfig, ScoringParameters, Weights,
};
use superfund_data::{LayerPaths, artifact_path, load_layers, write_scored_sites};
use superfund_scorer::{ScoredTable, score_sites};

use crate::{
    ARG_DEGENERATE_POLICY, ARG_EXCLUDE_SITE, ARG_NATURAL_AREAS, ARG_NATURAL_RADIUS,
    ARG_NATURAL_WEIGHT, ARG_OUTPUT_DIR, ARG_POPULATION_BLOCKS, ARG_POPULATION_RADIUS,
    ARG_POPULATION_WEIGHT, ARG_SCHOOL_RADIUS, ARG_SCHOOL_WEIGHT, ARG_SCHOOLS, ARG_SEVERITY_WEIGHT,
    ARG_SITES, ARG_TARGET_EPSG, CliError, DEFAULT_OUTPUT_DIR, ENV_NATURAL_AREAS,
    ENV_NATURAL_RADIUS, ENV_NATURAL_WEIGHT, ENV_POPULATION_BLOCKS, ENV_POPULATION_RADIUS,
    ENV_POPULATION_WEIGHT, ENV_SCHOOL_RADIUS, ENV_SCHOOL_WEIGHT, ENV_SCHOOLS,
    ENV_SEVERITY_WEIGHT, ENV_SITES,
};

/// CLI arguments for the `score` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Score Superfund sites against population blocks, school \
                 points and natural areas within the given radii, rescale each \
                 factor to [1, 100] and combine them with the given weights. \
                 Paths and parameters can come from CLI flags, configuration \
                 files, or environment variables.",
    about = "Score and rank Superfund sites"
)]
#[ortho_config(prefix = "SUPERFUND")]
pub(crate) struct ScoreArgs {
    /// GeoJSON layer of Superfund sites.
    #[arg(long = ARG_SITES, value_name = "path")]
    #[serde(default)]
    pub(crate) sites: Option<Utf8PathBuf>,
    /// GeoJSON layer of natural area polygons.
    #[arg(long = ARG_NATURAL_AREAS, value_name = "path")]
    #[serde(default)]
    pub(crate) natural_areas: Option<Utf8PathBuf>,
    /// GeoJSON layer of census blocks carrying `POPULATION`.
    #[arg(long = ARG_POPULATION_BLOCKS, value_name = "path")]
    #[serde(default)]
    pub(crate) population_blocks: Option<Utf8PathBuf>,
    /// GeoJSON layer of school points.
    #[arg(long = ARG_SCHOOLS, value_name = "path")]
    #[serde(default)]
    pub(crate) schools: Option<Utf8PathBuf>,
    /// Natural area search radius in kilometres.
    #[arg(long = ARG_NATURAL_RADIUS, value_name = "km")]
    #[serde(default)]
    pub(crate) natural_radius_km: Option<f64>,
    /// School search radius in kilometres.
    #[arg(long = ARG_SCHOOL_RADIUS, value_name = "km")]
    #[serde(default)]
    pub(crate) school_radius_km: Option<f64>,
    /// Population search radius in kilometres.
    #[arg(long = ARG_POPULATION_RADIUS, value_name = "km")]
    #[serde(default)]
    pub(crate) population_radius_km: Option<f64>,
    /// Weight of the population score.
    #[arg(long = ARG_POPULATION_WEIGHT, value_name = "weight")]
    #[serde(default)]
    pub(crate) population_weight: Option<f64>,
    /// Weight of the school score.
    #[arg(long = ARG_SCHOOL_WEIGHT, value_name = "weight")]
    #[serde(default)]
    pub(crate) school_weight: Option<f64>,
    /// Weight of the natural area score.
    #[arg(long = ARG_NATURAL_WEIGHT, value_name = "weight")]
    #[serde(default)]
    pub(crate) natural_weight: Option<f64>,
    /// Weight of the severity score.
    #[arg(long = ARG_SEVERITY_WEIGHT, value_name = "weight")]
    #[serde(default)]
    pub(crate) severity_weight: Option<f64>,
    /// Directory receiving the scored table (default `outputs`).
    #[arg(long = ARG_OUTPUT_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) output_dir: Option<Utf8PathBuf>,
    /// Projected metric reference system to score in (default 26918).
    #[arg(long = ARG_TARGET_EPSG, value_name = "code")]
    #[serde(default)]
    pub(crate) target_epsg: Option<u32>,
    /// Site names to drop before scoring; replaces the default exclusion.
    #[arg(long = ARG_EXCLUDE_SITE, value_name = "name")]
    #[serde(default)]
    pub(crate) exclude_site: Option<Vec<String>>,
    /// Handling of a factor on which every site ties: midpoint, minimum or reject.
    #[arg(long = ARG_DEGENERATE_POLICY, value_name = "policy")]
    #[serde(default)]
    pub(crate) degenerate_policy: Option<DegeneratePolicy>,
}

impl ScoreArgs {
    pub(crate) fn into_config(self) -> Result<ScoreConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ScoreConfig::try_from(merged)
    }
}

/// Resolved `score` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ScoreConfig {
    /// The four input layers.
    pub(crate) layers: LayerPaths,
    /// Parameters, frame, exclusions and tie policy.
    pub(crate) scoring: ScoringConfig,
    /// Directory receiving the scored table.
    pub(crate) output_dir: Utf8PathBuf,
}

impl ScoreConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        Self::require_existing(&self.layers.sites, ARG_SITES)?;
        Self::require_existing(&self.layers.natural_areas, ARG_NATURAL_AREAS)?;
        Self::require_existing(&self.layers.population_blocks, ARG_POPULATION_BLOCKS)?;
        Self::require_existing(&self.layers.schools, ARG_SCHOOLS)?;
        self.require_output_dir()
    }

    fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
        match superfund_fs::file_is_file(path) {
            Ok(true) => Ok(()),
            Ok(false) => Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            }),
            Err(source) => Err(CliError::InspectSourcePath {
                field,
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    fn require_output_dir(&self) -> Result<(), CliError> {
        match superfund_fs::file_is_file(&self.output_dir) {
            Ok(false) => Ok(()),
            Ok(true) => Err(CliError::OutputDirectoryNotDirectory {
                path: self.output_dir.clone(),
            }),
            Err(source) => Err(CliError::InspectSourcePath {
                field: ARG_OUTPUT_DIR,
                path: self.output_dir.clone(),
                source,
            }),
        }
    }
}

fn required<T>(value: Option<T>, field: &'static str, env: &'static str) -> Result<T, CliError> {
    value.ok_or(CliError::MissingArgument { field, env })
}

impl TryFrom<ScoreArgs> for ScoreConfig {
    type Error = CliError;

    fn try_from(args: ScoreArgs) -> Result<Self, Self::Error> {
        let layers = LayerPaths {
            sites: required(args.sites, ARG_SITES, ENV_SITES)?,
            natural_areas: required(args.natural_areas, ARG_NATURAL_AREAS, ENV_NATURAL_AREAS)?,
            population_blocks: required(
                args.population_blocks,
                ARG_POPULATION_BLOCKS,
                ENV_POPULATION_BLOCKS,
            )?,
            schools: required(args.schools, ARG_SCHOOLS, ENV_SCHOOLS)?,
        };
        let radii = Radii {
            natural_km: required(args.natural_radius_km, ARG_NATURAL_RADIUS, ENV_NATURAL_RADIUS)?,
            school_km: required(args.school_radius_km, ARG_SCHOOL_RADIUS, ENV_SCHOOL_RADIUS)?,
            population_km: required(
                args.population_radius_km,
                ARG_POPULATION_RADIUS,
                ENV_POPULATION_RADIUS,
            )?,
        };
        let weights = Weights {
            population: required(
                args.population_weight,
                ARG_POPULATION_WEIGHT,
                ENV_POPULATION_WEIGHT,
            )?,
            school: required(args.school_weight, ARG_SCHOOL_WEIGHT, ENV_SCHOOL_WEIGHT)?,
            natural: required(args.natural_weight, ARG_NATURAL_WEIGHT, ENV_NATURAL_WEIGHT)?,
            severity: required(args.severity_weight, ARG_SEVERITY_WEIGHT, ENV_SEVERITY_WEIGHT)?,
        };

        let mut scoring = ScoringConfig::new(ScoringParameters::new(radii, weights)?)
            .with_degenerate_policy(args.degenerate_policy.unwrap_or_default());
        if let Some(code) = args.target_epsg {
            let crs = Crs::from_epsg(code).map_err(|source| CliError::TargetCrs { code, source })?;
            scoring = scoring.with_target_crs(crs);
        }
        if let Some(names) = args.exclude_site {
            scoring = scoring.with_excluded_site_names(names);
        }

        let output_dir = args
            .output_dir
            .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_OUTPUT_DIR));

        Ok(Self {
            layers,
            scoring,
            output_dir,
        })
    }
}

pub(super) fn run_score(args: ScoreArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_score_with(args, &mut stdout)
}

/// Score, write the table, then report the written path and the ranking to
/// `writer`. Nothing is written when any stage fails.
pub(super) fn run_score_with(args: ScoreArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = resolve_score_config(args)?;
    let parameters = config.scoring.parameters;
    if !parameters.weights_sum_to_one() {
        log::warn!(
            "weights sum to {}, not 1; final scores are not normalised",
            parameters.weight_sum()
        );
    }

    let loaded = load_layers(&config.layers)?;
    let table = score_sites(&loaded.layers, &config.scoring)?;
    let path = artifact_path(&config.output_dir, &table);
    write_scored_sites(&path, &table, &loaded.site_attributes)?;
    write_report(writer, &path, &table)
}

fn resolve_score_config(args: ScoreArgs) -> Result<ScoreConfig, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    Ok(config)
}

fn write_report(writer: &mut dyn Write, path: &Utf8Path, table: &ScoredTable) -> Result<(), CliError> {
    writeln!(writer, "{path}").map_err(CliError::WriteReport)?;
    for entry in table.ranked() {
        writeln!(
            writer,
            "{}\t{}\t{:.3}",
            entry.rank, entry.site.site.id, entry.site.final_score
        )
        .map_err(CliError::WriteReport)?;
    }
    Ok(())
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<ScoreConfig, CliError> {
    let merged = ScoreArgs::merge_from_layers(layers).map_err(CliError::from)?;
    ScoreConfig::try_from(merged)
}
