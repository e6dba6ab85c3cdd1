//! Command-line interface for the Superfund remediation scoring engine.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod score;

pub use error::CliError;
use score::{ScoreArgs, run_score};

pub(crate) const ARG_SITES: &str = "sites";
pub(crate) const ARG_NATURAL_AREAS: &str = "natural-areas";
pub(crate) const ARG_POPULATION_BLOCKS: &str = "population-blocks";
pub(crate) const ARG_SCHOOLS: &str = "schools";
pub(crate) const ARG_NATURAL_RADIUS: &str = "natural-radius-km";
pub(crate) const ARG_SCHOOL_RADIUS: &str = "school-radius-km";
pub(crate) const ARG_POPULATION_RADIUS: &str = "population-radius-km";
pub(crate) const ARG_POPULATION_WEIGHT: &str = "population-weight";
pub(crate) const ARG_SCHOOL_WEIGHT: &str = "school-weight";
pub(crate) const ARG_NATURAL_WEIGHT: &str = "natural-weight";
pub(crate) const ARG_SEVERITY_WEIGHT: &str = "severity-weight";
pub(crate) const ARG_OUTPUT_DIR: &str = "output-dir";
pub(crate) const ARG_TARGET_EPSG: &str = "target-epsg";
pub(crate) const ARG_EXCLUDE_SITE: &str = "exclude-site";
pub(crate) const ARG_DEGENERATE_POLICY: &str = "degenerate-policy";

pub(crate) const ENV_SITES: &str = "SUPERFUND_CMDS_SCORE_SITES";
pub(crate) const ENV_NATURAL_AREAS: &str = "SUPERFUND_CMDS_SCORE_NATURAL_AREAS";
pub(crate) const ENV_POPULATION_BLOCKS: &str = "SUPERFUND_CMDS_SCORE_POPULATION_BLOCKS";
pub(crate) const ENV_SCHOOLS: &str = "SUPERFUND_CMDS_SCORE_SCHOOLS";
pub(crate) const ENV_NATURAL_RADIUS: &str = "SUPERFUND_CMDS_SCORE_NATURAL_RADIUS_KM";
pub(crate) const ENV_SCHOOL_RADIUS: &str = "SUPERFUND_CMDS_SCORE_SCHOOL_RADIUS_KM";
pub(crate) const ENV_POPULATION_RADIUS: &str = "SUPERFUND_CMDS_SCORE_POPULATION_RADIUS_KM";
pub(crate) const ENV_POPULATION_WEIGHT: &str = "SUPERFUND_CMDS_SCORE_POPULATION_WEIGHT";
pub(crate) const ENV_SCHOOL_WEIGHT: &str = "SUPERFUND_CMDS_SCORE_SCHOOL_WEIGHT";
pub(crate) const ENV_NATURAL_WEIGHT: &str = "SUPERFUND_CMDS_SCORE_NATURAL_WEIGHT";
pub(crate) const ENV_SEVERITY_WEIGHT: &str = "SUPERFUND_CMDS_SCORE_SEVERITY_WEIGHT";

/// Directory written to when `--output-dir` is not given.
pub const DEFAULT_OUTPUT_DIR: &str = "outputs";

/// Run the Superfund CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Score(args) => run_score(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "superfund",
    about = "Rank Superfund sites by proximity to people, schools and natural areas",
    version
)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Score every site and write the enriched table as GeoJSON.
    Score(ScoreArgs),
}

#[cfg(test)]
mod tests;
