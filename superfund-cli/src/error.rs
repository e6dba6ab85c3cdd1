//! Error types emitted by the Superfund CLI.
//!
//! Every stage error is wrapped rather than flattened so the message names
//! the layer, field or factor at fault.

use std::sync::Arc;

use camino::Utf8PathBuf;
use superfund_core::{ParameterError, ProjectionError};
use superfund_data::{ExportError, LayerError};
use superfund_scorer::ScoringError;
use thiserror::Error;

/// Errors emitted by the Superfund CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// The radii or weights failed validation.
    #[error("invalid scoring parameters: {0}")]
    InvalidParameters(#[from] ParameterError),
    /// The requested scoring frame is not a supported reference system.
    #[error("cannot score in EPSG:{code}: {source}")]
    TargetCrs {
        code: u32,
        #[source]
        source: ProjectionError,
    },
    /// A referenced input path does not exist on disk or is not a file.
    #[error("{field} path {path:?} does not exist or is not a file")]
    MissingSourceFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        field: &'static str,
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The output directory exists but is a file.
    #[error("output directory {path:?} is not a directory")]
    OutputDirectoryNotDirectory { path: Utf8PathBuf },
    /// An input layer could not be read or failed validation.
    #[error(transparent)]
    Load(#[from] LayerError),
    /// The scoring pipeline rejected the layers.
    #[error("scoring failed: {0}")]
    Score(#[from] ScoringError),
    /// The scored table could not be written.
    #[error(transparent)]
    Export(#[from] ExportError),
    /// Writing the run report failed.
    #[error("failed to write run report: {0}")]
    WriteReport(#[source] std::io::Error),
}
