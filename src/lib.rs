//! Facade crate for the Superfund remediation scoring engine.
//!
//! This crate re-exports the core domain types and the scoring pipeline, and
//! exposes the GeoJSON loader and emitter behind the `geojson` feature.

#![forbid(unsafe_code)]

pub use superfund_core::{
    Crs, DEFAULT_EXCLUDED_SITE, DEFAULT_TARGET_CRS, DegeneratePolicy, Layer, LayerKind, Layers,
    NaturalArea, ParameterError, PopulationBlock, ProjectionError, Radii, School,
    ScoringConfig, ScoringParameters, Site, SiteError, SiteId, Weights,
};
pub use superfund_scorer::{
    Factor, FactorScores, RankedSite, RawFactors, RunSummary, ScoredSite, ScoredTable,
    ScoringError, artifact_name, score_sites,
};

#[cfg(feature = "geojson")]
pub use superfund_data::{
    ExportError, LayerError, LayerPaths, LoadedLayers, artifact_path, load_layers,
    write_scored_sites,
};
