//! Core domain types for the Superfund remediation scoring engine.
//!
//! These models provide basic validation to keep downstream
//! components honest. Constructors return `Result` to surface
//! invalid input early; the pipeline itself lives in `superfund-scorer`.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod crs;
mod index;
mod layer;
mod params;
mod site;

pub use crs::{Crs, DEFAULT_TARGET_CRS, Hemisphere, ProjectionError, UtmZone};
pub use index::FeatureIndex;
pub use layer::{Layer, LayerKind, Layers, NaturalArea, PopulationBlock, School};
pub use params::{
    DEFAULT_EXCLUDED_SITE, DegeneratePolicy, ParameterError, Radii, ScoringConfig,
    ScoringParameters, WEIGHT_SUM_TOLERANCE, Weights,
};
pub use site::{Site, SiteError, SiteId, ensure_unique_ids};
