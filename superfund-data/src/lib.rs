//! GeoJSON input and output for the Superfund scoring engine.
//!
//! Responsibilities:
//! - Read the four input layers, validate their schemas and detect each
//!   layer's reference system from the `crs` member.
//! - Write the scored site table, with the original site attributes, as a
//!   GeoJSON `FeatureCollection` in the scoring frame.
//!
//! Boundaries:
//! - Scoring rules live in `superfund-scorer`; nothing here computes factors.
//! - All filesystem access goes through `superfund-fs`.
//!
//! Invariants:
//! - A layer that fails validation is rejected whole; no partial layer is
//!   returned.
//! - Output is deterministic: features follow table order and property maps
//!   are sorted.

#![forbid(unsafe_code)]

mod crs;
mod error;
mod export;
mod fields;
mod load;

pub use error::{ExportError, LayerError};
pub use export::{ARTIFACT_EXTENSION, artifact_path, scored_sites_to_geojson, write_scored_sites};
pub use load::{
    EPA_ID, GEOID, LayerPaths, LoadedLayers, POPULATION, SITE_NAME, SITE_SCORE, SiteAttributes,
    load_layers, natural_areas_from_collection, population_blocks_from_collection,
    read_natural_areas, read_population_blocks, read_schools, read_sites,
    schools_from_collection, sites_from_collection,
};
