//! Typed geospatial layers consumed by the scoring pipeline.

use std::fmt;

use geo::{MultiPolygon, Point};

use crate::{Crs, Site};

/// Identifies one of the four input layers in logs and errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LayerKind {
    /// Contaminated sites.
    Sites,
    /// Ecologically significant land.
    NaturalAreas,
    /// Census population blocks.
    PopulationBlocks,
    /// School locations.
    Schools,
}

impl LayerKind {
    /// Human-readable layer name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sites => "sites",
            Self::NaturalAreas => "natural areas",
            Self::PopulationBlocks => "population blocks",
            Self::Schools => "schools",
        }
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A homogeneous collection of features tagged with its reference system.
///
/// The reference system is optional so that a layer read without one can be
/// represented; the pipeline refuses to score it.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer<T> {
    crs: Option<Crs>,
    features: Vec<T>,
}

impl<T> Layer<T> {
    /// Build a layer whose coordinates are expressed in `crs`.
    #[must_use]
    pub const fn new(crs: Crs, features: Vec<T>) -> Self {
        Self {
            crs: Some(crs),
            features,
        }
    }

    /// Build a layer with no declared reference system.
    #[must_use]
    pub const fn without_crs(features: Vec<T>) -> Self {
        Self {
            crs: None,
            features,
        }
    }

    /// Declared reference system, if any.
    #[must_use]
    pub const fn crs(&self) -> Option<Crs> {
        self.crs
    }

    /// Borrow the features.
    #[must_use]
    pub fn features(&self) -> &[T] {
        &self.features
    }

    /// Number of features.
    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Whether the layer has no features.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Consume the layer and return its features.
    #[must_use]
    pub fn into_features(self) -> Vec<T> {
        self.features
    }
}

/// One natural-area polygon. Only the union of all areas matters for scoring.
#[derive(Debug, Clone, PartialEq)]
pub struct NaturalArea {
    /// Area footprint.
    pub geometry: MultiPolygon<f64>,
}

/// A census block with its resident count.
#[derive(Debug, Clone, PartialEq)]
pub struct PopulationBlock {
    /// Block label (`GEOID` when present). Blocks sharing a label are the
    /// same block and are counted once per site.
    pub id: String,
    /// People living in the block.
    pub population: u64,
    /// Block footprint.
    pub geometry: MultiPolygon<f64>,
}

/// A school location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct School {
    /// School position.
    pub location: Point<f64>,
}

/// The four input layers as supplied by the loader.
#[derive(Debug, Clone, PartialEq)]
pub struct Layers {
    /// Sites to score.
    pub sites: Layer<Site>,
    /// Natural areas to dissolve.
    pub natural_areas: Layer<NaturalArea>,
    /// Population blocks.
    pub population_blocks: Layer<PopulationBlock>,
    /// School points.
    pub schools: Layer<School>,
}
