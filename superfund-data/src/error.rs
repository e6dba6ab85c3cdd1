//! Error types raised while reading layers and writing scored tables.
#![forbid(unsafe_code)]

use std::io;

use camino::Utf8PathBuf;
use superfund_core::{LayerKind, ProjectionError, SiteError};
use thiserror::Error;

/// Errors raised while loading an input layer. Every variant is fatal.
#[derive(Debug, Error)]
pub enum LayerError {
    /// The layer file could not be opened or read.
    #[error("failed to read the {layer} layer from {path}")]
    Read {
        /// Layer being read.
        layer: LayerKind,
        /// Requested path.
        path: Utf8PathBuf,
        /// Source error from the filesystem.
        #[source]
        source: io::Error,
    },
    /// The file is not valid GeoJSON.
    #[error("the {layer} layer at {path} is not valid GeoJSON")]
    Parse {
        /// Layer being read.
        layer: LayerKind,
        /// Requested path.
        path: Utf8PathBuf,
        /// Source error from `geojson`.
        #[source]
        source: Box<geojson::Error>,
    },
    /// The document parsed but is not a `FeatureCollection`.
    #[error("the {layer} layer at {path} is not a GeoJSON FeatureCollection")]
    NotFeatureCollection {
        /// Layer being read.
        layer: LayerKind,
        /// Requested path.
        path: Utf8PathBuf,
    },
    /// The layer's `crs` member names an unknown or unsupported system.
    #[error("the {layer} layer declares an unusable coordinate reference system")]
    Projection {
        /// Layer being read.
        layer: LayerKind,
        /// Source error from the reference system parser.
        #[source]
        source: ProjectionError,
    },
    /// A required property is absent or null.
    #[error("feature {feature} of the {layer} layer has no {field:?} property")]
    MissingField {
        /// Layer being read.
        layer: LayerKind,
        /// Missing property name.
        field: &'static str,
        /// Zero-based feature position.
        feature: usize,
    },
    /// A required property has the wrong type or an invalid value.
    #[error("feature {feature} of the {layer} layer has an invalid {field:?} property: {reason}")]
    InvalidField {
        /// Layer being read.
        layer: LayerKind,
        /// Offending property name.
        field: &'static str,
        /// Zero-based feature position.
        feature: usize,
        /// What was wrong with the value.
        reason: String,
    },
    /// A site feature has no geometry.
    #[error("feature {feature} of the {layer} layer has no geometry")]
    MissingGeometry {
        /// Layer being read.
        layer: LayerKind,
        /// Zero-based feature position.
        feature: usize,
    },
    /// A geometry is of a type the layer does not accept.
    #[error("feature {feature} of the {layer} layer has unsupported {found} geometry")]
    UnsupportedGeometry {
        /// Layer being read.
        layer: LayerKind,
        /// Zero-based feature position.
        feature: usize,
        /// Geometry type found.
        found: &'static str,
    },
    /// A GeoJSON geometry could not be converted.
    #[error("feature {feature} of the {layer} layer has a malformed geometry")]
    Geometry {
        /// Layer being read.
        layer: LayerKind,
        /// Zero-based feature position.
        feature: usize,
        /// Source error from `geojson`.
        #[source]
        source: Box<geojson::Error>,
    },
    /// A site row violates a site invariant.
    #[error("feature {feature} of the sites layer is not a valid site")]
    Site {
        /// Zero-based feature position.
        feature: usize,
        /// Source error from site validation.
        #[source]
        source: SiteError,
    },
}

/// Errors raised while persisting a scored table.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The output directory could not be created.
    #[error("failed to create output directory for {path}")]
    CreateParent {
        /// Output path whose parent was requested.
        path: Utf8PathBuf,
        /// Source error from the filesystem.
        #[source]
        source: io::Error,
    },
    /// The output file could not be created or written.
    #[error("failed to write scored sites to {path}")]
    Write {
        /// Output path.
        path: Utf8PathBuf,
        /// Source error from the filesystem.
        #[source]
        source: io::Error,
    },
    /// The table could not be serialised.
    #[error("failed to serialise scored sites for {path}")]
    Serialise {
        /// Output path.
        path: Utf8PathBuf,
        /// Source error from `serde_json`.
        #[source]
        source: serde_json::Error,
    },
}
