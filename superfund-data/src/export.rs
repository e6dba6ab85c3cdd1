//! Result Emitter: the scored table out as GeoJSON.

use std::io::{BufWriter, Write};

use camino::{Utf8Path, Utf8PathBuf};
use geojson::{Feature, FeatureCollection, JsonObject, JsonValue};
use superfund_fs::{create_utf8_file, ensure_parent_dir};
use superfund_scorer::{ScoredSite, ScoredTable};

use crate::crs::crs_member;
use crate::load::{EPA_ID, SITE_NAME};
use crate::{ExportError, SiteAttributes};

/// File extension of written tables.
pub const ARTIFACT_EXTENSION: &str = "geojson";

/// Where a run's table is written: `<output_dir>/<artifact name>.geojson`.
#[must_use]
pub fn artifact_path(output_dir: &Utf8Path, table: &ScoredTable) -> Utf8PathBuf {
    output_dir.join(format!("{}.{ARTIFACT_EXTENSION}", table.artifact_name()))
}

/// Build the output collection: one feature per scored site, in table order,
/// declaring the table's reference system.
///
/// Properties are the site's original attributes overlaid with the computed
/// columns; a computed column replaces an original one of the same name.
///
/// # Errors
/// Returns a `serde_json` error if a computed column fails to serialise.
pub fn scored_sites_to_geojson(
    table: &ScoredTable,
    attributes: &SiteAttributes,
) -> Result<FeatureCollection, serde_json::Error> {
    let features = table
        .sites()
        .iter()
        .map(|scored| scored_feature(scored, attributes))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(FeatureCollection {
        bbox: None,
        features,
        foreign_members: Some(crs_member(table.crs())),
    })
}

fn scored_feature(
    scored: &ScoredSite,
    attributes: &SiteAttributes,
) -> Result<Feature, serde_json::Error> {
    let site = &scored.site;
    let mut properties = attributes.get(&site.id).cloned().unwrap_or_default();
    properties.insert(EPA_ID.to_owned(), JsonValue::from(site.id.as_str()));
    properties.insert(SITE_NAME.to_owned(), JsonValue::from(site.name.as_str()));
    merge_object(&mut properties, serde_json::to_value(scored.raw)?);
    merge_object(&mut properties, serde_json::to_value(scored.scores)?);
    properties.insert("final_score".to_owned(), JsonValue::from(scored.final_score));
    Ok(Feature {
        bbox: None,
        geometry: Some(geojson::Geometry::new(geojson::Value::from(&site.geometry))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    })
}

fn merge_object(target: &mut JsonObject, value: JsonValue) {
    if let JsonValue::Object(fields) = value {
        target.extend(fields);
    }
}

/// Write the scored table to `path` as GeoJSON, creating parent directories.
///
/// Identical tables produce byte-identical files.
///
/// # Errors
/// Returns [`ExportError`] when the directory or file cannot be created, or
/// the table cannot be serialised or written.
pub fn write_scored_sites(
    path: &Utf8Path,
    table: &ScoredTable,
    attributes: &SiteAttributes,
) -> Result<(), ExportError> {
    let collection =
        scored_sites_to_geojson(table, attributes).map_err(|source| ExportError::Serialise {
            path: path.to_path_buf(),
            source,
        })?;
    ensure_parent_dir(path).map_err(|source| ExportError::CreateParent {
        path: path.to_path_buf(),
        source,
    })?;
    let write_error = |source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    };
    let file = create_utf8_file(path).map_err(write_error)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &collection).map_err(|source| {
        ExportError::Serialise {
            path: path.to_path_buf(),
            source,
        }
    })?;
    writer.write_all(b"\n").map_err(write_error)?;
    writer.flush().map_err(write_error)?;
    log::info!("wrote {} scored sites to {path}", table.len());
    Ok(())
}
