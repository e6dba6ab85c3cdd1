//! Layer Loader: GeoJSON files in, typed layers out.

use std::collections::BTreeMap;
use std::io::Read;

use camino::{Utf8Path, Utf8PathBuf};
use geo::{Geometry, MultiPolygon};
use geojson::{Feature, FeatureCollection, GeoJson, JsonObject};
use superfund_core::{
    Layer, LayerKind, Layers, NaturalArea, PopulationBlock, School, Site, SiteId,
};
use superfund_fs::open_utf8_file;

use crate::LayerError;
use crate::crs::declared_crs;
use crate::fields::{FieldContext, optional_label, required_count, required_number, required_string};

/// `EPA_ID` column.
pub const EPA_ID: &str = "EPA_ID";
/// `Site Name` column.
pub const SITE_NAME: &str = "Site Name";
/// `Site Score` column.
pub const SITE_SCORE: &str = "Site Score";
/// `POPULATION` column.
pub const POPULATION: &str = "POPULATION";
/// Optional census block label.
pub const GEOID: &str = "GEOID";

/// Original site properties keyed by `EPA_ID`, carried through to the output.
pub type SiteAttributes = BTreeMap<SiteId, JsonObject>;

/// Locations of the four input layers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerPaths {
    /// Contaminated sites.
    pub sites: Utf8PathBuf,
    /// Natural areas.
    pub natural_areas: Utf8PathBuf,
    /// Census population blocks.
    pub population_blocks: Utf8PathBuf,
    /// School points.
    pub schools: Utf8PathBuf,
}

/// The loaded layers plus the site attributes the scorer does not use.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedLayers {
    /// Typed layers ready for scoring.
    pub layers: Layers,
    /// Every original site property, keyed by `EPA_ID`.
    pub site_attributes: SiteAttributes,
}

/// Read all four layers.
///
/// # Errors
/// Returns the first [`LayerError`] met, reading layers in the order sites,
/// natural areas, population blocks, schools.
pub fn load_layers(paths: &LayerPaths) -> Result<LoadedLayers, LayerError> {
    let (sites, site_attributes) = read_sites(&paths.sites)?;
    let natural_areas = read_natural_areas(&paths.natural_areas)?;
    let population_blocks = read_population_blocks(&paths.population_blocks)?;
    let schools = read_schools(&paths.schools)?;
    Ok(LoadedLayers {
        layers: Layers {
            sites,
            natural_areas,
            population_blocks,
            schools,
        },
        site_attributes,
    })
}

/// Read the site layer from `path`.
///
/// # Errors
/// Returns [`LayerError`] when the file cannot be read or parsed, or a
/// feature lacks `EPA_ID`, `Site Name`, `Site Score` or a geometry.
pub fn read_sites(path: &Utf8Path) -> Result<(Layer<Site>, SiteAttributes), LayerError> {
    let collection = read_collection(LayerKind::Sites, path)?;
    let parsed = sites_from_collection(&collection)?;
    log_loaded(LayerKind::Sites, path, &parsed.0);
    Ok(parsed)
}

/// Read the natural-area layer from `path`.
///
/// # Errors
/// Returns [`LayerError`] when the file cannot be read or parsed, or a
/// geometry is not polygonal.
pub fn read_natural_areas(path: &Utf8Path) -> Result<Layer<NaturalArea>, LayerError> {
    let collection = read_collection(LayerKind::NaturalAreas, path)?;
    let layer = natural_areas_from_collection(&collection)?;
    log_loaded(LayerKind::NaturalAreas, path, &layer);
    Ok(layer)
}

/// Read the population-block layer from `path`.
///
/// # Errors
/// Returns [`LayerError`] when the file cannot be read or parsed, a
/// geometry is not polygonal, or `POPULATION` is missing or not a whole
/// non-negative count.
pub fn read_population_blocks(path: &Utf8Path) -> Result<Layer<PopulationBlock>, LayerError> {
    let collection = read_collection(LayerKind::PopulationBlocks, path)?;
    let layer = population_blocks_from_collection(&collection)?;
    log_loaded(LayerKind::PopulationBlocks, path, &layer);
    Ok(layer)
}

/// Read the school layer from `path`.
///
/// # Errors
/// Returns [`LayerError`] when the file cannot be read or parsed, or a
/// geometry is not a point or multipoint.
pub fn read_schools(path: &Utf8Path) -> Result<Layer<School>, LayerError> {
    let collection = read_collection(LayerKind::Schools, path)?;
    let layer = schools_from_collection(&collection)?;
    log_loaded(LayerKind::Schools, path, &layer);
    Ok(layer)
}

fn log_loaded<T>(kind: LayerKind, path: &Utf8Path, layer: &Layer<T>) {
    match layer.crs() {
        Some(crs) => log::info!("loaded {} {kind} features from {path} ({crs})", layer.len()),
        None => log::warn!(
            "loaded {} {kind} features from {path} with no reference system",
            layer.len()
        ),
    }
}

fn read_collection(layer: LayerKind, path: &Utf8Path) -> Result<FeatureCollection, LayerError> {
    let read_error = |source| LayerError::Read {
        layer,
        path: path.to_path_buf(),
        source,
    };
    let mut text = String::new();
    open_utf8_file(path)
        .map_err(read_error)?
        .read_to_string(&mut text)
        .map_err(read_error)?;
    let geojson = text
        .parse::<GeoJson>()
        .map_err(|source| LayerError::Parse {
            layer,
            path: path.to_path_buf(),
            source: Box::new(source),
        })?;
    match geojson {
        GeoJson::FeatureCollection(collection) => Ok(collection),
        GeoJson::Feature(_) | GeoJson::Geometry(_) => Err(LayerError::NotFeatureCollection {
            layer,
            path: path.to_path_buf(),
        }),
    }
}

fn collection_crs<T>(
    layer: LayerKind,
    collection: &FeatureCollection,
    features: Vec<T>,
) -> Result<Layer<T>, LayerError> {
    let declared =
        declared_crs(collection).map_err(|source| LayerError::Projection { layer, source })?;
    Ok(match declared {
        Some(crs) => Layer::new(crs, features),
        None => Layer::without_crs(features),
    })
}

fn feature_geometry(
    layer: LayerKind,
    index: usize,
    feature: &Feature,
) -> Result<Option<Geometry<f64>>, LayerError> {
    let Some(geometry) = &feature.geometry else {
        return Ok(None);
    };
    Geometry::<f64>::try_from(geometry.clone())
        .map(Some)
        .map_err(|source| LayerError::Geometry {
            layer,
            feature: index,
            source: Box::new(source),
        })
}

const fn geometry_name(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "Line",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Rect(_) => "Rect",
        Geometry::Triangle(_) => "Triangle",
    }
}

fn polygonal(
    layer: LayerKind,
    index: usize,
    geometry: Geometry<f64>,
) -> Result<MultiPolygon<f64>, LayerError> {
    match geometry {
        Geometry::Polygon(polygon) => Ok(MultiPolygon(vec![polygon])),
        Geometry::MultiPolygon(polygons) => Ok(polygons),
        other => Err(LayerError::UnsupportedGeometry {
            layer,
            feature: index,
            found: geometry_name(&other),
        }),
    }
}

fn skip_null_geometry(layer: LayerKind, index: usize) {
    log::warn!("skipping feature {index} of the {layer} layer: no geometry");
}

/// Build the site layer from a parsed collection.
///
/// # Errors
/// See [`read_sites`].
pub fn sites_from_collection(
    collection: &FeatureCollection,
) -> Result<(Layer<Site>, SiteAttributes), LayerError> {
    let layer = LayerKind::Sites;
    let mut sites = Vec::with_capacity(collection.features.len());
    let mut attributes = SiteAttributes::new();
    for (index, feature) in collection.features.iter().enumerate() {
        let ctx = FieldContext {
            layer,
            feature: index,
        };
        let properties = feature.properties.as_ref();
        let id = required_string(properties, EPA_ID, ctx)?;
        let name = required_string(properties, SITE_NAME, ctx)?;
        let severity = required_number(properties, SITE_SCORE, ctx)?;
        let geometry = feature_geometry(layer, index, feature)?.ok_or(
            LayerError::MissingGeometry {
                layer,
                feature: index,
            },
        )?;
        if !matches!(
            geometry,
            Geometry::Point(_)
                | Geometry::MultiPoint(_)
                | Geometry::Polygon(_)
                | Geometry::MultiPolygon(_)
        ) {
            return Err(LayerError::UnsupportedGeometry {
                layer,
                feature: index,
                found: geometry_name(&geometry),
            });
        }
        let site = Site::new(id, name, severity, geometry)
            .map_err(|source| LayerError::Site {
                feature: index,
                source,
            })?;
        attributes.insert(site.id.clone(), properties.cloned().unwrap_or_default());
        sites.push(site);
    }
    Ok((collection_crs(layer, collection, sites)?, attributes))
}

/// Build the natural-area layer from a parsed collection.
///
/// # Errors
/// See [`read_natural_areas`].
pub fn natural_areas_from_collection(
    collection: &FeatureCollection,
) -> Result<Layer<NaturalArea>, LayerError> {
    let layer = LayerKind::NaturalAreas;
    let mut areas = Vec::with_capacity(collection.features.len());
    for (index, feature) in collection.features.iter().enumerate() {
        let Some(geometry) = feature_geometry(layer, index, feature)? else {
            skip_null_geometry(layer, index);
            continue;
        };
        areas.push(NaturalArea {
            geometry: polygonal(layer, index, geometry)?,
        });
    }
    collection_crs(layer, collection, areas)
}

/// Build the population-block layer from a parsed collection.
///
/// Blocks are labelled by `GEOID` when present, otherwise by position.
///
/// # Errors
/// See [`read_population_blocks`].
pub fn population_blocks_from_collection(
    collection: &FeatureCollection,
) -> Result<Layer<PopulationBlock>, LayerError> {
    let layer = LayerKind::PopulationBlocks;
    let mut blocks = Vec::with_capacity(collection.features.len());
    for (index, feature) in collection.features.iter().enumerate() {
        let ctx = FieldContext {
            layer,
            feature: index,
        };
        let properties = feature.properties.as_ref();
        let population = required_count(properties, POPULATION, ctx)?;
        let Some(geometry) = feature_geometry(layer, index, feature)? else {
            skip_null_geometry(layer, index);
            continue;
        };
        blocks.push(PopulationBlock {
            id: optional_label(properties, GEOID).unwrap_or_else(|| format!("#{index}")),
            population,
            geometry: polygonal(layer, index, geometry)?,
        });
    }
    collection_crs(layer, collection, blocks)
}

/// Build the school layer from a parsed collection. A multipoint feature
/// yields one school per member.
///
/// # Errors
/// See [`read_schools`].
pub fn schools_from_collection(collection: &FeatureCollection) -> Result<Layer<School>, LayerError> {
    let layer = LayerKind::Schools;
    let mut schools = Vec::with_capacity(collection.features.len());
    for (index, feature) in collection.features.iter().enumerate() {
        match feature_geometry(layer, index, feature)? {
            None => skip_null_geometry(layer, index),
            Some(Geometry::Point(location)) => schools.push(School { location }),
            Some(Geometry::MultiPoint(points)) => {
                schools.extend(points.into_iter().map(|location| School { location }));
            }
            Some(other) => {
                return Err(LayerError::UnsupportedGeometry {
                    layer,
                    feature: index,
                    found: geometry_name(&other),
                });
            }
        }
    }
    collection_crs(layer, collection, schools)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;
    use superfund_core::Crs;

    fn collection(value: serde_json::Value) -> FeatureCollection {
        match value.to_string().parse::<GeoJson>() {
            Ok(GeoJson::FeatureCollection(fc)) => fc,
            other => panic!("expected a feature collection, got {other:?}"),
        }
    }

    #[rstest]
    fn sites_keep_their_original_attributes() {
        let fc = collection(json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [-74.0, 40.7]},
                "properties": {"EPA_ID": "NYD000000001", "Site Name": "Gowanus", "Site Score": 50.0, "County": "Kings"}
            }]
        }));
        let (sites, attributes) = sites_from_collection(&fc).expect("sites");
        assert_eq!(sites.crs(), Some(Crs::Wgs84));
        let attrs = attributes.get(&SiteId::from("NYD000000001")).expect("attributes");
        assert_eq!(attrs.get("County"), Some(&json!("Kings")));
    }

    #[rstest]
    #[case(json!({"Site Name": "x", "Site Score": 1}), "EPA_ID")]
    #[case(json!({"EPA_ID": "A", "Site Score": 1}), "Site Name")]
    #[case(json!({"EPA_ID": "A", "Site Name": "x"}), "Site Score")]
    fn sites_require_their_columns(#[case] properties: serde_json::Value, #[case] missing: &str) {
        let fc = collection(json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [0.0, 0.0]},
                "properties": properties
            }]
        }));
        let err = sites_from_collection(&fc).expect_err("missing column");
        assert!(
            matches!(err, LayerError::MissingField { field, feature: 0, .. } if field == missing),
            "unexpected error: {err}"
        );
    }

    #[rstest]
    fn sites_require_a_geometry() {
        let fc = collection(json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": null,
                "properties": {"EPA_ID": "A", "Site Name": "x", "Site Score": 1}
            }]
        }));
        assert!(matches!(
            sites_from_collection(&fc),
            Err(LayerError::MissingGeometry { .. })
        ));
    }

    #[rstest]
    fn population_blocks_fall_back_to_position_labels() {
        let fc = collection(json!({
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "geometry": {"type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,0]]]}, "properties": {"POPULATION": 12, "GEOID": "340010001001"}},
                {"type": "Feature", "geometry": null, "properties": {"POPULATION": 4}},
                {"type": "Feature", "geometry": {"type": "Polygon", "coordinates": [[[2,2],[3,2],[3,3],[2,2]]]}, "properties": {"POPULATION": 30.0}}
            ]
        }));
        let blocks = population_blocks_from_collection(&fc).expect("blocks");
        let labels: Vec<&str> = blocks.features().iter().map(|b| b.id.as_str()).collect();
        assert_eq!(labels, vec!["340010001001", "#2"]);
        assert_eq!(blocks.features().get(1).map(|b| b.population), Some(30));
    }

    #[rstest]
    fn natural_areas_reject_points() {
        let fc = collection(json!({
            "type": "FeatureCollection",
            "features": [{"type": "Feature", "geometry": {"type": "Point", "coordinates": [0, 0]}, "properties": {}}]
        }));
        assert!(matches!(
            natural_areas_from_collection(&fc),
            Err(LayerError::UnsupportedGeometry { found: "Point", .. })
        ));
    }

    #[rstest]
    fn multipoint_schools_expand() {
        let fc = collection(json!({
            "type": "FeatureCollection",
            "crs": {"type": "name", "properties": {"name": "urn:ogc:def:crs:EPSG::26918"}},
            "features": [
                {"type": "Feature", "geometry": {"type": "MultiPoint", "coordinates": [[1, 1], [2, 2]]}, "properties": null},
                {"type": "Feature", "geometry": {"type": "Point", "coordinates": [3, 3]}, "properties": null}
            ]
        }));
        let schools = schools_from_collection(&fc).expect("schools");
        assert_eq!(schools.len(), 3);
        assert_eq!(schools.crs().map(Crs::epsg), Some(26918));
    }
}
