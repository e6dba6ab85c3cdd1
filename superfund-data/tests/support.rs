//! Fixture layers written to temporary directories.

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use serde_json::{Value, json};
use superfund_data::LayerPaths;

/// Write `value` as `<dir>/<name>.geojson` and return the path.
pub fn write_layer(dir: &Utf8Path, name: &str, value: &Value) -> Utf8PathBuf {
    let path = dir.join(format!("{name}.geojson"));
    fs::write(&path, value.to_string())
        .unwrap_or_else(|err| panic!("write fixture layer {path}: {err}"));
    path
}

/// A UTF-8 view of a temporary directory.
pub fn utf8_dir(dir: &tempfile::TempDir) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(dir.path().to_path_buf())
        .unwrap_or_else(|path| panic!("temporary directory {path:?} is not UTF-8"))
}

fn point_feature(lon: f64, lat: f64, properties: Value) -> Value {
    json!({
        "type": "Feature",
        "geometry": {"type": "Point", "coordinates": [lon, lat]},
        "properties": properties
    })
}

#[expect(
    clippy::float_arithmetic,
    reason = "square corners are offsets from the centre"
)]
fn square_feature(lon: f64, lat: f64, half: f64, properties: Value) -> Value {
    json!({
        "type": "Feature",
        "geometry": {
            "type": "Polygon",
            "coordinates": [[
                [lon - half, lat - half],
                [lon + half, lat - half],
                [lon + half, lat + half],
                [lon - half, lat + half],
                [lon - half, lat - half]
            ]]
        },
        "properties": properties
    })
}

/// Three sites in lower Manhattan and Brooklyn with nearby features, in
/// RFC 7946 longitude/latitude.
pub fn study_area(dir: &Utf8Path) -> LayerPaths {
    let sites = json!({
        "type": "FeatureCollection",
        "features": [
            point_feature(-74.00, 40.70, json!({"EPA_ID": "NYD000000001", "Site Name": "Harbor Works", "Site Score": 28.9, "County": "New York"})),
            point_feature(-73.95, 40.68, json!({"EPA_ID": "NYD000000002", "Site Name": "Canal Yard", "Site Score": "50.0", "County": "Kings"})),
            point_feature(-73.90, 40.66, json!({"EPA_ID": "NYD000000003", "Site Name": "Hudson River PCBs", "Site Score": 99.0, "County": "Kings"}))
        ]
    });
    let natural_areas = json!({
        "type": "FeatureCollection",
        "features": [square_feature(-74.001, 40.701, 0.001, json!({"NAME": "Battery Park"}))]
    });
    let population = json!({
        "type": "FeatureCollection",
        "features": [
            square_feature(-74.002, 40.699, 0.0005, json!({"GEOID": "360610001001", "POPULATION": 1200})),
            square_feature(-73.951, 40.681, 0.0005, json!({"GEOID": "360470002001", "POPULATION": 300.0}))
        ]
    });
    let schools = json!({
        "type": "FeatureCollection",
        "features": [
            point_feature(-73.999, 40.701, json!({"NAME": "PS 1"})),
            point_feature(-73.949, 40.679, json!({"NAME": "PS 2"})),
            point_feature(-73.951, 40.681, json!({"NAME": "PS 3"}))
        ]
    });
    LayerPaths {
        sites: write_layer(dir, "sites", &sites),
        natural_areas: write_layer(dir, "natural_areas", &natural_areas),
        population_blocks: write_layer(dir, "population", &population),
        schools: write_layer(dir, "schools", &schools),
    }
}
