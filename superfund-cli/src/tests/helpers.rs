//! Test helpers writing a small projected study area to disk.

use super::*;
use camino::{Utf8Path, Utf8PathBuf};
use serde_json::{Value, json};
use tempfile::TempDir;

/// Expected artefact name for [`StudyArea::full_args`].
pub(super) const ARTIFACT_NAME: &str =
    "nat1.0_school1.0_pop1.0_weights_0.25_0.25_0.25_0.25.geojson";

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path, contents).expect("write test file");
}

fn crs_member() -> Value {
    json!({"type": "name", "properties": {"name": "urn:ogc:def:crs:EPSG::26918"}})
}

fn collection(features: Vec<Value>) -> Value {
    json!({"type": "FeatureCollection", "crs": crs_member(), "features": features})
}

fn point(x: f64, y: f64, properties: Value) -> Value {
    json!({
        "type": "Feature",
        "geometry": {"type": "Point", "coordinates": [x, y]},
        "properties": properties
    })
}

fn square(min_x: f64, min_y: f64, max_x: f64, max_y: f64, properties: Value) -> Value {
    json!({
        "type": "Feature",
        "geometry": {
            "type": "Polygon",
            "coordinates": [[
                [min_x, min_y], [max_x, min_y], [max_x, max_y], [min_x, max_y], [min_x, min_y]
            ]]
        },
        "properties": properties
    })
}

/// Three sites in NAD83 / UTM 18N, ten kilometres apart. The third is the
/// default exclusion. Each remaining site has one school in range, so the
/// school factor ties.
#[derive(Debug)]
pub(super) struct StudyArea {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl StudyArea {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        let area = Self { _dir: dir, root };
        area.write_layer(
            ARG_SITES,
            &collection(vec![
                point(500_000.0, 4_500_000.0, json!({"EPA_ID": "NJD000000001", "Site Name": "Ajax Works", "Site Score": 10.0})),
                point(510_000.0, 4_500_000.0, json!({"EPA_ID": "NJD000000002", "Site Name": "Bayonne Drum", "Site Score": 40.0})),
                point(520_000.0, 4_500_000.0, json!({"EPA_ID": "NYD000000003", "Site Name": "Hudson River PCBs", "Site Score": 90.0})),
            ]),
        );
        area.write_layer(
            ARG_NATURAL_AREAS,
            &collection(vec![square(500_100.0, 4_500_000.0, 500_300.0, 4_500_200.0, json!({}))]),
        );
        area.write_layer(
            ARG_POPULATION_BLOCKS,
            &collection(vec![
                square(499_950.0, 4_499_950.0, 500_050.0, 4_500_050.0, json!({"GEOID": "340170001001", "POPULATION": 120})),
                square(509_950.0, 4_499_950.0, 510_050.0, 4_500_050.0, json!({"GEOID": "340170002001", "POPULATION": 30})),
            ]),
        );
        area.write_layer(
            ARG_SCHOOLS,
            &collection(vec![
                point(500_200.0, 4_500_100.0, json!({"NAME": "PS 11"})),
                point(510_300.0, 4_500_000.0, json!({"NAME": "PS 12"})),
            ]),
        );
        area
    }

    pub(super) fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub(super) fn layer(&self, name: &str) -> Utf8PathBuf {
        self.root.join(format!("{name}.geojson"))
    }

    pub(super) fn output_dir(&self) -> Utf8PathBuf {
        self.root.join("outputs")
    }

    pub(super) fn write_layer(&self, name: &str, value: &Value) {
        write_utf8(&self.layer(name), value.to_string().as_bytes());
    }

    /// Every required flag with its value, in command-line order.
    pub(super) fn flags(&self) -> Vec<(&'static str, String)> {
        let mut flags: Vec<(&'static str, String)> = [
            ARG_SITES,
            ARG_NATURAL_AREAS,
            ARG_POPULATION_BLOCKS,
            ARG_SCHOOLS,
        ]
        .into_iter()
        .map(|name| (name, self.layer(name).into_string()))
        .collect();
        flags.extend(
            [ARG_NATURAL_RADIUS, ARG_SCHOOL_RADIUS, ARG_POPULATION_RADIUS]
                .into_iter()
                .map(|name| (name, "1".to_owned())),
        );
        flags.extend(
            [
                ARG_POPULATION_WEIGHT,
                ARG_SCHOOL_WEIGHT,
                ARG_NATURAL_WEIGHT,
                ARG_SEVERITY_WEIGHT,
            ]
            .into_iter()
            .map(|name| (name, "0.25".to_owned())),
        );
        flags.push((ARG_OUTPUT_DIR, self.output_dir().into_string()));
        flags
    }

    pub(super) fn full_args(&self) -> ScoreArgs {
        ScoreArgs {
            sites: Some(self.layer(ARG_SITES)),
            natural_areas: Some(self.layer(ARG_NATURAL_AREAS)),
            population_blocks: Some(self.layer(ARG_POPULATION_BLOCKS)),
            schools: Some(self.layer(ARG_SCHOOLS)),
            natural_radius_km: Some(1.0),
            school_radius_km: Some(1.0),
            population_radius_km: Some(1.0),
            population_weight: Some(0.25),
            school_weight: Some(0.25),
            natural_weight: Some(0.25),
            severity_weight: Some(0.25),
            output_dir: Some(self.output_dir()),
            ..ScoreArgs::default()
        }
    }
}
