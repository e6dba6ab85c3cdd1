//! Shared builders for scoring integration tests.

use geo::{Geometry, MultiPolygon, Point, polygon};
use superfund_core::{
    Crs, DEFAULT_TARGET_CRS, Layer, Layers, NaturalArea, PopulationBlock, Radii, School, Site,
    ScoringParameters, Weights,
};

/// Tolerance for comparing computed scores.
const SCORE_EPSILON: f64 = 1.0e-9;

/// Northing shared by the reference sites.
pub const REFERENCE_NORTHING: f64 = 4_500_000.0;

/// Compare floating-point values within a small epsilon.
#[expect(
    clippy::float_arithmetic,
    reason = "test delta computation requires float maths"
)]
pub fn assert_close(actual: f64, expected: f64) {
    let delta = (actual - expected).abs();
    assert!(
        delta <= SCORE_EPSILON,
        "expected {expected}, got {actual} (|Δ| = {delta})"
    );
}

/// A point site in the reference northing band.
pub fn point_site(id: &str, name: &str, easting: f64, severity: f64) -> Site {
    Site::new(
        id,
        name,
        severity,
        Geometry::Point(Point::new(easting, REFERENCE_NORTHING)),
    )
    .unwrap_or_else(|err| panic!("build site {id}: {err}"))
}

/// Axis-aligned rectangle as a multipolygon.
#[expect(
    clippy::float_arithmetic,
    reason = "corner coordinates are offsets from the origin"
)]
pub fn rectangle(x: f64, y: f64, width: f64, height: f64) -> MultiPolygon<f64> {
    MultiPolygon(vec![polygon![
        (x: x, y: y),
        (x: x + width, y: y),
        (x: x + width, y: y + height),
        (x: x, y: y + height),
    ]])
}

/// A population block drawn as a small square.
pub fn block(id: &str, population: u64, x: f64, y: f64) -> PopulationBlock {
    PopulationBlock {
        id: id.to_owned(),
        population,
        geometry: rectangle(x, y, 50.0, 50.0),
    }
}

/// A school at the given position.
pub fn school(x: f64, y: f64) -> School {
    School {
        location: Point::new(x, y),
    }
}

/// Radii of one kilometre and equal quarter weights.
pub fn quarter_weights() -> ScoringParameters {
    ScoringParameters::new(
        Radii {
            natural_km: 1.0,
            school_km: 1.0,
            population_km: 1.0,
        },
        Weights {
            population: 0.25,
            school: 0.25,
            natural: 0.25,
            severity: 0.25,
        },
    )
    .unwrap_or_else(|err| panic!("reference parameters: {err}"))
}

/// Three sites ten kilometres apart with hand-placed surroundings:
/// - A: a 500 m² natural area, 100 residents and two schools;
/// - B: nothing nearby;
/// - C: 50 residents and one school.
///
/// Severities are 10, 20 and 30.
#[expect(
    clippy::float_arithmetic,
    reason = "feature positions are offsets from each site"
)]
pub fn reference_layers() -> Layers {
    let (a, b, c) = (500_000.0, 510_000.0, 520_000.0);
    let y = REFERENCE_NORTHING;
    let sites = vec![
        point_site("A", "Site A", a, 10.0),
        point_site("B", "Site B", b, 20.0),
        point_site("C", "Site C", c, 30.0),
    ];
    let natural_areas = vec![NaturalArea {
        geometry: rectangle(a + 100.0, y, 20.0, 25.0),
    }];
    let population_blocks = vec![
        block("A-1", 60, a + 200.0, y + 200.0),
        block("A-2", 40, a - 300.0, y - 300.0),
        block("C-1", 50, c + 100.0, y - 100.0),
    ];
    let schools = vec![
        school(a + 250.0, y),
        school(a, y - 400.0),
        school(c - 500.0, y + 100.0),
    ];
    layers_in(DEFAULT_TARGET_CRS, sites, natural_areas, population_blocks, schools)
}

/// Assemble four layers declared in one reference system.
pub fn layers_in(
    crs: Crs,
    sites: Vec<Site>,
    natural_areas: Vec<NaturalArea>,
    population_blocks: Vec<PopulationBlock>,
    schools: Vec<School>,
) -> Layers {
    Layers {
        sites: Layer::new(crs, sites),
        natural_areas: Layer::new(crs, natural_areas),
        population_blocks: Layer::new(crs, population_blocks),
        schools: Layer::new(crs, schools),
    }
}
