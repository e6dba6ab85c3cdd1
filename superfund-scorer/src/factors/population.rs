//! Population in range: residents of every census block touching a site's
//! buffer.
//!
//! A block that intersects the buffer at all contributes its *entire*
//! population, however little of it lies inside. This is a deliberate
//! approximation; blocks are not apportioned by area.
//!
//! The buffer is the polygonal approximation of the circle produced by
//! `geo::Buffer`, so "touching the boundary" means touching that polygon. A
//! block tangent to the true circle between two vertices is not counted.

use std::collections::BTreeMap;

use geo::{BoundingRect, Intersects, MultiPolygon};
use superfund_core::{FeatureIndex, PopulationBlock, Site};

use super::{FactorColumn, buffer_site};

/// Total population of the blocks intersecting each site's buffer
/// (`POPULATION`). Sites with no intersecting block get `0`.
#[must_use]
pub fn population_in_range(
    sites: &[Site],
    blocks: &[PopulationBlock],
    radius_m: f64,
) -> FactorColumn<u64> {
    let index = FeatureIndex::from_envelopes(blocks.iter().map(|b| b.geometry.bounding_rect()));
    sites
        .iter()
        .map(|site| {
            let zone = buffer_site(site, radius_m);
            let total = population_within(&zone, blocks, &index);
            if total == 0 {
                log::debug!("site {} has no population within {radius_m} m", site.id);
            }
            (site.id.clone(), total)
        })
        .collect()
}

/// Sum the population of blocks intersecting `zone`.
///
/// Intersection includes boundary contact. Each block label is counted once
/// even when several features carry it; the first such feature in layer
/// order supplies the count.
fn population_within(
    zone: &MultiPolygon<f64>,
    blocks: &[PopulationBlock],
    index: &FeatureIndex,
) -> u64 {
    let Some(extent) = zone.bounding_rect() else {
        return 0;
    };
    let mut counted: BTreeMap<&str, u64> = BTreeMap::new();
    for block in index
        .candidates(extent)
        .into_iter()
        .filter_map(|position| blocks.get(position))
    {
        if block.geometry.intersects(zone) {
            counted.entry(block.id.as_str()).or_insert(block.population);
        }
    }
    counted.values().copied().fold(0, u64::saturating_add)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{Geometry, Point, polygon};
    use rstest::{fixture, rstest};
    use superfund_core::SiteId;

    fn block(id: &str, population: u64, x0: f64, y0: f64, x1: f64, y1: f64) -> PopulationBlock {
        PopulationBlock {
            id: id.to_owned(),
            population,
            geometry: MultiPolygon(vec![polygon![
                (x: x0, y: y0),
                (x: x1, y: y0),
                (x: x1, y: y1),
                (x: x0, y: y1),
            ]]),
        }
    }

    /// A 100 m square zone standing in for a buffer.
    #[fixture]
    fn zone() -> MultiPolygon<f64> {
        MultiPolygon(vec![polygon![
            (x: 0.0, y: 0.0),
            (x: 100.0, y: 0.0),
            (x: 100.0, y: 100.0),
            (x: 0.0, y: 100.0),
        ]])
    }

    fn total(zone: &MultiPolygon<f64>, blocks: &[PopulationBlock]) -> u64 {
        let index = FeatureIndex::from_envelopes(blocks.iter().map(|b| b.geometry.bounding_rect()));
        population_within(zone, blocks, &index)
    }

    #[rstest]
    fn partially_covered_blocks_count_in_full(zone: MultiPolygon<f64>) {
        let blocks = vec![block("360610001001", 800, 90.0, 0.0, 5000.0, 100.0)];
        assert_eq!(total(&zone, &blocks), 800);
    }

    #[rstest]
    fn blocks_touching_the_boundary_are_included(zone: MultiPolygon<f64>) {
        let blocks = vec![block("360610001002", 120, 100.0, 0.0, 200.0, 100.0)];
        assert_eq!(total(&zone, &blocks), 120);
    }

    #[rstest]
    fn disjoint_blocks_are_ignored(zone: MultiPolygon<f64>) {
        let blocks = vec![block("360610001003", 55, 100.5, 0.0, 200.0, 100.0)];
        assert_eq!(total(&zone, &blocks), 0);
    }

    #[rstest]
    fn repeated_block_features_are_counted_once(zone: MultiPolygon<f64>) {
        let blocks = vec![
            block("340170001001", 300, 10.0, 10.0, 40.0, 40.0),
            block("340170001001", 300, 20.0, 20.0, 60.0, 60.0),
            block("340170001002", 25, 50.0, 50.0, 70.0, 70.0),
        ];
        assert_eq!(total(&zone, &blocks), 325);
    }

    #[rstest]
    fn sites_without_blocks_default_to_zero() {
        let sites = vec![
            Site::new("A", "Alpha", 1.0, Geometry::Point(Point::new(0.0, 0.0))).expect("site"),
            Site::new("B", "Beta", 1.0, Geometry::Point(Point::new(90_000.0, 0.0)))
                .expect("site"),
        ];
        let blocks = vec![block("1", 40, 100.0, 100.0, 300.0, 300.0)];
        let column = population_in_range(&sites, &blocks, 1000.0);
        assert_eq!(column.get(&SiteId::from("A")), Some(&40));
        assert_eq!(column.get(&SiteId::from("B")), Some(&0));
    }
}
