//! Natural-area overlap: square metres of protected land inside each site's
//! buffer.

use geo::{Area, BooleanOps, BoundingRect, Intersects, MultiPolygon, Rect, unary_union};
use superfund_core::{NaturalArea, Site};

use super::{FactorColumn, buffer_site};

/// Union every natural-area polygon into one geometry.
///
/// Overlapping areas are merged so their shared land is counted once.
#[must_use]
pub fn dissolve(areas: &[NaturalArea]) -> MultiPolygon<f64> {
    unary_union(areas.iter().map(|area| &area.geometry))
}

/// Area of the intersection between each site's buffer and the dissolved
/// natural areas (`nature_int_area`, m²). Sites with no overlap get `0.0`.
#[must_use]
pub fn natural_area_overlap(
    sites: &[Site],
    areas: &[NaturalArea],
    radius_m: f64,
) -> FactorColumn<f64> {
    let dissolved = dissolve(areas);
    let extent = dissolved.bounding_rect();
    sites
        .iter()
        .map(|site| {
            let zone = buffer_site(site, radius_m);
            let area = overlap_area(&zone, &dissolved, extent);
            if area <= 0.0 {
                log::debug!("site {} has no natural area within {radius_m} m", site.id);
            }
            (site.id.clone(), area)
        })
        .collect()
}

fn overlap_area(
    zone: &MultiPolygon<f64>,
    dissolved: &MultiPolygon<f64>,
    extent: Option<Rect<f64>>,
) -> f64 {
    let reachable = match (zone.bounding_rect(), extent) {
        (Some(zone_rect), Some(extent_rect)) => zone_rect.intersects(&extent_rect),
        _ => false,
    };
    if !reachable {
        return 0.0;
    }
    zone.intersection(dissolved).unsigned_area()
}
