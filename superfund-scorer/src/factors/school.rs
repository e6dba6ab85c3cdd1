//! School count in range: schools strictly inside each site's buffer.
//!
//! The buffer is the polygon `geo::Buffer` builds around the site, not a
//! true circle. A school is in range when it lies inside that polygon.

use geo::{BoundingRect, Contains, MultiPolygon};
use superfund_core::{FeatureIndex, School, Site};

use super::{FactorColumn, buffer_site};

/// Number of schools strictly inside each site's buffer (`school_count`).
/// Sites with none get `0`.
#[must_use]
pub fn school_count_in_range(
    sites: &[Site],
    schools: &[School],
    radius_m: f64,
) -> FactorColumn<u64> {
    let index =
        FeatureIndex::from_envelopes(schools.iter().map(|s| Some(s.location.bounding_rect())));
    sites
        .iter()
        .map(|site| {
            let zone = buffer_site(site, radius_m);
            let count = schools_within(&zone, schools, &index);
            if count == 0 {
                log::debug!("site {} has no school within {radius_m} m", site.id);
            }
            (site.id.clone(), count)
        })
        .collect()
}

/// Count schools in the interior of `zone`. A school on the boundary is not
/// contained and is not counted.
fn schools_within(zone: &MultiPolygon<f64>, schools: &[School], index: &FeatureIndex) -> u64 {
    let Some(extent) = zone.bounding_rect() else {
        return 0;
    };
    let count = index
        .candidates(extent)
        .into_iter()
        .filter_map(|position| schools.get(position))
        .filter(|school| zone.contains(&school.location))
        .count();
    u64::try_from(count).unwrap_or(u64::MAX)
}
