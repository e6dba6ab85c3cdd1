//! Raw per-site factors.
//!
//! Each calculator reads the sites and at most one other layer and returns a
//! new column keyed by `EPA_ID`. The calculators share no state, so they may
//! run in any order; the pipeline merges their columns by key.

use std::collections::BTreeMap;

use geo::{Buffer, MultiPolygon};
use superfund_core::{Site, SiteId};

mod nature;
mod population;
mod school;

pub use nature::{dissolve, natural_area_overlap};
pub use population::population_in_range;
pub use school::school_count_in_range;

/// One factor value per site, keyed by `EPA_ID`.
pub type FactorColumn<T> = BTreeMap<SiteId, T>;

/// Zone of influence: every point within `radius_m` metres of the site.
fn buffer_site(site: &Site, radius_m: f64) -> MultiPolygon<f64> {
    site.geometry.buffer(radius_m)
}

/// Carry each site's `Site Score` into a factor column unchanged.
#[must_use]
pub fn severity_passthrough(sites: &[Site]) -> FactorColumn<f64> {
    sites
        .iter()
        .map(|site| (site.id.clone(), site.severity))
        .collect()
}
