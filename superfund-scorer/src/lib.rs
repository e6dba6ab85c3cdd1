//! Remediation-priority scoring for contaminated sites.
//!
//! [`score_sites`] runs the whole pipeline over layers that have already been
//! loaded:
//! - **Reprojection** moves every layer into one planar metric frame so
//!   buffers and areas are measured in metres.
//! - **Outlier exclusion** drops sites by exact `Site Name` before any factor
//!   is computed, so the outlier never skews the rescaling.
//! - **Exposure factors** measure, per site buffer, the overlap with the
//!   dissolved natural areas, the population of every touching census block
//!   and the number of schools strictly inside.
//! - **Rescaling** maps each factor onto `[1, 100]` relative to the current
//!   batch, and **aggregation** combines the four with analyst weights as
//!   `sqrt(Σ score × weight)`.
//!
//! The returned [`ScoredTable`] carries the exact parameters used, from which
//! [`artifact_name`] derives a deterministic name for the persisted output.
//! Nothing in this crate touches the filesystem.
//!
//! # Examples
//!
//! ```
//! use geo::{Geometry, Point};
//! use superfund_core::{
//!     DEFAULT_TARGET_CRS, Layer, Layers, Radii, ScoringConfig, ScoringParameters, Site, Weights,
//! };
//! use superfund_scorer::score_sites;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let sites = vec![
//!     Site::new("NJD000000001", "North Yard", 12.0, Geometry::Point(Point::new(500_000.0, 4_500_000.0)))?,
//!     Site::new("NJD000000002", "South Yard", 48.0, Geometry::Point(Point::new(505_000.0, 4_500_000.0)))?,
//! ];
//! let layers = Layers {
//!     sites: Layer::new(DEFAULT_TARGET_CRS, sites),
//!     natural_areas: Layer::new(DEFAULT_TARGET_CRS, Vec::new()),
//!     population_blocks: Layer::new(DEFAULT_TARGET_CRS, Vec::new()),
//!     schools: Layer::new(DEFAULT_TARGET_CRS, Vec::new()),
//! };
//! let params = ScoringParameters::new(
//!     Radii { natural_km: 1.0, school_km: 1.0, population_km: 1.0 },
//!     Weights { population: 0.25, school: 0.25, natural: 0.25, severity: 0.25 },
//! )?;
//! let table = score_sites(&layers, &ScoringConfig::new(params))?;
//! let top = table.ranked();
//! assert_eq!(top.first().map(|r| r.site.site.id.as_str()), Some("NJD000000002"));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod aggregate;
mod error;
pub mod factors;
mod filter;
mod normalise;
mod pipeline;
mod reproject;
mod table;

pub use aggregate::final_score;
pub use error::ScoringError;
pub use filter::exclude_sites;
pub use normalise::{Factor, SCORE_CEILING, SCORE_FLOOR, rescale};
pub use pipeline::score_sites;
pub use reproject::reproject_layers;
pub use table::{
    FactorScores, RankedSite, RawFactors, RunSummary, ScoredSite, ScoredTable, artifact_name,
};
