//! Contaminated sites: the entities being scored.

use std::fmt;

use geo::Geometry;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// EPA identifier of a site (`EPA_ID`), unique across the site table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct SiteId(String);

impl SiteId {
    /// Wrap an identifier without validation.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SiteId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A contaminated site with its pre-existing severity metric.
///
/// # Examples
///
/// ```
/// use geo::{Geometry, Point};
/// use superfund_core::Site;
///
/// # fn main() -> Result<(), superfund_core::SiteError> {
/// let site = Site::new("NJD000000001", "Example Landfill", 42.5, Geometry::Point(Point::new(0.0, 0.0)))?;
/// assert_eq!(site.id.as_str(), "NJD000000001");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Site {
    /// `EPA_ID`.
    pub id: SiteId,
    /// `Site Name`.
    pub name: String,
    /// `Site Score`, the externally sourced contamination severity.
    pub severity: f64,
    /// Site footprint, either a point or a polygon.
    pub geometry: Geometry<f64>,
}

/// Errors returned while building or collecting sites.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SiteError {
    /// The `EPA_ID` was blank.
    #[error("site identifier must not be blank")]
    EmptyId,
    /// The severity was NaN or infinite.
    #[error("site {id} has a non-finite Site Score ({value})")]
    NonFiniteSeverity {
        /// Affected site.
        id: SiteId,
        /// Rejected value.
        value: f64,
    },
    /// Two rows share one `EPA_ID`.
    #[error("site identifier {id} appears more than once")]
    DuplicateId {
        /// Repeated identifier.
        id: SiteId,
    },
}

impl Site {
    /// Validate and construct a [`Site`].
    ///
    /// # Errors
    /// Returns [`SiteError::EmptyId`] for a blank identifier and
    /// [`SiteError::NonFiniteSeverity`] when the severity is not finite.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        severity: f64,
        geometry: Geometry<f64>,
    ) -> Result<Self, SiteError> {
        let id = SiteId::new(id);
        if id.as_str().trim().is_empty() {
            return Err(SiteError::EmptyId);
        }
        if !severity.is_finite() {
            return Err(SiteError::NonFiniteSeverity {
                id,
                value: severity,
            });
        }
        Ok(Self {
            id,
            name: name.into(),
            severity,
            geometry,
        })
    }
}

/// Confirm that no two sites share an `EPA_ID`.
///
/// # Errors
/// Returns [`SiteError::DuplicateId`] naming the first repeated identifier.
pub fn ensure_unique_ids(sites: &[Site]) -> Result<(), SiteError> {
    let mut seen = std::collections::BTreeSet::new();
    for site in sites {
        if !seen.insert(&site.id) {
            return Err(SiteError::DuplicateId {
                id: site.id.clone(),
            });
        }
    }
    Ok(())
}
