//! Error types raised while scoring sites.
#![forbid(unsafe_code)]

use superfund_core::{ProjectionError, SiteError};
use thiserror::Error;

use crate::Factor;

/// Errors that abort a scoring run. No partial table is produced.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ScoringError {
    /// A layer could not be brought into the scoring frame.
    #[error(transparent)]
    Projection(#[from] ProjectionError),
    /// The site table violates a structural invariant.
    #[error(transparent)]
    Site(#[from] SiteError),
    /// Every site shares one value for a factor and the configured policy
    /// refuses to rescale it.
    #[error("every site has the same {factor} value ({value}); cannot rescale to [1, 100]")]
    DegenerateRange {
        /// Factor with zero variance.
        factor: Factor,
        /// The shared value.
        value: f64,
    },
}
