//! R-tree over feature envelopes for spatial-join candidate lookup.
//!
//! The index stores only bounding boxes and feature positions. Callers run
//! the exact geometric predicate on each candidate.

use geo::Rect;
use rstar::{AABB, RTree, RTreeObject};

/// A feature's bounding box and its position in the source slice.
struct IndexedEnvelope {
    position: usize,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for IndexedEnvelope {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// Bulk-loaded envelope index over a slice of features.
pub struct FeatureIndex {
    tree: RTree<IndexedEnvelope>,
}

impl FeatureIndex {
    /// Build an index from per-feature bounding boxes, in slice order.
    ///
    /// Features without a bounding box (empty geometries) are left out and
    /// can never be returned as candidates.
    pub fn from_envelopes<I>(envelopes: I) -> Self
    where
        I: IntoIterator<Item = Option<Rect<f64>>>,
    {
        let entries = envelopes
            .into_iter()
            .enumerate()
            .filter_map(|(position, rect)| {
                rect.map(|r| IndexedEnvelope {
                    position,
                    envelope: to_aabb(r),
                })
            })
            .collect();
        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// Positions of features whose bounding box intersects `query`,
    /// in ascending order.
    #[must_use]
    pub fn candidates(&self, query: Rect<f64>) -> Vec<usize> {
        let mut positions: Vec<usize> = self
            .tree
            .locate_in_envelope_intersecting(&to_aabb(query))
            .map(|entry| entry.position)
            .collect();
        positions.sort_unstable();
        positions
    }

    /// Number of indexed features.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Whether no feature was indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

fn to_aabb(rect: Rect<f64>) -> AABB<[f64; 2]> {
    AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y])
}
