use geo::Rect;
use rstar::{AABB, RTree, RTreeObject};

/// A bounding box in an R-tree, associated with a feature by index.
#[derive(Debug, Clone)]
struct IndexedBounds {
    idx: usize,
    bbox: Rect<f64>,
}

impl RTreeObject for IndexedBounds {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.bbox.min().into(), self.bbox.max().into())
    }
}

/// Read-only bounding-box index over a feature collection.
///
/// Query results are over-inclusive: every feature whose box intersects the
/// query box is returned, and bbox overlap does not imply true geometric
/// intersection. Features with no bounding rect (empty geometries) are left
/// out of the tree and can never be returned.
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    rtree: RTree<IndexedBounds>,
}

impl SpatialIndex {
    /// Bulk-load an index from per-feature bounding rects, in feature order.
    /// `None` entries (features without a bounding rect) are skipped.
    pub fn build(bounds: impl IntoIterator<Item = Option<Rect<f64>>>) -> Self {
        Self {
            rtree: RTree::bulk_load(
                bounds.into_iter()
                    .enumerate()
                    .filter_map(|(idx, bbox)| bbox.map(|bbox| IndexedBounds { idx, bbox }))
                    .collect(),
            ),
        }
    }

    /// Number of indexed features.
    #[inline] pub fn len(&self) -> usize { self.rtree.size() }

    /// Check if the index is empty.
    #[inline] pub fn is_empty(&self) -> bool { self.rtree.size() == 0 }

    /// Indices of features whose bounding box intersects `rect`.
    pub fn query(&self, rect: &Rect<f64>) -> impl Iterator<Item = usize> + '_ {
        let envelope = AABB::from_corners(rect.min().into(), rect.max().into());
        self.rtree
            .locate_in_envelope_intersecting(&envelope)
            .map(|bounds| bounds.idx)
    }
}
