use rstar::{RTree, RTreeObject, AABB};

use crate::geometry::BBox3;

/// An entry in the R-tree spatial index, referencing a placed cell by index.
#[derive(Debug, Clone)]
pub struct SpatialEntry {
    /// Index into the caller's list of placed cells.
    pub index: usize,
    /// Inclusive voxel bounding box of the cell.
    pub bbox: BBox3,
}

impl RTreeObject for SpatialEntry {
    type Envelope = AABB<[i32; 3]>;

    fn envelope(&self) -> Self::Envelope {
        envelope(&self.bbox)
    }
}

fn envelope(bbox: &BBox3) -> AABB<[i32; 3]> {
    AABB::from_corners(
        [bbox.min.layer, bbox.min.row, bbox.min.col],
        [bbox.max.layer, bbox.max.row, bbox.max.col],
    )
}

/// Spatial index over cell bounding boxes for overlap candidate queries.
pub struct SpatialIndex {
    tree: RTree<SpatialEntry>,
}

impl SpatialIndex {
    pub fn build(entries: Vec<SpatialEntry>) -> Self {
        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// All entries whose box shares at least one voxel with `bbox`.
    pub fn query_intersecting(&self, bbox: &BBox3) -> Vec<&SpatialEntry> {
        self.tree
            .locate_in_envelope_intersecting(&envelope(bbox))
            .collect()
    }

    /// Every unordered pair `(i, j)`, `i < j`, whose boxes intersect, sorted.
    pub fn intersecting_pairs(&self) -> Vec<(usize, usize)> {
        let mut pairs: Vec<(usize, usize)> = self
            .tree
            .iter()
            .flat_map(|a| {
                self.query_intersecting(&a.bbox)
                    .into_iter()
                    .filter(move |b| a.index < b.index)
                    .map(move |b| (a.index, b.index))
            })
            .collect();
        pairs.sort_unstable();
        pairs
    }
}
