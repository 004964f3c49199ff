//! Spatial indexing for point-to-station lookups
//!
//! This module is only available with the `spatial-index` feature.

#[cfg(feature = "spatial-index")]
use glam::DVec2;
#[cfg(feature = "spatial-index")]
use kiddo::immutable::float::kdtree::ImmutableKdTree;
#[cfg(feature = "spatial-index")]
use kiddo::SquaredEuclidean;

/// KD-tree over planar station positions
///
/// The nearest seed to a location is the seed whose Voronoi cell contains
/// it, so a nearest-neighbor query answers "which station covers this
/// point" in O(log n) without touching the cell polygons.
#[cfg(feature = "spatial-index")]
#[derive(Clone)]
pub struct SpatialIndex {
    tree: Option<ImmutableKdTree<f64, usize, 2, 32>>,
    ids: Vec<usize>,
}

#[cfg(feature = "spatial-index")]
impl SpatialIndex {
    /// Index positions, identified by their slice index
    ///
    /// # Example
    ///
    /// ```
    /// use glam::DVec2;
    /// use voronoi_coverage::SpatialIndex;
    ///
    /// let index = SpatialIndex::new(&[DVec2::new(0.0, 0.0), DVec2::new(10.0, 0.0)]);
    /// assert_eq!(index.find_nearest(DVec2::new(7.0, 3.0)), Some(1));
    /// ```
    pub fn new(positions: &[DVec2]) -> Self {
        Self::from_entries(positions.iter().copied().enumerate())
    }

    /// Index positions under caller-chosen ids
    pub fn from_entries(entries: impl IntoIterator<Item = (usize, DVec2)>) -> Self {
        let (ids, points): (Vec<usize>, Vec<[f64; 2]>) = entries
            .into_iter()
            .map(|(id, p)| (id, [p.x, p.y]))
            .unzip();

        let tree = if points.is_empty() {
            None
        } else {
            Some(ImmutableKdTree::new_from_slice(&points))
        };
        Self { tree, ids }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Id of the indexed position closest to `position`, if any are indexed
    pub fn find_nearest(&self, position: DVec2) -> Option<usize> {
        let tree = self.tree.as_ref()?;
        let result = tree.nearest_one::<SquaredEuclidean>(&[position.x, position.y]);
        self.ids.get(result.item as usize).copied()
    }
}
