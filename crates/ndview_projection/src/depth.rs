//! Back-to-front paint ordering

use ndview_math::{GeometryError, Result, VALIDATE};

use crate::perspective::calculate_depth;

/// Depth sorter that keeps its index and depth arrays between frames.
///
/// The returned permutation orders vertices furthest first (descending
/// [`calculate_depth`]). Ties keep their input order.
#[derive(Debug, Default)]
pub struct DepthSorter {
    order: Vec<usize>,
    depths: Vec<f64>,
}

impl DepthSorter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paint order for a list of vertices
    pub fn sort_by_depth<V: AsRef<[f64]>>(&mut self, vertices: &[V]) -> &[usize] {
        self.depths.clear();
        self.depths
            .extend(vertices.iter().map(|v| calculate_depth(v.as_ref())));
        self.sort()
    }

    /// Paint order for a flat vertex buffer of the given dimension
    pub fn sort_flat(&mut self, flat_vertices: &[f64], dim: usize) -> Result<&[usize]> {
        if dim == 0 {
            return Err(GeometryError::InvalidDimension {
                dimension: 0,
                minimum: 1,
            });
        }
        if VALIDATE && flat_vertices.len() % dim != 0 {
            return Err(GeometryError::DimensionMismatch {
                expected: flat_vertices.len() / dim * dim,
                actual: flat_vertices.len(),
            });
        }
        self.depths.clear();
        self.depths
            .extend(flat_vertices.chunks_exact(dim).map(calculate_depth));
        Ok(self.sort())
    }

    /// Capacity currently held by the index scratch
    pub fn capacity(&self) -> usize {
        self.order.capacity()
    }

    fn sort(&mut self) -> &[usize] {
        let depths = &self.depths;
        self.order.clear();
        self.order.extend(0..depths.len());
        // Unstable sort with an index tie-break: same result as a stable
        // sort, without the merge buffer
        self.order
            .sort_unstable_by(|&a, &b| depths[b].total_cmp(&depths[a]).then(a.cmp(&b)));
        &self.order
    }
}

/// One-off paint order; prefer a long-lived [`DepthSorter`] per frame loop
pub fn sort_by_depth<V: AsRef<[f64]>>(vertices: &[V]) -> Vec<usize> {
    DepthSorter::new().sort_by_depth(vertices).to_vec()
}
