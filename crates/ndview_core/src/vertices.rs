//! Operations over flat vertex buffers
//!
//! Vertex sets are stored packed: `[v0_x, v0_y, ..., v1_x, v1_y, ...]`,
//! `dim` floats per vertex.

use std::cmp::Ordering;
use std::collections::{BTreeSet, BinaryHeap};

use ndview_math::{vecn, GeometryError, Result, VALIDATE};

/// `out[v] = matrix * vertices[v]` for every vertex.
///
/// `matrix` is a flat row-major `dim x dim` buffer; `out` must be the same
/// length as `flat_vertices`.
pub fn apply_matrix_to_vertices(
    matrix: &[f64],
    flat_vertices: &[f64],
    dim: usize,
    out: &mut [f64],
) -> Result<()> {
    if dim == 0 {
        return Err(GeometryError::InvalidDimension {
            dimension: 0,
            minimum: 1,
        });
    }
    if VALIDATE {
        if matrix.len() != dim * dim {
            return Err(GeometryError::DimensionMismatch {
                expected: dim * dim,
                actual: matrix.len(),
            });
        }
        if flat_vertices.len() % dim != 0 || out.len() != flat_vertices.len() {
            return Err(GeometryError::DimensionMismatch {
                expected: flat_vertices.len(),
                actual: out.len(),
            });
        }
    }

    for (src, dst) in flat_vertices.chunks_exact(dim).zip(out.chunks_exact_mut(dim)) {
        for (row, o) in dst.iter_mut().enumerate() {
            let r = &matrix[row * dim..(row + 1) * dim];
            *o = r.iter().zip(src).map(|(a, b)| a * b).sum();
        }
    }
    Ok(())
}

/// Connect every pair of vertices whose distance is within
/// `(1 + epsilon_factor)` of the shortest non-zero distance.
///
/// This recovers the natural edge structure of regular point sets such as
/// hypercubes, cross-polytopes and root systems. Returns flat index pairs.
pub fn build_short_edges(flat_vertices: &[f64], dim: usize, epsilon_factor: f64) -> Vec<u32> {
    const COINCIDENT_SQ: f64 = 1e-9;

    if dim == 0 || flat_vertices.len() < dim * 2 {
        return Vec::new();
    }
    let vertices: Vec<&[f64]> = flat_vertices.chunks_exact(dim).collect();
    let n = vertices.len();

    let pair_distance = |i: usize, j: usize| -> f64 {
        // Chunks all have length `dim`, so this cannot mismatch
        vecn::distance_squared(vertices[i], vertices[j]).unwrap_or(f64::MAX)
    };

    let mut min_sq = f64::MAX;
    for i in 0..n {
        for j in (i + 1)..n {
            let d2 = pair_distance(i, j);
            if d2 > COINCIDENT_SQ && d2 < min_sq {
                min_sq = d2;
            }
        }
    }
    if min_sq == f64::MAX {
        return Vec::new();
    }

    let threshold = min_sq.sqrt() * (1.0 + epsilon_factor);
    let threshold_sq = threshold * threshold;

    let mut edges = Vec::new();
    for i in 0..n {
        for j in (i + 1)..n {
            if pair_distance(i, j) <= threshold_sq {
                edges.push(i as u32);
                edges.push(j as u32);
            }
        }
    }
    log::debug!(
        "Built {} short edges for {} vertices in {}D",
        edges.len() / 2,
        n,
        dim
    );
    edges
}

/// Candidate neighbor, ordered by distance then index so the heap's top is
/// the farthest one kept so far
#[derive(Clone, Copy, Debug)]
struct Neighbor {
    dist_sq: f64,
    index: usize,
}

impl PartialEq for Neighbor {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Neighbor {}

impl PartialOrd for Neighbor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Neighbor {
    fn cmp(&self, other: &Self) -> Ordering {
        self.dist_sq
            .total_cmp(&other.dist_sq)
            .then(self.index.cmp(&other.index))
    }
}

/// Connect every vertex to its `k` nearest neighbors.
///
/// Meant for point clouds without a natural edge length. `k` is capped at
/// `vertex_count - 1`; an edge found from both ends is emitted once. Pairs
/// come out sorted, lower index first.
pub fn build_knn_edges(flat_vertices: &[f64], dim: usize, k: usize) -> Vec<u32> {
    if dim == 0 || k == 0 || flat_vertices.len() < dim * 2 {
        return Vec::new();
    }
    let vertices: Vec<&[f64]> = flat_vertices.chunks_exact(dim).collect();
    let n = vertices.len();
    let k = k.min(n - 1);

    let mut pairs = BTreeSet::new();
    let mut heap = BinaryHeap::with_capacity(k + 1);
    for i in 0..n {
        heap.clear();
        for j in (0..n).filter(|&j| j != i) {
            let candidate = Neighbor {
                dist_sq: vecn::distance_squared(vertices[i], vertices[j]).unwrap_or(f64::MAX),
                index: j,
            };
            if heap.len() < k {
                heap.push(candidate);
            } else if heap.peek().is_some_and(|far| candidate < *far) {
                heap.pop();
                heap.push(candidate);
            }
        }
        for neighbor in heap.drain() {
            let j = neighbor.index;
            pairs.insert((i.min(j) as u32, i.max(j) as u32));
        }
    }

    let mut edges = Vec::with_capacity(pairs.len() * 2);
    for (a, b) in pairs {
        edges.push(a);
        edges.push(b);
    }
    log::debug!(
        "Built {} nearest-neighbor edges (k = {}) for {} vertices in {}D",
        edges.len() / 2,
        k,
        n,
        dim
    );
    edges
}
