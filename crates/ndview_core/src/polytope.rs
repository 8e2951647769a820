//! Base vertex sets for common n-dimensional polytopes
//!
//! A hypercube in n dimensions has 2^n vertices (all combinations of ±h per
//! axis) and n·2^(n-1) edges. A simplex has n+1 mutually equidistant
//! vertices with every pair connected.
//!
//! Root systems are the point sets of the simply-laced Lie algebras:
//!
//! - A_{n-1}: `e_i - e_j` for `i != j`, n(n-1) roots in R^n
//! - D_n: `±e_i ± e_j` for `i < j`, 2n(n-1) roots, n >= 4
//! - E_8: the 112 D_8 roots plus the 128 `(±1/2)^8` with an even number of
//!   minus signs
//!
//! All roots are scaled to the same length, which is also the distance
//! between neighboring roots, so their edges come from
//! [`build_short_edges`].

use ndview_math::{GeometryError, Result};
use serde::{Deserialize, Serialize};

use crate::vertices::build_short_edges;

/// Largest dimension accepted by [`Polytope::hypercube`] (2^16 vertices)
pub const MAX_HYPERCUBE_DIMENSION: usize = 16;

/// Relative slack when connecting roots at the nearest-neighbor distance
const ROOT_EDGE_TOLERANCE: f64 = 0.01;

/// Which polytope to generate
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolytopeKind {
    #[default]
    Hypercube,
    Simplex,
    /// A_{n-1} root system
    RootsA,
    /// D_n root system
    RootsD,
    /// E_8 root system
    RootsE8,
}

/// Root system families [`Polytope::root_system`] can generate
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RootSystemKind {
    A,
    D,
    E8,
}

/// Flat vertex buffer plus flat edge index pairs
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PolytopeData")]
pub struct Polytope {
    dimension: usize,
    vertices: Vec<f64>,
    edges: Vec<u32>,
}

/// Unchecked wire form of a [`Polytope`]
#[derive(Deserialize)]
struct PolytopeData {
    dimension: usize,
    vertices: Vec<f64>,
    edges: Vec<u32>,
}

impl TryFrom<PolytopeData> for Polytope {
    type Error = GeometryError;

    fn try_from(data: PolytopeData) -> Result<Self> {
        Self::from_parts(data.dimension, data.vertices, data.edges)
    }
}

impl Polytope {
    /// Generate a polytope of the given kind with edge length `size`
    pub fn generate(kind: PolytopeKind, dimension: usize, size: f64) -> Result<Self> {
        match kind {
            PolytopeKind::Hypercube => Self::hypercube(dimension, size),
            PolytopeKind::Simplex => Self::simplex(dimension, size),
            PolytopeKind::RootsA => Self::root_system(RootSystemKind::A, dimension, size),
            PolytopeKind::RootsD => Self::root_system(RootSystemKind::D, dimension, size),
            PolytopeKind::RootsE8 => Self::root_system(RootSystemKind::E8, dimension, size),
        }
    }

    /// Build from a flat vertex buffer and flat edge pairs.
    ///
    /// Fails unless `dimension >= 1`, the vertex buffer holds whole
    /// vertices, and every edge is a pair of existing vertex indices.
    pub fn from_parts(dimension: usize, vertices: Vec<f64>, edges: Vec<u32>) -> Result<Self> {
        if dimension == 0 {
            return Err(GeometryError::InvalidDimension {
                dimension,
                minimum: 1,
            });
        }
        if vertices.len() % dimension != 0 {
            return Err(GeometryError::DimensionMismatch {
                expected: vertices.len() / dimension * dimension,
                actual: vertices.len(),
            });
        }
        if edges.len() % 2 != 0 {
            return Err(GeometryError::DimensionMismatch {
                expected: edges.len() + 1,
                actual: edges.len(),
            });
        }
        let vertex_count = vertices.len() / dimension;
        if let Some(&bad) = edges.iter().find(|&&v| v as usize >= vertex_count) {
            return Err(GeometryError::InvalidIndex {
                index: bad as usize,
                bound: vertex_count,
            });
        }
        Ok(Self {
            dimension,
            vertices,
            edges,
        })
    }

    /// Root system in R^`dimension` with every root of length `scale`.
    ///
    /// Type A needs at least 2 dimensions, type D at least 4 and E_8
    /// exactly 8. Roots closest to each other (`scale` apart) share an edge.
    pub fn root_system(kind: RootSystemKind, dimension: usize, scale: f64) -> Result<Self> {
        let vertices = match kind {
            RootSystemKind::A => {
                check_root_dimension(dimension, 2)?;
                a_roots(dimension, scale)
            }
            RootSystemKind::D => {
                check_root_dimension(dimension, 4)?;
                d_roots(dimension, scale)
            }
            RootSystemKind::E8 => {
                if dimension != 8 {
                    return Err(GeometryError::DimensionMismatch {
                        expected: 8,
                        actual: dimension,
                    });
                }
                e8_roots(scale)
            }
        };
        let edges = build_short_edges(&vertices, dimension, ROOT_EDGE_TOLERANCE);
        log::debug!(
            "Generated {:?} root system in {}D: {} roots, {} edges",
            kind,
            dimension,
            vertices.len() / dimension,
            edges.len() / 2
        );
        Self::from_parts(dimension, vertices, edges)
    }

    /// Axis-aligned hypercube centered at the origin with side length `size`
    pub fn hypercube(dimension: usize, size: f64) -> Result<Self> {
        if dimension == 0 {
            return Err(GeometryError::InvalidDimension {
                dimension,
                minimum: 1,
            });
        }
        if dimension > MAX_HYPERCUBE_DIMENSION {
            return Err(GeometryError::InvalidIndex {
                index: dimension,
                bound: MAX_HYPERCUBE_DIMENSION + 1,
            });
        }
        let h = size * 0.5;
        let count = 1usize << dimension;

        // Vertex i has +h on axis b when bit b of i is set
        let mut vertices = Vec::with_capacity(count * dimension);
        for i in 0..count {
            for b in 0..dimension {
                vertices.push(if i & (1 << b) != 0 { h } else { -h });
            }
        }

        // Vertices differing in exactly one bit share an edge
        let mut edges = Vec::with_capacity(dimension * count);
        for i in 0..count {
            for b in 0..dimension {
                let j = i | (1 << b);
                if j != i {
                    edges.push(i as u32);
                    edges.push(j as u32);
                }
            }
        }

        Ok(Self {
            dimension,
            vertices,
            edges,
        })
    }

    /// Regular simplex centered at the origin with edge length `size`
    pub fn simplex(dimension: usize, size: f64) -> Result<Self> {
        if dimension == 0 {
            return Err(GeometryError::InvalidDimension {
                dimension,
                minimum: 1,
            });
        }
        let n = dimension as f64;
        // Unit basis vectors plus a·(1,...,1) are pairwise sqrt(2) apart
        let a = (1.0 - (n + 1.0).sqrt()) / n;
        let centroid = (1.0 + a) / (n + 1.0);
        let scale = size / std::f64::consts::SQRT_2;

        let count = dimension + 1;
        let mut vertices = Vec::with_capacity(count * dimension);
        for i in 0..count {
            for axis in 0..dimension {
                let raw = if i == dimension {
                    a
                } else if i == axis {
                    1.0
                } else {
                    0.0
                };
                vertices.push((raw - centroid) * scale);
            }
        }

        let mut edges = Vec::with_capacity(count * (count - 1));
        for i in 0..count {
            for j in (i + 1)..count {
                edges.push(i as u32);
                edges.push(j as u32);
            }
        }

        Ok(Self {
            dimension,
            vertices,
            edges,
        })
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Flat vertex coordinates, `dimension` per vertex
    #[inline]
    pub fn vertices(&self) -> &[f64] {
        &self.vertices
    }

    /// Flat edge index pairs
    #[inline]
    pub fn edges(&self) -> &[u32] {
        &self.edges
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / self.dimension
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len() / 2
    }

    /// Coordinates of one vertex
    pub fn vertex(&self, index: usize) -> &[f64] {
        &self.vertices[index * self.dimension..(index + 1) * self.dimension]
    }
}

fn check_root_dimension(dimension: usize, minimum: usize) -> Result<()> {
    if dimension < minimum {
        return Err(GeometryError::InvalidDimension { dimension, minimum });
    }
    Ok(())
}

/// `(e_i - e_j) * scale / sqrt(2)` for every ordered pair `i != j`
fn a_roots(n: usize, scale: f64) -> Vec<f64> {
    let c = scale / std::f64::consts::SQRT_2;
    let mut vertices = Vec::with_capacity(n * (n - 1) * n);
    for i in 0..n {
        for j in (0..n).filter(|&j| j != i) {
            let at = vertices.len();
            vertices.resize(at + n, 0.0);
            vertices[at + i] = c;
            vertices[at + j] = -c;
        }
    }
    vertices
}

/// `(±e_i ± e_j) * scale / sqrt(2)` for every `i < j`
fn d_roots(n: usize, scale: f64) -> Vec<f64> {
    let c = scale / std::f64::consts::SQRT_2;
    let mut vertices = Vec::with_capacity(2 * n * (n - 1) * n);
    for i in 0..n {
        for j in (i + 1)..n {
            for (si, sj) in [(1.0, 1.0), (1.0, -1.0), (-1.0, 1.0), (-1.0, -1.0)] {
                let at = vertices.len();
                vertices.resize(at + n, 0.0);
                vertices[at + i] = si * c;
                vertices[at + j] = sj * c;
            }
        }
    }
    vertices
}

/// The 240 roots of E_8, D_8 part first
fn e8_roots(scale: f64) -> Vec<f64> {
    let mut vertices = d_roots(8, scale);
    vertices.reserve(128 * 8);
    // (±1/2)^8 has length sqrt(2), like the D_8 roots before scaling
    let half = 0.5 * scale / std::f64::consts::SQRT_2;
    for mask in 0u32..256 {
        if mask.count_ones() % 2 == 0 {
            for axis in 0..8 {
                vertices.push(if mask & (1 << axis) != 0 { -half } else { half });
            }
        }
    }
    vertices
}
