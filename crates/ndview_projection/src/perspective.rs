//! Perspective and orthographic projection to 3D
//!
//! For a point `(x, y, z, h0, h1, ...)` with `k = n - 3` extra coordinates:
//!
//! ```text
//! depth  = (h0 + h1 + ... ) / sqrt(k)
//! scale  = 1 / (distance - depth)
//! result = (x * scale, y * scale, z * scale)
//! ```
//!
//! Dividing by `sqrt(k)` keeps the depth comparable no matter how many extra
//! dimensions there are. When the denominator gets within
//! [`MIN_SAFE_DISTANCE`] of zero it is clamped to that value (keeping its
//! sign) instead of failing, so animation never blows up mid-frame.

use ndview_math::{GeometryError, Result};

/// Projection distance used when nothing better is known
pub const DEFAULT_PROJECTION_DISTANCE: f64 = 4.0;

/// Smallest magnitude the perspective denominator may take
pub const MIN_SAFE_DISTANCE: f64 = 0.01;

/// Default margin for [`calculate_projection_distance`]
pub const DEFAULT_MARGIN: f64 = 2.0;

#[inline]
pub(crate) fn check_projectable(dim: usize) -> Result<()> {
    if dim < 3 {
        return Err(GeometryError::InvalidDimension {
            dimension: dim,
            minimum: 3,
        });
    }
    Ok(())
}

/// Aggregate of all coordinates past `z`, normalized by `sqrt(n - 3)`
#[inline]
pub fn effective_depth(v: &[f64]) -> f64 {
    let extra = v.len().saturating_sub(3);
    if extra == 0 {
        return 0.0;
    }
    let sum: f64 = v[3..].iter().sum();
    sum / (extra as f64).sqrt()
}

/// `distance - depth`, clamped away from zero
#[inline]
pub(crate) fn safe_denominator(distance: f64, depth: f64) -> f64 {
    let denom = distance - depth;
    if denom.abs() < MIN_SAFE_DISTANCE {
        if denom >= 0.0 {
            MIN_SAFE_DISTANCE
        } else {
            -MIN_SAFE_DISTANCE
        }
    } else {
        denom
    }
}

/// Projection of a point already known to have at least 3 coordinates
#[inline]
pub(crate) fn project_unchecked(v: &[f64], distance: f64) -> [f64; 3] {
    let scale = 1.0 / safe_denominator(distance, effective_depth(v));
    [v[0] * scale, v[1] * scale, v[2] * scale]
}

/// Perspective projection of one point
pub fn project_perspective(v: &[f64], distance: f64) -> Result<[f64; 3]> {
    check_projectable(v.len())?;
    Ok(project_unchecked(v, distance))
}

/// Orthographic projection: keep `x, y, z`, drop everything else
pub fn project_orthographic(v: &[f64]) -> Result<[f64; 3]> {
    check_projectable(v.len())?;
    Ok([v[0], v[1], v[2]])
}

/// Perspective projection of a vertex list sharing one dimension
pub fn project_vertices<V: AsRef<[f64]>>(vertices: &[V], distance: f64) -> Result<Vec<[f64; 3]>> {
    let Some(first) = vertices.first() else {
        return Ok(Vec::new());
    };
    let dim = first.as_ref().len();
    check_projectable(dim)?;

    let mut out = Vec::with_capacity(vertices.len());
    for v in vertices {
        let v = v.as_ref();
        if v.len() != dim {
            return Err(GeometryError::DimensionMismatch {
                expected: dim,
                actual: v.len(),
            });
        }
        out.push(project_unchecked(v, distance));
    }
    Ok(out)
}

/// Paint-order key: Euclidean norm of the coordinates past `z`
#[inline]
pub fn calculate_depth(v: &[f64]) -> f64 {
    if v.len() <= 3 {
        return 0.0;
    }
    v[3..].iter().map(|x| x * x).sum::<f64>().sqrt()
}

/// Projection distance that keeps every vertex well clear of the singular
/// region: `margin * max|higher coordinate| + 1`.
pub fn calculate_projection_distance<V: AsRef<[f64]>>(vertices: &[V], margin: f64) -> f64 {
    let max_extent = vertices
        .iter()
        .flat_map(|v| v.as_ref().iter().skip(3))
        .fold(0.0f64, |acc, x| acc.max(x.abs()));
    margin * max_extent + 1.0
}

/// [`calculate_projection_distance`] over a flat vertex buffer
pub fn calculate_projection_distance_flat(flat_vertices: &[f64], dim: usize, margin: f64) -> f64 {
    if dim == 0 {
        return 1.0;
    }
    let max_extent = flat_vertices
        .chunks_exact(dim)
        .flat_map(|v| v.iter().skip(3))
        .fold(0.0f64, |acc, x| acc.max(x.abs()));
    margin * max_extent + 1.0
}
