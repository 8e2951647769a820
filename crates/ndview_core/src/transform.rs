//! Affine transforms in n dimensions
//!
//! Scale and shear are plain `n x n` matrices. Translation needs homogeneous
//! coordinates, so [`translation_matrix`] returns an `(n+1) x (n+1)` matrix
//! and points are lifted with [`to_homogeneous`] before applying it.
//!
//! Composition follows matrix order: in `compose_transformations(&[A, B, C])`
//! the product is `A * B * C`, so `C` is applied to a point first.

use ndview_math::{vecn, GeometryError, MatrixN, Result};

/// Trailing homogeneous coordinates smaller than this cannot be divided out
pub const HOMOGENEOUS_EPSILON: f64 = 1e-10;

/// Diagonal matrix with one scale factor per axis
pub fn scale_matrix(dim: usize, scales: &[f64]) -> Result<MatrixN> {
    if scales.len() != dim {
        return Err(GeometryError::DimensionMismatch {
            expected: dim,
            actual: scales.len(),
        });
    }
    let mut m = MatrixN::zero(dim, dim);
    for (i, &s) in scales.iter().enumerate() {
        m.set(i, i, s);
    }
    Ok(m)
}

/// Same scale factor on every axis
pub fn uniform_scale_matrix(dim: usize, scale: f64) -> MatrixN {
    let mut m = MatrixN::zero(dim, dim);
    for i in 0..dim {
        m.set(i, i, scale);
    }
    m
}

/// Shear that adds `amount * p[reference_axis]` to `p[shear_axis]`
pub fn shear_matrix(
    dim: usize,
    shear_axis: usize,
    reference_axis: usize,
    amount: f64,
) -> Result<MatrixN> {
    for axis in [shear_axis, reference_axis] {
        if axis >= dim {
            return Err(GeometryError::InvalidIndex { index: axis, bound: dim });
        }
    }
    if shear_axis == reference_axis {
        return Err(GeometryError::InvalidIndex {
            index: reference_axis,
            bound: dim,
        });
    }
    let mut m = MatrixN::identity(dim);
    m.set(shear_axis, reference_axis, amount);
    Ok(m)
}

/// Homogeneous `(dim+1) x (dim+1)` translation by `t`
pub fn translation_matrix(dim: usize, t: &[f64]) -> Result<MatrixN> {
    if t.len() != dim {
        return Err(GeometryError::DimensionMismatch {
            expected: dim,
            actual: t.len(),
        });
    }
    let mut m = MatrixN::identity(dim + 1);
    for (i, &offset) in t.iter().enumerate() {
        m.set(i, dim, offset);
    }
    Ok(m)
}

/// Append a trailing `1`
pub fn to_homogeneous(v: &[f64]) -> Vec<f64> {
    let mut h = Vec::with_capacity(v.len() + 1);
    h.extend_from_slice(v);
    h.push(1.0);
    h
}

/// Divide by the trailing coordinate and drop it
pub fn from_homogeneous(h: &[f64]) -> Result<Vec<f64>> {
    let Some((&w, rest)) = h.split_last() else {
        return Err(GeometryError::InvalidDimension {
            dimension: 0,
            minimum: 1,
        });
    };
    if w.abs() < HOMOGENEOUS_EPSILON {
        return Err(GeometryError::SingularHomogeneous { w });
    }
    Ok(vecn::scale(rest, 1.0 / w))
}

/// Lift a square `n x n` linear map into `(n+1) x (n+1)` homogeneous form
pub fn embed_homogeneous(m: &MatrixN) -> Result<MatrixN> {
    let dim = m.dim()?;
    let mut out = MatrixN::identity(dim + 1);
    for r in 0..dim {
        for c in 0..dim {
            out.set(r, c, m.get(r, c));
        }
    }
    Ok(out)
}

/// Left-to-right product of a non-empty list of matrices
pub fn compose_transformations(list: &[MatrixN]) -> Result<MatrixN> {
    let Some((first, rest)) = list.split_first() else {
        return Err(GeometryError::InvalidDimension {
            dimension: 0,
            minimum: 1,
        });
    };
    let mut acc = first.clone();
    for m in rest {
        acc = acc.multiply(m)?;
    }
    Ok(acc)
}

/// Apply a transform to a point. A matrix one size larger than the point is
/// treated as homogeneous.
pub fn apply_transform(m: &MatrixN, v: &[f64]) -> Result<Vec<f64>> {
    let dim = m.dim()?;
    if dim == v.len() + 1 {
        from_homogeneous(&m.multiply_vector(&to_homogeneous(v))?)
    } else {
        m.multiply_vector(v)
    }
}

/// Collects named transform components and composes them in the fixed
/// order scale, then rotation, then shear, then translation.
#[derive(Clone, Debug, Default)]
pub struct TransformBuilder {
    scale: Option<MatrixN>,
    rotation: Option<MatrixN>,
    shear: Option<MatrixN>,
    translation: Option<MatrixN>,
}

impl TransformBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scale(mut self, m: MatrixN) -> Self {
        self.scale = Some(m);
        self
    }

    pub fn rotation(mut self, m: MatrixN) -> Self {
        self.rotation = Some(m);
        self
    }

    pub fn shear(mut self, m: MatrixN) -> Self {
        self.shear = Some(m);
        self
    }

    pub fn translation(mut self, m: MatrixN) -> Self {
        self.translation = Some(m);
        self
    }

    /// Compose the components for a `dim`-dimensional space.
    ///
    /// The result is `dim x dim`, or `(dim+1) x (dim+1)` when a translation
    /// is present. With no components at all the identity is returned.
    pub fn build(&self, dim: usize) -> Result<MatrixN> {
        let linear = [&self.shear, &self.rotation, &self.scale];
        for m in linear.iter().copied().flatten() {
            let side = m.dim()?;
            if side != dim {
                return Err(GeometryError::DimensionMismatch {
                    expected: dim,
                    actual: side,
                });
            }
        }

        let Some(translation) = &self.translation else {
            let parts: Vec<MatrixN> = linear.iter().copied().flatten().cloned().collect();
            if parts.is_empty() {
                return Ok(MatrixN::identity(dim));
            }
            return compose_transformations(&parts);
        };

        let side = translation.dim()?;
        if side != dim + 1 {
            return Err(GeometryError::DimensionMismatch {
                expected: dim + 1,
                actual: side,
            });
        }
        let mut parts = vec![translation.clone()];
        for m in linear.iter().copied().flatten() {
            parts.push(embed_homogeneous(m)?);
        }
        compose_transformations(&parts)
    }
}
