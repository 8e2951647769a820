//! Dense matrices of arbitrary dimension
//!
//! [`MatrixN`] stores its elements as a flat row-major `Vec<f64>`. The flat
//! helpers at the bottom of this module ([`identity_into`],
//! [`multiply_flat_into`], [`multiply_vector_flat_into`]) work directly on
//! slices for the per-frame path, and [`MatrixScratch`] provides the
//! alias-safe in-place multiply used when composing rotations.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{GeometryError, Result};
use crate::vecn::check_len;
use crate::VALIDATE;

/// Row-major dense matrix
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatrixN {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl MatrixN {
    /// Identity matrix of size `dim x dim`
    pub fn identity(dim: usize) -> Self {
        let mut m = Self::zero(dim, dim);
        for i in 0..dim {
            m.data[i * dim + i] = 1.0;
        }
        m
    }

    /// Zero matrix of size `rows x cols`
    pub fn zero(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Build a square matrix from a flat row-major buffer
    ///
    /// The element count must be a perfect square.
    pub fn from_flat(data: Vec<f64>) -> Result<Self> {
        let dim = square_dimension(data.len())?;
        Ok(Self {
            rows: dim,
            cols: dim,
            data,
        })
    }

    /// Build a matrix from nested rows. All rows must have the same length.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            if row.len() != cols {
                return Err(GeometryError::DimensionMismatch {
                    expected: cols,
                    actual: row.len(),
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    /// Nested-row copy of this matrix
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        if self.cols == 0 {
            return vec![Vec::new(); self.rows];
        }
        self.data.chunks(self.cols).map(<[f64]>::to_vec).collect()
    }

    /// `(rows, cols)`
    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    #[inline]
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Side length of a square matrix
    pub fn dim(&self) -> Result<usize> {
        if !self.is_square() {
            return Err(GeometryError::NotSquare {
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(self.rows)
    }

    /// Element at row `r`, column `c`
    #[inline]
    pub fn get(&self, r: usize, c: usize) -> f64 {
        self.data[r * self.cols + c]
    }

    #[inline]
    pub fn set(&mut self, r: usize, c: usize, value: f64) {
        self.data[r * self.cols + c] = value;
    }

    /// Flat row-major view
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// Matrix product `self * other`
    pub fn multiply(&self, other: &MatrixN) -> Result<MatrixN> {
        if self.cols != other.rows {
            return Err(GeometryError::DimensionMismatch {
                expected: self.cols,
                actual: other.rows,
            });
        }
        let mut out = MatrixN::zero(self.rows, other.cols);
        for i in 0..self.rows {
            let row = &self.data[i * self.cols..(i + 1) * self.cols];
            for j in 0..other.cols {
                let mut sum = 0.0;
                for (k, a) in row.iter().enumerate() {
                    sum += a * other.data[k * other.cols + j];
                }
                out.data[i * other.cols + j] = sum;
            }
        }
        Ok(out)
    }

    /// Matrix-vector product `self * v`
    pub fn multiply_vector(&self, v: &[f64]) -> Result<Vec<f64>> {
        let mut out = vec![0.0; self.rows];
        self.multiply_vector_into(v, &mut out)?;
        Ok(out)
    }

    /// Matrix-vector product written into `out`
    pub fn multiply_vector_into(&self, v: &[f64], out: &mut [f64]) -> Result<()> {
        if v.len() != self.cols {
            return Err(GeometryError::DimensionMismatch {
                expected: self.cols,
                actual: v.len(),
            });
        }
        if out.len() != self.rows {
            return Err(GeometryError::DimensionMismatch {
                expected: self.rows,
                actual: out.len(),
            });
        }
        for (i, o) in out.iter_mut().enumerate() {
            let row = &self.data[i * self.cols..(i + 1) * self.cols];
            *o = row.iter().zip(v).map(|(a, b)| a * b).sum();
        }
        Ok(())
    }

    /// Transposed copy
    pub fn transpose(&self) -> MatrixN {
        let mut out = MatrixN::zero(self.cols, self.rows);
        for i in 0..self.rows {
            for j in 0..self.cols {
                out.data[j * self.rows + i] = self.data[i * self.cols + j];
            }
        }
        out
    }

    /// Determinant by cofactor expansion along the first row.
    ///
    /// This is O(n!) and only meant for checks and tests, never per frame.
    pub fn determinant(&self) -> Result<f64> {
        let dim = self.dim()?;
        Ok(determinant_flat(&self.data, dim))
    }

    /// Approximate equality; differently shaped matrices are never equal
    pub fn approx_eq(&self, other: &MatrixN, eps: f64) -> bool {
        self.rows == other.rows
            && self.cols == other.cols
            && self
                .data
                .iter()
                .zip(&other.data)
                .all(|(a, b)| (a - b).abs() <= eps)
    }

    /// Overwrite this matrix with the contents of `other` (same shape required)
    pub fn copy_from(&mut self, other: &MatrixN) -> Result<()> {
        if self.dimensions() != other.dimensions() {
            return Err(GeometryError::DimensionMismatch {
                expected: self.data.len(),
                actual: other.data.len(),
            });
        }
        self.data.copy_from_slice(&other.data);
        Ok(())
    }
}

fn determinant_flat(m: &[f64], dim: usize) -> f64 {
    match dim {
        0 => 1.0,
        1 => m[0],
        2 => m[0] * m[3] - m[1] * m[2],
        _ => {
            let minor_dim = dim - 1;
            let mut minor = vec![0.0; minor_dim * minor_dim];
            let mut det = 0.0;
            for col in 0..dim {
                let pivot = m[col];
                if pivot == 0.0 {
                    continue;
                }
                let mut idx = 0;
                for r in 1..dim {
                    for c in 0..dim {
                        if c != col {
                            minor[idx] = m[r * dim + c];
                            idx += 1;
                        }
                    }
                }
                let sign = if col % 2 == 0 { 1.0 } else { -1.0 };
                det += sign * pivot * determinant_flat(&minor, minor_dim);
            }
            det
        }
    }
}

/// Side length of a square matrix with `len` elements
pub fn square_dimension(len: usize) -> Result<usize> {
    let dim = (len as f64).sqrt().round() as usize;
    if dim * dim != len {
        return Err(GeometryError::NotSquare { rows: len, cols: 1 });
    }
    Ok(dim)
}

/// Reset a flat `dim x dim` buffer to the identity
pub fn identity_into(out: &mut [f64], dim: usize) -> Result<()> {
    check_len(dim * dim, out.len())?;
    out.fill(0.0);
    for i in 0..dim {
        out[i * dim + i] = 1.0;
    }
    Ok(())
}

/// `out = a * b` for flat square matrices. `out` must not overlap the inputs;
/// the borrow checker already guarantees that here, see [`MatrixScratch`]
/// for the in-place form.
pub fn multiply_flat_into(out: &mut [f64], a: &[f64], b: &[f64], dim: usize) -> Result<()> {
    if VALIDATE {
        let n = dim * dim;
        check_len(n, a.len())?;
        check_len(n, b.len())?;
        check_len(n, out.len())?;
    }
    for i in 0..dim {
        let row = i * dim;
        for j in 0..dim {
            let mut sum = 0.0;
            for k in 0..dim {
                sum += a[row + k] * b[k * dim + j];
            }
            out[row + j] = sum;
        }
    }
    Ok(())
}

/// `out = m * v` for a flat square matrix
pub fn multiply_vector_flat_into(out: &mut [f64], m: &[f64], v: &[f64], dim: usize) -> Result<()> {
    if VALIDATE {
        check_len(dim * dim, m.len())?;
        check_len(dim, v.len())?;
        check_len(dim, out.len())?;
    }
    for (i, o) in out.iter_mut().enumerate().take(dim) {
        let row = &m[i * dim..(i + 1) * dim];
        *o = row.iter().zip(v).map(|(a, b)| a * b).sum();
    }
    Ok(())
}

/// One side of an in-place multiply: either the output buffer itself or an
/// independent input.
#[derive(Clone, Copy, Debug)]
pub enum Operand<'a> {
    /// The buffer being written to
    Output,
    /// Storage distinct from the output
    Input(&'a [f64]),
}

impl<'a> Operand<'a> {
    #[inline]
    fn resolve<'s>(self, output: &'s [f64]) -> &'s [f64]
    where
        'a: 's,
    {
        match self {
            Operand::Output => output,
            Operand::Input(slice) => slice,
        }
    }

    #[inline]
    fn is_output(&self) -> bool {
        matches!(self, Operand::Output)
    }
}

/// Per-dimension scratch buffers for alias-safe multiplication.
///
/// Buffers are created the first time a dimension is seen and kept for the
/// life of the pool. Not meant to be shared between threads; give each
/// thread its own pool.
#[derive(Debug, Default)]
pub struct MatrixScratch {
    buffers: HashMap<usize, Vec<f64>>,
}

impl MatrixScratch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scratch buffer of `dim * dim` elements for this dimension
    pub fn buffer(&mut self, dim: usize) -> &mut [f64] {
        self.buffers
            .entry(dim)
            .or_insert_with(|| {
                log::debug!("Allocating {}x{} matrix scratch buffer", dim, dim);
                vec![0.0; dim * dim]
            })
            .as_mut_slice()
    }

    /// Dimensions that currently own a scratch buffer
    pub fn cached_dimensions(&self) -> usize {
        self.buffers.len()
    }

    /// `out = a * b` where either operand may be `out` itself.
    ///
    /// When an operand aliases the output, the product is computed into this
    /// pool's scratch buffer and then copied back, so chains like
    /// `out = out * r` are safe without any caller bookkeeping.
    pub fn multiply_into(
        &mut self,
        out: &mut [f64],
        a: Operand<'_>,
        b: Operand<'_>,
        dim: usize,
    ) -> Result<()> {
        if !a.is_output() && !b.is_output() {
            return multiply_flat_into(out, a.resolve(&[]), b.resolve(&[]), dim);
        }

        check_len(dim * dim, out.len())?;
        let scratch = self.buffer(dim);
        {
            let src: &[f64] = out;
            multiply_flat_into(scratch, a.resolve(src), b.resolve(src), dim)?;
        }
        out.copy_from_slice(scratch);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-10;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    fn sample(dim: usize, seed: f64) -> MatrixN {
        let data = (0..dim * dim)
            .map(|i| ((i as f64 + 1.0) * seed).sin())
            .collect();
        MatrixN::from_flat(data).unwrap()
    }

    #[test]
    fn test_identity_preserves_vectors() {
        for dim in 1..=8 {
            let v: Vec<f64> = (0..dim).map(|i| i as f64 * 1.5 - 2.0).collect();
            let result = MatrixN::identity(dim).multiply_vector(&v).unwrap();
            assert_eq!(result, v, "identity({}) changed the vector", dim);
        }
    }

    #[test]
    fn test_from_flat_requires_perfect_square() {
        assert!(MatrixN::from_flat(vec![1.0; 9]).is_ok());
        assert!(matches!(
            MatrixN::from_flat(vec![1.0; 8]),
            Err(GeometryError::NotSquare { .. })
        ));
    }

    #[test]
    fn test_nested_representation_roundtrip() {
        let rows = vec![vec![1.0, 2.0], vec![3.0, 4.0]];
        let m = MatrixN::from_rows(&rows).unwrap();
        assert_eq!(m.as_slice(), &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(m.to_rows(), rows);

        let ragged = vec![vec![1.0, 2.0], vec![3.0]];
        assert!(MatrixN::from_rows(&ragged).is_err());
    }

    #[test]
    fn test_multiply() {
        let a = MatrixN::from_flat(vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let b = MatrixN::from_flat(vec![5.0, 6.0, 7.0, 8.0]).unwrap();
        let c = a.multiply(&b).unwrap();
        assert_eq!(c.as_slice(), &[19.0, 22.0, 43.0, 50.0]);
    }

    #[test]
    fn test_multiply_rectangular_mismatch() {
        let a = MatrixN::zero(2, 3);
        let b = MatrixN::zero(2, 3);
        assert!(matches!(
            a.multiply(&b),
            Err(GeometryError::DimensionMismatch { expected: 3, actual: 2 })
        ));
    }

    #[test]
    fn test_transpose() {
        let m = MatrixN::from_rows(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
        let t = m.transpose();
        assert_eq!(t.dimensions(), (3, 2));
        assert_eq!(t.to_rows(), vec![vec![1.0, 4.0], vec![2.0, 5.0], vec![3.0, 6.0]]);
    }

    #[test]
    fn test_determinant() {
        let m = MatrixN::from_flat(vec![2.0, 0.0, 1.0, 1.0, 3.0, 2.0, 1.0, 1.0, 1.0]).unwrap();
        // 2*(3-2) - 0 + 1*(1-3) = 0
        assert!(approx(m.determinant().unwrap(), 0.0));

        let m = MatrixN::from_flat(vec![4.0, 3.0, 6.0, 3.0]).unwrap();
        assert!(approx(m.determinant().unwrap(), -6.0));

        assert!(approx(MatrixN::identity(6).determinant().unwrap(), 1.0));
        assert!(MatrixN::zero(2, 3).determinant().is_err());
    }

    #[test]
    fn test_determinant_of_product() {
        let a = sample(4, 0.7);
        let b = sample(4, 1.3);
        let det_ab = a.multiply(&b).unwrap().determinant().unwrap();
        let expected = a.determinant().unwrap() * b.determinant().unwrap();
        assert!((det_ab - expected).abs() < 1e-9);
    }

    #[test]
    fn test_copy_from() {
        let src = sample(3, 0.5);
        let mut dst = MatrixN::identity(3);
        dst.copy_from(&src).unwrap();
        assert_eq!(dst, src);
        assert!(MatrixN::identity(2).copy_from(&src).is_err());
    }

    #[test]
    fn test_multiply_into_left_alias() {
        let mut scratch = MatrixScratch::new();
        for dim in 2..=6 {
            let a = sample(dim, 0.3);
            let b = sample(dim, 0.9);
            let expected = a.multiply(&b).unwrap();

            let mut out = a.clone().into_vec();
            scratch
                .multiply_into(&mut out, Operand::Output, Operand::Input(b.as_slice()), dim)
                .unwrap();
            assert!(MatrixN::from_flat(out).unwrap().approx_eq(&expected, EPSILON));
        }
        assert_eq!(scratch.cached_dimensions(), 5);
    }

    #[test]
    fn test_multiply_into_right_and_double_alias() {
        let mut scratch = MatrixScratch::new();
        let a = sample(4, 0.4);
        let b = sample(4, 1.1);

        let mut out = b.clone().into_vec();
        scratch
            .multiply_into(&mut out, Operand::Input(a.as_slice()), Operand::Output, 4)
            .unwrap();
        assert!(MatrixN::from_flat(out).unwrap().approx_eq(&a.multiply(&b).unwrap(), EPSILON));

        let mut out = a.clone().into_vec();
        scratch
            .multiply_into(&mut out, Operand::Output, Operand::Output, 4)
            .unwrap();
        assert!(MatrixN::from_flat(out).unwrap().approx_eq(&a.multiply(&a).unwrap(), EPSILON));
    }

    #[test]
    fn test_multiply_into_without_alias() {
        let mut scratch = MatrixScratch::new();
        let a = sample(3, 0.2);
        let b = sample(3, 0.6);
        let mut out = vec![0.0; 9];
        scratch
            .multiply_into(&mut out, Operand::Input(a.as_slice()), Operand::Input(b.as_slice()), 3)
            .unwrap();
        assert!(MatrixN::from_flat(out).unwrap().approx_eq(&a.multiply(&b).unwrap(), EPSILON));
        assert_eq!(scratch.cached_dimensions(), 0);
    }

    #[test]
    fn test_multiply_flat_into_validates() {
        let mut out = vec![0.0; 4];
        let err = multiply_flat_into(&mut out, &[1.0; 4], &[1.0; 9], 2).unwrap_err();
        assert_eq!(err, GeometryError::DimensionMismatch { expected: 4, actual: 9 });
    }

    #[test]
    fn test_identity_into() {
        let mut out = vec![7.0; 9];
        identity_into(&mut out, 3).unwrap();
        assert_eq!(out, MatrixN::identity(3).into_vec());
    }
}
