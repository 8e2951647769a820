//! Dense vector arithmetic of arbitrary dimension
//!
//! Vectors are plain `&[f64]` slices; dimension is the slice length. Every
//! operation that produces a vector has an `_into` form writing into a
//! caller-supplied buffer so per-frame code can avoid allocating.
//!
//! Pairwise length checks only run when [`VALIDATE`](crate::VALIDATE) is on.
//! Without them, mismatched operands are truncated to the shorter length.

use crate::error::{GeometryError, Result};
use crate::VALIDATE;

/// Magnitudes below this are treated as zero by [`normalize`].
pub const DEGENERATE_MAGNITUDE: f64 = 1e-10;

#[inline]
pub(crate) fn check_len(expected: usize, actual: usize) -> Result<()> {
    if VALIDATE && expected != actual {
        return Err(GeometryError::DimensionMismatch { expected, actual });
    }
    Ok(())
}

/// Create a vector of `dim` components, all set to `fill`
pub fn create(dim: usize, fill: f64) -> Vec<f64> {
    vec![fill; dim]
}

/// Component-wise sum `a + b`
pub fn add(a: &[f64], b: &[f64]) -> Result<Vec<f64>> {
    let mut out = vec![0.0; a.len()];
    add_into(&mut out, a, b)?;
    Ok(out)
}

/// Component-wise sum written into `out`
pub fn add_into(out: &mut [f64], a: &[f64], b: &[f64]) -> Result<()> {
    check_len(a.len(), b.len())?;
    check_len(a.len(), out.len())?;
    for ((o, x), y) in out.iter_mut().zip(a).zip(b) {
        *o = x + y;
    }
    Ok(())
}

/// Component-wise difference `a - b`
pub fn subtract(a: &[f64], b: &[f64]) -> Result<Vec<f64>> {
    let mut out = vec![0.0; a.len()];
    subtract_into(&mut out, a, b)?;
    Ok(out)
}

/// Component-wise difference written into `out`
pub fn subtract_into(out: &mut [f64], a: &[f64], b: &[f64]) -> Result<()> {
    check_len(a.len(), b.len())?;
    check_len(a.len(), out.len())?;
    for ((o, x), y) in out.iter_mut().zip(a).zip(b) {
        *o = x - y;
    }
    Ok(())
}

/// Multiply every component by `s`
pub fn scale(v: &[f64], s: f64) -> Vec<f64> {
    v.iter().map(|x| x * s).collect()
}

/// Scaled copy of `v` written into `out`
pub fn scale_into(out: &mut [f64], v: &[f64], s: f64) -> Result<()> {
    check_len(v.len(), out.len())?;
    for (o, x) in out.iter_mut().zip(v) {
        *o = x * s;
    }
    Ok(())
}

/// Dot product
pub fn dot(a: &[f64], b: &[f64]) -> Result<f64> {
    check_len(a.len(), b.len())?;
    Ok(a.iter().zip(b).map(|(x, y)| x * y).sum())
}

/// Squared length (no square root)
#[inline]
pub fn magnitude_squared(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum()
}

/// Euclidean length
#[inline]
pub fn magnitude(v: &[f64]) -> f64 {
    magnitude_squared(v).sqrt()
}

/// Unit vector in the direction of `v`
///
/// Fails with [`GeometryError::DegenerateVector`] when the magnitude is
/// below [`DEGENERATE_MAGNITUDE`].
pub fn normalize(v: &[f64]) -> Result<Vec<f64>> {
    let mut out = vec![0.0; v.len()];
    normalize_into(&mut out, v)?;
    Ok(out)
}

/// Unit vector written into `out`
pub fn normalize_into(out: &mut [f64], v: &[f64]) -> Result<()> {
    let mag = magnitude(v);
    if mag < DEGENERATE_MAGNITUDE {
        return Err(GeometryError::DegenerateVector { magnitude: mag });
    }
    scale_into(out, v, 1.0 / mag)
}

/// Approximate equality; vectors of different length are never equal
pub fn approx_eq(a: &[f64], b: &[f64], eps: f64) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| (x - y).abs() <= eps)
}

/// Copy `v` into `out`
pub fn copy_into(out: &mut [f64], v: &[f64]) -> Result<()> {
    check_len(v.len(), out.len())?;
    let n = out.len().min(v.len());
    out[..n].copy_from_slice(&v[..n]);
    Ok(())
}

/// Squared Euclidean distance between two points
pub fn distance_squared(a: &[f64], b: &[f64]) -> Result<f64> {
    check_len(a.len(), b.len())?;
    Ok(a
        .iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum())
}

/// Euclidean distance between two points
pub fn distance(a: &[f64], b: &[f64]) -> Result<f64> {
    Ok(distance_squared(a, b)?.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-10;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_create() {
        let v = create(5, 1.5);
        assert_eq!(v.len(), 5);
        assert!(v.iter().all(|&x| x == 1.5));
    }

    #[test]
    fn test_add_and_subtract() {
        let a = [5.0, 3.0, 1.0];
        let b = [1.0, 2.0, 3.0];
        assert_eq!(add(&a, &b).unwrap(), vec![6.0, 5.0, 4.0]);
        assert_eq!(subtract(&a, &b).unwrap(), vec![4.0, 1.0, -2.0]);
    }

    #[test]
    fn test_add_length_mismatch() {
        let err = add(&[1.0, 2.0], &[1.0, 2.0, 3.0]).unwrap_err();
        assert_eq!(err, GeometryError::DimensionMismatch { expected: 2, actual: 3 });
    }

    #[test]
    fn test_into_rejects_wrong_output_length() {
        let mut out = [0.0; 2];
        assert!(subtract_into(&mut out, &[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]).is_err());
    }

    #[test]
    fn test_dot() {
        // 1*4 + 2*5 + 3*6 = 32
        assert!(approx(dot(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]).unwrap(), 32.0));
        assert!(dot(&[1.0], &[1.0, 2.0]).is_err());
    }

    #[test]
    fn test_magnitude() {
        assert!(approx(magnitude(&[3.0, 4.0]), 5.0));
        assert!(approx(magnitude_squared(&[1.0, 2.0, 2.0]), 9.0));
    }

    #[test]
    fn test_normalize() {
        let n = normalize(&[3.0, 4.0]).unwrap();
        assert!(approx(magnitude(&n), 1.0));
        assert!(approx(n[0], 0.6));
        assert!(approx(n[1], 0.8));
    }

    #[test]
    fn test_normalize_degenerate() {
        match normalize(&[0.0, 1e-12, 0.0]) {
            Err(GeometryError::DegenerateVector { magnitude }) => assert!(magnitude < 1e-10),
            other => panic!("Expected DegenerateVector, got {:?}", other),
        }
    }

    #[test]
    fn test_scale_and_copy() {
        let v = [1.0, -2.0, 0.5, 4.0];
        assert_eq!(scale(&v, 2.0), vec![2.0, -4.0, 1.0, 8.0]);

        let mut out = [0.0; 4];
        copy_into(&mut out, &v).unwrap();
        assert_eq!(out, v);
    }

    #[test]
    fn test_approx_eq() {
        assert!(approx_eq(&[1.0, 2.0], &[1.0 + 1e-9, 2.0], 1e-6));
        assert!(!approx_eq(&[1.0, 2.0], &[1.1, 2.0], 1e-6));
        assert!(!approx_eq(&[1.0], &[1.0, 0.0], 1e-6));
    }

    #[test]
    fn test_distance() {
        assert!(approx(distance(&[0.0, 0.0], &[3.0, 4.0]).unwrap(), 5.0));
        assert!(approx(distance_squared(&[1.0, 1.0, 1.0], &[2.0, 2.0, 2.0]).unwrap(), 3.0));
    }
}
