//! Single-plane (Givens) rotation matrices
//!
//! A rotation by `θ` in the plane of axes `i < j` is the identity with
//!
//! ```text
//! R[i][i] =  cos θ    R[i][j] = -sin θ
//! R[j][i] =  sin θ    R[j][j] =  cos θ
//! ```
//!
//! so it is orthogonal with determinant 1 by construction.

use ndview_math::matn::identity_into;
use ndview_math::{GeometryError, MatrixN, Result, TrigMode, VALIDATE};

fn check_plane(dim: usize, i: usize, j: usize) -> Result<()> {
    if dim < 2 {
        return Err(GeometryError::InvalidDimension {
            dimension: dim,
            minimum: 2,
        });
    }
    if j >= dim {
        return Err(GeometryError::InvalidIndex { index: j, bound: dim });
    }
    if i >= j {
        return Err(GeometryError::InvalidIndex { index: i, bound: j });
    }
    Ok(())
}

/// Rotation by `angle` radians in the plane of axes `i < j`
pub fn rotation_matrix(dim: usize, i: usize, j: usize, angle: f64) -> Result<MatrixN> {
    rotation_matrix_with(dim, i, j, angle, TrigMode::Exact)
}

/// Rotation matrix using the chosen sin/cos implementation
pub fn rotation_matrix_with(
    dim: usize,
    i: usize,
    j: usize,
    angle: f64,
    trig: TrigMode,
) -> Result<MatrixN> {
    check_plane(dim, i, j)?;
    let (sin, cos) = trig.sin_cos(angle);
    let mut m = MatrixN::zero(dim, dim);
    rotation_matrix_into(m.as_mut_slice(), dim, i, j, sin, cos)?;
    Ok(m)
}

/// Write a plane rotation with precomputed `sin`/`cos` into a flat buffer
pub fn rotation_matrix_into(
    out: &mut [f64],
    dim: usize,
    i: usize,
    j: usize,
    sin: f64,
    cos: f64,
) -> Result<()> {
    if VALIDATE {
        check_plane(dim, i, j)?;
    }
    identity_into(out, dim)?;
    out[i * dim + i] = cos;
    out[j * dim + j] = cos;
    out[i * dim + j] = -sin;
    out[j * dim + i] = sin;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    const EPSILON: f64 = 1e-6;

    #[test]
    fn test_rotation_xy_quarter_turn() {
        let r = rotation_matrix(3, 0, 1, FRAC_PI_2).unwrap();
        let v = r.multiply_vector(&[1.0, 0.0, 0.0]).unwrap();
        assert!(ndview_math::vecn::approx_eq(&v, &[0.0, 1.0, 0.0], EPSILON));

        // Z is untouched
        let v = r.multiply_vector(&[0.0, 0.0, 1.0]).unwrap();
        assert!(ndview_math::vecn::approx_eq(&v, &[0.0, 0.0, 1.0], EPSILON));
    }

    #[test]
    fn test_orthogonal_and_unit_determinant() {
        for dim in 2..=7 {
            for i in 0..dim {
                for j in (i + 1)..dim {
                    let mut angle = -2.0 * PI;
                    while angle <= 2.0 * PI {
                        let r = rotation_matrix(dim, i, j, angle).unwrap();
                        let rrt = r.multiply(&r.transpose()).unwrap();
                        assert!(
                            rrt.approx_eq(&MatrixN::identity(dim), EPSILON),
                            "R*R^T != I for dim {} plane ({}, {}) angle {}",
                            dim, i, j, angle
                        );
                        let det = r.determinant().unwrap();
                        assert!((det - 1.0).abs() < EPSILON, "det = {}", det);
                        angle += 0.7;
                    }
                }
            }
        }
    }

    #[test]
    fn test_invalid_indices() {
        assert!(matches!(
            rotation_matrix(4, 1, 1, 0.3),
            Err(GeometryError::InvalidIndex { .. })
        ));
        assert!(matches!(
            rotation_matrix(4, 2, 1, 0.3),
            Err(GeometryError::InvalidIndex { .. })
        ));
        assert!(matches!(
            rotation_matrix(4, 0, 4, 0.3),
            Err(GeometryError::InvalidIndex { index: 4, bound: 4 })
        ));
        assert!(matches!(
            rotation_matrix(1, 0, 1, 0.3),
            Err(GeometryError::InvalidDimension { .. })
        ));
    }

    #[test]
    fn test_fast_trig_rotation_close_to_exact() {
        let exact = rotation_matrix(5, 1, 3, 0.9).unwrap();
        let fast = rotation_matrix_with(5, 1, 3, 0.9, TrigMode::Fast).unwrap();
        assert!(fast.approx_eq(&exact, 0.06));
        assert!(!fast.approx_eq(&exact, 1e-6));
    }

    #[test]
    fn test_rotation_into_overwrites_buffer() {
        let mut out = vec![9.0; 16];
        rotation_matrix_into(&mut out, 4, 0, 3, 1.0, 0.0).unwrap();
        let expected = rotation_matrix(4, 0, 3, FRAC_PI_2).unwrap();
        assert!(MatrixN::from_flat(out).unwrap().approx_eq(&expected, EPSILON));
    }
}
