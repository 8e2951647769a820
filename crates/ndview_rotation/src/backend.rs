//! Rotation composition strategies
//!
//! A backend turns an ordered list of resolved plane rotations into one
//! matrix `R1 * R2 * ... * Rk`. Backends are interchangeable: all of them
//! must agree with [`ReferenceBackend`] to within floating-point noise.

use std::fmt;

use ndview_math::matn::{identity_into, multiply_flat_into};
use ndview_math::Result;
use serde::{Deserialize, Serialize};

use crate::rotation::rotation_matrix_into;

/// One resolved plane rotation with its sin/cos already evaluated
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaneStep {
    pub i: usize,
    pub j: usize,
    pub sin: f64,
    pub cos: f64,
}

/// Reusable per-dimension buffers handed to a backend on every call
#[derive(Debug)]
pub struct ComposeBuffers {
    dimension: usize,
    rotation: Vec<f64>,
    current: Vec<f64>,
    next: Vec<f64>,
}

impl ComposeBuffers {
    pub fn new(dimension: usize) -> Self {
        let len = dimension * dimension;
        Self {
            dimension,
            rotation: vec![0.0; len],
            current: vec![0.0; len],
            next: vec![0.0; len],
        }
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Strategy for composing plane rotations into `out` (a flat `dim x dim` buffer)
pub trait RotationBackend: fmt::Debug {
    /// Short identifier used in logs
    fn name(&self) -> &'static str;

    /// Write the product of `steps`, in order, into `out`.
    ///
    /// `buffers` belongs to the caller's cache; a backend may use it freely
    /// but must fully overwrite `out`.
    fn compose_into(
        &self,
        steps: &[PlaneStep],
        buffers: &mut ComposeBuffers,
        out: &mut [f64],
    ) -> Result<()>;
}

/// Builds each plane rotation as a full matrix and multiplies, alternating
/// two accumulators so no step allocates.
#[derive(Clone, Copy, Debug, Default)]
pub struct ReferenceBackend;

impl RotationBackend for ReferenceBackend {
    fn name(&self) -> &'static str {
        "reference"
    }

    fn compose_into(
        &self,
        steps: &[PlaneStep],
        buffers: &mut ComposeBuffers,
        out: &mut [f64],
    ) -> Result<()> {
        let dim = buffers.dimension;
        identity_into(&mut buffers.current, dim)?;

        for step in steps {
            rotation_matrix_into(&mut buffers.rotation, dim, step.i, step.j, step.sin, step.cos)?;
            multiply_flat_into(&mut buffers.next, &buffers.current, &buffers.rotation, dim)?;
            std::mem::swap(&mut buffers.current, &mut buffers.next);
        }

        out.copy_from_slice(&buffers.current);
        Ok(())
    }
}

/// Right-multiplying by a plane rotation only changes columns `i` and `j`,
/// so each step is an O(n) column update instead of an O(n³) product.
#[derive(Clone, Copy, Debug, Default)]
pub struct GivensBackend;

impl RotationBackend for GivensBackend {
    fn name(&self) -> &'static str {
        "givens"
    }

    fn compose_into(
        &self,
        steps: &[PlaneStep],
        buffers: &mut ComposeBuffers,
        out: &mut [f64],
    ) -> Result<()> {
        let dim = buffers.dimension;
        identity_into(out, dim)?;

        for step in steps {
            let (i, j) = (step.i, step.j);
            for row in 0..dim {
                let base = row * dim;
                let a = out[base + i];
                let b = out[base + j];
                out[base + i] = a * step.cos + b * step.sin;
                out[base + j] = b * step.cos - a * step.sin;
            }
        }
        Ok(())
    }
}

/// Backend selection, e.g. from configuration
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Reference,
    Givens,
}

impl BackendKind {
    pub fn build(self) -> Box<dyn RotationBackend> {
        match self {
            BackendKind::Reference => Box::new(ReferenceBackend),
            BackendKind::Givens => Box::new(GivensBackend),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(i: usize, j: usize, angle: f64) -> PlaneStep {
        let (sin, cos) = angle.sin_cos();
        PlaneStep { i, j, sin, cos }
    }

    #[test]
    fn test_empty_steps_give_identity() {
        for kind in [BackendKind::Reference, BackendKind::Givens] {
            let backend = kind.build();
            let mut buffers = ComposeBuffers::new(3);
            let mut out = vec![5.0; 9];
            backend.compose_into(&[], &mut buffers, &mut out).unwrap();
            assert_eq!(out, vec![1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);
        }
    }

    #[test]
    fn test_backends_agree() {
        let steps = [step(0, 1, 0.3), step(1, 3, -1.2), step(0, 3, 2.5), step(2, 4, 0.8)];
        let mut buffers = ComposeBuffers::new(5);

        let mut reference = vec![0.0; 25];
        ReferenceBackend
            .compose_into(&steps, &mut buffers, &mut reference)
            .unwrap();
        let mut givens = vec![0.0; 25];
        GivensBackend
            .compose_into(&steps, &mut buffers, &mut givens)
            .unwrap();

        for (a, b) in reference.iter().zip(&givens) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn test_backend_names() {
        assert_eq!(BackendKind::Reference.build().name(), "reference");
        assert_eq!(BackendKind::Givens.build().name(), "givens");
    }
}
