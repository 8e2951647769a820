//! Per-dimension rotation caches
//!
//! [`RotationContext`] owns everything the rotation engine would otherwise
//! keep in globals: the immutable plane tables for each dimension it has
//! seen, and the scratch buffers reused by every composition call. Both maps
//! only grow. A context is meant to be driven by one thread; give each
//! thread its own.

use std::collections::HashMap;

use ndview_math::{GeometryError, MatrixN, Result, TrigMode, VALIDATE};

use crate::backend::{BackendKind, ComposeBuffers, PlaneStep, RotationBackend};
use crate::plane::{PlaneTable, RotationPlane};

/// Owner of plane tables, scratch buffers and the composition backend
#[derive(Debug)]
pub struct RotationContext {
    tables: HashMap<usize, PlaneTable>,
    buffers: HashMap<usize, ComposeBuffers>,
    steps: Vec<PlaneStep>,
    backend: Box<dyn RotationBackend>,
    trig: TrigMode,
}

impl Default for RotationContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RotationContext {
    /// Context using the reference backend and exact trig
    pub fn new() -> Self {
        Self::with_backend(BackendKind::Reference.build())
    }

    pub fn with_backend(backend: Box<dyn RotationBackend>) -> Self {
        Self {
            tables: HashMap::new(),
            buffers: HashMap::new(),
            steps: Vec::new(),
            backend,
            trig: TrigMode::Exact,
        }
    }

    /// Builder-style trig selection
    pub fn with_trig(mut self, trig: TrigMode) -> Self {
        self.trig = trig;
        self
    }

    pub fn set_trig(&mut self, trig: TrigMode) {
        self.trig = trig;
    }

    pub fn trig(&self) -> TrigMode {
        self.trig
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Plane table for `dim`, built on first use
    pub fn table(&mut self, dim: usize) -> Result<&PlaneTable> {
        if !self.tables.contains_key(&dim) {
            let table = PlaneTable::new(dim)?;
            log::debug!("Built rotation plane table for {}D ({} planes)", dim, table.len());
            self.tables.insert(dim, table);
        }
        Ok(&self.tables[&dim])
    }

    /// All rotation planes of `dim`, in canonical order
    pub fn planes(&mut self, dim: usize) -> Result<&[RotationPlane]> {
        Ok(self.table(dim)?.planes())
    }

    /// Number of dimensions with a cached plane table
    pub fn cached_dimensions(&self) -> usize {
        self.tables.len()
    }

    /// Compose the given plane rotations into a new matrix.
    ///
    /// Rotations are multiplied in iteration order (`R1 * R2 * ...`), so the
    /// caller's ordering must be deterministic. An empty input yields the
    /// identity.
    pub fn compose_rotations<'a, I>(&mut self, dim: usize, angles: I) -> Result<MatrixN>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut out = MatrixN::zero(dim, dim);
        self.compose_rotations_into(dim, angles, out.as_mut_slice())?;
        Ok(out)
    }

    /// Compose the given plane rotations into a flat `dim x dim` buffer.
    ///
    /// Unknown plane names fail with [`GeometryError::InvalidPlaneName`]
    /// when validating; otherwise they are skipped.
    pub fn compose_rotations_into<'a, I>(
        &mut self,
        dim: usize,
        angles: I,
        out: &mut [f64],
    ) -> Result<()>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        if out.len() != dim * dim {
            return Err(GeometryError::BufferTooSmall {
                required: dim * dim,
                available: out.len(),
            });
        }
        self.table(dim)?;
        let table = &self.tables[&dim];

        self.steps.clear();
        for (name, angle) in angles {
            match table.resolve(name) {
                Some((i, j)) => {
                    let (sin, cos) = self.trig.sin_cos(angle);
                    self.steps.push(PlaneStep { i, j, sin, cos });
                }
                None if VALIDATE => {
                    return Err(GeometryError::InvalidPlaneName(name.to_string()));
                }
                None => {
                    log::warn!("Skipping unknown rotation plane '{}' in {}D", name, dim);
                }
            }
        }

        let buffers = self.buffers.entry(dim).or_insert_with(|| {
            log::debug!("Allocating rotation composition buffers for {}D", dim);
            ComposeBuffers::new(dim)
        });
        log::trace!(
            "Composing {} plane rotations in {}D with {} backend",
            self.steps.len(),
            dim,
            self.backend.name()
        );
        self.backend.compose_into(&self.steps, buffers, out)
    }
}
