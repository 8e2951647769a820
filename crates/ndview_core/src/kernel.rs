//! Per-frame kernel context
//!
//! [`Kernel`] owns every cache one frame needs: the rotation context, the
//! matrix scratch pool, the depth sorter and the rotated-vertex buffer.
//! After the first frame in a given dimension, [`Kernel::render_frame`]
//! performs no heap allocation as long as the vertex count stays the same.

use ndview_math::{matn, GeometryError, MatrixN, MatrixScratch, Operand, Result, TrigMode};
use ndview_projection::{
    calculate_projection_distance_flat, project_edges_to_positions,
    project_vertices_to_positions, DepthSorter, DEFAULT_MARGIN,
};
use ndview_rotation::{BackendKind, RotationContext};
use serde::{Deserialize, Serialize};

use crate::vertices::apply_matrix_to_vertices;

/// Knobs fixed for the lifetime of a [`Kernel`]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KernelSettings {
    pub backend: BackendKind,
    pub trig: TrigMode,
    /// Fixed projection distance; `None` picks one per frame from the
    /// rotated vertices
    pub projection_distance: Option<f64>,
    /// Margin for the automatic projection distance
    pub margin: f64,
}

impl Default for KernelSettings {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            trig: TrigMode::default(),
            projection_distance: None,
            margin: DEFAULT_MARGIN,
        }
    }
}

/// What one frame produced, borrowed from the kernel's buffers
#[derive(Debug)]
pub struct FrameOutput<'a> {
    /// Composed rotation, flat row-major
    pub rotation: &'a [f64],
    /// Vertex indices furthest first
    pub order: &'a [usize],
    /// Number of positions written
    pub vertex_count: usize,
    /// Distance used for the perspective division
    pub projection_distance: f64,
}

#[derive(Debug)]
pub struct Kernel {
    rotation: RotationContext,
    scratch: MatrixScratch,
    depth: DepthSorter,
    matrix: Vec<f64>,
    staging: Vec<f64>,
    rotated: Vec<f64>,
    base_orientation: Option<MatrixN>,
    object_offset: Vec<f64>,
    dimension: usize,
    last_distance: f64,
    settings: KernelSettings,
}

impl Default for Kernel {
    fn default() -> Self {
        Self::new(KernelSettings::default())
    }
}

impl Kernel {
    pub fn new(settings: KernelSettings) -> Self {
        let rotation = RotationContext::with_backend(settings.backend.build()).with_trig(settings.trig);
        log::debug!(
            "Kernel created with {} backend, {:?} trig",
            rotation.backend_name(),
            settings.trig
        );
        Self {
            rotation,
            scratch: MatrixScratch::new(),
            depth: DepthSorter::new(),
            matrix: Vec::new(),
            staging: Vec::new(),
            rotated: Vec::new(),
            base_orientation: None,
            object_offset: Vec::new(),
            dimension: 0,
            last_distance: settings.projection_distance.unwrap_or(0.0),
            settings,
        }
    }

    pub fn settings(&self) -> &KernelSettings {
        &self.settings
    }

    /// Rotation context, for plane enumeration
    pub fn rotation_context(&mut self) -> &mut RotationContext {
        &mut self.rotation
    }

    /// Fixed orientation applied to the base vertices before the animated
    /// rotation. `None` clears it.
    pub fn set_base_orientation(&mut self, orientation: Option<MatrixN>) -> Result<()> {
        if let Some(m) = &orientation {
            m.dim()?;
        }
        self.base_orientation = orientation;
        Ok(())
    }

    /// Offset added to every vertex after rotation. An empty slice clears it.
    pub fn set_object_offset(&mut self, offset: &[f64]) {
        self.object_offset.clear();
        self.object_offset.extend_from_slice(offset);
    }

    /// Compose the frame rotation into the kernel's matrix buffer.
    ///
    /// The rotation is built in a staging buffer and only replaces the last
    /// composed matrix once every step succeeded, so a failed call leaves
    /// [`Kernel::rotate_parameters`] and [`Kernel::project_edges`] working
    /// on the previous frame.
    pub fn compose<'a, I>(&mut self, dim: usize, angles: I) -> Result<&[f64]>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        if let Some(base) = &self.base_orientation {
            let side = base.dim()?;
            if side != dim {
                return Err(GeometryError::DimensionMismatch {
                    expected: dim,
                    actual: side,
                });
            }
        }

        self.staging.resize(dim * dim, 0.0);
        self.rotation
            .compose_rotations_into(dim, angles, &mut self.staging)?;
        if let Some(base) = &self.base_orientation {
            self.scratch.multiply_into(
                &mut self.staging,
                Operand::Output,
                Operand::Input(base.as_slice()),
                dim,
            )?;
        }

        std::mem::swap(&mut self.matrix, &mut self.staging);
        self.dimension = dim;
        Ok(&self.matrix)
    }

    /// Run one frame: compose, rotate the base vertices, project them into
    /// `positions[offset..]` and compute the paint order.
    pub fn render_frame<'a, I>(
        &mut self,
        dim: usize,
        angles: I,
        base_vertices: &[f64],
        positions: &mut [f32],
        offset: usize,
    ) -> Result<FrameOutput<'_>>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        // Input shape is checked before anything owned by the kernel changes
        if dim == 0 {
            return Err(GeometryError::InvalidDimension {
                dimension: 0,
                minimum: 1,
            });
        }
        if base_vertices.len() % dim != 0 {
            return Err(GeometryError::DimensionMismatch {
                expected: base_vertices.len() / dim * dim,
                actual: base_vertices.len(),
            });
        }
        if !self.object_offset.is_empty() && self.object_offset.len() != dim {
            return Err(GeometryError::DimensionMismatch {
                expected: dim,
                actual: self.object_offset.len(),
            });
        }

        self.compose(dim, angles)?;

        self.rotated.resize(base_vertices.len(), 0.0);
        apply_matrix_to_vertices(&self.matrix, base_vertices, dim, &mut self.rotated)?;

        if !self.object_offset.is_empty() {
            for v in self.rotated.chunks_exact_mut(dim) {
                for (c, o) in v.iter_mut().zip(&self.object_offset) {
                    *c += o;
                }
            }
        }

        let distance = match self.settings.projection_distance {
            Some(d) => d,
            None => calculate_projection_distance_flat(&self.rotated, dim, self.settings.margin),
        };
        self.last_distance = distance;

        let vertex_count =
            project_vertices_to_positions(&self.rotated, dim, distance, positions, offset)?;
        let order = self.depth.sort_flat(&self.rotated, dim)?;
        log::trace!(
            "Frame in {}D: {} vertices at distance {:.3}",
            dim,
            vertex_count,
            distance
        );

        Ok(FrameOutput {
            rotation: &self.matrix,
            order,
            vertex_count,
            projection_distance: distance,
        })
    }

    /// Project the edges of the last rendered frame as line segments
    pub fn project_edges(&self, edges: &[u32], out: &mut [f32], offset: usize) -> Result<usize> {
        project_edges_to_positions(
            &self.rotated,
            self.dimension,
            edges,
            self.last_distance,
            out,
            offset,
        )
    }

    /// Rotate a per-object parameter vector by the last composed rotation
    pub fn rotate_parameters(&self, params: &[f64], out: &mut [f64]) -> Result<()> {
        let dim = self.dimension;
        if dim == 0 {
            return Err(GeometryError::InvalidDimension {
                dimension: 0,
                minimum: 1,
            });
        }
        if params.len() != dim || out.len() != dim {
            return Err(GeometryError::DimensionMismatch {
                expected: dim,
                actual: if params.len() != dim { params.len() } else { out.len() },
            });
        }
        matn::multiply_vector_flat_into(out, &self.matrix, params, dim)
    }

    /// Rotated vertices of the last frame
    pub fn rotated_vertices(&self) -> &[f64] {
        &self.rotated
    }

    /// Dimension of the last composed rotation
    pub fn dimension(&self) -> usize {
        self.dimension
    }
}
