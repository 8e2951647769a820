//! N-dimensional Rotation Engine
//!
//! Rotations in n dimensions are built from independent rotations in the
//! `n(n-1)/2` coordinate planes and recomposed every animation frame.
//!
//! - [`plane`] - plane naming (`XY`, `ZW`, `XA6`, ...) and per-dimension plane tables
//! - [`rotation`] - single-plane rotation matrices
//! - [`backend`] - interchangeable composition strategies
//! - [`context`] - [`RotationContext`], the owner of all cached state

pub mod backend;
pub mod context;
pub mod plane;
pub mod rotation;

pub use backend::{BackendKind, GivensBackend, PlaneStep, ReferenceBackend, RotationBackend};
pub use context::RotationContext;
pub use plane::{
    axis_name, create_plane_name, parse_plane_name, plane_count, PlaneTable, RotationPlane,
};
pub use rotation::{rotation_matrix, rotation_matrix_into, rotation_matrix_with};

pub use ndview_math::{GeometryError, MatrixN, Result};
