//! N-dimensional to 3D Projection
//!
//! Points with `n >= 3` coordinates are projected onto the three display
//! axes with a single perspective division. Everything beyond `z` is folded
//! into one "effective depth" scalar first, which avoids the exponential
//! shrinking a per-dimension chain of divisions would cause.
//!
//! - [`perspective`] - point and batch projection, depth, distance heuristic
//! - [`depth`] - back-to-front paint ordering with reusable scratch
//! - [`clip`] - line visibility against the projection plane
//! - [`buffer`] - writers targeting flat `f32` GPU buffers

pub mod buffer;
pub mod clip;
pub mod depth;
pub mod perspective;

pub use buffer::{
    positions_as_bytes, positions_as_points, project_edges_to_positions,
    project_vertices_to_positions, GpuPosition,
};
pub use clip::{clip_line, is_in_front};
pub use depth::{sort_by_depth, DepthSorter};
pub use perspective::{
    calculate_depth, calculate_projection_distance, calculate_projection_distance_flat,
    effective_depth, project_orthographic,
    project_perspective, project_vertices, DEFAULT_MARGIN, DEFAULT_PROJECTION_DISTANCE,
    MIN_SAFE_DISTANCE,
};

pub use ndview_math::{GeometryError, Result};
