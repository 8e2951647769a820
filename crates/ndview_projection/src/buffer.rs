//! Projection straight into flat `f32` buffers
//!
//! These writers fill a caller-owned position buffer (three floats per
//! point) starting at an offset, ready to upload to the GPU without an
//! intermediate allocation. Destination capacity is always checked.

use bytemuck::{Pod, Zeroable};
use ndview_math::{GeometryError, Result, VALIDATE};

use crate::perspective::{check_projectable, project_unchecked};

/// One projected position as laid out in a GPU vertex buffer
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct GpuPosition {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

fn check_capacity(out: &[f32], offset: usize, floats: usize) -> Result<()> {
    match offset.checked_add(floats) {
        Some(required) if required <= out.len() => Ok(()),
        required => Err(GeometryError::BufferTooSmall {
            required: required.unwrap_or(usize::MAX),
            available: out.len(),
        }),
    }
}

fn check_flat(flat_vertices: &[f64], dim: usize) -> Result<usize> {
    check_projectable(dim)?;
    if VALIDATE && flat_vertices.len() % dim != 0 {
        return Err(GeometryError::DimensionMismatch {
            expected: flat_vertices.len() / dim * dim,
            actual: flat_vertices.len(),
        });
    }
    Ok(flat_vertices.len() / dim)
}

#[inline]
fn write_point(out: &mut [f32], at: usize, p: [f64; 3]) {
    out[at] = p[0] as f32;
    out[at + 1] = p[1] as f32;
    out[at + 2] = p[2] as f32;
}

/// Project every vertex of a flat buffer into `out[offset..]`.
///
/// Returns the number of vertices written (`3` floats each).
pub fn project_vertices_to_positions(
    flat_vertices: &[f64],
    dim: usize,
    distance: f64,
    out: &mut [f32],
    offset: usize,
) -> Result<usize> {
    let count = check_flat(flat_vertices, dim)?;
    check_capacity(out, offset, count * 3)?;

    for (k, v) in flat_vertices.chunks_exact(dim).enumerate() {
        write_point(out, offset + k * 3, project_unchecked(v, distance));
    }
    Ok(count)
}

/// Project both endpoints of each edge into `out[offset..]` (6 floats per
/// edge), the layout line-segment geometry expects.
///
/// `flat_edges` holds vertex index pairs. An edge referring to a missing
/// vertex is written as zeros. Returns the number of edges written.
pub fn project_edges_to_positions(
    flat_vertices: &[f64],
    dim: usize,
    flat_edges: &[u32],
    distance: f64,
    out: &mut [f32],
    offset: usize,
) -> Result<usize> {
    let vertex_count = check_flat(flat_vertices, dim)?;
    if VALIDATE && flat_edges.len() % 2 != 0 {
        return Err(GeometryError::DimensionMismatch {
            expected: flat_edges.len() + 1,
            actual: flat_edges.len(),
        });
    }
    let edge_count = flat_edges.len() / 2;
    check_capacity(out, offset, edge_count * 6)?;

    for (e, pair) in flat_edges.chunks_exact(2).enumerate() {
        let at = offset + e * 6;
        let (a, b) = (pair[0] as usize, pair[1] as usize);
        if a >= vertex_count || b >= vertex_count {
            out[at..at + 6].fill(0.0);
            continue;
        }
        let va = &flat_vertices[a * dim..(a + 1) * dim];
        let vb = &flat_vertices[b * dim..(b + 1) * dim];
        write_point(out, at, project_unchecked(va, distance));
        write_point(out, at + 3, project_unchecked(vb, distance));
    }
    Ok(edge_count)
}

/// Raw bytes of a position buffer for upload
pub fn positions_as_bytes(positions: &[f32]) -> &[u8] {
    bytemuck::cast_slice(positions)
}

/// View a flat position buffer as typed points
pub fn positions_as_points(positions: &[f32]) -> Result<&[GpuPosition]> {
    bytemuck::try_cast_slice(positions).map_err(|_| GeometryError::DimensionMismatch {
        expected: positions.len() / 3 * 3,
        actual: positions.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_vertices_3d() {
        let verts = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let mut out = vec![0.0f32; 6];
        let n = project_vertices_to_positions(&verts, 3, 4.0, &mut out, 0).unwrap();
        assert_eq!(n, 2);
        assert!(approx(out[0], 0.25));
        assert!(approx(out[1], 0.5));
        assert!(approx(out[2], 0.75));
        assert!(approx(out[5], 1.5));
    }

    #[test]
    fn test_vertices_4d_with_offset() {
        let verts = [2.0, 4.0, 6.0, 2.0];
        let mut out = vec![-1.0f32; 5];
        project_vertices_to_positions(&verts, 4, 4.0, &mut out, 2).unwrap();
        assert_eq!(out[..2], [-1.0, -1.0]);
        assert!(approx(out[2], 1.0));
        assert!(approx(out[3], 2.0));
        assert!(approx(out[4], 3.0));
    }

    #[test]
    fn test_vertices_buffer_too_small() {
        let verts = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let mut out = vec![0.0f32; 6];
        assert_eq!(
            project_vertices_to_positions(&verts, 3, 4.0, &mut out, 1),
            Err(GeometryError::BufferTooSmall { required: 7, available: 6 })
        );
    }

    #[test]
    fn test_offset_past_usize_range() {
        let mut out = vec![0.0f32; 6];
        assert_eq!(
            project_vertices_to_positions(&[1.0, 2.0, 3.0], 3, 4.0, &mut out, usize::MAX - 1),
            Err(GeometryError::BufferTooSmall { required: usize::MAX, available: 6 })
        );
        assert_eq!(
            project_edges_to_positions(&[0.0; 6], 3, &[0, 1], 4.0, &mut out, usize::MAX - 1),
            Err(GeometryError::BufferTooSmall { required: usize::MAX, available: 6 })
        );
        assert!(out.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_vertices_ragged_input() {
        let mut out = vec![0.0f32; 12];
        assert!(project_vertices_to_positions(&[1.0; 7], 4, 4.0, &mut out, 0).is_err());
        assert!(project_vertices_to_positions(&[1.0; 4], 2, 4.0, &mut out, 0).is_err());
    }

    #[test]
    fn test_edges() {
        let verts = [0.0, 0.0, 4.0, 0.0, 0.0, 4.0, 0.0, 2.0];
        let edges = [0u32, 1, 1, 7];
        let mut out = vec![9.0f32; 12];
        let n = project_edges_to_positions(&verts, 4, &edges, 4.0, &mut out, 0).unwrap();
        assert_eq!(n, 2);
        // Edge 0: (0,0,1) then (0,2,0)
        assert!(approx(out[2], 1.0));
        assert!(approx(out[4], 2.0));
        // Edge 1 references a missing vertex
        assert!(out[6..].iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_edges_buffer_too_small() {
        let verts = [0.0; 8];
        let mut out = vec![0.0f32; 11];
        assert!(matches!(
            project_edges_to_positions(&verts, 4, &[0, 1, 1, 0], 4.0, &mut out, 0),
            Err(GeometryError::BufferTooSmall { required: 12, available: 11 })
        ));
    }

    #[test]
    fn test_typed_views() {
        let positions = [1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0];
        let points = positions_as_points(&positions).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[1], GpuPosition { x: 4.0, y: 5.0, z: 6.0 });
        assert_eq!(positions_as_bytes(&positions).len(), 24);
        assert!(positions_as_points(&positions[..5]).is_err());
    }
}
