//! Line visibility against the projection plane
//!
//! A point is in front of the plane while `distance - effective_depth > 0`.
//! Segments with both ends in front are drawn as-is and segments with both
//! ends behind are dropped. A segment that crosses the plane is dropped as
//! well; it is not cut at the crossing point.

use ndview_math::{GeometryError, Result};

use crate::perspective::{check_projectable, effective_depth, project_unchecked};

/// Whether a point lies in front of the projection plane
#[inline]
pub fn is_in_front(v: &[f64], distance: f64) -> bool {
    distance - effective_depth(v) > 0.0
}

/// Projected endpoints of a segment, or `None` when it should not be drawn
pub fn clip_line(v1: &[f64], v2: &[f64], distance: f64) -> Result<Option<[[f64; 3]; 2]>> {
    check_projectable(v1.len())?;
    if v1.len() != v2.len() {
        return Err(GeometryError::DimensionMismatch {
            expected: v1.len(),
            actual: v2.len(),
        });
    }

    match (is_in_front(v1, distance), is_in_front(v2, distance)) {
        (true, true) => Ok(Some([
            project_unchecked(v1, distance),
            project_unchecked(v2, distance),
        ])),
        (false, false) => Ok(None),
        _ => {
            log::trace!("Dropping segment crossing the projection plane");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_both_in_front() {
        let seg = clip_line(&[1.0, 0.0, 0.0, 0.0], &[0.0, 1.0, 0.0, 2.0], 4.0)
            .unwrap()
            .unwrap();
        assert_eq!(seg[0], [0.25, 0.0, 0.0]);
        assert_eq!(seg[1], [0.0, 0.5, 0.0]);
    }

    #[test]
    fn test_both_behind() {
        let seg = clip_line(&[1.0, 0.0, 0.0, 5.0], &[0.0, 1.0, 0.0, 6.0], 4.0).unwrap();
        assert!(seg.is_none());
    }

    #[test]
    fn test_crossing_segment_is_dropped() {
        let seg = clip_line(&[1.0, 0.0, 0.0, 1.0], &[0.0, 1.0, 0.0, 6.0], 4.0).unwrap();
        assert!(seg.is_none());
    }

    #[test]
    fn test_pure_3d_always_in_front_of_positive_distance() {
        assert!(is_in_front(&[100.0, 100.0, 100.0], 0.5));
        assert!(clip_line(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0], 4.0).unwrap().is_some());
    }

    #[test]
    fn test_shape_errors() {
        assert!(clip_line(&[1.0, 2.0], &[1.0, 2.0], 4.0).is_err());
        assert!(clip_line(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0, 4.0], 4.0).is_err());
    }
}
