//! Rotation planes and their names
//!
//! In n dimensions rotations happen in planes spanned by two coordinate
//! axes. There are `n(n-1)/2` of them. Axes 0 through 5 are named
//! X, Y, Z, W, V, U; higher axes are named `A<index>` (`A6`, `A7`, ...).
//! A plane's name is the concatenation of its two axis names, lower index
//! first: `XY`, `ZW`, `XA6`, `A6A7`.

use std::collections::HashMap;

use ndview_math::{GeometryError, Result};
use serde::{Deserialize, Serialize};

/// Single-letter names for the first six axes
pub const AXIS_NAMES: [char; 6] = ['X', 'Y', 'Z', 'W', 'V', 'U'];

/// Display name of an axis
pub fn axis_name(index: usize) -> String {
    match AXIS_NAMES.get(index) {
        Some(c) => c.to_string(),
        None => format!("A{}", index),
    }
}

/// Axis index for a name produced by [`axis_name`]
pub fn parse_axis_name(name: &str) -> Option<usize> {
    let mut chars = name.chars();
    let first = chars.next()?;
    if chars.as_str().is_empty() {
        return AXIS_NAMES.iter().position(|&c| c == first);
    }
    let digits = chars.as_str();
    // Only the exact spelling axis_name produces: no sign, no leading zero
    if first != 'A' || digits.starts_with('0') || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    // Indices below 6 always use their letter
    let index: usize = digits.parse().ok()?;
    if index >= AXIS_NAMES.len() {
        return Some(index);
    }
    None
}

/// Number of rotation planes in `dim` dimensions
pub fn plane_count(dim: usize) -> Result<usize> {
    if dim < 2 {
        return Err(GeometryError::InvalidDimension {
            dimension: dim,
            minimum: 2,
        });
    }
    Ok(dim * (dim - 1) / 2)
}

/// Canonical name of the plane spanned by axes `i` and `j` (in either order)
pub fn create_plane_name(i: usize, j: usize) -> Result<String> {
    if i == j {
        return Err(GeometryError::InvalidIndex { index: j, bound: i });
    }
    let (lo, hi) = if i < j { (i, j) } else { (j, i) };
    Ok(format!("{}{}", axis_name(lo), axis_name(hi)))
}

/// Axis pair `(lo, hi)` for a plane name. Reversed names such as `YX` are
/// accepted and normalized.
pub fn parse_plane_name(name: &str) -> Result<(usize, usize)> {
    let invalid = || GeometryError::InvalidPlaneName(name.to_string());

    // Split before every upper-case letter: "XA6" -> ["X", "A6"]
    let mut parts: Vec<&str> = Vec::with_capacity(2);
    let mut start = 0;
    for (pos, c) in name.char_indices() {
        if c.is_ascii_uppercase() && pos > start {
            parts.push(&name[start..pos]);
            start = pos;
        }
    }
    if start < name.len() {
        parts.push(&name[start..]);
    }

    let [first, second] = parts.as_slice() else {
        return Err(invalid());
    };
    let a = parse_axis_name(first).ok_or_else(invalid)?;
    let b = parse_axis_name(second).ok_or_else(invalid)?;
    if a == b {
        return Err(invalid());
    }
    Ok(if a < b { (a, b) } else { (b, a) })
}

/// A rotation plane: two axis indices (`i < j`) and the canonical name
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RotationPlane {
    pub i: usize,
    pub j: usize,
    pub name: String,
}

impl RotationPlane {
    /// Plane spanned by axes `i` and `j` (in either order)
    pub fn new(i: usize, j: usize) -> Result<Self> {
        let name = create_plane_name(i, j)?;
        Ok(Self {
            i: i.min(j),
            j: i.max(j),
            name,
        })
    }

    #[inline]
    pub fn indices(&self) -> (usize, usize) {
        (self.i, self.j)
    }
}

/// All rotation planes of one dimension plus an O(1) name lookup.
///
/// Built once per dimension and never modified afterwards.
#[derive(Clone, Debug)]
pub struct PlaneTable {
    dimension: usize,
    planes: Vec<RotationPlane>,
    lookup: HashMap<String, (usize, usize)>,
}

impl PlaneTable {
    /// Enumerate planes in lexicographic `(i, j)` order
    pub fn new(dimension: usize) -> Result<Self> {
        let count = plane_count(dimension)?;
        let mut planes = Vec::with_capacity(count);
        let mut lookup = HashMap::with_capacity(count);
        for i in 0..dimension {
            for j in (i + 1)..dimension {
                let plane = RotationPlane::new(i, j)?;
                lookup.insert(plane.name.clone(), (i, j));
                planes.push(plane);
            }
        }
        Ok(Self {
            dimension,
            planes,
            lookup,
        })
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    #[inline]
    pub fn planes(&self) -> &[RotationPlane] {
        &self.planes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.planes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.planes.is_empty()
    }

    /// Axis pair for a plane name, if it names a plane of this dimension.
    ///
    /// Canonical names hit the hash table; anything else (e.g. `YX`) falls
    /// back to parsing.
    pub fn resolve(&self, name: &str) -> Option<(usize, usize)> {
        if let Some(&pair) = self.lookup.get(name) {
            return Some(pair);
        }
        parse_plane_name(name)
            .ok()
            .filter(|&(_, j)| j < self.dimension)
    }
}
