//! Rotation animation system
//!
//! Advances one angle per configured plane each tick. Planes keep the order
//! they were configured in, which is also the order the kernel composes
//! them in.

use ndview_math::trig::normalize_angle;

use crate::config::PlaneSpeed;

/// One animated plane and its current angle
#[derive(Debug, Clone, PartialEq)]
struct PlaneState {
    name: String,
    speed: f64,
    angle: f64,
}

/// Accumulates per-plane rotation angles over time
#[derive(Debug, Clone, Default)]
pub struct AnimationSystem {
    planes: Vec<PlaneState>,
    elapsed: f64,
}

impl AnimationSystem {
    /// Create a system from configured plane speeds
    pub fn new(planes: &[PlaneSpeed]) -> Self {
        let mut system = Self::default();
        for p in planes {
            system.add_plane(&p.plane, p.speed);
        }
        system
    }

    /// Add a plane at angle zero, or change the speed of one already present
    pub fn add_plane(&mut self, name: &str, speed: f64) {
        match self.planes.iter_mut().find(|p| p.name == name) {
            Some(existing) => existing.speed = speed,
            None => self.planes.push(PlaneState {
                name: name.to_string(),
                speed,
                angle: 0.0,
            }),
        }
    }

    /// Advance every plane by `dt` seconds
    pub fn update(&mut self, dt: f64) {
        for p in &mut self.planes {
            p.angle = normalize_angle(p.angle + p.speed * dt);
        }
        self.elapsed += dt;
    }

    /// Reset all angles and the clock to zero
    pub fn reset(&mut self) {
        for p in &mut self.planes {
            p.angle = 0.0;
        }
        self.elapsed = 0.0;
    }

    /// Current `(plane, angle)` pairs in application order
    pub fn angles(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.planes.iter().map(|p| (p.name.as_str(), p.angle))
    }

    /// Current angle of one plane
    pub fn angle(&self, name: &str) -> Option<f64> {
        self.planes.iter().find(|p| p.name == name).map(|p| p.angle)
    }

    /// Seconds simulated so far
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn plane_count(&self) -> usize {
        self.planes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    const EPSILON: f64 = 1e-12;

    fn speeds(list: &[(&str, f64)]) -> Vec<PlaneSpeed> {
        list.iter()
            .map(|(plane, speed)| PlaneSpeed {
                plane: plane.to_string(),
                speed: *speed,
            })
            .collect()
    }

    #[test]
    fn test_angles_accumulate_in_order() {
        let mut system = AnimationSystem::new(&speeds(&[("ZW", 1.0), ("XY", -0.5)]));
        system.update(0.5);
        system.update(0.5);

        let angles: Vec<(&str, f64)> = system.angles().collect();
        assert_eq!(angles[0].0, "ZW");
        assert_eq!(angles[1].0, "XY");
        assert!((angles[0].1 - 1.0).abs() < EPSILON);
        assert!((angles[1].1 + 0.5).abs() < EPSILON);
        assert!((system.elapsed() - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_angles_wrap() {
        let mut system = AnimationSystem::new(&speeds(&[("XW", 1.0)]));
        system.update(PI + 0.5);
        let angle = system.angle("XW").unwrap();
        assert!((angle - (-PI + 0.5)).abs() < 1e-9);
    }

    #[test]
    fn test_duplicate_plane_updates_speed() {
        let mut system = AnimationSystem::new(&speeds(&[("XW", 1.0)]));
        system.add_plane("XW", 2.0);
        assert_eq!(system.plane_count(), 1);
        system.update(0.25);
        assert!((system.angle("XW").unwrap() - 0.5).abs() < EPSILON);
    }

    #[test]
    fn test_reset() {
        let mut system = AnimationSystem::new(&speeds(&[("XY", 1.0)]));
        system.update(1.0);
        system.reset();
        assert_eq!(system.angle("XY"), Some(0.0));
        assert_eq!(system.elapsed(), 0.0);
        assert_eq!(system.angle("ZW"), None);
    }
}
