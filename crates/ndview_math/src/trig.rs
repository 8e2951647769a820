//! Fast sine/cosine for animation
//!
//! Parabolic approximation `sin(x) ≈ x·(π−|x|)·4/π²` on `[−π, π]`. The
//! absolute error stays below 0.06 and is zero at `0`, `±π/2` and `±π`.
//!
//! Only use these for visual rotation. Geometry construction and anything
//! that must stay exact goes through `f64::sin`/`f64::cos`.

use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI, TAU};

const FOUR_OVER_PI_SQ: f64 = 4.0 / (PI * PI);

/// Which sin/cos implementation a caller wants
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrigMode {
    /// `f64::sin_cos`
    #[default]
    Exact,
    /// [`fast_sin`] / [`fast_cos`]
    Fast,
}

impl TrigMode {
    /// `(sin, cos)` of `angle` using this mode
    #[inline]
    pub fn sin_cos(self, angle: f64) -> (f64, f64) {
        match self {
            TrigMode::Exact => angle.sin_cos(),
            TrigMode::Fast => (fast_sin(angle), fast_cos(angle)),
        }
    }
}

/// Wrap an angle into `[−π, π]`
#[inline]
pub fn normalize_angle(x: f64) -> f64 {
    if (-PI..=PI).contains(&x) {
        return x;
    }
    (x + PI).rem_euclid(TAU) - PI
}

/// Approximate sine of any angle
#[inline]
pub fn fast_sin(x: f64) -> f64 {
    fast_sin_unchecked(normalize_angle(x))
}

/// Approximate cosine of any angle
#[inline]
pub fn fast_cos(x: f64) -> f64 {
    fast_sin(x + FRAC_PI_2)
}

/// Approximate sine; `x` must already lie in `[−π, π]`
#[inline]
pub fn fast_sin_unchecked(x: f64) -> f64 {
    x * (PI - x.abs()) * FOUR_OVER_PI_SQ
}

/// Approximate cosine; `x` must already lie in `[−π, π]`
#[inline]
pub fn fast_cos_unchecked(x: f64) -> f64 {
    let shifted = x + FRAC_PI_2;
    if shifted > PI {
        fast_sin_unchecked(shifted - TAU)
    } else {
        fast_sin_unchecked(shifted)
    }
}
