//! Types, aliases and helper operations for doing math with `ultraviolet`.
use std::f64::consts::PI;
pub use ultraviolet as uv;

pub type Vec2 = uv::DVec2;

/// Default squared length below which a vector is considered to have no direction.
pub const DEGENERATE_EPS: f64 = 1e-8;

/// An angle in either degrees or radians.
/// Default conversion from f64 is in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde-types", derive(serde::Serialize, serde::Deserialize))]
pub enum Angle {
    Rad(f64),
    Deg(f64),
}
impl Angle {
    /// Get the angle as degrees.
    #[inline]
    pub fn deg(&self) -> f64 {
        match self {
            Angle::Rad(rad) => rad * 180.0 / PI,
            Angle::Deg(deg) => *deg,
        }
    }

    /// Get the angle as radians.
    #[inline]
    pub fn rad(&self) -> f64 {
        match self {
            Angle::Rad(rad) => *rad,
            Angle::Deg(deg) => deg * PI / 180.0,
        }
    }
}
impl Default for Angle {
    fn default() -> Self {
        Angle::Deg(0.0)
    }
}
impl From<f64> for Angle {
    #[inline]
    fn from(deg: f64) -> Self {
        Angle::Deg(deg)
    }
}

// Vec2 utils

#[inline]
pub fn left_normal(v: Vec2) -> Vec2 {
    Vec2::new(-v.y, v.x)
}

/// Normalize a vector, returning the zero vector if it's too short to have a direction.
///
/// `eps` is compared against the squared length.
/// Callers treat a zero result as "no well-defined axis" and skip it.
#[inline]
pub fn normalize_or_zero(v: Vec2, eps: f64) -> Vec2 {
    let mag_sq = v.mag_sq();
    if mag_sq < eps {
        Vec2::zero()
    } else {
        v / mag_sq.sqrt()
    }
}

/// Check whether a vector is too short to be used as a direction.
#[inline]
pub fn is_degenerate(v: Vec2, eps: f64) -> bool {
    v.mag_sq() < eps
}

/// Rotate a vector counterclockwise by an angle.
#[inline]
pub fn rotate(v: Vec2, angle: Angle) -> Vec2 {
    let (s, c) = angle.rad().sin_cos();
    Vec2::new(v.x * c - v.y * s, v.x * s + v.y * c)
}

#[inline]
pub fn has_nan(v: Vec2) -> bool {
    v.x.is_nan() || v.y.is_nan()
}
