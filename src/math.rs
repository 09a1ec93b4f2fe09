//! Types, aliases and helper operations for doing math with `ultraviolet`.
use std::f64::consts::{PI, TAU};
pub use ultraviolet as uv;

pub type Vec2 = uv::DVec2;

/// An angle in either degrees or radians.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde-types", derive(serde::Deserialize, serde::Serialize))]
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
        Angle::Rad(0.0)
    }
}

// Vec2 utils

/// The vector rotated a quarter turn counterclockwise, `(-y, x)`.
#[inline]
pub fn left_normal(v: Vec2) -> Vec2 {
    Vec2::new(-v.y, v.x)
}
#[inline]
pub fn right_normal(v: Vec2) -> Vec2 {
    Vec2::new(v.y, -v.x)
}

/// Scalar 2D cross product, i.e. the bivector part of the wedge product `a ∧ b`.
#[inline]
pub fn cross(a: Vec2, b: Vec2) -> f64 {
    a.wedge(b).xy
}

/// Signed angle from `d1` to `d2` in `(-π, π]`, positive counterclockwise.
#[inline]
pub fn signed_angle(d1: Vec2, d2: Vec2) -> f64 {
    cross(d1, d2).atan2(d1.dot(d2))
}

/// Wrap an angle in radians into the range `(-π, π]`.
#[inline]
pub fn wrap_angle(angle: f64) -> f64 {
    let wrapped = PI - (PI - angle).rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped <= -PI {
        PI
    } else {
        wrapped
    }
}
