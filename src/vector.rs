//! Small set of 3-vector helpers over plain `[f64; 3]` arrays.

use crate::EPSILON;

pub type Vec3 = [f64; 3];

#[inline]
pub fn add(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

#[inline]
pub fn sub(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

#[inline]
pub fn scale(a: Vec3, s: f64) -> Vec3 {
    [a[0] * s, a[1] * s, a[2] * s]
}

#[inline]
pub fn dot(a: Vec3, b: Vec3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

#[inline]
pub fn cross(a: Vec3, b: Vec3) -> Vec3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

#[inline]
pub fn length_sq(a: Vec3) -> f64 {
    dot(a, a)
}

#[inline]
pub fn length(a: Vec3) -> f64 {
    length_sq(a).sqrt()
}

#[inline]
pub fn distance_sq(a: Vec3, b: Vec3) -> f64 {
    length_sq(sub(a, b))
}

#[inline]
pub fn midpoint(a: Vec3, b: Vec3) -> Vec3 {
    scale(add(a, b), 0.5)
}

/// Unit vector in the direction of `a`, or `None` if `a` is (near) zero.
pub fn normalize(a: Vec3) -> Option<Vec3> {
    let len = length(a);
    if len <= EPSILON {
        return None;
    }
    Some(scale(a, 1.0 / len))
}

/// Component-wise equality within `EPSILON`.
#[inline]
pub fn approx_eq(a: Vec3, b: Vec3) -> bool {
    (a[0] - b[0]).abs() <= EPSILON
        && (a[1] - b[1]).abs() <= EPSILON
        && (a[2] - b[2]).abs() <= EPSILON
}
