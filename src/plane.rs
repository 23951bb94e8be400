use crate::EPSILON;
use crate::vector::{self, Vec3};
use std::fmt;

/// An oriented plane splitting space into two half-spaces.
///
/// The plane is stored as a unit `normal` and a signed `distance` so that a point `p`
/// lies on the plane when `dot(normal, p) + distance == 0`. The positive side, where
/// `dot(normal, p) + distance > 0`, is the "inside" of the half-space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub distance: f64,
}

impl Plane {
    /// Creates a plane through `point` facing along `normal`.
    ///
    /// The normal is normalized. Returns `None` if it has (near) zero length.
    pub fn new(normal: Vec3, point: Vec3) -> Option<Plane> {
        let normal = vector::normalize(normal)?;
        Some(Plane {
            normal,
            distance: -vector::dot(normal, point),
        })
    }

    /// Creates a plane from a normal and a signed distance to the origin.
    pub fn from_normal_distance(normal: Vec3, distance: f64) -> Option<Plane> {
        let len = vector::length(normal);
        if len <= EPSILON {
            return None;
        }
        Some(Plane {
            normal: vector::scale(normal, 1.0 / len),
            distance: distance / len,
        })
    }

    /// Creates the plane through three points. The normal follows the right-hand rule
    /// on `a -> b -> c`. Returns `None` for collinear points.
    pub fn from_points(a: Vec3, b: Vec3, c: Vec3) -> Option<Plane> {
        let normal = vector::cross(vector::sub(b, a), vector::sub(c, a));
        Plane::new(normal, a)
    }

    #[inline]
    pub fn signed_distance(&self, point: Vec3) -> f64 {
        vector::dot(self.normal, point) + self.distance
    }

    /// Is the point strictly on the positive side of the plane?
    #[inline]
    pub fn get_side(&self, point: Vec3) -> bool {
        self.signed_distance(point) > 0.0
    }

    pub fn same_side(&self, a: Vec3, b: Vec3) -> bool {
        let da = self.signed_distance(a);
        let db = self.signed_distance(b);
        (da > 0.0 && db > 0.0) || (da <= 0.0 && db <= 0.0)
    }

    /// The point of the plane closest to `point`.
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        vector::sub(point, vector::scale(self.normal, self.signed_distance(point)))
    }

    /// The point of the plane closest to the origin.
    pub fn anchor(&self) -> Vec3 {
        vector::scale(self.normal, -self.distance)
    }

    pub fn flipped(&self) -> Plane {
        Plane {
            normal: vector::scale(self.normal, -1.0),
            distance: -self.distance,
        }
    }

    pub fn flip(&mut self) {
        *self = self.flipped();
    }

    /// Moves the plane by `offset`.
    pub fn translate(&mut self, offset: Vec3) {
        self.distance -= vector::dot(self.normal, offset);
    }

    /// Intersects a ray with the plane, returning the ray parameter of the hit.
    ///
    /// Returns `None` if the ray runs parallel to the plane or the hit lies behind its origin.
    pub fn raycast(&self, ray: &Ray) -> Option<f64> {
        let denom = vector::dot(ray.direction, self.normal);
        if denom.abs() <= EPSILON {
            return None;
        }
        let enter = -self.signed_distance(ray.origin) / denom;
        if enter > 0.0 { Some(enter) } else { None }
    }

    /// Same orientation and offset, within `EPSILON`.
    pub fn approx_eq(&self, other: &Plane) -> bool {
        vector::approx_eq(self.normal, other.normal)
            && (self.distance - other.distance).abs() <= EPSILON
    }
}

impl fmt::Display for Plane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(normal:({:.2}, {:.2}, {:.2}), distance:{:.2})",
            self.normal[0], self.normal[1], self.normal[2], self.distance
        )
    }
}

/// A half-line starting at `origin`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Ray {
        Ray { origin, direction }
    }

    #[inline]
    pub fn point_at(&self, t: f64) -> Vec3 {
        vector::add(self.origin, vector::scale(self.direction, t))
    }
}
