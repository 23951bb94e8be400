use crate::error::{Result, VoronoiError};
use crate::plane::Plane;
use crate::vector::{self, Vec3};
use crate::EPSILON;

/// Axis-aligned box that bounds the diagram.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    /// Creates a box from its corners, which must be finite and strictly ordered per axis.
    pub fn new(min: Vec3, max: Vec3) -> Result<Self> {
        if min.iter().chain(max.iter()).any(|c| !c.is_finite()) {
            return Err(VoronoiError::NonFiniteBounds);
        }
        for axis in 0..3 {
            if min[axis] >= max[axis] {
                return Err(VoronoiError::InvalidBounds {
                    axis,
                    min: min[axis],
                    max: max[axis],
                });
            }
        }
        Ok(Self { min, max })
    }

    pub fn center(&self) -> Vec3 {
        vector::midpoint(self.min, self.max)
    }

    pub fn size(&self) -> Vec3 {
        vector::sub(self.max, self.min)
    }

    /// Half of the size.
    pub fn extents(&self) -> Vec3 {
        vector::scale(self.size(), 0.5)
    }

    pub fn volume(&self) -> f64 {
        let s = self.size();
        s[0] * s[1] * s[2]
    }

    /// Closed containment test, tolerant by `EPSILON` so points on the surface are inside.
    pub fn contains(&self, point: Vec3) -> bool {
        (0..3).all(|axis| {
            point[axis] >= self.min[axis] - EPSILON && point[axis] <= self.max[axis] + EPSILON
        })
    }

    /// The eight corners, bottom layer (`z = min`) first, counter-clockwise seen from above.
    pub fn corners(&self) -> [Vec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            [a[0], a[1], a[2]], // 0
            [b[0], a[1], a[2]], // 1
            [b[0], b[1], a[2]], // 2
            [a[0], b[1], a[2]], // 3
            [a[0], a[1], b[2]], // 4
            [b[0], a[1], b[2]], // 5
            [b[0], b[1], b[2]], // 6
            [a[0], b[1], b[2]], // 7
        ]
    }

    /// The six boundary half-spaces with inward normals, anchored at the face centers.
    ///
    /// Order is x-min, x-max, y-min, y-max, z-min, z-max, matching [`box_side`].
    pub fn planes(&self) -> [Plane; 6] {
        let center = self.center();
        let mut planes = [Plane { normal: [0.0; 3], distance: 0.0 }; 6];
        for axis in 0..3 {
            for (k, is_max) in [false, true].into_iter().enumerate() {
                let mut normal = [0.0; 3];
                normal[axis] = if is_max { -1.0 } else { 1.0 };
                let mut anchor = center;
                anchor[axis] = if is_max { self.max[axis] } else { self.min[axis] };
                planes[axis * 2 + k] = Plane {
                    normal,
                    distance: -vector::dot(normal, anchor),
                };
            }
        }
        planes
    }
}

/// Calculates the neighbor ID for a bounding box face based on the axis and direction.
///
/// The IDs start at -1 and decrease, so they never collide with site indices.
/// - Axis 0 (X) Min: -1
/// - Axis 0 (X) Max: -2
/// - Axis 1 (Y) Min: -3
/// - Axis 1 (Y) Max: -4
/// - Axis 2 (Z) Min: -5
/// - Axis 2 (Z) Max: -6
pub fn box_side(axis: usize, is_max: bool) -> i32 {
    -1 - (axis * 2 + if is_max { 1 } else { 0 }) as i32
}
