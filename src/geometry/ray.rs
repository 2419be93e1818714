use crate::geometry::bounds::Bounds;
use crate::geometry::triangle::Triangle;
use crate::math::vec::Vec3;

/// A half-line `origin + direction * t` for `t >= 0`.
///
/// `direction` is not required to be unit length; hit parameters are in
/// multiples of it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Ray from `from` whose parameter `1.0` lands on `to`.
    pub fn between(from: Vec3, to: Vec3) -> Self {
        Self::new(from, to - from)
    }

    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Slab test against an axis-aligned box.
    ///
    /// Each axis contributes an entry/exit interval; the ray hits the box if
    /// the running maximum entry never passes the running minimum exit. Axes
    /// the ray is parallel to only pass when the origin already lies inside
    /// that axis's interval.
    pub fn intersects_bounds(&self, bounds: &Bounds) -> bool {
        let mut t_entry = f32::NEG_INFINITY;
        let mut t_exit = f32::INFINITY;

        for axis in 0..3 {
            let origin = self.origin[axis];
            let direction = self.direction[axis];

            if direction == 0.0 {
                if origin < bounds.min[axis] || origin > bounds.max[axis] {
                    return false;
                }
                continue;
            }

            let mut t0 = (bounds.min[axis] - origin) / direction;
            let mut t1 = (bounds.max[axis] - origin) / direction;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }

            t_entry = t_entry.max(t0);
            t_exit = t_exit.min(t1);
            if t_entry > t_exit {
                return false;
            }
        }

        // Box entirely behind the origin.
        t_exit >= 0.0
    }

    /// One-sided Möller–Trumbore intersection.
    ///
    /// Only triangles whose front face (see [`crate::geometry::triangle`])
    /// points back toward the ray are hit; back faces and edge-on triangles
    /// are rejected by the `determinant <= 0` test.
    ///
    /// # Returns
    ///
    /// The hit parameter `t >= 0`, or `None`.
    pub fn triangle_intersection(&self, triangle: &Triangle) -> Option<f32> {
        let reversed = -self.direction;
        let determinant = reversed.dot(&triangle.edge_cross);
        if determinant <= 0.0 {
            return None;
        }

        let to_origin = self.origin - triangle.v0;

        let u = reversed.dot(&triangle.edge2.cross(&to_origin)) / determinant;
        if u < 0.0 {
            return None;
        }
        let v = reversed.dot(&to_origin.cross(&triangle.edge1)) / determinant;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = to_origin.dot(&triangle.edge_cross) / determinant;
        if t < 0.0 {
            return None;
        }

        Some(t)
    }
}
