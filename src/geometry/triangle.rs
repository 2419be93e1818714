//! World triangles and the closest-point query the capsule test is built on.
//!
//! # Winding
//!
//! The world uses a single fixed winding: the front face of `v0 → v1 → v2`
//! is the side from which the vertices appear **clockwise**. The stored
//! `edge_cross` is therefore `edge2 × edge1`, and the unit `normal` points
//! out of the front face. Every test in this module (containment, the
//! one-sided ray test in [`crate::geometry::Ray`]) relies on that convention.

use crate::geometry::line::Line;
use crate::math::vec::Vec3;

/// An immutable triangle of static world geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub v0: Vec3,
    pub v1: Vec3,
    pub v2: Vec3,
    pub centroid: Vec3,
    /// `v1 - v0`
    pub edge1: Vec3,
    /// `v2 - v0`
    pub edge2: Vec3,
    /// `edge2 × edge1`, twice the area along the front normal.
    pub edge_cross: Vec3,
    pub normal: Vec3,
}

/// Result of [`Triangle::closest_point`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosestPoint {
    pub point: Vec3,
    /// Whether the reference projected inside the triangle.
    pub contained: bool,
    /// Planar distance when contained, direct distance to the boundary otherwise.
    pub distance: f32,
}

impl Triangle {
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        let edge1 = v1 - v0;
        let edge2 = v2 - v0;
        let edge_cross = edge2.cross(&edge1);

        Self {
            v0,
            v1,
            v2,
            centroid: (v0 + v1 + v2) / 3.0,
            edge1,
            edge2,
            edge_cross,
            normal: edge_cross.normalize(),
        }
    }

    pub fn vertices(&self) -> [Vec3; 3] {
        [self.v0, self.v1, self.v2]
    }

    /// Zero-area triangles have no plane and never contain a point.
    pub fn is_degenerate(&self) -> bool {
        self.normal == Vec3::ZERO
    }

    /// Signed distance of `p` from the triangle's plane, positive on the front side.
    pub fn signed_distance(&self, p: &Vec3) -> f32 {
        (*p - self.v0).dot(&self.normal)
    }

    /// Boundary segments in winding order.
    pub fn edges(&self) -> [Line; 3] {
        [
            Line::new(self.v0, self.v1),
            Line::new(self.v1, self.v2),
            Line::new(self.v2, self.v0),
        ]
    }

    /// Whether a point on the plane lies inside or on the triangle.
    ///
    /// For each edge `a → b` the cross product `(b - a) × (p - a)` points
    /// against the normal for interior points, so the point is inside iff
    /// all three dot products are `<= 0`.
    pub fn contains_on_plane(&self, p: &Vec3) -> bool {
        if self.is_degenerate() {
            return false;
        }
        self.edges().iter().all(|edge| {
            edge.direction
                .cross(&(*p - edge.start))
                .dot(&self.normal)
                <= 0.0
        })
    }

    /// Finds the point on the triangle closest to `reference`.
    ///
    /// # Arguments
    ///
    /// * `reference` - The query point
    /// * `on_plane` - Skip the projection step when `reference` is known to
    ///   lie on the triangle's plane
    /// * `occlude_dist` - Early-out bound: when the planar distance already
    ///   exceeds it the triangle cannot be closer, and `None` is returned
    ///
    /// # Returns
    ///
    /// The projected point with `contained = true` and the planar distance
    /// when the projection falls inside; otherwise the nearest point over
    /// the three boundary segments with its direct distance to `reference`.
    pub fn closest_point(
        &self,
        reference: &Vec3,
        on_plane: bool,
        occlude_dist: Option<f32>,
    ) -> Option<ClosestPoint> {
        let (projected, plane_distance) = if on_plane {
            (*reference, 0.0)
        } else {
            let signed = self.signed_distance(reference);
            (*reference - self.normal * signed, signed.abs())
        };

        if let Some(limit) = occlude_dist {
            if plane_distance > limit {
                return None;
            }
        }

        if self.contains_on_plane(&projected) {
            return Some(ClosestPoint {
                point: projected,
                contained: true,
                distance: plane_distance,
            });
        }

        let mut best = ClosestPoint {
            point: self.v0,
            contained: false,
            distance: f32::INFINITY,
        };
        for edge in self.edges() {
            let candidate = edge.closest_point_to(&projected);
            let distance = candidate.distance_to(reference);
            if distance < best.distance {
                best.point = candidate;
                best.distance = distance;
            }
        }
        Some(best)
    }

    /// Barycentric weights `(w0, w1, w2)` of a point on the plane.
    ///
    /// Computed from sub-triangle areas, independently of the ray test.
    pub fn barycentric(&self, p: &Vec3) -> (f32, f32, f32) {
        let area = self.edge_cross.dot(&self.normal);
        if area == 0.0 {
            return (1.0, 0.0, 0.0);
        }
        let d = *p - self.v0;
        let w1 = self.edge2.cross(&d).dot(&self.normal) / area;
        let w2 = d.cross(&self.edge1).dot(&self.normal) / area;
        (1.0 - w1 - w2, w1, w2)
    }
}
