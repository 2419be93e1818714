use crate::geometry::bounds::Bounds;
use crate::geometry::line::Line;
use crate::geometry::triangle::{ClosestPoint, Triangle};
use crate::math::mat::Mat4;
use crate::math::vec::Vec3;

/// A swept-sphere hitbox carried alongside its current transform.
///
/// The endpoints are stored as local offsets. World-space endpoints, the
/// axis segment and the radius-padded bounds are recomputed once per
/// [`Capsule::set_transform`] and then read from the cache.
#[derive(Debug, Clone, PartialEq)]
pub struct Capsule {
    local_start: Vec3,
    local_end: Vec3,
    radius: f32,
    transform: Mat4,
    segment: Line,
    bounds: Bounds,
}

/// Overlap between a capsule and a single triangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapsuleHit {
    /// Unit direction that pushes the capsule out of the triangle.
    pub normal: Vec3,
    /// Penetration depth along `normal`.
    pub overlap: f32,
}

impl Capsule {
    pub fn new(local_start: Vec3, local_end: Vec3, radius: f32) -> Self {
        let mut capsule = Self {
            local_start,
            local_end,
            radius,
            transform: Mat4::identity(),
            segment: Line::new(local_start, local_end),
            bounds: Bounds::EMPTY,
        };
        capsule.set_transform(Mat4::identity());
        capsule
    }

    /// Upright capsule whose lowest point sits at the local origin.
    pub fn upright(height: f32, radius: f32) -> Self {
        let top = (height - radius).max(radius);
        Self::new(Vec3::new(0.0, radius, 0.0), Vec3::new(0.0, top, 0.0), radius)
    }

    pub fn set_transform(&mut self, transform: Mat4) {
        self.transform = transform;
        let start = transform.transform_point(self.local_start);
        let end = transform.transform_point(self.local_end);
        self.segment = Line::new(start, end);
        self.bounds = Bounds::from_points(&[start, end], self.radius);
    }

    pub fn transform(&self) -> &Mat4 {
        &self.transform
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn segment(&self) -> &Line {
        &self.segment
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// Tests the capsule against one triangle.
    ///
    /// # Algorithm
    ///
    /// 1. Pick a reference point on the triangle: the capsule axis (as an
    ///    infinite line) meets the triangle's plane, clamped onto the
    ///    triangle. A parallel axis falls back to the centroid.
    /// 2. Take the point on the capsule segment closest to that reference.
    /// 3. Find the triangle's closest point to that axis point, using the
    ///    radius as the early-out bound.
    /// 4. Within the radius, the overlap is `radius - distance`; the push-out
    ///    normal is the face normal for interior contacts and the direction
    ///    from the boundary point to the axis point for edge contacts.
    pub fn triangle_intersection(&self, triangle: &Triangle) -> Option<CapsuleHit> {
        let reference = self
            .segment
            .plane_intersection(&triangle.v0, &triangle.normal, true)
            .and_then(|on_plane| triangle.closest_point(&on_plane, true, None))
            .map(|closest| closest.point)
            .unwrap_or(triangle.centroid);

        let axis_point = self.segment.closest_point_to(&reference);
        let closest = triangle.closest_point(&axis_point, false, Some(self.radius))?;
        if closest.distance > self.radius {
            return None;
        }

        let normal = contact_normal(triangle, axis_point, &closest)?;

        Some(CapsuleHit {
            normal,
            overlap: self.radius - closest.distance,
        })
    }
}

/// Direction that pushes the capsule axis off the triangle.
///
/// An axis touching the boundary exactly has no separating direction of its
/// own and takes the face normal. Zero-area triangles have none either, so
/// such a touch yields `None`.
fn contact_normal(triangle: &Triangle, axis_point: Vec3, closest: &ClosestPoint) -> Option<Vec3> {
    if closest.contained {
        return Some(triangle.normal);
    }
    let away = (axis_point - closest.point).normalize();
    let normal = if away == Vec3::ZERO { triangle.normal } else { away };
    (normal != Vec3::ZERO).then_some(normal)
}
