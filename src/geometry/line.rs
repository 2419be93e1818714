use crate::math::vec::Vec3;

/// A line segment from `start` to `end`.
///
/// `direction` is `end - start` and is not normalized, so a parameter of
/// `1.0` lands on `end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub start: Vec3,
    pub end: Vec3,
    pub direction: Vec3,
}

impl Line {
    pub fn new(start: Vec3, end: Vec3) -> Self {
        Self {
            start,
            end,
            direction: end - start,
        }
    }

    pub fn length(&self) -> f32 {
        self.direction.length()
    }

    /// Point on the segment closest to `p`.
    ///
    /// The scalar projection of `p` onto the segment direction is clamped to
    /// `[0, length]`. A zero-length segment always returns `start`.
    pub fn closest_point_to(&self, p: &Vec3) -> Vec3 {
        let unit = self.direction.normalize();
        let along = (*p - self.start).dot(&unit).clamp(0.0, self.length());
        self.start + unit * along
    }

    /// Intersection with the plane through `plane_point` with normal `plane_normal`.
    ///
    /// With `infinite_range` the whole line through the segment is considered,
    /// otherwise only parameters in `[0, 1]`. Returns `None` when the line is
    /// parallel to the plane or the hit lies outside the segment.
    pub fn plane_intersection(
        &self,
        plane_point: &Vec3,
        plane_normal: &Vec3,
        infinite_range: bool,
    ) -> Option<Vec3> {
        let denominator = plane_normal.dot(&self.direction);
        if denominator == 0.0 {
            return None;
        }

        let t = plane_normal.dot(&(*plane_point - self.start)) / denominator;
        if !infinite_range && !(0.0..=1.0).contains(&t) {
            return None;
        }

        Some(self.start + self.direction * t)
    }
}
