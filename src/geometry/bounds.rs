//! Axis-aligned bounding boxes.

use crate::math::vec::Vec3;

/// Axis-Aligned Bounding Box used at every level of the collision system.
///
/// Bounds approximate triangles, capsules and BVH subtrees for cheap
/// rejection before any exact test runs.
///
/// # Empty bounds
///
/// [`Bounds::EMPTY`] has `min = +∞` and `max = -∞`. It overlaps nothing, and
/// expanding it by any point yields the degenerate box around that point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Bounds {
    pub const EMPTY: Bounds = Bounds {
        min: Vec3([f32::INFINITY; 3]),
        max: Vec3([f32::NEG_INFINITY; 3]),
    };

    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Smallest box containing every point, inflated by `padding` on all sides.
    ///
    /// # Arguments
    ///
    /// * `points` - The points to enclose; an empty set yields [`Bounds::EMPTY`]
    /// * `padding` - Uniform inflation, e.g. a capsule radius
    pub fn from_points<'a, I>(points: I, padding: f32) -> Self
    where
        I: IntoIterator<Item = &'a Vec3>,
    {
        let mut bounds = Self::EMPTY;
        for point in points {
            bounds.expand_point(point);
        }
        if bounds.is_empty() {
            return bounds;
        }
        let pad = Vec3::splat(padding);
        Self::new(bounds.min - pad, bounds.max + pad)
    }

    pub fn is_empty(&self) -> bool {
        (0..3).any(|axis| self.min[axis] > self.max[axis])
    }

    pub fn expand_point(&mut self, point: &Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Expands this box in place to also contain `other`.
    pub fn expand(&mut self, other: &Bounds) {
        self.min = self.min.min(&other.min);
        self.max = self.max.max(&other.max);
    }

    /// Checks if this box overlaps another.
    ///
    /// Boxes overlap unless they are separated along **at least one** axis,
    /// so the per-axis separation test is combined with a logical OR. Touching
    /// faces count as overlapping.
    pub fn overlaps(&self, other: &Bounds) -> bool {
        let separated = (0..3)
            .any(|axis| self.max[axis] < other.min[axis] || self.min[axis] > other.max[axis]);
        !separated
    }

    pub fn contains(&self, point: &Vec3) -> bool {
        (0..3).all(|axis| point[axis] >= self.min[axis] && point[axis] <= self.max[axis])
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Per-axis extents (width, height, depth).
    pub fn dimensions(&self) -> Vec3 {
        self.max - self.min
    }

    /// Index of the axis with the largest extent, preferring x over y over z on ties.
    pub fn longest_axis(&self) -> usize {
        let d = self.dimensions();
        let mut axis = 0;
        if d.y() > d[axis] {
            axis = 1;
        }
        if d.z() > d[axis] {
            axis = 2;
        }
        axis
    }
}
