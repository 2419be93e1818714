use std::ops::{Add, AddAssign, Div, Index, Mul, Neg, Sub, SubAssign};

/*
Requirements for Memory Compatibility with GPU consumers:
   1. Standard layout (like C structs).
   2. Can be safely cast to [f32; 3] or bytes.
   3. Immutable value type: every operation returns a new vector.
*/

#[repr(transparent)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vec3(pub [f32; 3]);

impl Vec3 {
    pub const ZERO: Vec3 = Vec3([0.0, 0.0, 0.0]);
    pub const X: Vec3 = Vec3([1.0, 0.0, 0.0]);
    pub const Y: Vec3 = Vec3([0.0, 1.0, 0.0]);
    pub const Z: Vec3 = Vec3([0.0, 0.0, 1.0]);
    /// World-up used by the physics classifier.
    pub const UP: Vec3 = Vec3::Y;

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Vec3([x, y, z])
    }

    pub fn splat(value: f32) -> Self {
        Vec3([value; 3])
    }

    pub fn dot(&self, other: &Self) -> f32 {
        self.x() * other.x() + self.y() * other.y() + self.z() * other.z()
    }

    pub fn cross(&self, other: &Self) -> Self {
        Vec3([
            self.y() * other.z() - self.z() * other.y(),
            self.z() * other.x() - self.x() * other.z(),
            self.x() * other.y() - self.y() * other.x(),
        ])
    }

    pub fn length_squared(&self) -> f32 {
        self.dot(self)
    }

    pub fn length(&self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Unit vector in the same direction. The zero vector maps to itself.
    pub fn normalize(&self) -> Self {
        let length = self.length();
        if length == 0.0 {
            return Self::ZERO;
        }

        Self([self.x() / length, self.y() / length, self.z() / length])
    }

    pub fn distance_to(&self, other: &Self) -> f32 {
        (*self - *other).length()
    }

    /// Component of `self` along `axis`. `axis` does not need to be unit length.
    pub fn project_onto(&self, axis: &Self) -> Self {
        let unit = axis.normalize();
        unit * self.dot(&unit)
    }

    /// Component of `self` orthogonal to `axis`.
    pub fn reject_from(&self, axis: &Self) -> Self {
        *self - self.project_onto(axis)
    }

    /// Same vector with the vertical component removed.
    pub fn flatten(&self) -> Self {
        Vec3([self.x(), 0.0, self.z()])
    }

    pub fn min(&self, other: &Self) -> Self {
        Vec3([
            self.x().min(other.x()),
            self.y().min(other.y()),
            self.z().min(other.z()),
        ])
    }

    pub fn max(&self, other: &Self) -> Self {
        Vec3([
            self.x().max(other.x()),
            self.y().max(other.y()),
            self.z().max(other.z()),
        ])
    }

    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|c| c.is_finite())
    }

    /// Angle between two vectors in radians. Zero vectors yield `0.0`.
    pub fn angle_between(&self, other: &Self) -> f32 {
        self.normalize()
            .dot(&other.normalize())
            .clamp(-1.0, 1.0)
            .acos()
    }

    /// Rotates the vector about world-up by `angle` radians.
    pub fn rotate_y(&self, angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Vec3([
            self.x() * c + self.z() * s,
            self.y(),
            -self.x() * s + self.z() * c,
        ])
    }

    pub fn as_array(&self) -> &[f32; 3] {
        &self.0
    }
    pub fn x(&self) -> f32 {
        self.0[0]
    }
    pub fn y(&self) -> f32 {
        self.0[1]
    }
    pub fn z(&self) -> f32 {
        self.0[2]
    }
}

impl From<[f32; 3]> for Vec3 {
    fn from(values: [f32; 3]) -> Self {
        Vec3(values)
    }
}

impl From<Vec3> for [f32; 3] {
    fn from(vec: Vec3) -> Self {
        vec.0
    }
}

impl Index<usize> for Vec3 {
    type Output = f32;

    fn index(&self, axis: usize) -> &f32 {
        &self.0[axis]
    }
}

impl Add for Vec3 {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self([
            self.x() + other.x(),
            self.y() + other.y(),
            self.z() + other.z(),
        ])
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sub for Vec3 {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self([
            self.x() - other.x(),
            self.y() - other.y(),
            self.z() - other.z(),
        ])
    }
}

impl SubAssign for Vec3 {
    fn sub_assign(&mut self, other: Self) {
        *self = *self - other;
    }
}

impl Mul<f32> for Vec3 {
    type Output = Self;

    fn mul(self, scalar: f32) -> Self {
        Self([self.x() * scalar, self.y() * scalar, self.z() * scalar])
    }
}

impl Div<f32> for Vec3 {
    type Output = Self;

    fn div(self, scalar: f32) -> Self {
        Self([self.x() / scalar, self.y() / scalar, self.z() / scalar])
    }
}

impl Neg for Vec3 {
    type Output = Self;

    fn neg(self) -> Self {
        Self([-self.x(), -self.y(), -self.z()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn normalize_of_zero_is_zero() {
        assert_eq!(Vec3::ZERO.normalize(), Vec3::ZERO);
    }

    #[test]
    fn normalize_has_unit_length() {
        let v = Vec3::new(3.0, -4.0, 12.0).normalize();
        assert_relative_eq!(v.length(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn cross_follows_right_hand_rule() {
        assert_eq!(Vec3::X.cross(&Vec3::Y), Vec3::Z);
        assert_eq!(Vec3::Z.cross(&Vec3::X), Vec3::Y);
    }

    #[test]
    fn projection_and_rejection_recombine() {
        let v = Vec3::new(2.0, 3.0, -1.0);
        let axis = Vec3::new(0.0, 5.0, 0.0);
        let along = v.project_onto(&axis);
        let across = v.reject_from(&axis);
        assert_relative_eq!(along.y(), 3.0, epsilon = 1e-6);
        assert_relative_eq!(across.dot(&axis), 0.0, epsilon = 1e-5);
        assert_eq!(along + across, v);
    }

    #[test]
    fn rotate_y_quarter_turn() {
        let v = Vec3::Z.rotate_y(std::f32::consts::FRAC_PI_2);
        assert_relative_eq!(v.x(), 1.0, epsilon = 1e-6);
        assert_relative_eq!(v.z(), 0.0, epsilon = 1e-6);
    }
}
