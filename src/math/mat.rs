use std::ops::Mul;

use crate::math::vec::Vec3;

/// Column-major 4x4 matrix (`self.0[column][row]`), the layout WGSL expects.
///
/// Only affine transforms are built by this crate: the bottom row is always
/// `[0, 0, 0, 1]`, the upper-left 3x3 block holds the rotation and the last
/// column holds the translation.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Mat4(pub [[f32; 4]; 4]);

impl Default for Mat4 {
    fn default() -> Self {
        Mat4::identity()
    }
}

impl Mat4 {
    pub fn identity() -> Mat4 {
        Mat4([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn perspective(
        field_of_view_y_in_radians: f32,
        aspect: f32,
        z_near: f32,
        z_far: f32,
    ) -> Mat4 {
        let f = 1.0 / (field_of_view_y_in_radians * 0.5).tan();
        let range_reciprocal = 1.0 / (z_near - z_far);

        Mat4([
            [f / aspect, 0.0, 0.0, 0.0],
            [0.0, f, 0.0, 0.0],
            [0.0, 0.0, z_far * range_reciprocal, -1.0],
            [0.0, 0.0, z_far * z_near * range_reciprocal, 0.0],
        ])
    }

    pub fn translation(tx: f32, ty: f32, tz: f32) -> Mat4 {
        Mat4([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [tx, ty, tz, 1.0],
        ])
    }

    pub fn from_translation(position: Vec3) -> Mat4 {
        Mat4::translation(position.x(), position.y(), position.z())
    }

    pub fn rotation_x(angle_in_radians: f32) -> Mat4 {
        let (s, c) = angle_in_radians.sin_cos();
        Mat4([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, c, s, 0.0],
            [0.0, -s, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn rotation_y(angle_in_radians: f32) -> Mat4 {
        let (s, c) = angle_in_radians.sin_cos();
        Mat4([
            [c, 0.0, -s, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [s, 0.0, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Builds an affine transform from its local axes and translation.
    pub fn from_axes(right: Vec3, up: Vec3, forward: Vec3, position: Vec3) -> Mat4 {
        Mat4([
            [right.x(), right.y(), right.z(), 0.0],
            [up.x(), up.y(), up.z(), 0.0],
            [forward.x(), forward.y(), forward.z(), 0.0],
            [position.x(), position.y(), position.z(), 1.0],
        ])
    }

    /// Rotation whose local forward (+Z) axis points along `direction`.
    ///
    /// Up is kept as close to world-up as possible. When `direction` is
    /// vertical the right axis falls back to world +X. A zero direction
    /// yields the identity.
    pub fn face_towards(direction: Vec3) -> Mat4 {
        let forward = direction.normalize();
        if forward == Vec3::ZERO {
            return Mat4::identity();
        }

        let mut right = Vec3::UP.cross(&forward).normalize();
        if right == Vec3::ZERO {
            right = Vec3::X;
        }
        let up = forward.cross(&right);

        Mat4::from_axes(right, up, forward, Vec3::ZERO)
    }

    /// Matrix product `self * b`; `b` is applied to a point first.
    pub fn multiply(&self, b: &Mat4) -> Mat4 {
        let mut result = [[0.0; 4]; 4];
        for (i, column) in result.iter_mut().enumerate() {
            for (j, cell) in column.iter_mut().enumerate() {
                *cell = (0..4).map(|k| b.0[i][k] * self.0[k][j]).sum();
            }
        }
        Mat4(result)
    }

    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        let m = &self.0;
        Vec3::new(
            m[0][0] * p.x() + m[1][0] * p.y() + m[2][0] * p.z() + m[3][0],
            m[0][1] * p.x() + m[1][1] * p.y() + m[2][1] * p.z() + m[3][1],
            m[0][2] * p.x() + m[1][2] * p.y() + m[2][2] * p.z() + m[3][2],
        )
    }

    /// Applies only the rotation block; translation is ignored.
    pub fn transform_vector(&self, v: Vec3) -> Vec3 {
        let m = &self.0;
        Vec3::new(
            m[0][0] * v.x() + m[1][0] * v.y() + m[2][0] * v.z(),
            m[0][1] * v.x() + m[1][1] * v.y() + m[2][1] * v.z(),
            m[0][2] * v.x() + m[1][2] * v.y() + m[2][2] * v.z(),
        )
    }

    pub fn position(&self) -> Vec3 {
        Vec3::new(self.0[3][0], self.0[3][1], self.0[3][2])
    }

    /// Same transform with the translation removed.
    pub fn rotation(&self) -> Mat4 {
        let mut m = self.0;
        m[3] = [0.0, 0.0, 0.0, 1.0];
        Mat4(m)
    }

    pub fn right(&self) -> Vec3 {
        Vec3::new(self.0[0][0], self.0[0][1], self.0[0][2])
    }

    pub fn up(&self) -> Vec3 {
        Vec3::new(self.0[1][0], self.0[1][1], self.0[1][2])
    }

    pub fn forward(&self) -> Vec3 {
        Vec3::new(self.0[2][0], self.0[2][1], self.0[2][2])
    }

    /// Inverse of an affine transform. Singular matrices fall back to the identity.
    pub fn inverse(&self) -> Mat4 {
        let m = self.0;

        // Rows of the 3x3 linear block A (A[row][col] = m[col][row]).
        let a = [
            [m[0][0], m[1][0], m[2][0]],
            [m[0][1], m[1][1], m[2][1]],
            [m[0][2], m[1][2], m[2][2]],
        ];
        let t = [m[3][0], m[3][1], m[3][2]];

        let det = a[0][0] * (a[1][1] * a[2][2] - a[1][2] * a[2][1])
            - a[0][1] * (a[1][0] * a[2][2] - a[1][2] * a[2][0])
            + a[0][2] * (a[1][0] * a[2][1] - a[1][1] * a[2][0]);

        if det.abs() < f32::EPSILON {
            return Mat4::identity();
        }

        let inv_det = 1.0 / det;
        let mut a_inv = [[0.0; 3]; 3];

        a_inv[0][0] = (a[1][1] * a[2][2] - a[1][2] * a[2][1]) * inv_det;
        a_inv[0][1] = -(a[0][1] * a[2][2] - a[0][2] * a[2][1]) * inv_det;
        a_inv[0][2] = (a[0][1] * a[1][2] - a[0][2] * a[1][1]) * inv_det;
        a_inv[1][0] = -(a[1][0] * a[2][2] - a[1][2] * a[2][0]) * inv_det;
        a_inv[1][1] = (a[0][0] * a[2][2] - a[0][2] * a[2][0]) * inv_det;
        a_inv[1][2] = -(a[0][0] * a[1][2] - a[0][2] * a[1][0]) * inv_det;
        a_inv[2][0] = (a[1][0] * a[2][1] - a[1][1] * a[2][0]) * inv_det;
        a_inv[2][1] = -(a[0][0] * a[2][1] - a[0][1] * a[2][0]) * inv_det;
        a_inv[2][2] = (a[0][0] * a[1][1] - a[0][1] * a[1][0]) * inv_det;

        // -A⁻¹ * t
        let new_t = [
            -(a_inv[0][0] * t[0] + a_inv[0][1] * t[1] + a_inv[0][2] * t[2]),
            -(a_inv[1][0] * t[0] + a_inv[1][1] * t[1] + a_inv[1][2] * t[2]),
            -(a_inv[2][0] * t[0] + a_inv[2][1] * t[1] + a_inv[2][2] * t[2]),
        ];

        // Back to column-major.
        Mat4([
            [a_inv[0][0], a_inv[1][0], a_inv[2][0], 0.0],
            [a_inv[0][1], a_inv[1][1], a_inv[2][1], 0.0],
            [a_inv[0][2], a_inv[1][2], a_inv[2][2], 0.0],
            [new_t[0], new_t[1], new_t[2], 1.0],
        ])
    }
}

impl Mul for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: Mat4) -> Mat4 {
        self.multiply(&rhs)
    }
}

impl From<[[f32; 4]; 4]> for Mat4 {
    fn from(matrix: [[f32; 4]; 4]) -> Self {
        Mat4(matrix)
    }
}

impl From<Mat4> for [[f32; 4]; 4] {
    fn from(matrix: Mat4) -> Self {
        matrix.0
    }
}
