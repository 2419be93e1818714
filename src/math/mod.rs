//! Math utilities and types for 3D physics and game logic.
//!
//! This module provides matrix and vector types and operations, as well as
//! a helper for converting angles to degrees. Both types are `bytemuck::Pod` so
//! rendering collaborators can upload entity transforms without conversion.
//!
//! # Module Organization
//!
//! - [`vec`] module contains all vector operations
//! - [`mat`] module contains the affine 4x4 transform
//! - `rad_to_deg` is provided at root level

pub mod mat;
pub mod vec;

pub use mat::Mat4;
pub use vec::Vec3;

/// Converts radians to degrees.
///
/// This handles angle wrapping by first normalizing the input to the range (-2π, 2π).
///
/// # Example
/// ```
/// use umbra::math::rad_to_deg;
///
/// assert!((rad_to_deg(std::f32::consts::PI) - 180.0).abs() < 1e-4);
/// ```
pub fn rad_to_deg(radians: f32) -> f32 {
    (radians % (2.0 * std::f32::consts::PI)) * (180.0 / std::f32::consts::PI)
}
