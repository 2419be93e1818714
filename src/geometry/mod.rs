//! Geometric primitives for collision and line-of-sight queries.
//!
//! # Core Components
//!
//! * [`Bounds`] - Axis-aligned box, the broad-phase primitive
//! * [`Line`] - Segment with closest-point and plane intersection
//! * [`Triangle`] - Static world triangle with closest-point query
//! * [`Ray`] - Slab test against bounds and one-sided ray/triangle test
//! * [`Capsule`] - Entity hitbox with swept-sphere/triangle test
//!
//! Every primitive is a plain value. Queries never fail: "no hit" is `None`.

pub mod bounds;
pub mod capsule;
pub mod line;
pub mod ray;
pub mod triangle;

pub use bounds::Bounds;
pub use capsule::{Capsule, CapsuleHit};
pub use line::Line;
pub use ray::Ray;
pub use triangle::{ClosestPoint, Triangle};
