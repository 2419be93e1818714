//! Procedural world generation.
//!
//! A maze is generated as a wall grid ([`generator`]) and then turned into the
//! triangle soup the collision system indexes ([`mesh`]).

pub mod generator;
pub mod mesh;

pub use generator::{Cell, Maze, MazeGenerator};
