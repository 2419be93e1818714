//! Umbra - physics and collision core for a first-person maze game
//!
//! Umbra keeps a static triangulated world in a bounding volume hierarchy and
//! moves capsule-shaped entities through it with gravity and two-pass contact
//! resolution. A procedurally generated maze supplies the world, a pursuer
//! hunts the player through it, and a raycast scanner paints the walls.
//!
//! # Architecture
//! - `math/`: `Vec3` and column-major `Mat4`
//! - `geometry/`: bounds, lines, triangles, rays and capsules
//! - `game/`: BVH collision system, entity physics, player, pursuer, scanner
//!   and the [`GameState`] that ticks them
//! - `maze/`: seeded maze generation and its conversion to world triangles
//! - `config`, `error`: TOML configuration and crate error types
//! - `benchmarks/`: named timing measurements and reports
//!
//! # Example
//! ```
//! use umbra::config::GameConfig;
//! use umbra::game::player::PlayerInput;
//! use umbra::GameState;
//!
//! let mut config = GameConfig::default();
//! config.maze.seed = Some(3);
//! let mut game = GameState::new(config).unwrap();
//! let step = game.config.physics.time_step;
//! game.tick(step, &PlayerInput::default());
//! assert_eq!(game.tick_count, 1);
//! ```

pub mod benchmarks;
pub mod config;
pub mod error;
pub mod game;
pub mod geometry;
pub mod math;
pub mod maze;

pub use error::{Error, Result};
pub use game::GameState;
