//! Player state and movement logic.
//!
//! This module defines the [`Player`], which turns per-frame input into an
//! [`Entity`] move direction and aim, and exposes the camera matrices.
//!
//! # Overview
//!
//! The player system handles:
//! - **Orientation**: pitch/yaw angles for camera control
//! - **Movement**: input-driven walking, sprinting and jumping; gravity and
//!   collision are left to the wrapped [`Entity`]
//! - **Stamina System**: Sprint mechanics with depletion and regeneration
//! - **View Matrix**: Camera transformation calculations for rendering
//!
//! # Coordinate System
//!
//! The player uses a right-handed coordinate system with Y up. At zero yaw
//! the player looks down -Z with +X to the right.
//!
//! Angles are measured in degrees:
//! - **Pitch**: Up/down look angle (-89° to +89°)
//! - **Yaw**: Left/right look angle, increasing counter-clockwise seen from above
//!
//! # Usage Example
//!
//! ```rust
//! use umbra::config::PlayerConfig;
//! use umbra::game::player::{Player, PlayerInput};
//! use umbra::math::Vec3;
//!
//! let mut player = Player::new(Vec3::ZERO, &PlayerConfig::default());
//!
//! let input = PlayerInput {
//!     forward: true,
//!     look_delta: (10.0, 5.0),
//!     ..Default::default()
//! };
//! player.apply_input(&input, 0.016);
//!
//! let view_matrix = player.view_matrix();
//! ```

use crate::config::{PhysicsConfig, PlayerConfig};
use crate::game::collision::CollisionSystem;
use crate::game::entity::Entity;
use crate::geometry::Capsule;
use crate::math::mat::Mat4;
use crate::math::vec::Vec3;

/// Stamina drained per second of sprinting.
const SPRINT_DRAIN_RATE: f32 = 0.7;

/// One frame of player input.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerInput {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub sprint: bool,
    pub jump: bool,
    /// Mouse movement since the last frame, `(x, y)` in device units.
    pub look_delta: (f64, f64),
}

impl PlayerInput {
    pub fn is_moving(&self) -> bool {
        self.forward != self.backward || self.left != self.right
    }
}

/// Represents the player character's state in the world.
///
/// # Fields
///
/// ## Orientation
/// - `pitch`: Vertical look angle in degrees (-89° to +89°)
/// - `yaw`: Horizontal look angle in degrees
/// - `fov`: Field of view in degrees for perspective projection
///
/// ## Stamina System
/// - `stamina`: Current stamina value (0.0 to max_stamina)
/// - `max_stamina`: Maximum stamina capacity
/// - `stamina_regen_cooldown`: Seconds to wait before stamina regeneration starts
/// - `stamina_regen_rate`: Stamina points regenerated per second
/// - `last_sprint_time`: Time accumulator for regeneration cooldown
#[derive(Debug, Clone)]
pub struct Player {
    /// Physics body; its position is at the player's feet.
    pub entity: Entity,

    /// Pitch angle in degrees.
    ///
    /// - Positive values: Looking up
    /// - Negative values: Looking down
    /// - Clamped between -89° and +89° to prevent camera flipping
    pub pitch: f32,

    /// Yaw angle in degrees.
    pub yaw: f32,

    /// Field of view in degrees for perspective projection.
    pub fov: f32,

    /// Camera height above the feet.
    pub eye_height: f32,

    pub walk_speed: f32,
    pub sprint_speed: f32,
    pub jump_speed: f32,

    /// Mouse sensitivity multiplier for camera control.
    pub mouse_sensitivity: f32,

    pub stamina: f32,
    pub max_stamina: f32,
    pub stamina_regen_cooldown: f32,
    pub stamina_regen_rate: f32,
    pub last_sprint_time: f32,
}

impl Player {
    /// Creates a player standing at `position` with full stamina.
    pub fn new(position: Vec3, config: &PlayerConfig) -> Self {
        let hitbox = Capsule::upright(config.height, config.radius);
        let mut player = Self {
            entity: Entity::new(position, hitbox),
            pitch: 0.0,
            yaw: 0.0,
            fov: 75.0,
            eye_height: config.eye_height,
            walk_speed: config.walk_speed,
            sprint_speed: config.sprint_speed,
            jump_speed: config.jump_speed,
            mouse_sensitivity: config.mouse_sensitivity,
            stamina: config.max_stamina,
            max_stamina: config.max_stamina,
            stamina_regen_cooldown: config.stamina_regen_cooldown,
            stamina_regen_rate: config.stamina_regen_rate,
            last_sprint_time: 0.0,
        };
        player.entity.set_aim(player.look_direction());
        player
    }

    pub fn position(&self) -> Vec3 {
        self.entity.position
    }

    pub fn eye_position(&self) -> Vec3 {
        self.entity.position + Vec3::UP * self.eye_height
    }

    /// Horizontal unit vector the player is facing.
    pub fn forward(&self) -> Vec3 {
        let yaw = self.yaw.to_radians();
        Vec3::new(-yaw.sin(), 0.0, -yaw.cos())
    }

    /// Horizontal unit vector to the player's right.
    pub fn right(&self) -> Vec3 {
        self.forward().cross(&Vec3::UP)
    }

    /// Unit vector the camera looks along, including pitch.
    pub fn look_direction(&self) -> Vec3 {
        let pitch = self.pitch.to_radians();
        self.forward() * pitch.cos() + Vec3::UP * pitch.sin()
    }

    /// Updates the player's orientation based on mouse movement.
    ///
    /// # Arguments
    ///
    /// * `delta_x` - Mouse movement in the X direction (positive = right)
    /// * `delta_y` - Mouse movement in the Y direction (positive = down)
    ///
    /// # Behavior
    ///
    /// - **Yaw**: Decreases with positive delta_x (mouse right = turn right)
    /// - **Pitch**: Decreases with positive delta_y (mouse down = look down)
    /// - **Pitch Clamping**: Clamped to [-89°, +89°]
    pub fn mouse_movement(&mut self, delta_x: f64, delta_y: f64) {
        self.yaw -= delta_x as f32 * self.mouse_sensitivity;
        self.pitch -= delta_y as f32 * self.mouse_sensitivity;
        self.pitch = self.pitch.clamp(-89.0, 89.0);
        self.entity.set_aim(self.look_direction());
    }

    /// Applies one frame of input: look, stamina, move direction, speed and jump.
    ///
    /// Gravity and collisions are applied later by [`Player::tick`].
    pub fn apply_input(&mut self, input: &PlayerInput, delta_time: f32) {
        let (dx, dy) = input.look_delta;
        if dx != 0.0 || dy != 0.0 {
            self.mouse_movement(dx, dy);
        }

        let moving = input.is_moving();
        self.update_stamina(input.sprint, moving, delta_time);

        let mut direction = Vec3::ZERO;
        if input.forward {
            direction += self.forward();
        }
        if input.backward {
            direction -= self.forward();
        }
        if input.right {
            direction += self.right();
        }
        if input.left {
            direction -= self.right();
        }
        self.entity.set_move_direction(direction);

        let sprinting = input.sprint && moving && self.stamina > 0.0;
        self.entity.move_speed = if sprinting {
            self.sprint_speed
        } else {
            self.walk_speed
        };

        if input.jump {
            self.entity.jump(self.jump_speed);
        }
    }

    pub fn tick(&mut self, delta_time: f32, world: &CollisionSystem, physics: &PhysicsConfig) {
        self.entity.tick(delta_time, world, physics);
    }

    /// Computes the view matrix for the current camera position and orientation.
    ///
    /// The camera transform is translation to the eye, then yaw about world-up,
    /// then pitch about the local right axis; the view matrix is its inverse.
    pub fn view_matrix(&self) -> Mat4 {
        let camera = Mat4::from_translation(self.eye_position())
            * Mat4::rotation_y(self.yaw.to_radians())
            * Mat4::rotation_x(self.pitch.to_radians());
        camera.inverse()
    }

    /// Computes the combined view-projection matrix: `projection * view`.
    ///
    /// # Arguments
    ///
    /// * `aspect_ratio` - Width divided by height of the viewport
    /// * `near` - Distance to the near clipping plane
    /// * `far` - Distance to the far clipping plane
    pub fn view_proj_matrix(&self, aspect_ratio: f32, near: f32, far: f32) -> Mat4 {
        Mat4::perspective(self.fov.to_radians(), aspect_ratio, near, far) * self.view_matrix()
    }

    /// Updates stamina for one frame.
    ///
    /// Sprinting while moving drains stamina; otherwise it regenerates once
    /// `stamina_regen_cooldown` seconds have passed since the last sprint.
    pub fn update_stamina(&mut self, is_sprinting: bool, is_moving: bool, delta_time: f32) {
        if is_sprinting && is_moving && self.stamina > 0.0 {
            self.stamina = (self.stamina - SPRINT_DRAIN_RATE * delta_time).max(0.0);
            self.last_sprint_time = 0.0;
        } else {
            self.last_sprint_time += delta_time;
            if self.last_sprint_time > self.stamina_regen_cooldown {
                self.stamina =
                    (self.stamina + self.stamina_regen_rate * delta_time).min(self.max_stamina);
            }
        }
    }

    /// Returns the current stamina as a ratio from 0.0 to 1.0.
    pub fn stamina_ratio(&self) -> f32 {
        (self.stamina / self.max_stamina).clamp(0.0, 1.0)
    }
}
