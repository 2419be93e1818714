//! Entity physics and contact resolution against the static world.
//!
//! # Overview
//!
//! An [`Entity`] is anything that walks, falls and collides: the player and the
//! pursuer both wrap one. Each fixed-step [`Entity::tick`] runs two passes:
//!
//! 1. **Vertical pass**: gravity moves the entity, then floor and ceiling
//!    contacts push it back out. Landing zeroes the fall speed and sets
//!    [`Entity::on_floor`].
//! 2. **Horizontal pass**: the entity walks along its move direction, then
//!    wall contacts push it back out. Fall state is left alone.
//!
//! Contacts are split between the passes by the angle between their push-out
//! normal and world-up (see [`is_vertical_contact`]), and each pass combines
//! its contacts with [`resolve_corrections`].

use crate::config::PhysicsConfig;
use crate::game::collision::{CollisionSystem, Contact};
use crate::geometry::Capsule;
use crate::math::mat::Mat4;
use crate::math::rad_to_deg;
use crate::math::vec::Vec3;

/// A moving body with a capsule hitbox.
#[derive(Debug, Clone)]
pub struct Entity {
    /// World position of the entity's feet.
    pub position: Vec3,
    /// Horizontal speed in units per second.
    pub move_speed: f32,
    /// Vertical speed, positive downward.
    pub fall_speed: f32,
    move_direction: Vec3,
    aim: Vec3,
    face: Mat4,
    on_floor: bool,
    hitbox: Capsule,
}

impl Entity {
    /// Creates an entity at `position`, aiming along +Z and standing still.
    pub fn new(position: Vec3, hitbox: Capsule) -> Self {
        let mut entity = Self {
            position,
            move_speed: 0.0,
            fall_speed: 0.0,
            move_direction: Vec3::ZERO,
            aim: Vec3::Z,
            face: Mat4::face_towards(Vec3::Z),
            on_floor: false,
            hitbox,
        };
        entity.update_hitbox();
        entity
    }

    /// Sets the walking direction. The vertical component is dropped and the
    /// rest normalized; a vertical or zero input stops horizontal motion.
    pub fn set_move_direction(&mut self, direction: Vec3) {
        self.move_direction = direction.flatten().normalize();
    }

    pub fn move_direction(&self) -> Vec3 {
        self.move_direction
    }

    /// Points the entity along `aim`. A zero vector keeps the previous aim.
    pub fn set_aim(&mut self, aim: Vec3) {
        let aim = aim.normalize();
        if aim == Vec3::ZERO {
            return;
        }
        self.aim = aim;
        self.face = Mat4::face_towards(aim);
    }

    pub fn aim(&self) -> Vec3 {
        self.aim
    }

    /// Rotation-only transform whose forward axis is the aim direction.
    pub fn face_transform(&self) -> Mat4 {
        self.face
    }

    /// Full world transform: face rotation followed by translation to `position`.
    pub fn transform(&self) -> Mat4 {
        Mat4::from_translation(self.position) * self.face
    }

    pub fn on_floor(&self) -> bool {
        self.on_floor
    }

    pub fn hitbox(&self) -> &Capsule {
        &self.hitbox
    }

    /// Launches the entity upward if it is standing on something.
    ///
    /// # Returns
    ///
    /// `true` if the jump happened.
    pub fn jump(&mut self, speed: f32) -> bool {
        if !self.on_floor {
            return false;
        }
        self.fall_speed = -speed;
        self.on_floor = false;
        true
    }

    /// Moves the capsule to the current position.
    ///
    /// Only the horizontal part of the aim turns the capsule, so looking up or
    /// down never tilts the hitbox.
    fn update_hitbox(&mut self) {
        let facing = Mat4::face_towards(self.aim.flatten());
        self.hitbox
            .set_transform(Mat4::from_translation(self.position) * facing);
    }

    /// Advances the entity by one fixed step of `dt` seconds.
    ///
    /// # Arguments
    ///
    /// * `dt` - Step length in seconds
    /// * `world` - Static geometry to collide against
    /// * `physics` - Gravity and the floor/wall classification threshold
    pub fn tick(&mut self, dt: f32, world: &CollisionSystem, physics: &PhysicsConfig) {
        let gravity = physics.gravity;
        let threshold = physics.slope_threshold_degrees;

        // Vertical pass
        self.position += Vec3::new(0.0, -self.fall_speed * dt - 0.5 * gravity * dt * dt, 0.0);
        self.fall_speed += gravity * dt;

        self.update_hitbox();
        let vertical: Vec<Contact> = world
            .collision_query(&self.hitbox)
            .into_iter()
            .filter(|contact| is_vertical_contact(contact.normal, threshold))
            .collect();

        let correction = resolve_corrections(vertical.iter().map(Contact::correction));
        if !vertical.is_empty() {
            self.fall_speed = 0.0;
        }
        self.on_floor = correction.dot(&Vec3::UP) > 0.0;
        self.position += correction;

        // Horizontal pass
        self.position += self.move_direction * (self.move_speed * dt);

        self.update_hitbox();
        let correction = resolve_corrections(
            world
                .collision_query(&self.hitbox)
                .iter()
                .filter(|contact| !is_vertical_contact(contact.normal, threshold))
                .map(Contact::correction),
        );
        self.position += correction;
        self.update_hitbox();
    }
}

/// Whether a contact normal counts as floor or ceiling rather than wall.
///
/// True when the angle between `normal` and world-up is at most
/// `threshold_degrees`, or at least `180 - threshold_degrees`.
pub fn is_vertical_contact(normal: Vec3, threshold_degrees: f32) -> bool {
    let angle = rad_to_deg(normal.angle_between(&Vec3::UP));
    angle <= threshold_degrees || angle >= 180.0 - threshold_degrees
}

/// Combines several push-out corrections into one displacement.
///
/// # Algorithm
///
/// 1. **Primary**: the correction with the greatest magnitude
/// 2. **Secondary**: the greatest component orthogonal to the primary
/// 3. **Tertiary**: the greatest component along `unit(primary x secondary)`
///
/// Ties go to the earliest correction. With no corrections the result is zero;
/// collinear corrections only ever produce a primary.
pub fn resolve_corrections<I>(corrections: I) -> Vec3
where
    I: IntoIterator<Item = Vec3>,
{
    let corrections: Vec<Vec3> = corrections.into_iter().collect();

    let primary = largest(corrections.iter().copied());
    let secondary = largest(corrections.iter().map(|c| c.reject_from(&primary)));
    let tertiary_axis = primary.cross(&secondary).normalize();
    let tertiary = largest(corrections.iter().map(|c| c.project_onto(&tertiary_axis)));

    primary + secondary + tertiary
}

/// First vector of maximum length, or zero.
fn largest<I: Iterator<Item = Vec3>>(vectors: I) -> Vec3 {
    let mut best = Vec3::ZERO;
    let mut best_length = 0.0;
    for vector in vectors {
        let length = vector.length_squared();
        if length > best_length {
            best = vector;
            best_length = length;
        }
    }
    best
}
