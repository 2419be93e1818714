//! The pursuer: an autonomous entity that hunts the player.
//!
//! Every update the pursuer picks a target point. With a clear line of sight
//! inside sight range it heads straight for the player. Otherwise it probes
//! candidate directions, rotating away from the direct heading in fixed steps
//! (first one turning sense, then the other) until a probe ray is unobstructed,
//! and keeps that detour until it arrives, gets stuck or the replan interval
//! runs out.
//!
//! Geometry queries come in through a `line_intersects_geometry(from, to)`
//! closure so the steering logic can be exercised without a world.

use log::{debug, warn};
use std::f32::consts::PI;

use crate::config::{EnemyConfig, PhysicsConfig};
use crate::game::collision::CollisionSystem;
use crate::game::entity::Entity;
use crate::geometry::Capsule;
use crate::math::vec::Vec3;

/// Consecutive low-progress ticks after which the pursuer is considered stuck.
const STUCK_TICKS: u32 = 30;

/// Smallest accepted rotation between probe directions, in degrees.
const MIN_ROTATION_STEP_DEGREES: f32 = 1.0;

/// Upper bound on rotated directions tried per turning sense.
const MAX_ROTATIONS: u32 = 180;

#[derive(Debug, Clone)]
pub struct Enemy {
    pub entity: Entity,
    pub current_target: Option<Vec3>,
    /// Whether the current target is the player itself.
    pub chasing: bool,
    pub reached_player: bool,
    pub stuck_counter: u32,
    pub speed: f32,
    pub capture_distance: f32,
    pub sight_range: f32,
    pub probe_distance: f32,
    /// Rotation between successive probes, in radians.
    pub rotation_step: f32,
    pub replan_interval: f32,
    eye_height: f32,
    replan_timer: f32,
    last_position: Vec3,
}

impl Enemy {
    pub fn new(position: Vec3, config: &EnemyConfig) -> Self {
        Self {
            entity: Entity::new(position, Capsule::upright(config.height, config.radius)),
            current_target: None,
            chasing: false,
            reached_player: false,
            stuck_counter: 0,
            speed: config.speed,
            capture_distance: config.capture_distance,
            sight_range: config.sight_range,
            probe_distance: config.probe_distance,
            rotation_step: rotation_step(config.probe_step_degrees),
            replan_interval: config.replan_interval,
            eye_height: config.height * 0.5,
            replan_timer: 0.0,
            last_position: position,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.entity.position
    }

    fn eye(&self, feet: Vec3) -> Vec3 {
        feet + Vec3::UP * self.eye_height
    }

    /// Chooses a target and steers the entity toward it.
    ///
    /// # Arguments
    ///
    /// * `player_position` - The player's feet
    /// * `delta_time` - Frame time in seconds
    /// * `line_intersects_geometry` - Returns true when the segment between
    ///   two points is blocked
    pub fn update<F>(&mut self, player_position: Vec3, delta_time: f32, line_intersects_geometry: F)
    where
        F: Fn(Vec3, Vec3) -> bool,
    {
        if self.reached_player {
            return;
        }

        let to_player = (player_position - self.position()).flatten();
        if to_player.length() <= self.capture_distance {
            debug!("Pursuer reached the player at {:?}", self.position());
            self.reached_player = true;
            self.current_target = None;
            self.entity.set_move_direction(Vec3::ZERO);
            self.entity.move_speed = 0.0;
            return;
        }

        self.replan_timer -= delta_time;

        let sees_player = to_player.length() <= self.sight_range
            && !line_intersects_geometry(self.eye(self.position()), self.eye(player_position));

        if sees_player {
            if !self.chasing {
                debug!("Pursuer spotted the player");
            }
            self.chasing = true;
            self.current_target = Some(player_position);
        } else if self.chasing || self.needs_new_target() {
            self.chasing = false;
            self.current_target = self.calculate_new_target(to_player, &line_intersects_geometry);
            self.replan_timer = self.replan_interval;
            debug!("Pursuer detour target: {:?}", self.current_target);
        }

        match self.current_target {
            Some(target) => {
                let heading = (target - self.position()).flatten();
                self.entity.set_move_direction(heading);
                self.entity.set_aim(heading);
                self.entity.move_speed = self.speed;
            }
            None => {
                self.entity.set_move_direction(Vec3::ZERO);
                self.entity.move_speed = 0.0;
            }
        }
    }

    fn needs_new_target(&self) -> bool {
        match self.current_target {
            None => true,
            Some(target) => {
                let arrived =
                    (target - self.position()).flatten().length() <= self.entity.hitbox().radius();
                arrived || self.replan_timer <= 0.0 || self.stuck_counter > STUCK_TICKS
            }
        }
    }

    /// Finds a clear probe target, starting from the direct heading and
    /// rotating by `rotation_step` in each sense in turn.
    ///
    /// When stuck, probing starts from the heading away from the player.
    fn calculate_new_target<F>(&self, to_player: Vec3, line_intersects_geometry: &F) -> Option<Vec3>
    where
        F: Fn(Vec3, Vec3) -> bool,
    {
        let toward = to_player.normalize();
        let base_direction = if self.stuck_counter > STUCK_TICKS {
            -toward
        } else {
            toward
        };

        let origin = self.eye(self.position());
        let clear = |direction: Vec3| {
            let probe = origin + direction * self.probe_distance;
            !line_intersects_geometry(origin, probe)
        };

        if clear(base_direction) {
            return Some(self.position() + base_direction * self.probe_distance);
        }

        if self.rotation_step.is_nan() || self.rotation_step <= 0.0 {
            return None;
        }
        let max_rotations = ((PI / self.rotation_step) as u32).min(MAX_ROTATIONS);
        for sense in [1.0, -1.0] {
            for i in 1..=max_rotations {
                let direction = base_direction.rotate_y(self.rotation_step * i as f32 * sense);
                if clear(direction) {
                    return Some(self.position() + direction * self.probe_distance);
                }
            }
        }

        None
    }

    /// Runs physics and updates stuck detection.
    pub fn tick(&mut self, delta_time: f32, world: &CollisionSystem, physics: &PhysicsConfig) {
        self.entity.tick(delta_time, world, physics);

        let moved = (self.position() - self.last_position).flatten().length();
        let expected = self.entity.move_speed * delta_time;
        if expected > 0.0 && moved < expected * 0.25 {
            self.stuck_counter += 1;
        } else {
            self.stuck_counter = 0;
        }
        self.last_position = self.position();
    }
}

/// Converts the configured step to radians, clamped to `[1°, 180°]`.
fn rotation_step(degrees: f32) -> f32 {
    let clamped = if degrees.is_finite() {
        degrees.clamp(MIN_ROTATION_STEP_DEGREES, 180.0)
    } else {
        MIN_ROTATION_STEP_DEGREES
    };
    if clamped != degrees {
        warn!(
            "Pursuer rotation step {} out of range, using {} degrees",
            degrees, clamped
        );
    }
    clamped.to_radians()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn enemy() -> Enemy {
        Enemy::new(Vec3::ZERO, &EnemyConfig::default())
    }

    #[test]
    fn chases_visible_player() {
        let mut enemy = enemy();
        enemy.update(Vec3::new(10.0, 0.0, 0.0), 0.016, |_, _| false);

        assert!(enemy.chasing);
        assert_eq!(enemy.current_target, Some(Vec3::new(10.0, 0.0, 0.0)));
        assert_eq!(enemy.entity.move_direction(), Vec3::X);
        assert_eq!(enemy.entity.move_speed, enemy.speed);
        assert_eq!(enemy.entity.aim(), Vec3::X);
    }

    #[test]
    fn catches_player_inside_capture_distance() {
        let mut enemy = enemy();
        enemy.update(Vec3::new(0.5, 3.0, 0.5), 0.016, |_, _| false);
        assert!(enemy.reached_player);
        assert_eq!(enemy.entity.move_speed, 0.0);

        // Stays put once caught.
        enemy.update(Vec3::new(10.0, 0.0, 0.0), 0.016, |_, _| false);
        assert_eq!(enemy.current_target, None);
    }

    #[test]
    fn player_out_of_range_is_not_chased() {
        let mut enemy = enemy();
        enemy.update(Vec3::new(100.0, 0.0, 0.0), 0.016, |_, _| false);
        assert!(!enemy.chasing);

        let target = enemy.current_target.unwrap();
        assert_relative_eq!(target.x(), enemy.probe_distance);
    }

    #[test]
    fn probes_around_blocked_heading() {
        let mut enemy = enemy();
        // Anything heading mostly along +x is blocked.
        let blocked = |from: Vec3, to: Vec3| (to - from).normalize().x() > 0.95;
        enemy.update(Vec3::new(10.0, 0.0, 0.0), 0.016, blocked);

        assert!(!enemy.chasing);
        let direction = enemy.entity.move_direction();
        let expected = Vec3::X.rotate_y(enemy.rotation_step);
        assert_relative_eq!(direction.x(), expected.x(), epsilon = 1e-5);
        assert_relative_eq!(direction.z(), expected.z(), epsilon = 1e-5);
    }

    #[test]
    fn tries_the_other_sense_before_giving_up() {
        let mut enemy = enemy();
        // Only directions with a positive z component are clear.
        let blocked = |from: Vec3, to: Vec3| (to - from).z() <= 1e-3;
        enemy.update(Vec3::new(10.0, 0.0, 0.0), 0.016, blocked);

        let direction = enemy.entity.move_direction();
        assert!(direction.z() > 0.0);
        assert_relative_eq!(direction.angle_between(&Vec3::X), enemy.rotation_step, epsilon = 1e-4);
    }

    #[test]
    fn boxed_in_pursuer_stands_still() {
        let mut enemy = enemy();
        enemy.update(Vec3::new(10.0, 0.0, 0.0), 0.016, |_, _| true);
        assert_eq!(enemy.current_target, None);
        assert_eq!(enemy.entity.move_direction(), Vec3::ZERO);
    }

    #[test]
    fn keeps_detour_until_replan() {
        let mut enemy = enemy();
        let blocked = |from: Vec3, to: Vec3| (to - from).normalize().x() > 0.95;
        enemy.update(Vec3::new(10.0, 0.0, 0.0), 0.016, blocked);
        let first = enemy.current_target;

        enemy.update(Vec3::new(10.0, 0.0, 0.5), 0.016, blocked);
        assert_eq!(enemy.current_target, first);
    }

    fn count_blocked_checks(enemy: &mut Enemy) -> usize {
        let calls = std::cell::Cell::new(0usize);
        enemy.update(Vec3::new(10.0, 0.0, 0.0), 0.016, |_, _| {
            calls.set(calls.get() + 1);
            true
        });
        calls.get()
    }

    #[test]
    fn zero_rotation_step_is_clamped() {
        let config = EnemyConfig {
            probe_step_degrees: 0.0,
            ..EnemyConfig::default()
        };
        let mut enemy = Enemy::new(Vec3::ZERO, &config);
        assert_relative_eq!(enemy.rotation_step, MIN_ROTATION_STEP_DEGREES.to_radians());

        // Sight check, base heading, then every rotation in both senses.
        let calls = count_blocked_checks(&mut enemy);
        assert!(calls <= 2 + 2 * MAX_ROTATIONS as usize, "{calls} line checks");
        assert_eq!(enemy.current_target, None);
    }

    #[test]
    fn negative_rotation_step_still_turns() {
        let config = EnemyConfig {
            probe_step_degrees: -45.0,
            ..EnemyConfig::default()
        };
        let mut enemy = Enemy::new(Vec3::ZERO, &config);
        assert!(enemy.rotation_step > 0.0);
        assert!(count_blocked_checks(&mut enemy) > 2);
    }

    #[test]
    fn unusable_rotation_step_skips_turning() {
        for step in [0.0, -0.1, f32::NAN] {
            let mut enemy = enemy();
            enemy.rotation_step = step;
            assert_eq!(count_blocked_checks(&mut enemy), 2);
            assert_eq!(enemy.current_target, None);
        }
    }
}
