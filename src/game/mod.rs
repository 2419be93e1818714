//! Game state management module.
//!
//! This module defines the [`GameState`] struct, which owns the static world
//! and every entity in it and advances them one fixed step at a time.

pub mod collision;
pub mod enemy;
pub mod entity;
pub mod player;
pub mod scanner;

use log::info;

use self::collision::CollisionSystem;
use self::enemy::Enemy;
use self::player::{Player, PlayerInput};
use self::scanner::Scanner;
use crate::benchmarks;
use crate::config::GameConfig;
use crate::error::Result;
use crate::math::vec::Vec3;
use crate::maze::{Cell, MazeGenerator, mesh};

/// Represents the entire mutable state of the game.
///
/// Each [`GameState::tick`] runs player physics, then pursuer steering and
/// physics, strictly in that order.
pub struct GameState {
    pub config: GameConfig,
    /// Static geometry shared by every query.
    pub collision_system: CollisionSystem,
    pub player: Player,
    pub enemy: Enemy,
    pub scanner: Scanner,
    /// Number of ticks run so far.
    pub tick_count: u64,
    /// Simulated seconds since start.
    pub elapsed: f32,
    caught: bool,
}

impl GameState {
    /// Generates a maze from `config.maze` and spawns the player in its first
    /// cell and the pursuer in the opposite corner.
    pub fn new(config: GameConfig) -> Result<Self> {
        let maze_config = &config.maze;
        let maze = benchmarks::time("maze_generation", || {
            MazeGenerator::new(maze_config.width, maze_config.height, maze_config.seed).generate()
        });
        let world = CollisionSystem::from_maze(&maze, maze_config.cell_size, maze_config.wall_height)?;

        let player_spawn = mesh::cell_center(Cell::new(0, 0), maze_config.cell_size);
        let enemy_spawn = mesh::cell_center(
            Cell::new(maze.height - 1, maze.width - 1),
            maze_config.cell_size,
        );
        info!(
            "Generated {}x{} maze; player at {:?}, pursuer at {:?}",
            maze.width, maze.height, player_spawn, enemy_spawn
        );

        Ok(Self::with_world(config, world, player_spawn, enemy_spawn))
    }

    /// Builds a game around an existing world.
    pub fn with_world(
        config: GameConfig,
        collision_system: CollisionSystem,
        player_spawn: Vec3,
        enemy_spawn: Vec3,
    ) -> Self {
        let player = Player::new(player_spawn, &config.player);
        let enemy = Enemy::new(enemy_spawn, &config.enemy);
        let scanner = Scanner::new(config.scanner.clone(), config.maze.seed);

        Self {
            config,
            collision_system,
            player,
            enemy,
            scanner,
            tick_count: 0,
            elapsed: 0.0,
            caught: false,
        }
    }

    /// Whether the pursuer has reached the player.
    pub fn caught(&self) -> bool {
        self.caught
    }

    /// Advances the simulation by `delta_time` seconds.
    ///
    /// Does nothing once the player has been caught.
    pub fn tick(&mut self, delta_time: f32, input: &PlayerInput) {
        if self.caught {
            return;
        }

        benchmarks::time("physics_tick", || {
            let world = &self.collision_system;
            let physics = &self.config.physics;

            self.player.apply_input(input, delta_time);
            self.player.tick(delta_time, world, physics);

            self.enemy
                .update(self.player.position(), delta_time, |from, to| {
                    !world.has_line_of_sight(from, to)
                });
            self.enemy.tick(delta_time, world, physics);
        });

        self.tick_count += 1;
        self.elapsed += delta_time;

        if self.enemy.reached_player {
            self.caught = true;
            info!(
                "Player caught after {:.2}s ({} ticks)",
                self.elapsed, self.tick_count
            );
        }
    }

    /// Fires a scan burst from the player's eye along the view direction.
    pub fn scan(&mut self) -> usize {
        self.scanner.scan(
            &self.collision_system,
            self.player.eye_position(),
            self.player.look_direction(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MazeConfig;

    fn config() -> GameConfig {
        GameConfig {
            maze: MazeConfig {
                width: 4,
                height: 4,
                seed: Some(17),
                ..MazeConfig::default()
            },
            ..GameConfig::default()
        }
    }

    #[test]
    fn spawns_inside_maze_cells() {
        let game = GameState::new(config()).unwrap();
        let cell = game.config.maze.cell_size;
        assert_eq!(game.player.position(), Vec3::new(1.5 * cell, 0.0, 1.5 * cell));
        assert_eq!(game.enemy.position(), Vec3::new(7.5 * cell, 0.0, 7.5 * cell));
        assert!(game.collision_system.bvh().triangles().len() > 2);
    }

    #[test]
    fn empty_maze_fails_to_load() {
        let mut config = config();
        config.maze.width = 0;
        assert!(GameState::new(config).is_err());
    }

    #[test]
    fn idle_player_settles_on_the_floor() {
        let mut game = GameState::new(config()).unwrap();
        let dt = game.config.physics.time_step;
        for _ in 0..30 {
            game.tick(dt, &PlayerInput::default());
        }
        assert!(game.player.entity.on_floor());
        assert!(game.player.position().y().abs() < 1e-3);
        assert_eq!(game.tick_count, 30);
    }

    #[test]
    fn scanning_from_spawn_hits_walls() {
        let mut game = GameState::new(config()).unwrap();
        assert!(game.scan() > 0);
        assert!(!game.scanner.dots().is_empty());
    }
}
