//! Configuration system
//!
//! All tunables live in [`GameConfig`], loaded from a TOML file. Every field
//! has a default, so a file only needs the values it changes:
//!
//! ```toml
//! [physics]
//! gravity = 30.0
//!
//! [scanner]
//! rays_per_burst = 48
//! ```

use std::path::Path;

pub use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !is_toml(path) {
            return Err(ConfigError::UnsupportedFormat(path.display().to_string()));
        }

        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Save configuration to file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if !is_toml(path) {
            return Err(ConfigError::UnsupportedFormat(path.display().to_string()));
        }

        let contents =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?;
        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

fn is_toml(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "toml")
}

/// Gravity, time step and the floor/wall classification threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Downward acceleration in units per second squared.
    pub gravity: f32,
    /// Fixed tick length in seconds.
    pub time_step: f32,
    /// Contacts whose normal is within this many degrees of world-up (or
    /// world-down) are treated as floor/ceiling.
    pub slope_threshold_degrees: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 20.0,
            time_step: 1.0 / 60.0,
            slope_threshold_degrees: 80.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub radius: f32,
    pub height: f32,
    pub eye_height: f32,
    pub walk_speed: f32,
    pub sprint_speed: f32,
    pub jump_speed: f32,
    pub mouse_sensitivity: f32,
    pub max_stamina: f32,
    /// Seconds after sprinting stops before stamina regenerates.
    pub stamina_regen_cooldown: f32,
    /// Stamina per second while regenerating.
    pub stamina_regen_rate: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            radius: 0.4,
            height: 1.8,
            eye_height: 1.6,
            walk_speed: 4.0,
            sprint_speed: 7.0,
            jump_speed: 6.0,
            mouse_sensitivity: 0.1,
            max_stamina: 2.0,
            stamina_regen_cooldown: 0.7,
            stamina_regen_rate: 1.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    pub radius: f32,
    pub height: f32,
    pub speed: f32,
    /// Horizontal distance at which the pursuer catches the player.
    pub capture_distance: f32,
    /// Beyond this distance the pursuer stops seeing the player.
    pub sight_range: f32,
    /// Length of the probe rays used to find a clear direction.
    pub probe_distance: f32,
    /// Degrees between successive probe directions.
    pub probe_step_degrees: f32,
    /// Seconds a chosen detour is kept before re-planning.
    pub replan_interval: f32,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            radius: 0.5,
            height: 2.0,
            speed: 3.0,
            capture_distance: 1.0,
            sight_range: 40.0,
            probe_distance: 3.0,
            probe_step_degrees: 22.5,
            replan_interval: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Rays fired by a normal scan.
    pub rays_per_burst: usize,
    /// Hard cap on any single burst.
    pub max_burst: usize,
    /// Half-angle of the scan cone in degrees.
    pub spread_degrees: f32,
    /// Maximum ray length.
    pub range: f32,
    /// Dots kept for visualisation before the oldest are dropped.
    pub max_dots: usize,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            rays_per_burst: 32,
            max_burst: 256,
            spread_degrees: 15.0,
            range: 50.0,
            max_dots: 4096,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MazeConfig {
    /// Width in cells.
    pub width: usize,
    /// Height in cells.
    pub height: usize,
    /// World size of one wall-grid block.
    pub cell_size: f32,
    pub wall_height: f32,
    /// Fixed seed for reproducible layouts; random when absent.
    pub seed: Option<u64>,
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            width: 8,
            height: 8,
            cell_size: 4.0,
            wall_height: 3.0,
            seed: None,
        }
    }
}

/// Settings for the headless runner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub ticks: u32,
    /// Fire a scan burst every this many ticks; `0` disables scanning.
    pub scan_every: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            ticks: 1800,
            scan_every: 30,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub physics: PhysicsConfig,
    pub player: PlayerConfig,
    pub enemy: EnemyConfig,
    pub scanner: ScannerConfig,
    pub maze: MazeConfig,
    pub sim: SimConfig,
}

impl Config for GameConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: GameConfig = toml::from_str(
            r#"
            [physics]
            gravity = 9.81

            [maze]
            seed = 7
            "#,
        )
        .unwrap();

        assert_eq!(config.physics.gravity, 9.81);
        assert_eq!(
            config.physics.slope_threshold_degrees,
            PhysicsConfig::default().slope_threshold_degrees
        );
        assert_eq!(config.maze.seed, Some(7));
        assert_eq!(config.player, PlayerConfig::default());
    }

    #[test]
    fn round_trips_through_file() {
        let path = std::env::temp_dir().join(format!("umbra-config-{}.toml", std::process::id()));
        let mut config = GameConfig::default();
        config.scanner.rays_per_burst = 12;
        config.save_to_file(&path).unwrap();

        let loaded = GameConfig::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, config);
    }

    #[test]
    fn rejects_unknown_extension() {
        let err = GameConfig::load_from_file("settings.ron").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = GameConfig::load_from_file("/nonexistent/umbra.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
