use umbra::config::{Config, GameConfig, MazeConfig, PhysicsConfig};
use umbra::game::collision::CollisionSystem;
use umbra::game::player::PlayerInput;
use umbra::math::vec::Vec3;
use umbra::GameState;

fn maze_config(seed: u64) -> GameConfig {
    GameConfig {
        maze: MazeConfig {
            width: 5,
            height: 5,
            seed: Some(seed),
            ..MazeConfig::default()
        },
        ..GameConfig::default()
    }
}

/// Large floor around the origin with its diagonal seam along x = z.
fn open_floor() -> CollisionSystem {
    let corner = Vec3::new(-50.0, 0.0, -50.0);
    let u = Vec3::X * 100.0;
    let v = Vec3::Z * 100.0;
    CollisionSystem::from_models(&[vec![
        [corner, corner + u, corner + u + v],
        [corner, corner + u + v, corner + v],
    ]])
    .unwrap()
}

#[test]
fn scripted_run_stays_inside_the_maze() {
    let mut game = GameState::new(maze_config(11)).unwrap();
    let dt = game.config.physics.time_step;
    let extent = 11.0 * game.config.maze.cell_size;

    for tick in 0..600u32 {
        let input = PlayerInput {
            forward: true,
            sprint: tick % 240 < 120,
            jump: tick % 90 == 45,
            look_delta: if tick % 30 == 0 { (120.0, 0.0) } else { (0.0, 0.0) },
            ..PlayerInput::default()
        };
        game.tick(dt, &input);
        if tick % 20 == 0 {
            game.scan();
        }

        for position in [game.player.position(), game.enemy.position()] {
            assert!(position.is_finite());
            assert!(position.y() > -0.05, "sank through the floor at {position:?}");
            assert!(position.x() > 0.0 && position.x() < extent);
            assert!(position.z() > 0.0 && position.z() < extent);
        }
        if game.caught() {
            break;
        }
    }

    assert!(game.tick_count > 0);
    assert!(!game.scanner.dots().is_empty());
}

#[test]
fn same_seed_same_simulation() {
    let run = || {
        let mut game = GameState::new(maze_config(5)).unwrap();
        let dt = game.config.physics.time_step;
        let input = PlayerInput {
            forward: true,
            ..PlayerInput::default()
        };
        for _ in 0..120 {
            game.tick(dt, &input);
        }
        game.scan();
        (
            game.player.position(),
            game.enemy.position(),
            game.scanner.dots().iter().copied().collect::<Vec<_>>(),
        )
    };

    assert_eq!(run(), run());
}

#[test]
fn pursuer_catches_idle_player_in_the_open() {
    let config = GameConfig::default();
    let dt = config.physics.time_step;
    let mut game = GameState::with_world(
        config,
        open_floor(),
        Vec3::new(0.0, 0.0, -3.0),
        Vec3::new(10.0, 0.0, -3.0),
    );

    for _ in 0..600 {
        game.tick(dt, &PlayerInput::default());
        if game.caught() {
            break;
        }
    }

    assert!(game.caught());
    assert!(game.enemy.chasing);
    let gap = (game.enemy.position() - game.player.position()).flatten().length();
    assert!(gap <= game.config.enemy.capture_distance);

    // Caught games no longer advance.
    let ticks = game.tick_count;
    game.tick(dt, &PlayerInput::default());
    assert_eq!(game.tick_count, ticks);
}

#[test]
fn config_file_drives_the_world() {
    let path = std::env::temp_dir().join(format!("umbra-game-{}.toml", std::process::id()));
    std::fs::write(
        &path,
        "[maze]\nwidth = 3\nheight = 2\nseed = 1\ncell_size = 2.0\n",
    )
    .unwrap();

    let config = GameConfig::load_from_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    let game = GameState::new(config).unwrap();
    let bounds = game.collision_system.bvh().bounds();
    assert_eq!(bounds.max.x(), 7.0 * 2.0);
    assert_eq!(bounds.max.z(), 5.0 * 2.0);
    assert_eq!(game.config.physics, PhysicsConfig::default());
}
