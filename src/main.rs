//! Umbra - headless simulation runner
//!
//! Generates a maze world from the configuration, walks the player through it
//! with a scripted input pattern while the pursuer hunts, and fires periodic
//! scan bursts. Stops when the pursuer catches the player, the configured tick
//! count runs out, or Ctrl-C is pressed.
//!
//! # Usage
//! ```text
//! umbra [config.toml] [benchmark-report-dir]
//! ```
//! Logging follows `RUST_LOG` and defaults to `info`. Build with
//! `--features dhat-heap` to write a heap profile on exit.

use std::env;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{error, info, warn};

use umbra::benchmarks::{self, BenchmarkConfig};
use umbra::config::{Config, GameConfig};
use umbra::game::player::PlayerInput;
use umbra::GameState;

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run() {
        error!("{}", err);
        std::process::exit(1);
    }
}

/// Loads the configuration named by the first argument, falling back to
/// defaults when it is absent or missing on disk.
fn load_config(path: Option<&str>) -> umbra::Result<GameConfig> {
    let Some(path) = path else {
        info!("No config given, using defaults");
        return Ok(GameConfig::default());
    };

    if !Path::new(path).exists() {
        warn!("Config file {} not found, using defaults", path);
        return Ok(GameConfig::default());
    }

    let config = GameConfig::load_from_file(path)?;
    info!("Loaded config from {}", path);
    Ok(config)
}

/// Scripted intent for tick `tick`: walk forward, turn a little every second,
/// sprint in bursts and hop now and then.
fn scripted_input(tick: u32) -> PlayerInput {
    let second = tick / 60;
    PlayerInput {
        forward: true,
        sprint: second % 4 < 2,
        jump: tick % 150 == 0 && tick > 0,
        look_delta: if tick % 60 == 0 { (45.0, 0.0) } else { (0.0, 0.0) },
        ..PlayerInput::default()
    }
}

fn run() -> umbra::Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let config = load_config(args.first().map(String::as_str))?;
    let report_dir = args.get(1).cloned();

    benchmarks::configure(BenchmarkConfig {
        enabled: true,
        ..BenchmarkConfig::default()
    });

    let running = Arc::new(AtomicBool::new(true));
    let handler_flag = Arc::clone(&running);
    if let Err(err) = ctrlc::set_handler(move || {
        handler_flag.store(false, Ordering::SeqCst);
    }) {
        warn!("Could not install Ctrl-C handler: {}", err);
    }

    let ticks = config.sim.ticks;
    let scan_every = config.sim.scan_every;
    let dt = config.physics.time_step;

    let mut game = GameState::new(config)?;
    info!(
        "World ready: {} triangles, {} BVH nodes, depth {}",
        game.collision_system.bvh().triangles().len(),
        game.collision_system.bvh().nodes().len(),
        game.collision_system.bvh().depth()
    );

    let mut scan_hits = 0;
    for tick in 0..ticks {
        if !running.load(Ordering::SeqCst) {
            info!("Interrupted after {} ticks", tick);
            break;
        }

        game.tick(dt, &scripted_input(tick));
        if scan_every > 0 && tick % scan_every == 0 {
            scan_hits += game.scan();
        }
        if game.caught() {
            break;
        }
    }

    info!(
        "Finished: {} ticks, {:.2}s simulated, caught: {}, player at {:?}, pursuer at {:?}",
        game.tick_count,
        game.elapsed,
        game.caught(),
        game.player.position(),
        game.enemy.position()
    );
    info!(
        "Scanner: {} hits, {} dots retained, stamina {:.0}%",
        scan_hits,
        game.scanner.dots().len(),
        game.player.stamina_ratio() * 100.0
    );

    benchmarks::log_summary();
    if let Some(directory) = report_dir {
        if let Err(err) = benchmarks::write_results_to_file(&directory, "Headless Run") {
            warn!("Failed to write benchmark report to {}: {}", directory, err);
        }
    }

    Ok(())
}
