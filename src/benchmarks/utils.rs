//! Benchmark utility functions and helper types
//!
//! This module provides convenience functions, timers, and utilities for common
//! benchmarking tasks. It includes both manual timers and automatic scoped timers,
//! as well as functions for managing benchmark data and generating reports.
//!
//! # Key Features
//! - **Manual Timers**: `Timer` for explicit start/stop timing
//! - **Scoped Timers**: `ScopedTimer` for automatic timing based on scope
//! - **Reports**: Logged summaries and timestamped report files
//! - **Macros**: `benchmark!` for easy code instrumentation

use chrono::{DateTime, Local};
use log::info;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use super::BenchmarkConfig;
use super::data::{self, PerformanceMetrics, Profiler};
use super::format;

/// A timer for measuring execution time of code sections
///
/// This timer provides manual control over timing operations. It starts timing
/// when created and can be stopped explicitly to record the measurement.
pub struct Timer {
    /// The name of the operation being timed
    name: String,
    /// When the timer was started
    start_time: Instant,
    /// Configuration for this timer
    config: BenchmarkConfig,
}

impl Timer {
    /// Creates a new timer with the given name
    ///
    /// # Arguments
    /// * `name` - The name of the operation to be timed
    /// * `config` - Configuration for the timer behavior
    pub fn new(name: &str, config: BenchmarkConfig) -> Self {
        Self {
            name: name.to_string(),
            start_time: Instant::now(),
            config,
        }
    }

    /// Stops the timer and records the measurement
    ///
    /// Returns the duration that elapsed since the timer was created.
    pub fn stop(self) -> Duration {
        let duration = self.start_time.elapsed();
        data::record(&self.config, &self.name, duration);
        duration
    }
}

/// A scoped timer that automatically stops when dropped
pub struct ScopedTimer {
    timer: Option<Timer>,
}

impl ScopedTimer {
    /// Creates a new scoped timer
    ///
    /// # Arguments
    /// * `name` - The name of the operation to be timed
    /// * `config` - Configuration for the timer behavior
    pub fn new(name: &str, config: BenchmarkConfig) -> Self {
        Self {
            timer: Some(Timer::new(name, config)),
        }
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.stop();
        }
    }
}

/// Replaces the active configuration used by [`time`] and [`scoped_timer`].
pub fn configure(config: BenchmarkConfig) {
    data::store().set_config(config);
}

/// The active configuration.
pub fn current_config() -> BenchmarkConfig {
    data::store().config().clone()
}

/// Times a closure execution with the active configuration
///
/// # Arguments
/// * `name` - The name of the operation being timed
/// * `f` - The closure to execute and time
///
/// # Returns
/// The result of the closure execution
pub fn time<F, R>(name: &str, f: F) -> R
where
    F: FnOnce() -> R,
{
    let mut profiler = Profiler::new(current_config());
    profiler.time_closure(name, f)
}

/// Creates a scoped timer with the active configuration
pub fn scoped_timer(name: &str) -> ScopedTimer {
    ScopedTimer::new(name, current_config())
}

/// Gets all recorded measurements, indexed by operation name
pub fn get_measurements() -> HashMap<String, PerformanceMetrics> {
    data::store().get_measurements()
}

/// Logs a summary of all recorded measurements at info level
pub fn log_summary() {
    let measurements = get_measurements();
    if measurements.is_empty() {
        info!("[BENCHMARK] No measurements recorded");
        return;
    }

    info!("=== PERFORMANCE SUMMARY ===");
    for line in format::format_report(&measurements).lines() {
        info!("{}", line);
    }
}

/// Writes benchmark results to a timestamped file under `directory`
///
/// # Arguments
/// * `directory` - Created if missing
/// * `source` - Label written into the report header
///
/// # Returns
/// The path of the written report, or `None` if nothing was recorded
pub fn write_results_to_file(
    directory: impl AsRef<Path>,
    source: &str,
) -> io::Result<Option<PathBuf>> {
    let measurements = get_measurements();
    if measurements.is_empty() {
        info!("[BENCHMARK] No measurements to write");
        return Ok(None);
    }

    let directory = directory.as_ref();
    fs::create_dir_all(directory)?;

    let now: DateTime<Local> = Local::now();
    let file_path = directory.join(format!("benchmark-{}.txt", now.format("%Y%m%d-%H%M%S%.3f")));

    let mut file = File::create(&file_path)?;
    writeln!(file, "Umbra Performance Benchmark Results")?;
    writeln!(file, "Generated: {}", now.format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(file, "Source: {}", source)?;
    writeln!(file, "{}", "=".repeat(60))?;
    writeln!(file)?;
    write!(file, "{}", format::format_report(&measurements))?;

    let slow: Vec<_> = measurements
        .iter()
        .filter(|(_, metrics)| metrics.avg_duration > Duration::from_millis(1))
        .collect();
    if !slow.is_empty() {
        writeln!(file, "\nOperations averaging over 1ms:")?;
        for (name, metrics) in slow {
            writeln!(file, "   {}: {:?} average", name, metrics.avg_duration)?;
        }
    }

    writeln!(file)?;
    writeln!(file, "{}", "=".repeat(60))?;
    writeln!(file, "End of benchmark report")?;

    info!("[BENCHMARK] Results written to: {}", file_path.display());
    Ok(Some(file_path))
}

/// Macro for easy timing of code blocks
///
/// # Example
/// ```rust
/// let sum = umbra::benchmark!("sum", { (1..=10).sum::<u32>() });
/// assert_eq!(sum, 55);
/// ```
#[macro_export]
macro_rules! benchmark {
    ($name:expr, $block:expr) => {{
        let _timer = $crate::benchmarks::scoped_timer($name);
        $block
    }};
}
