use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use log::debug;

use super::BenchmarkConfig;

/// Performance profiler for identifying hot paths
pub struct Profiler {
    active_timers: HashMap<String, Instant>,
    config: BenchmarkConfig,
}

impl Profiler {
    /// Creates a new profiler
    pub fn new(config: BenchmarkConfig) -> Self {
        Self {
            active_timers: HashMap::new(),
            config,
        }
    }

    /// Starts timing a section
    pub fn start_section(&mut self, name: &str) {
        if self.config.enabled {
            self.active_timers.insert(name.to_string(), Instant::now());
        }
    }

    /// Ends timing a section and records it. Unknown sections are ignored.
    pub fn end_section(&mut self, name: &str) -> Option<Duration> {
        if !self.config.enabled {
            return None;
        }
        let start_time = self.active_timers.remove(name)?;
        let duration = start_time.elapsed();
        record(&self.config, name, duration);
        Some(duration)
    }

    /// Times a closure execution
    pub fn time_closure<F, R>(&mut self, name: &str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        if self.config.enabled {
            self.start_section(name);
            let result = f();
            self.end_section(name);
            result
        } else {
            f()
        }
    }
}

/// Performance metrics for a specific operation
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceMetrics {
    /// Number of times this operation was measured
    pub count: usize,
    /// Total duration of all measurements combined
    pub total_duration: Duration,
    /// Shortest duration recorded for this operation
    pub min_duration: Duration,
    /// Longest duration recorded for this operation
    pub max_duration: Duration,
    /// Average duration across all measurements
    pub avg_duration: Duration,
}

impl PerformanceMetrics {
    fn new() -> Self {
        Self {
            count: 0,
            total_duration: Duration::ZERO,
            min_duration: Duration::MAX,
            max_duration: Duration::ZERO,
            avg_duration: Duration::ZERO,
        }
    }

    fn update(&mut self, duration: Duration) {
        self.count += 1;
        self.total_duration += duration;
        self.min_duration = self.min_duration.min(duration);
        self.max_duration = self.max_duration.max(duration);
        self.avg_duration = self.total_duration / self.count as u32;
    }
}

lazy_static::lazy_static! {
    /// Centralized benchmark data storage
    pub static ref BENCHMARK_DATA: Mutex<BenchmarkData> = Mutex::new(BenchmarkData::new());
}

/// Locks the global store, recovering it if a previous holder panicked.
pub(crate) fn store() -> MutexGuard<'static, BenchmarkData> {
    BENCHMARK_DATA.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Records `duration` under `name` if it passes the config's filters.
pub(crate) fn record(config: &BenchmarkConfig, name: &str, duration: Duration) {
    if !config.enabled || duration < config.min_duration_threshold {
        return;
    }
    store().record_measurement(name, duration);
    if config.log_each {
        debug!("[BENCHMARK] {}: {:?}", name, duration);
    }
}

/// Central storage for all benchmark measurements
pub struct BenchmarkData {
    measurements: HashMap<String, PerformanceMetrics>,
    config: BenchmarkConfig,
}

impl BenchmarkData {
    fn new() -> Self {
        Self {
            measurements: HashMap::new(),
            config: BenchmarkConfig::default(),
        }
    }

    /// Records a new measurement for the specified operation
    ///
    /// # Arguments
    /// * `name` - The name of the operation being measured
    /// * `duration` - The duration of the operation
    pub fn record_measurement(&mut self, name: &str, duration: Duration) {
        let is_new = !self.measurements.contains_key(name);
        if is_new
            && self.config.max_samples > 0
            && self.measurements.len() >= self.config.max_samples
        {
            return;
        }
        self.measurements
            .entry(name.to_string())
            .or_insert_with(PerformanceMetrics::new)
            .update(duration);
    }

    /// Returns a copy of all recorded measurements
    pub fn get_measurements(&self) -> HashMap<String, PerformanceMetrics> {
        self.measurements.clone()
    }

    pub fn config(&self) -> &BenchmarkConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: BenchmarkConfig) {
        self.config = config;
    }
}
