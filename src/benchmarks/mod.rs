//! Benchmarking and Performance Analysis Library
//!
//! This module provides utilities for measuring where the simulation spends
//! its time: BVH construction, maze generation, per-tick physics and scan
//! bursts. Measurements are collected in a process-wide store and can be
//! summarised through the logger or written to a timestamped report file.
//!
//! # Features
//! - **Timing Measurements**: Manual and scoped timers for code sections
//! - **Profiling Tools**: Named sections aggregated into count/total/min/max/avg
//! - **Runtime Control**: [`configure`] swaps the active [`BenchmarkConfig`]
//! - **Minimal Overhead**: A disabled configuration skips all bookkeeping

use std::time::Duration;

/// Configuration for benchmarking features
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkConfig {
    /// Whether benchmarking is enabled
    pub enabled: bool,
    /// Whether to log every individual measurement at debug level
    pub log_each: bool,
    /// Minimum duration to record (filters out very fast operations)
    pub min_duration_threshold: Duration,
    /// Maximum number of distinct operations to keep in memory
    pub max_samples: usize,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            enabled: cfg!(debug_assertions),
            log_each: false,
            min_duration_threshold: Duration::ZERO,
            max_samples: 1000,
        }
    }
}

/// Data structures for storing benchmark measurements
///
/// This module contains the per-operation metrics, the profiler and the
/// global measurement store.
pub mod data;

/// Table formatting for benchmark reports
pub mod format;

/// Timers, convenience functions, report output and macros
pub mod utils;

#[cfg(test)]
mod tests;

// Re-export main types for convenience
pub use data::{PerformanceMetrics, Profiler};
pub use utils::*;
