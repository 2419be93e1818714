//! Benchmark result formatting utilities
//!
//! Turns collected metrics into fixed-width text tables. The same tables are
//! used for the logged summary and for report files.

use std::collections::HashMap;
use std::fmt::Write;

use super::data::PerformanceMetrics;

/// Name fragments that mark one-off setup work rather than per-tick work.
const SETUP_MARKERS: [&str; 4] = ["build", "generation", "loading", "setup"];

/// Splits measurements into (setup, per-tick) lists, each sorted by total
/// duration, most expensive first.
pub fn categorize(
    measurements: &HashMap<String, PerformanceMetrics>,
) -> (
    Vec<(&String, &PerformanceMetrics)>,
    Vec<(&String, &PerformanceMetrics)>,
) {
    let (mut setup, mut update): (Vec<_>, Vec<_>) = measurements
        .iter()
        .partition(|(name, _)| SETUP_MARKERS.iter().any(|marker| name.contains(marker)));

    setup.sort_by(|a, b| b.1.total_duration.cmp(&a.1.total_duration));
    update.sort_by(|a, b| b.1.total_duration.cmp(&a.1.total_duration));
    (setup, update)
}

/// Helper function to calculate column widths for benchmark table formatting
///
/// # Arguments
/// * `benchmarks` - A slice of tuples containing benchmark names and their metrics
///
/// # Returns
/// A tuple of column widths in the order: (name, count, total, avg, min, max)
pub fn calculate_column_widths(
    benchmarks: &[(&String, &PerformanceMetrics)],
) -> (usize, usize, usize, usize, usize, usize) {
    let mut name_width = 24;
    let mut count_width = 6;
    let mut total_width = 12;
    let mut avg_width = 12;
    let mut min_width = 12;
    let mut max_width = 12;

    for (name, metrics) in benchmarks {
        name_width = name_width.max(name.len());
        count_width = count_width.max(metrics.count.to_string().len());
        total_width = total_width.max(format!("{:?}", metrics.total_duration).len());
        avg_width = avg_width.max(format!("{:?}", metrics.avg_duration).len());
        min_width = min_width.max(format!("{:?}", metrics.min_duration).len());
        max_width = max_width.max(format!("{:?}", metrics.max_duration).len());
    }

    (
        name_width,
        count_width,
        total_width,
        avg_width,
        min_width,
        max_width,
    )
}

/// Renders a titled table followed by the section's total time.
pub fn format_table(title: &str, benchmarks: &[(&String, &PerformanceMetrics)]) -> String {
    let mut out = String::new();
    if benchmarks.is_empty() {
        return out;
    }

    let (name_width, count_width, total_width, avg_width, min_width, max_width) =
        calculate_column_widths(benchmarks);

    // Writing into a String cannot fail.
    let _ = writeln!(out, "=== {} ===", title);
    let _ = writeln!(
        out,
        "{:<name_width$} | {:>count_width$} | {:>total_width$} | {:>avg_width$} | {:>min_width$} | {:>max_width$}",
        "Operation", "Count", "Total", "Avg", "Min", "Max",
    );
    let separator_length =
        name_width + count_width + total_width + avg_width + min_width + max_width + 15;
    let _ = writeln!(out, "{}", "-".repeat(separator_length));

    for (name, metrics) in benchmarks {
        let _ = writeln!(
            out,
            "{:<name_width$} | {:>count_width$} | {:>total_width$} | {:>avg_width$} | {:>min_width$} | {:>max_width$}",
            name,
            metrics.count,
            format!("{:?}", metrics.total_duration),
            format!("{:?}", metrics.avg_duration),
            format!("{:?}", metrics.min_duration),
            format!("{:?}", metrics.max_duration),
        );
    }

    let total: f64 = benchmarks
        .iter()
        .map(|(_, m)| m.total_duration.as_secs_f64())
        .sum();
    let _ = writeln!(out, "Total: {:.3}s", total);
    out
}

/// Renders the full report body: setup table, then per-tick table.
pub fn format_report(measurements: &HashMap<String, PerformanceMetrics>) -> String {
    let (setup, update) = categorize(measurements);
    let mut out = format_table("SETUP BENCHMARKS", &setup);
    if !setup.is_empty() && !update.is_empty() {
        out.push('\n');
    }
    out.push_str(&format_table("UPDATE BENCHMARKS", &update));
    out
}
