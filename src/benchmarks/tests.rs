//! Benchmark module tests
//!
//! The measurement store is process-wide and tests run in parallel, so every
//! test records under its own operation names and never clears the store.

#[cfg(test)]
mod tests {
    use crate::benchmarks::data;
    use crate::benchmarks::*;
    use std::collections::HashMap;
    use std::fs;
    use std::thread;
    use std::time::Duration;

    fn enabled() -> BenchmarkConfig {
        BenchmarkConfig {
            enabled: true,
            log_each: false,
            min_duration_threshold: Duration::ZERO,
            max_samples: 1000,
        }
    }

    #[test]
    fn test_timer() {
        let timer = Timer::new("test_timer_op", enabled());
        thread::sleep(Duration::from_millis(10));
        let duration = timer.stop();

        assert!(duration >= Duration::from_millis(10));
        assert!(get_measurements().contains_key("test_timer_op"));
    }

    /// `ScopedTimer` records when it goes out of scope.
    #[test]
    fn test_scoped_timer() {
        {
            let _timer = ScopedTimer::new("scoped_test", enabled());
            thread::sleep(Duration::from_millis(5));
        }

        let measurements = get_measurements();
        let metrics = &measurements["scoped_test"];
        assert_eq!(metrics.count, 1);
        assert!(metrics.total_duration >= Duration::from_millis(5));
    }

    #[test]
    fn test_profiler() {
        let mut profiler = Profiler::new(enabled());

        profiler.start_section("profiler_section");
        thread::sleep(Duration::from_millis(2));
        assert!(profiler.end_section("profiler_section").is_some());
        assert_eq!(profiler.end_section("never_started"), None);

        let value = profiler.time_closure("profiler_closure", || 7);
        assert_eq!(value, 7);

        let measurements = get_measurements();
        assert!(measurements.contains_key("profiler_section"));
        assert!(measurements.contains_key("profiler_closure"));
        assert!(!measurements.contains_key("never_started"));
    }

    #[test]
    fn test_disabled_config_records_nothing() {
        let config = BenchmarkConfig {
            enabled: false,
            ..enabled()
        };
        Timer::new("disabled_timer", config.clone()).stop();
        let mut profiler = Profiler::new(config);
        assert_eq!(profiler.time_closure("disabled_closure", || 3), 3);

        let measurements = get_measurements();
        assert!(!measurements.contains_key("disabled_timer"));
        assert!(!measurements.contains_key("disabled_closure"));
    }

    #[test]
    fn test_threshold_filters_fast_operations() {
        let config = BenchmarkConfig {
            min_duration_threshold: Duration::from_secs(60),
            ..enabled()
        };
        Timer::new("below_threshold", config).stop();
        assert!(!get_measurements().contains_key("below_threshold"));
    }

    #[test]
    fn test_metrics_aggregate() {
        {
            let mut store = data::store();
            store.record_measurement("aggregate_op", Duration::from_millis(1));
            store.record_measurement("aggregate_op", Duration::from_millis(3));
        }

        let measurements = get_measurements();
        let metrics = &measurements["aggregate_op"];
        assert_eq!(metrics.count, 2);
        assert_eq!(metrics.total_duration, Duration::from_millis(4));
        assert_eq!(metrics.min_duration, Duration::from_millis(1));
        assert_eq!(metrics.max_duration, Duration::from_millis(3));
        assert_eq!(metrics.avg_duration, Duration::from_millis(2));
    }

    #[test]
    fn test_report_separates_setup_from_updates() {
        let metrics = PerformanceMetrics {
            count: 1,
            total_duration: Duration::from_millis(5),
            min_duration: Duration::from_millis(5),
            max_duration: Duration::from_millis(5),
            avg_duration: Duration::from_millis(5),
        };
        let mut measurements = HashMap::new();
        measurements.insert("bvh_build".to_string(), metrics.clone());
        measurements.insert("maze_generation".to_string(), metrics.clone());
        measurements.insert("physics_tick".to_string(), metrics);

        let (setup, update) = format::categorize(&measurements);
        assert_eq!(setup.len(), 2);
        assert_eq!(update.len(), 1);
        assert_eq!(update[0].0, "physics_tick");

        let report = format::format_report(&measurements);
        let setup_at = report.find("SETUP BENCHMARKS").unwrap();
        let update_at = report.find("UPDATE BENCHMARKS").unwrap();
        assert!(setup_at < update_at);
        assert!(report[update_at..].contains("physics_tick"));
    }

    #[test]
    fn test_file_output() {
        Timer::new("file_output_op", enabled()).stop();

        let directory = std::env::temp_dir().join(format!(
            "umbra-benchmarks-{}",
            std::process::id()
        ));
        let path = write_results_to_file(&directory, "Unit Test")
            .unwrap()
            .unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("Umbra Performance Benchmark Results"));
        assert!(contents.contains("Source: Unit Test"));
        assert!(contents.contains("file_output_op"));

        let _ = fs::remove_dir_all(&directory);
    }

    #[test]
    fn test_benchmark_macro() {
        let value = crate::benchmark!("macro_op", { 2 + 2 });
        assert_eq!(value, 4);
    }
}
