//! Prometheus metrics for the scheduler, collectors and analytics
//!
//! This module provides metrics tracking for:
//! - Scheduler: task runs by outcome, task duration, running tasks
//! - Collectors: content items and account snapshots fetched per platform
//! - Analytics: anomalies detected per platform and severity
//!
//! # Usage
//!
//! Call `init_metrics()` at application startup to register all metrics.
//! If initialization fails, metrics operations become no-ops.

use prometheus::{
    register_counter_vec, register_gauge, register_histogram_vec, CounterVec, Encoder, Gauge,
    HistogramVec, TextEncoder,
};
use std::sync::OnceLock;

// ============================================================================
// Metrics Storage
// ============================================================================

/// Container for scheduler metrics
struct SchedulerMetrics {
    task_runs: CounterVec,
    task_duration: HistogramVec,
    running_tasks: Gauge,
}

/// Container for collector and analytics metrics
struct AnalyticsMetrics {
    items_fetched: CounterVec,
    anomalies_detected: CounterVec,
}

static SCHEDULER_METRICS: OnceLock<SchedulerMetrics> = OnceLock::new();

static ANALYTICS_METRICS: OnceLock<AnalyticsMetrics> = OnceLock::new();

/// Flag to track if initialization was attempted
static METRICS_INIT_ATTEMPTED: OnceLock<bool> = OnceLock::new();

// ============================================================================
// Initialization
// ============================================================================

/// Initialize all Prometheus metrics
///
/// This function should be called once at application startup.
/// If metric registration fails, errors are logged and subsequent
/// metric operations become no-ops.
pub fn init_metrics() -> Result<(), Box<dyn std::error::Error>> {
    if METRICS_INIT_ATTEMPTED.get().is_some() {
        return Ok(());
    }
    METRICS_INIT_ATTEMPTED.set(true).ok();

    let scheduler = SchedulerMetrics {
        task_runs: register_counter_vec!(
            "crossforge_scheduler_task_runs_total",
            "Total task executions by task and outcome",
            &["task", "outcome"]
        )?,
        task_duration: register_histogram_vec!(
            "crossforge_scheduler_task_duration_seconds",
            "Task execution time in seconds",
            &["task"],
            vec![0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 10.0, 30.0, 60.0, 300.0]
        )?,
        running_tasks: register_gauge!(
            "crossforge_scheduler_running_tasks",
            "Number of task loops currently running"
        )?,
    };

    let analytics = AnalyticsMetrics {
        items_fetched: register_counter_vec!(
            "crossforge_fetch_items_total",
            "Content items fetched per platform",
            &["platform"]
        )?,
        anomalies_detected: register_counter_vec!(
            "crossforge_anomalies_detected_total",
            "Anomalies detected per platform and severity",
            &["platform", "severity"]
        )?,
    };

    SCHEDULER_METRICS
        .set(scheduler)
        .map_err(|_| "Scheduler metrics already initialized")?;
    ANALYTICS_METRICS
        .set(analytics)
        .map_err(|_| "Analytics metrics already initialized")?;

    tracing::info!("Prometheus metrics initialized successfully");
    Ok(())
}

/// Check if metrics have been initialized
pub fn metrics_initialized() -> bool {
    SCHEDULER_METRICS.get().is_some() && ANALYTICS_METRICS.get().is_some()
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Encode all metrics to Prometheus text format
pub fn encode_metrics() -> Result<String, Box<dyn std::error::Error>> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

/// Record one task execution
pub fn record_task_run(task: &str, success: bool, duration_secs: f64) {
    let Some(m) = SCHEDULER_METRICS.get() else {
        return;
    };
    let outcome = if success { "success" } else { "failure" };
    m.task_runs.with_label_values(&[task, outcome]).inc();
    m.task_duration
        .with_label_values(&[task])
        .observe(duration_secs);
}

/// Track task loops entering or leaving the running state
pub fn adjust_running_tasks(delta: i64) {
    if let Some(m) = SCHEDULER_METRICS.get() {
        m.running_tasks.add(delta as f64);
    }
}

/// Record content items fetched for a platform
pub fn record_items_fetched(platform: &str, count: usize) {
    if count == 0 {
        return;
    }
    if let Some(m) = ANALYTICS_METRICS.get() {
        m.items_fetched
            .with_label_values(&[platform])
            .inc_by(count as f64);
    }
}

/// Record a detected anomaly
pub fn record_anomaly(platform: &str, severity: &str) {
    if let Some(m) = ANALYTICS_METRICS.get() {
        m.anomalies_detected
            .with_label_values(&[platform, severity])
            .inc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_before_init_is_noop() {
        // Must not panic whether or not another test initialized the registry
        record_task_run("noop", true, 0.1);
        record_items_fetched("youtube", 3);
        record_anomaly("x", "high");
        adjust_running_tasks(1);
        adjust_running_tasks(-1);
    }

    #[test]
    fn test_init_is_idempotent() {
        assert!(init_metrics().is_ok());
        assert!(init_metrics().is_ok());
        assert!(metrics_initialized());

        record_task_run("fetch-youtube", false, 0.5);
        let text = encode_metrics().unwrap();
        assert!(text.contains("crossforge_scheduler_task_runs_total"));
    }
}
