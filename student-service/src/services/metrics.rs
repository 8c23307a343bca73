//! Metrics collection and Prometheus export.
//!
//! Initializes the metrics exporter and records storage gateway metrics.

use super::store::StoreError;
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::Instant;

/// Global handle to the Prometheus recorder.
pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Initialize the metrics recorder.
///
/// This must be called once at startup before any metrics are recorded.
/// Panics if called more than once.
pub fn init_metrics() {
    let builder = PrometheusBuilder::new();
    let handle = builder
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    if METRICS_HANDLE.set(handle).is_err() {
        panic!("failed to set metrics handle: already initialized");
    }
}

/// Get the current metrics in Prometheus text format.
pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized\n".to_string())
}

/// Record one storage gateway call.
pub fn record_store_operation<T>(
    operation: &'static str,
    started: Instant,
    result: &Result<T, StoreError>,
) {
    let outcome = match result {
        Ok(_) => "ok",
        Err(e) => e.kind(),
    };

    counter!(
        "student_store_operations_total",
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);
    histogram!(
        "student_store_operation_duration_seconds",
        "operation" => operation
    )
    .record(started.elapsed().as_secs_f64());
}
