//! Prometheus metrics for course-service.
//!
//! Recorded through the `metrics` facade and rendered by the exporter handle
//! installed at startup.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::Duration;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder once per process and return its handle.
///
/// Later calls (several test apps in one binary) reuse the first handle.
pub fn init_metrics() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => handle,
            Err(e) => {
                tracing::warn!("Prometheus recorder not installed: {}", e);
                // A detached recorder still renders, it just sees no global events.
                PrometheusBuilder::new().build_recorder().handle()
            }
        })
        .clone()
}

/// Count one provider call and its latency.
pub fn record_generation(provider: &'static str, outcome: &'static str, elapsed: Duration) {
    ::metrics::counter!(
        "course_generations_total",
        "provider" => provider,
        "outcome" => outcome
    )
    .increment(1);
    ::metrics::histogram!(
        "course_generation_duration_seconds",
        "provider" => provider
    )
    .record(elapsed.as_secs_f64());
}

/// Number of courses currently held.
pub fn record_stored(count: usize) {
    ::metrics::gauge!("courses_stored").set(count as f64);
}
