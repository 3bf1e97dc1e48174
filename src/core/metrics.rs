//! Prometheus metrics for monitoring the chat relay server.
//!
//! This module provides a centralized metrics registry tracking request
//! volume and upstream failures.

use prometheus::{register_int_counter_vec, IntCounterVec};
use std::sync::OnceLock;

/// Container for all application metrics.
pub struct Metrics {
    /// Total number of chat requests by endpoint, response mode, and context
    pub request_count: IntCounterVec,

    /// Upstream failures by kind (status, network, protocol)
    pub upstream_errors: IntCounterVec,
}

static METRICS: OnceLock<Metrics> = OnceLock::new();

/// Initialize the metrics registry.
///
/// This should be called once at application startup. Subsequent calls will
/// return the same instance.
pub fn init_metrics() -> &'static Metrics {
    METRICS.get_or_init(|| {
        let request_count = register_int_counter_vec!(
            "agribot_relay_requests_total",
            "Total number of chat requests",
            &["endpoint", "mode", "context"]
        )
        .expect("Failed to register request_count metric");

        let upstream_errors = register_int_counter_vec!(
            "agribot_relay_upstream_errors_total",
            "Total number of upstream failures",
            &["kind"]
        )
        .expect("Failed to register upstream_errors metric");

        Metrics {
            request_count,
            upstream_errors,
        }
    })
}

/// Get the global metrics instance.
///
/// # Panics
///
/// Panics if metrics have not been initialized via [`init_metrics`].
pub fn get_metrics() -> &'static Metrics {
    METRICS.get().expect("Metrics not initialized")
}
