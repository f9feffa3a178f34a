//! Image API metrics collection.
//!
//! Provides standardized metrics for monitoring calls to the image service:
//! - Request counters by operation and status
//! - Latency histograms

use metrics::{counter, histogram};

/// Metric name constants for consistency.
pub mod names {
    /// Total image API requests by operation and status.
    pub const REQUESTS_TOTAL: &str = "image_api_requests_total";

    /// Request latency in seconds by operation.
    pub const LATENCY_SECONDS: &str = "image_api_latency_seconds";
}

/// Status label used when no HTTP response was received.
pub const TRANSPORT_FAILURE_STATUS: u16 = 0;

/// Record metrics for a completed image API request.
pub fn record_request(operation: &'static str, status: u16, latency_ms: f64) {
    counter!(
        names::REQUESTS_TOTAL,
        "operation" => operation,
        "status" => status.to_string()
    )
    .increment(1);

    histogram!(
        names::LATENCY_SECONDS,
        "operation" => operation
    )
    .record(latency_ms / 1000.0);
}

/// Record a request that failed before a response arrived.
pub fn record_transport_failure(operation: &'static str, latency_ms: f64) {
    record_request(operation, TRANSPORT_FAILURE_STATUS, latency_ms);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_names() {
        assert!(names::REQUESTS_TOTAL.contains("requests"));
        assert!(names::LATENCY_SECONDS.contains("latency"));
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        record_request("get_images", 200, 12.5);
        record_transport_failure("get_images", 3.0);
    }
}
