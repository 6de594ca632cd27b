//! Prometheus metrics for the API server.

use std::time::Instant;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus recorder and return a handle for rendering.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Metric names as constants for consistency.
pub mod names {
    // HTTP metrics
    pub const HTTP_REQUESTS_TOTAL: &str = "pose_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "pose_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "pose_http_requests_in_flight";

    // Pipeline metrics
    pub const ESTIMATES_TOTAL: &str = "pose_estimates_total";
    pub const INFERENCE_DURATION_SECONDS: &str = "pose_inference_duration_seconds";
}

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", route_label(path).to_string()),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record a finished estimate by outcome (`ok` or an error code).
pub fn record_estimate(outcome: &'static str) {
    counter!(names::ESTIMATES_TOTAL, "outcome" => outcome).increment(1);
}

/// Record model inference time for one canvas.
pub fn record_inference_duration(duration_secs: f64) {
    histogram!(names::INFERENCE_DURATION_SECONDS).record(duration_secs);
}

/// Collapse unknown paths so scanners can't blow up label cardinality.
fn route_label(path: &str) -> &str {
    match path {
        "/" | "/health" | "/metrics" => path,
        _ => "other",
    }
}

/// Metrics middleware for HTTP requests.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);

    let response = next.run(request).await;

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    let status = response.status().as_u16();
    let duration = start.elapsed().as_secs_f64();

    record_http_request(&method, &path, status, duration);

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_label() {
        assert_eq!(route_label("/"), "/");
        assert_eq!(route_label("/health"), "/health");
        assert_eq!(route_label("/wp-admin/setup.php"), "other");
    }
}
