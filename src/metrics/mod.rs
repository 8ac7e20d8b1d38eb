pub mod middleware;

pub use middleware::MetricsMiddleware;

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::sync::{Arc, OnceLock};

static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

const HTTP_DURATION_BUCKETS: &[f64] = &[0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0];

/// Handle over the process-wide Prometheus recorder
///
/// The recorder is installed once, every instance renders the same registry.
#[derive(Clone)]
pub struct AppMetrics {
    prometheus_handle: Arc<PrometheusHandle>,
}

impl AppMetrics {
    pub fn new() -> Self {
        let handle = PROMETHEUS_HANDLE.get_or_init(|| {
            let builder = match PrometheusBuilder::new().set_buckets_for_metric(
                Matcher::Full("http_requests_duration_seconds".to_string()),
                HTTP_DURATION_BUCKETS,
            ) {
                Ok(builder) => builder,
                Err(e) => {
                    ::tracing::warn!(error = %e, "Failed to set histogram buckets, using summaries");
                    PrometheusBuilder::new()
                }
            };

            let recorder = builder.build_recorder();
            let handle = recorder.handle();

            if metrics::set_global_recorder(recorder).is_err() {
                ::tracing::warn!("A metrics recorder is already installed");
            }

            Self::describe_metrics();

            handle
        });

        Self {
            prometheus_handle: Arc::new(handle.clone()),
        }
    }

    fn describe_metrics() {
        describe_counter!("http_requests_total", "Total number of HTTP requests");
        describe_histogram!(
            "http_requests_duration_seconds",
            "HTTP request duration in seconds"
        );
        describe_gauge!(
            "http_requests_in_flight",
            "Number of HTTP requests currently being processed"
        );
        describe_counter!("users_created_total", "Total number of registered users");
        describe_counter!(
            "auth_tokens_issued_total",
            "Total number of successful token requests"
        );
        describe_counter!(
            "auth_token_failures_total",
            "Total number of rejected token requests"
        );
    }

    pub fn record_http_request(&self, method: &str, path: &str, status: u16, duration_secs: f64) {
        counter!(
            "http_requests_total",
            "method" => method.to_string(),
            "path" => path.to_string(),
            "status" => status.to_string()
        )
        .increment(1);

        histogram!(
            "http_requests_duration_seconds",
            "method" => method.to_string(),
            "path" => path.to_string()
        )
        .record(duration_secs);
    }

    pub fn http_request_start(&self) {
        gauge!("http_requests_in_flight").increment(1.0);
    }

    pub fn http_request_end(&self) {
        gauge!("http_requests_in_flight").decrement(1.0);
    }

    pub fn record_user_created(&self) {
        counter!("users_created_total").increment(1);
    }

    pub fn record_token_issued(&self) {
        counter!("auth_tokens_issued_total").increment(1);
    }

    pub fn record_token_failure(&self, reason: &'static str) {
        counter!("auth_token_failures_total", "reason" => reason).increment(1);
    }

    /// Prometheus text exposition of every recorded metric
    pub fn render(&self) -> String {
        self.prometheus_handle.render()
    }
}

impl Default for AppMetrics {
    fn default() -> Self {
        Self::new()
    }
}
