//! Prometheus metrics for ai-gateway.
//!
//! Components receive a [`MetricsRecorder`] instead of touching process-wide
//! statics, so each test can hand in its own recorder.

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};

/// Outcome label for `ai_gateway_requests_total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStatus {
    Started,
    InferenceError,
    SourceHostError,
    Success,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Started => "started",
            RequestStatus::InferenceError => "ollama_error",
            RequestStatus::SourceHostError => "github_error",
            RequestStatus::Success => "success",
        }
    }
}

pub trait MetricsRecorder: Send + Sync {
    fn record_request(&self, endpoint: &str, status: RequestStatus);

    fn record_generation(&self, kind: &str, duration_secs: f64);

    fn record_pull_request(&self, status: &str);

    fn record_http_request(&self, method: &str, path: &str, status: u16, duration_secs: f64);

    /// Text exposition of everything recorded so far.
    fn gather(&self) -> String;
}

/// Recorder that drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMetrics;

impl MetricsRecorder for NoopMetrics {
    fn record_request(&self, _endpoint: &str, _status: RequestStatus) {}

    fn record_generation(&self, _kind: &str, _duration_secs: f64) {}

    fn record_pull_request(&self, _status: &str) {}

    fn record_http_request(&self, _method: &str, _path: &str, _status: u16, _duration_secs: f64) {}

    fn gather(&self) -> String {
        String::new()
    }
}

pub struct PrometheusMetrics {
    registry: Registry,
    requests_total: IntCounterVec,
    generation_duration: HistogramVec,
    prs_created_total: IntCounterVec,
    http_requests_total: IntCounterVec,
    http_request_duration: HistogramVec,
}

impl PrometheusMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let requests_total = IntCounterVec::new(
            Opts::new("ai_gateway_requests_total", "Total requests to AI Gateway"),
            &["endpoint", "status"],
        )?;

        // Local models are slow; buckets reach past the default 10s.
        let generation_duration = HistogramVec::new(
            HistogramOpts::new(
                "ai_gateway_generation_duration_seconds",
                "Time spent generating manifests",
            )
            .buckets(vec![0.5, 1.0, 2.5, 5.0, 10.0, 20.0, 30.0, 60.0, 120.0]),
            &["type"],
        )?;

        let prs_created_total = IntCounterVec::new(
            Opts::new("ai_gateway_prs_created_total", "Total PRs created by AI Gateway"),
            &["status"],
        )?;

        let http_requests_total = IntCounterVec::new(
            Opts::new("http_requests_total", "Total number of HTTP requests"),
            &["method", "path", "status"],
        )?;

        let http_request_duration = HistogramVec::new(
            HistogramOpts::new(
                "http_request_duration_seconds",
                "HTTP request duration in seconds",
            ),
            &["method", "path", "status"],
        )?;

        registry.register(Box::new(requests_total.clone()))?;
        registry.register(Box::new(generation_duration.clone()))?;
        registry.register(Box::new(prs_created_total.clone()))?;
        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration.clone()))?;

        tracing::info!("Prometheus metrics initialized");

        Ok(Self {
            registry,
            requests_total,
            generation_duration,
            prs_created_total,
            http_requests_total,
            http_request_duration,
        })
    }
}

impl MetricsRecorder for PrometheusMetrics {
    fn record_request(&self, endpoint: &str, status: RequestStatus) {
        self.requests_total
            .with_label_values(&[endpoint, status.as_str()])
            .inc();
    }

    fn record_generation(&self, kind: &str, duration_secs: f64) {
        self.generation_duration
            .with_label_values(&[kind])
            .observe(duration_secs);
    }

    fn record_pull_request(&self, status: &str) {
        self.prs_created_total.with_label_values(&[status]).inc();
    }

    fn record_http_request(&self, method: &str, path: &str, status: u16, duration_secs: f64) {
        let status = status.to_string();
        let labels = [method, path, status.as_str()];
        self.http_requests_total.with_label_values(&labels).inc();
        self.http_request_duration
            .with_label_values(&labels)
            .observe(duration_secs);
    }

    fn gather(&self) -> String {
        let mut buffer = Vec::new();
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();

        if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
            tracing::error!(error = %e, "Failed to encode metrics");
            return format!("# Failed to encode metrics: {}\n", e);
        }

        match String::from_utf8(buffer) {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "Failed to convert metrics to UTF-8");
                format!("# Failed to convert metrics to UTF-8: {}\n", e)
            }
        }
    }
}
