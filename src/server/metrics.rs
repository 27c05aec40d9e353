use axum::{http::StatusCode, response::IntoResponse};
use lazy_static::lazy_static;
use prometheus::{
    CounterVec, Encoder, Gauge, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
};
use std::time::Duration;

use crate::artwork::ArtworkSourceKind;

/// Metric name prefix for all Airwaves metrics
const PREFIX: &str = "airwaves";

lazy_static! {
    // Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    // HTTP Request Metrics
    pub static ref HTTP_REQUESTS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_http_requests_total"), "Total number of HTTP requests"),
        &["method", "path", "status"]
    ).expect("Failed to create http_requests_total metric");

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            format!("{PREFIX}_http_request_duration_seconds"),
            "HTTP request duration in seconds"
        )
        .buckets(vec![0.001, 0.01, 0.05, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0]),
        &["method", "path"]
    ).expect("Failed to create http_request_duration_seconds metric");

    // Artwork Metrics
    pub static ref ARTWORK_RESOLUTIONS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_artwork_resolutions_total"), "Artwork resolutions by outcome"),
        &["outcome"]
    ).expect("Failed to create artwork_resolutions_total metric");

    pub static ref ARTWORK_ADAPTER_LOOKUPS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(
            format!("{PREFIX}_artwork_adapter_lookups_total"),
            "Artwork adapter lookups by source and result"
        ),
        &["source", "result"]
    ).expect("Failed to create artwork_adapter_lookups_total metric");

    pub static ref ARTWORK_CACHE_ENTRIES: Gauge = Gauge::new(
        format!("{PREFIX}_artwork_cache_entries"),
        "Number of entries in the artwork result cache"
    ).expect("Failed to create artwork_cache_entries metric");
}

/// Initialize all metrics and register them with the Prometheus registry
pub fn init_metrics() {
    // Register all metrics - ignore errors if already registered (for tests)
    let _ = REGISTRY.register(Box::new(HTTP_REQUESTS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(HTTP_REQUEST_DURATION_SECONDS.clone()));
    let _ = REGISTRY.register(Box::new(ARTWORK_RESOLUTIONS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(ARTWORK_ADAPTER_LOOKUPS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(ARTWORK_CACHE_ENTRIES.clone()));

    tracing::info!("Metrics system initialized successfully");
}

/// Record an HTTP request
pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, path, &status.to_string()])
        .inc();

    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[method, path])
        .observe(duration.as_secs_f64());
}

/// Record the outcome of one artwork resolution
pub fn record_artwork_resolution(outcome: &str) {
    ARTWORK_RESOLUTIONS_TOTAL.with_label_values(&[outcome]).inc();
}

/// Record one adapter lookup; `result` is "hit", "miss" or "error"
pub fn record_adapter_lookup(source: ArtworkSourceKind, result: &str) {
    ARTWORK_ADAPTER_LOOKUPS_TOTAL
        .with_label_values(&[source.as_str(), result])
        .inc();
}

pub fn set_artwork_cache_entries(count: usize) {
    ARTWORK_CACHE_ENTRIES.set(count as f64);
}

/// Handler for the /metrics endpoint
pub async fn metrics_handler() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();

    let mut buffer = vec![];
    match encoder.encode(&metric_families, &mut buffer) {
        Ok(()) => {
            let response = String::from_utf8(buffer).unwrap_or_else(|_| String::from(""));
            (StatusCode::OK, response)
        }
        Err(e) => {
            tracing::error!("Failed to encode metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to encode metrics: {}", e),
            )
        }
    }
}
