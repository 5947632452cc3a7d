//! Prometheus metrics for module executions and authentication

use lazy_static::lazy_static;
use prometheus::{
    CounterVec, Encoder, HistogramVec, TextEncoder, register_counter_vec, register_histogram_vec,
};

lazy_static! {
    /// Module executions by outcome (`success`, `mismatch`, `error`)
    pub static ref MODULE_EXECUTIONS_TOTAL: CounterVec = register_counter_vec!(
        "pathos_module_executions_total",
        "Total number of module executions by module and outcome",
        &["module", "status"]
    )
    .unwrap();

    pub static ref MODULE_DURATION: HistogramVec = register_histogram_vec!(
        "pathos_module_duration_seconds",
        "Duration of module executions in seconds",
        &["module"],
        vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]
    )
    .unwrap();

    pub static ref AUTH_EVENTS_TOTAL: CounterVec = register_counter_vec!(
        "pathos_auth_events_total",
        "Authentication and license events",
        &["event"]
    )
    .unwrap();
}

/// Export all registered metrics in Prometheus text format
pub fn export_metrics() -> Result<String, Box<dyn std::error::Error>> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

pub fn record_execution(module: &str, status: &str, duration_secs: f64) {
    MODULE_EXECUTIONS_TOTAL
        .with_label_values(&[module, status])
        .inc();
    MODULE_DURATION
        .with_label_values(&[module])
        .observe(duration_secs);
}

pub fn record_auth_event(event: &str) {
    AUTH_EVENTS_TOTAL.with_label_values(&[event]).inc();
}
