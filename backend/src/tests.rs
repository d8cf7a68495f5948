//! Tests for the server bootstrap helpers.

#[cfg(feature = "metrics")]
use super::initialize_metrics;
#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetricsBuilder;

#[cfg(feature = "metrics")]
#[test]
fn initialize_metrics_returns_none_on_error() {
    let metrics = initialize_metrics(|| -> Result<_, &str> { Err("boom") });
    assert!(metrics.is_none(), "expected metrics to be absent on error");
}

#[cfg(feature = "metrics")]
#[test]
fn initialize_metrics_returns_metrics_on_success() {
    let metrics = initialize_metrics(|| {
        PrometheusMetricsBuilder::new("personnel_bootstrap")
            .endpoint("/metrics")
            .build()
    });
    assert!(metrics.is_some(), "expected metrics on success");
}
