use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus exporter and register all application metrics.
/// Returns a `PrometheusHandle` whose `render()` method produces the
/// text/plain Prometheus scrape payload.
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    // Pre-register counters so they appear even before the first increment.
    counter!("provider_requests_total").absolute(0);
    counter!("provider_request_failures_total").absolute(0);
    counter!("fixtures_upserted_total", "op" => "insert").absolute(0);
    counter!("fixtures_upserted_total", "op" => "update").absolute(0);
    counter!("fixtures_rejected_total").absolute(0);
    counter!("sync_runs_total").absolute(0);
    counter!("fixtures_closed_total").absolute(0);
    counter!("predictions_settled_total").absolute(0);
    counter!("settlement_failures_total").absolute(0);

    // Histogram is lazily created on first record; force creation.
    histogram!("settlement_run_seconds").record(0.0);

    Ok(handle)
}
