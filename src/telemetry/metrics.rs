//! Prometheus recorder and metric descriptions

use anyhow::Context;
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus recorder and return a handle for rendering metrics.
pub fn install_prometheus_recorder() -> anyhow::Result<PrometheusHandle> {
    let buckets = [
        0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
    ];

    PrometheusBuilder::new()
        .set_buckets(&buckets)
        .context("failed to set histogram buckets")?
        .install_recorder()
        .context("failed to install Prometheus recorder")
}

/// Register metric descriptions so HELP/TYPE lines appear from startup.
pub fn describe_metrics() {
    describe_counter!("portal_http_requests_total", "Total number of HTTP requests");
    describe_histogram!(
        "portal_http_request_duration_seconds",
        "HTTP request duration in seconds"
    );
    describe_gauge!(
        "portal_http_requests_in_flight",
        "Number of HTTP requests currently being processed"
    );

    describe_counter!(
        "portal_policy_decisions_total",
        "Row policy evaluations by table, operation and outcome"
    );
    describe_counter!(
        "portal_hook_deliveries_total",
        "Identity lifecycle hook deliveries by hook and result"
    );

    gauge!("portal_http_requests_in_flight").set(0.0);
    counter!(
        "portal_policy_decisions_total",
        "table" => "users",
        "operation" => "select",
        "outcome" => "deny"
    )
    .absolute(0);
    counter!(
        "portal_hook_deliveries_total",
        "hook" => "identity_created",
        "result" => "ok"
    )
    .absolute(0);
}
