// src/metrics.rs
use anyhow::Context;
use axum::{routing::get, Router};
use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

/// One-time metrics registration (so series show up on /metrics).
pub fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("feed_requests_total", "Feed requests by feed id.");
        describe_counter!(
            "feed_request_errors_total",
            "Feed requests answered with 412, by error kind."
        );
        describe_counter!(
            "feed_items_enrich_failed_total",
            "Items left unchanged because enrichment failed or timed out."
        );
        describe_counter!(
            "feed_items_filtered_total",
            "Items dropped by path filters."
        );
        describe_counter!("asset_proxy_requests_total", "Proxied asset requests.");
        describe_counter!(
            "asset_proxy_errors_total",
            "Proxied asset requests that failed locally."
        );
        describe_counter!(
            "upstream_fetch_errors_total",
            "Upstream fetches that failed or returned non-2xx."
        );
        describe_histogram!("upstream_fetch_ms", "Upstream response time in milliseconds.");
    });
}

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the process-wide Prometheus recorder. Call once.
    pub fn init() -> anyhow::Result<Self> {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("prometheus: install recorder")?;
        ensure_metrics_described();
        Ok(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router<S>(&self) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}
