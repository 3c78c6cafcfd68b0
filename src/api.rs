// src/api.rs
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{
        header::{CONTENT_TYPE, HOST},
        HeaderMap, StatusCode, Uri,
    },
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use metrics::counter;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::ProxyConfig;
use crate::extractors::ExtractContext;
use crate::fetch::HttpFetcher;
use crate::pipeline;
use crate::proxy;
use crate::registry::Registry;

pub const RSS_CONTENT_TYPE: &str = "application/rss+xml; charset=utf-8";

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<Registry>,
    pub http: HttpFetcher,
    pub config: Arc<ProxyConfig>,
}

impl AppState {
    /// State with the built-in site registry.
    pub fn new(config: ProxyConfig) -> anyhow::Result<Self> {
        let registry = Registry::builtin(&config);
        Self::with_registry(config, registry)
    }

    pub fn with_registry(config: ProxyConfig, registry: Registry) -> anyhow::Result<Self> {
        Ok(Self {
            http: HttpFetcher::from_config(&config)?,
            registry: Arc::new(registry),
            config: Arc::new(config),
        })
    }

    /// `<scheme>://<host>/<base>`, the prefix extractors use for proxied assets.
    /// HTTP/2 requests carry the host as `:authority`, which ends up in the URI.
    fn base_url(&self, headers: &HeaderMap, uri: &Uri, base: &str) -> String {
        let host = headers
            .get(HOST)
            .and_then(|h| h.to_str().ok())
            .or_else(|| uri.authority().map(|a| a.as_str()))
            .unwrap_or("localhost");
        format!("{}://{}/{}", self.config.public_scheme, host, base)
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/{base}/webtoons/{*path}", get(asset_proxy))
        .route("/{base}/{feed}", get(serve_feed))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

async fn serve_feed(
    State(state): State<AppState>,
    Path((base, feed)): Path<(String, String)>,
    headers: HeaderMap,
    uri: Uri,
) -> Response {
    let binding = match state.registry.get(&feed) {
        Ok(b) => b.clone(),
        Err(_) => return StatusCode::NOT_FOUND.into_response(),
    };
    counter!("feed_requests_total", "feed" => feed.clone()).increment(1);

    let ctx = Arc::new(ExtractContext {
        base: state.base_url(&headers, &uri, &base),
        http: state.http.clone(),
        item_timeout: state.config.item_timeout(),
    });

    match pipeline::run(&binding, ctx).await {
        Ok(body) => ([(CONTENT_TYPE, RSS_CONTENT_TYPE)], body).into_response(),
        Err(e) => {
            counter!("feed_request_errors_total", "kind" => e.kind()).increment(1);
            tracing::warn!(target: "feedproxy", %feed, binding = binding.kind(), error = %e, "feed request failed");
            (StatusCode::PRECONDITION_FAILED, e.to_string()).into_response()
        }
    }
}

async fn asset_proxy(
    State(state): State<AppState>,
    Path((_base, path)): Path<(String, String)>,
) -> Response {
    proxy::relay(&state.http, &state.config, &path).await
}
