// src/proxy.rs
//! Relay for images whose host only serves them to an approved referrer.

use axum::body::Body;
use axum::http::{header::CONTENT_TYPE, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use metrics::counter;

use crate::config::ProxyConfig;
use crate::fetch::HttpFetcher;

pub fn upstream_url(cfg: &ProxyConfig, path: &str) -> String {
    format!("{}/{}", cfg.asset_origin, path.trim_start_matches('/'))
}

/// Fetch `path` from the asset origin and stream the body back untouched.
/// Upstream status and content type are passed through as-is; a local transport
/// failure answers 502 with an empty body.
pub async fn relay(http: &HttpFetcher, cfg: &ProxyConfig, path: &str) -> Response {
    counter!("asset_proxy_requests_total").increment(1);
    let url = upstream_url(cfg, path);

    let upstream = match http.get_with_referer(&url, &cfg.asset_referer).await {
        Ok(resp) => resp,
        Err(e) => {
            counter!("asset_proxy_errors_total").increment(1);
            tracing::warn!(target: "feedproxy", %url, error = %e, "asset proxy upstream failed");
            return StatusCode::BAD_GATEWAY.into_response();
        }
    };

    let status = StatusCode::from_u16(upstream.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
    let content_type = upstream
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| HeaderValue::from_bytes(v.as_bytes()).ok());

    let mut resp = Response::new(Body::from_stream(upstream.bytes_stream()));
    *resp.status_mut() = status;
    if let Some(ct) = content_type {
        resp.headers_mut().insert(CONTENT_TYPE, ct);
    }
    resp
}
