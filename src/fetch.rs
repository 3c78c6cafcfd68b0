// src/fetch.rs
//! Upstream HTTP access. One `reqwest::Client` is shared by the whole process;
//! every call is bounded by the configured upstream timeout.

use anyhow::Context;
use metrics::{counter, histogram};
use axum::body::Bytes;
use reqwest::header::{COOKIE, REFERER};
use reqwest::{RequestBuilder, Response};

use crate::config::ProxyConfig;
use crate::error::FeedError;
use crate::model::SourceFeed;

#[derive(Clone, Debug)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn from_config(cfg: &ProxyConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(cfg.upstream_timeout())
            .user_agent(cfg.user_agent.as_str())
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .context("building upstream http client")?;
        Ok(Self { client })
    }

    /// GET `url` and return the body as text. Non-2xx answers are errors.
    pub async fn get_text(&self, url: &str) -> Result<String, FeedError> {
        let resp = self.send_checked(self.client.get(url), url).await?;
        read_text(resp, url).await
    }

    /// GET `url` and return the raw body, no charset decoding.
    pub async fn get_bytes(&self, url: &str) -> Result<Bytes, FeedError> {
        let resp = self.send_checked(self.client.get(url), url).await?;
        resp.bytes().await.map_err(|source| FeedError::UpstreamFetch {
            url: url.to_string(),
            source,
        })
    }

    /// Same as [`get_text`](Self::get_text) but carrying one fixed cookie.
    pub async fn get_text_with_cookie(&self, url: &str, cookie: &str) -> Result<String, FeedError> {
        let req = self.client.get(url).header(COOKIE, cookie);
        let resp = self.send_checked(req, url).await?;
        read_text(resp, url).await
    }

    /// Fetch and parse an RSS/Atom document.
    pub async fn fetch_feed(&self, url: &str) -> Result<SourceFeed, FeedError> {
        let bytes = self.get_bytes(url).await?;
        let parsed = feed_rs::parser::parse(bytes.as_ref())
            .map_err(|e| FeedError::Parse(format!("feed {url}: {e}")))?;
        Ok(SourceFeed::from(parsed))
    }

    /// GET with an overridden referrer; the response is returned whatever its status.
    pub async fn get_with_referer(&self, url: &str, referer: &str) -> Result<Response, FeedError> {
        let req = self.client.get(url).header(REFERER, referer);
        self.send(req, url).await
    }

    async fn send(&self, req: RequestBuilder, url: &str) -> Result<Response, FeedError> {
        let t0 = std::time::Instant::now();
        let res = req.send().await;
        histogram!("upstream_fetch_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);

        res.map_err(|source| {
            counter!("upstream_fetch_errors_total").increment(1);
            tracing::debug!(target: "feedproxy", %url, error = %source, "upstream transport error");
            FeedError::UpstreamFetch {
                url: url.to_string(),
                source,
            }
        })
    }

    async fn send_checked(&self, req: RequestBuilder, url: &str) -> Result<Response, FeedError> {
        let resp = self.send(req, url).await?;
        let status = resp.status();
        if !status.is_success() {
            counter!("upstream_fetch_errors_total").increment(1);
            return Err(FeedError::UpstreamStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(resp)
    }
}

async fn read_text(resp: Response, url: &str) -> Result<String, FeedError> {
    resp.text().await.map_err(|source| FeedError::UpstreamFetch {
        url: url.to_string(),
        source,
    })
}
