// src/error.rs
//! Request-level error taxonomy. The `Display` text of every variant is what
//! callers receive as the body of a `412` response.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    /// Network/transport failure fetching a feed or page.
    #[error("fetching {url} failed: {source}")]
    UpstreamFetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// Upstream answered, but not with a 2xx status.
    #[error("fetching {url} failed: HTTP {status}")]
    UpstreamStatus { url: String, status: u16 },
    /// Malformed feed or HTML.
    #[error("parse error: {0}")]
    Parse(String),
    /// A selector or attribute the generator relies on is missing.
    #[error("extract error: {0}")]
    Extract(String),
    /// Embedded JSON blob could not be repaired, or holds too few records.
    #[error("data repair error: {0}")]
    DataRepair(String),
    #[error("serialize error: {0}")]
    Serialize(String),
    #[error("unknown feed `{0}`")]
    UnknownFeed(String),
    /// Link has fewer than four `/`-delimited parts.
    #[error("link `{0}` has no path segment to filter on")]
    Index(String),
}

impl FeedError {
    pub(crate) fn serialize<E: std::fmt::Display>(e: E) -> Self {
        FeedError::Serialize(e.to_string())
    }

    /// Short stable label used as a metrics/log field.
    pub fn kind(&self) -> &'static str {
        match self {
            FeedError::UpstreamFetch { .. } | FeedError::UpstreamStatus { .. } => "upstream",
            FeedError::Parse(_) => "parse",
            FeedError::Extract(_) => "extract",
            FeedError::DataRepair(_) => "data_repair",
            FeedError::Serialize(_) => "serialize",
            FeedError::UnknownFeed(_) => "unknown_feed",
            FeedError::Index(_) => "index",
        }
    }
}
