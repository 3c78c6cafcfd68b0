// src/extractors/mod.rs
//! Site-specific strategies.
//!
//! Two capabilities: [`ItemModifier`] rewrites one already-converted item of an
//! upstream feed, [`FeedGenerator`] synthesizes a whole feed from a page that is
//! not a feed. HTML is always parsed inside a plain (non-async) helper so the
//! `scraper` document never lives across an await point.

pub mod commitstrip;
pub mod dilbert;
pub mod gamercat;
pub mod littlebobby;
pub mod nichtlustig;
pub mod ruthe;
pub mod webtoons;

use std::borrow::Cow;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::error::FeedError;
use crate::fetch::HttpFetcher;
use crate::model::{CanonicalFeed, CanonicalItem};

/// Per-request values every extractor may need.
#[derive(Clone, Debug)]
pub struct ExtractContext {
    /// `<scheme>://<host>/<base>`, prefix for asset-proxy URLs.
    pub base: String,
    pub http: HttpFetcher,
    pub item_timeout: Duration,
}

/// What a modifier did to its item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Mutated,
    Unchanged,
}

#[async_trait]
pub trait ItemModifier: Send + Sync {
    /// Rewrite `item` in place. The caller hands in a scratch copy and discards it
    /// unless `Ok(Outcome::Mutated)` comes back, so partial writes before an error are harmless.
    async fn modify(&self, ctx: &ExtractContext, item: &mut CanonicalItem)
        -> Result<Outcome, FeedError>;
    fn name(&self) -> &'static str;
}

#[async_trait]
pub trait FeedGenerator: Send + Sync {
    async fn generate(&self, ctx: &ExtractContext) -> Result<CanonicalFeed, FeedError>;
    fn name(&self) -> &'static str;
}

/* ----------------------------
Shared markup helpers
---------------------------- */

pub(crate) fn attr(s: &str) -> Cow<'_, str> {
    html_escape::encode_double_quoted_attribute(s)
}

/// `<img>` tag with the given attributes, values escaped.
pub(crate) fn img_tag(attrs: &[(&str, &str)]) -> String {
    let mut out = String::from("<img");
    for (k, v) in attrs {
        out.push(' ');
        out.push_str(k);
        out.push_str("=\"");
        out.push_str(&attr(v));
        out.push('"');
    }
    out.push('>');
    out
}

pub(crate) fn midnight_utc(d: NaiveDate) -> Option<DateTime<Utc>> {
    d.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc())
}

/// `dd.mm.yyyy`, the date style used in generated item titles.
pub(crate) fn title_date(d: DateTime<Utc>) -> String {
    d.format("%d.%m.%Y").to_string()
}
