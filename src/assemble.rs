// src/assemble.rs
use chrono::{DateTime, Utc};

use crate::error::FeedError;
use crate::model::{CanonicalFeed, CanonicalItem, SourceFeed};
use crate::rss;

/// Feed-level updated timestamp: the first item's, or `now` for an empty feed.
pub fn feed_updated(items: &[CanonicalItem], now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    match items.first() {
        Some(first) => first.updated.or(first.created),
        None => Some(now),
    }
}

/// Fix up the feed-level timestamp and serialize.
pub fn finish(mut feed: CanonicalFeed) -> Result<String, FeedError> {
    feed.updated = feed_updated(&feed.items, Utc::now());
    rss::to_rss(&feed)
}

/// Output feed for items that came out of an upstream feed.
pub fn assemble(source: &SourceFeed, items: Vec<CanonicalItem>) -> Result<String, FeedError> {
    let mut feed = CanonicalFeed::header_from(source);
    feed.items = items;
    finish(feed)
}
