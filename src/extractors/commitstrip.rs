// src/extractors/commitstrip.rs
//! The upstream feed is served as-is, minus anything after the root element.
//! This never goes through the canonical item model.

pub const COMMITSTRIP_FEED_URL: &str = "https://www.commitstrip.com/en/feed/";
pub const RSS_CLOSING_TAG: &str = "</rss>";

/// Keep every byte before the first `closing_tag` and close the document again.
/// Works on raw bytes so the upstream encoding is never touched.
pub fn truncate_document(body: &[u8], closing_tag: &str) -> Vec<u8> {
    let tag = closing_tag.as_bytes();
    let end = body
        .windows(tag.len())
        .position(|w| w == tag)
        .unwrap_or(body.len());
    let mut out = Vec::with_capacity(end + tag.len());
    out.extend_from_slice(&body[..end]);
    out.extend_from_slice(tag);
    out
}
