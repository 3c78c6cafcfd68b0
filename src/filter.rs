// src/filter.rs
//! Path-segment allow/block lists for section feeds.
//!
//! The segment is everything after the host: `https://www.heise.de/security/meldung/x`
//! splits into at most four `/`-parts and the fourth, `security/meldung/x`, is what
//! whitelist prefixes are matched against.

use metrics::counter;

use crate::error::FeedError;
use crate::model::CanonicalItem;

/// `true` if any whitelist entry is a prefix of `segment`. Case-sensitive, no normalization.
pub fn matches<S: AsRef<str>>(segment: &str, whitelist: &[S]) -> bool {
    whitelist.iter().any(|w| segment.starts_with(w.as_ref()))
}

/// Fourth `/`-delimited part of `link`.
pub fn path_area(link: &str) -> Result<&str, FeedError> {
    link.splitn(4, '/')
        .nth(3)
        .ok_or_else(|| FeedError::Index(link.to_string()))
}

/// Whether an item with this link is kept. `include == true` makes the whitelist an
/// allow-list, `false` a block-list.
pub fn retains<S: AsRef<str>>(link: &str, whitelist: &[S], include: bool) -> Result<bool, FeedError> {
    Ok(matches(path_area(link)?, whitelist) == include)
}

/// Keep matching items in their original order. Items whose link has no path
/// segment are dropped whatever the include flag says.
pub fn apply<S: AsRef<str>>(
    items: Vec<CanonicalItem>,
    whitelist: &[S],
    include: bool,
) -> Vec<CanonicalItem> {
    let total = items.len();
    let kept: Vec<CanonicalItem> = items
        .into_iter()
        .filter(|it| match retains(&it.link, whitelist, include) {
            Ok(keep) => keep,
            Err(e) => {
                tracing::warn!(target: "feedproxy", error = %e, "dropping item without path segment");
                false
            }
        })
        .collect();

    counter!("feed_items_filtered_total").increment((total - kept.len()) as u64);
    kept
}
