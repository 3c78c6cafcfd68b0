// src/pipeline.rs
//! Runs one binding end to end: fetch, convert, enrich or filter, assemble, serialize.

use std::sync::Arc;

use crate::assemble::{assemble, finish};
use crate::error::FeedError;
use crate::extractors::{commitstrip::truncate_document, ExtractContext};
use crate::filter;
use crate::model::convert;
use crate::registry::ExtractorBinding;
use crate::transform::enrich_all;

/// Response body bytes. Serialized feeds are UTF-8; verbatim feeds keep the upstream encoding.
pub async fn run(binding: &ExtractorBinding, ctx: Arc<ExtractContext>) -> Result<Vec<u8>, FeedError> {
    match binding {
        ExtractorBinding::Modify {
            source_url,
            modifier,
        } => {
            let source = ctx.http.fetch_feed(source_url).await?;
            let items = source.items.iter().map(convert).collect();
            let items = enrich_all(items, Arc::clone(modifier), Arc::clone(&ctx)).await;
            assemble(&source, items).map(String::into_bytes)
        }
        ExtractorBinding::Filter {
            source_url,
            include,
            whitelist,
        } => {
            let source = ctx.http.fetch_feed(source_url).await?;
            let items = source.items.iter().map(convert).collect();
            let items = filter::apply(items, whitelist, *include);
            assemble(&source, items).map(String::into_bytes)
        }
        ExtractorBinding::Generate(generator) => {
            let feed = generator.generate(&ctx).await?;
            tracing::debug!(target: "feedproxy", generator = generator.name(), items = feed.items.len(), "feed generated");
            finish(feed).map(String::into_bytes)
        }
        ExtractorBinding::Verbatim {
            source_url,
            closing_tag,
        } => {
            let body = ctx.http.get_bytes(source_url).await?;
            Ok(truncate_document(&body, closing_tag))
        }
    }
}
