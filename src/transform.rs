// src/transform.rs
//! Fan-out/join over the items of one modify-style feed.
//!
//! Every item gets its own task. Results land in a slot vector allocated up
//! front, so output order is source order no matter which task finishes first.
//! A task hands back `Some(item)` only when its modifier reports a mutation;
//! errors, timeouts and panics all keep the converted item untouched.

use std::sync::Arc;

use futures::future::join_all;
use metrics::counter;

use crate::extractors::{ExtractContext, ItemModifier, Outcome};
use crate::model::CanonicalItem;

pub async fn enrich_all(
    items: Vec<CanonicalItem>,
    modifier: Arc<dyn ItemModifier>,
    ctx: Arc<ExtractContext>,
) -> Vec<CanonicalItem> {
    let mut slots = items;

    let handles: Vec<_> = slots
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let draft = item.clone();
            let modifier = Arc::clone(&modifier);
            let ctx = Arc::clone(&ctx);
            tokio::spawn(async move { enrich_one(index, draft, modifier.as_ref(), &ctx).await })
        })
        .collect();

    // counting join: wait for every task, not just the first failure
    let results = join_all(handles).await;

    for (index, (slot, res)) in slots.iter_mut().zip(results).enumerate() {
        match res {
            Ok(Some(mutated)) => *slot = mutated,
            Ok(None) => {}
            Err(e) => {
                counter!("feed_items_enrich_failed_total").increment(1);
                tracing::warn!(target: "feedproxy", index, error = %e, "enrichment task aborted");
            }
        }
    }

    slots
}

async fn enrich_one(
    index: usize,
    mut draft: CanonicalItem,
    modifier: &dyn ItemModifier,
    ctx: &ExtractContext,
) -> Option<CanonicalItem> {
    let res = tokio::time::timeout(ctx.item_timeout, modifier.modify(ctx, &mut draft)).await;
    match res {
        Ok(Ok(Outcome::Mutated)) => Some(draft),
        Ok(Ok(Outcome::Unchanged)) => None,
        Ok(Err(e)) => {
            counter!("feed_items_enrich_failed_total").increment(1);
            tracing::debug!(
                target: "feedproxy",
                extractor = modifier.name(),
                index,
                link = %draft.link,
                error = %e,
                "item left unchanged"
            );
            None
        }
        Err(_elapsed) => {
            counter!("feed_items_enrich_failed_total").increment(1);
            tracing::warn!(
                target: "feedproxy",
                extractor = modifier.name(),
                index,
                timeout_ms = ctx.item_timeout.as_millis() as u64,
                "item enrichment timed out"
            );
            None
        }
    }
}
