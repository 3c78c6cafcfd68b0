// src/extractors/gamercat.rs
use async_trait::async_trait;

use super::{ExtractContext, ItemModifier, Outcome};
use crate::error::FeedError;
use crate::model::CanonicalItem;

pub const GAMERCAT_FEED_URL: &str = "http://www.thegamercat.com/feed/";

/// Points the embedded thumbnail at the full-size image by dropping the size suffix.
pub struct GamercatModifier {
    token: &'static str,
}

impl Default for GamercatModifier {
    fn default() -> Self {
        Self { token: "-200x150" }
    }
}

impl GamercatModifier {
    pub fn rewrite(&self, content: &str) -> String {
        content.replacen(self.token, "", 1)
    }
}

#[async_trait]
impl ItemModifier for GamercatModifier {
    async fn modify(
        &self,
        _ctx: &ExtractContext,
        item: &mut CanonicalItem,
    ) -> Result<Outcome, FeedError> {
        let rewritten = self.rewrite(&item.content);
        if rewritten == item.content {
            return Ok(Outcome::Unchanged);
        }
        item.content = rewritten;
        Ok(Outcome::Mutated)
    }

    fn name(&self) -> &'static str {
        "gamercat"
    }
}
