// src/extractors/dilbert.rs
//! Comic-detail scraper: follows each item link, takes the strip title and image
//! from the detail page and replaces the item body with the bare image.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use super::{img_tag, ExtractContext, ItemModifier, Outcome};
use crate::error::FeedError;
use crate::model::CanonicalItem;

pub const DILBERT_FEED_URL: &str = "http://dilbert.com/feed";

static TITLE_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("span.comic-title-name").expect("comic title selector"));
static IMAGE_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("img.img-comic").expect("comic image selector"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComicDetail {
    pub name: String,
    pub image: String,
}

/// Pull the strip name and image URL out of a detail page.
pub fn parse_detail_page(html: &str) -> Result<ComicDetail, FeedError> {
    let doc = Html::parse_document(html);

    // Untitled strips have no name span, or an empty one.
    let name = doc
        .select(&TITLE_SEL)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .unwrap_or_default();

    let image = doc
        .select(&IMAGE_SEL)
        .next()
        .and_then(|el| el.value().attr("src"))
        .map(str::to_string)
        .ok_or_else(|| FeedError::Extract("comic image element missing".into()))?;

    Ok(ComicDetail { name, image })
}

#[derive(Default)]
pub struct DilbertModifier;

impl DilbertModifier {
    fn apply(detail: &ComicDetail, item: &mut CanonicalItem) {
        if !detail.name.is_empty() {
            item.title = format!("{} - {}", item.title, detail.name);
        }
        let alt = format!("{} - Dilbert by Scott Adams", detail.name);
        item.content = img_tag(&[("alt", &alt), ("src", &detail.image)]);
    }
}

#[async_trait]
impl ItemModifier for DilbertModifier {
    async fn modify(
        &self,
        ctx: &ExtractContext,
        item: &mut CanonicalItem,
    ) -> Result<Outcome, FeedError> {
        let page = ctx.http.get_text(&item.link).await?;
        let detail = parse_detail_page(&page)?;
        Self::apply(&detail, item);
        Ok(Outcome::Mutated)
    }

    fn name(&self) -> &'static str {
        "dilbert"
    }
}
