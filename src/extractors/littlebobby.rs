// src/extractors/littlebobby.rs
use async_trait::async_trait;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use super::{img_tag, midnight_utc, title_date, ExtractContext, FeedGenerator};
use crate::error::FeedError;
use crate::model::{CanonicalFeed, CanonicalItem};

pub const LITTLEBOBBY_ARCHIVE_URL: &str = "https://www.littlebobbycomic.com/archive/";

const THUMB_SIZE_TOKEN: &str = "-480x270";
const ARCHIVE_DATE_FMT: &str = "%B %d, %Y";

static ENTRY_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.project-img-wrap a").expect("archive anchor selector"));
static IMG_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("img").expect("img selector"));

fn element_text(el: &ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// One anchor per week: `<a href><img src><h3>week</h3>...<span>date</span></a>`.
pub fn parse_archive(html: &str) -> Result<CanonicalFeed, FeedError> {
    let doc = Html::parse_document(html);
    let mut feed = CanonicalFeed::generated("Little Bobby", "https://www.littlebobbycomic.com");

    for anchor in doc.select(&ENTRY_SEL) {
        let link = anchor.value().attr("href").unwrap_or_default().to_string();

        let image = anchor
            .select(&IMG_SEL)
            .next()
            .and_then(|img| img.value().attr("src"))
            .map(|src| src.replacen(THUMB_SIZE_TOKEN, "", 1))
            .ok_or_else(|| FeedError::Extract(format!("archive entry {link} has no image")))?;

        let children: Vec<ElementRef<'_>> = anchor.children().filter_map(ElementRef::wrap).collect();
        let week = children.get(1).map(element_text).unwrap_or_default();
        let raw_date = children.last().map(element_text).unwrap_or_default();

        let date = match NaiveDate::parse_from_str(&raw_date, ARCHIVE_DATE_FMT) {
            Ok(d) => midnight_utc(d),
            Err(e) => {
                tracing::warn!(target: "feedproxy", %link, raw = %raw_date, error = %e, "littlebobby date unparseable");
                None
            }
        };
        let day = date.map(title_date).unwrap_or_default();

        feed.items.push(CanonicalItem {
            title: format!("LittleBobbyComic for {week} ({day})"),
            content: img_tag(&[("alt", "Comic"), ("height", "300"), ("src", &image)]),
            link,
            id: week,
            updated: date,
            ..CanonicalItem::default()
        });
    }

    if feed.items.is_empty() {
        return Err(FeedError::Extract("archive page has no entries".into()));
    }
    Ok(feed)
}

pub struct LittlebobbyGenerator {
    archive_url: String,
}

impl Default for LittlebobbyGenerator {
    fn default() -> Self {
        Self::new(LITTLEBOBBY_ARCHIVE_URL)
    }
}

impl LittlebobbyGenerator {
    pub fn new(archive_url: &str) -> Self {
        Self {
            archive_url: archive_url.to_string(),
        }
    }
}

#[async_trait]
impl FeedGenerator for LittlebobbyGenerator {
    async fn generate(&self, ctx: &ExtractContext) -> Result<CanonicalFeed, FeedError> {
        let page = ctx.http.get_text(&self.archive_url).await?;
        parse_archive(&page)
    }

    fn name(&self) -> &'static str {
        "littlebobby"
    }
}
