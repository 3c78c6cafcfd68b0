// src/extractors/nichtlustig.rs
//! The cartoon index ships as a JavaScript array literal inside a `<script>`
//! block. We cut it out, massage it into JSON and build the feed from the newest
//! records.

use async_trait::async_trait;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use super::{img_tag, midnight_utc, title_date, ExtractContext, FeedGenerator};
use crate::error::FeedError;
use crate::model::{CanonicalFeed, CanonicalItem};

pub const NICHTLUSTIG_PAGE_URL: &str = "https://joscha.com/nichtlustig/";

const BLOB_MARKER: &str = "var cartoonList = ";
const BLOB_TERMINATOR: &str = "; </script>";
const MEDIA_ROOT: &str = "https://joscha.com/data/media/cartoons/";
const SLUG_DATE_FMT: &str = "%y%m%d";
pub const FEED_LEN: usize = 20;

static TRAILING_COMMA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",\s*([\]}])").expect("trailing comma regex"));

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CartoonRecord {
    pub slug: String,
    pub image: String,
    /// Some records carry `null` here.
    #[serde(default)]
    pub bonus_image: Option<String>,
    #[serde(default)]
    pub public_bonus: bool,
    pub title: String,
}

/// Locate the array literal and turn it into strict JSON.
pub fn repair_blob(page: &str) -> Result<String, FeedError> {
    let (_, rest) = page
        .split_once(BLOB_MARKER)
        .ok_or_else(|| FeedError::DataRepair(format!("marker `{BLOB_MARKER}` not found")))?;
    let literal = rest
        .split_once(BLOB_TERMINATOR)
        .map(|(blob, _)| blob)
        .unwrap_or(rest);

    let quoted = literal.replace('\'', "\"");
    Ok(TRAILING_COMMA.replace_all(&quoted, "$1").into_owned())
}

pub fn parse_records(page: &str) -> Result<Vec<CartoonRecord>, FeedError> {
    let json = repair_blob(page)?;
    let records: Vec<CartoonRecord> = serde_json::from_str(&json)
        .map_err(|e| FeedError::DataRepair(format!("cartoon list is not valid JSON: {e}")))?;
    if records.len() < FEED_LEN {
        return Err(FeedError::DataRepair(format!(
            "expected at least {FEED_LEN} cartoons, found {}",
            records.len()
        )));
    }
    Ok(records)
}

fn record_to_item(rec: &CartoonRecord) -> CanonicalItem {
    let date = NaiveDate::parse_from_str(&rec.slug, SLUG_DATE_FMT)
        .ok()
        .and_then(midnight_utc);

    let main_src = format!("{MEDIA_ROOT}{}", rec.image);
    let mut content = img_tag(&[("alt", &rec.title), ("src", &main_src)]);
    if rec.public_bonus {
        let bonus_alt = format!("BonusCartoon for {}", rec.title);
        let bonus_src = format!(
            "{MEDIA_ROOT}bonus/{}",
            rec.bonus_image.as_deref().unwrap_or_default()
        );
        content.push_str(&img_tag(&[("alt", &bonus_alt), ("src", &bonus_src)]));
    }

    let day = date.map(title_date).unwrap_or_else(|| rec.slug.clone());
    CanonicalItem {
        title: format!("NichtLustig Cartoon vom {day} - {}", rec.title),
        content,
        link: format!("https://joscha.com/nichtlustig/{}/", rec.slug),
        id: rec.slug.clone(),
        updated: date,
        ..CanonicalItem::default()
    }
}

pub fn build_feed(page: &str) -> Result<CanonicalFeed, FeedError> {
    let records = parse_records(page)?;
    let mut feed =
        CanonicalFeed::generated("Nicht Lustig Cartoons", "https://joscha.com/nichtlustig");
    feed.items = records.iter().take(FEED_LEN).map(record_to_item).collect();
    Ok(feed)
}

pub struct NichtlustigGenerator {
    page_url: String,
}

impl Default for NichtlustigGenerator {
    fn default() -> Self {
        Self::new(NICHTLUSTIG_PAGE_URL)
    }
}

impl NichtlustigGenerator {
    pub fn new(page_url: &str) -> Self {
        Self {
            page_url: page_url.to_string(),
        }
    }
}

#[async_trait]
impl FeedGenerator for NichtlustigGenerator {
    async fn generate(&self, ctx: &ExtractContext) -> Result<CanonicalFeed, FeedError> {
        let page = ctx.http.get_text(&self.page_url).await?;
        build_feed(&page)
    }

    fn name(&self) -> &'static str {
        "nichtlustig"
    }
}
