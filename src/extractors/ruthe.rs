// src/extractors/ruthe.rs
use async_trait::async_trait;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use super::{img_tag, midnight_utc, title_date, ExtractContext, FeedGenerator};
use crate::error::FeedError;
use crate::model::{CanonicalFeed, CanonicalItem};

pub const RUTHE_ARCHIVE_URL: &str = "https://ruthe.de/archiv/0/datum/asc/";

const THUMB_PREFIX: &str = "/cartoons/tn_strip_";
const THUMB_SUFFIX: &str = ".jpg";
const CAPTION_MARKER: &str = "eingestellt: ";
const CAPTION_DATE_FMT: &str = "%d.%m.'%y";

static ENTRY_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("#archiv_inner li").expect("archive entry selector"));
static IMG_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("img").expect("img selector"));

/// Builds the feed from the archive listing, one item per archive entry.
pub struct RutheGenerator {
    archive_url: String,
}

impl Default for RutheGenerator {
    fn default() -> Self {
        Self::new(RUTHE_ARCHIVE_URL)
    }
}

impl RutheGenerator {
    pub fn new(archive_url: &str) -> Self {
        Self {
            archive_url: archive_url.to_string(),
        }
    }
}

pub fn parse_archive(html: &str) -> Result<CanonicalFeed, FeedError> {
    let doc = Html::parse_document(html);
    let mut feed = CanonicalFeed::generated("Ruthe Comics", "http://ruthe.de");

    for entry in doc.select(&ENTRY_SEL) {
        let thumb = entry
            .select(&IMG_SEL)
            .next()
            .and_then(|img| img.value().attr("src"))
            .ok_or_else(|| FeedError::Extract("archive entry without thumbnail".into()))?;
        let id = thumb
            .replacen(THUMB_PREFIX, "", 1)
            .replacen(THUMB_SUFFIX, "", 1);

        let caption = entry.text().collect::<String>();
        let date = caption
            .split_once(CAPTION_MARKER)
            .and_then(|(_, rest)| rest.split_whitespace().next())
            .and_then(|raw| NaiveDate::parse_from_str(raw, CAPTION_DATE_FMT).ok())
            .and_then(midnight_utc);
        if date.is_none() {
            tracing::debug!(target: "feedproxy", %id, "ruthe entry without usable date");
        }

        let title = match date {
            Some(d) => format!("Comic vom {}", title_date(d)),
            None => format!("Comic {id}"),
        };
        let src = format!("https://ruthe.de/cartoons/strip_{id}.jpg");

        feed.items.push(CanonicalItem {
            title,
            link: format!("https://ruthe.de/cartoon/{id}/"),
            content: img_tag(&[
                ("alt", "Comic"),
                ("class", "img-responsive img-comic"),
                ("height", "300"),
                ("src", &src),
            ]),
            id,
            updated: date,
            ..CanonicalItem::default()
        });
    }

    if feed.items.is_empty() {
        return Err(FeedError::Extract("archive page has no entries".into()));
    }
    Ok(feed)
}

#[async_trait]
impl FeedGenerator for RutheGenerator {
    async fn generate(&self, ctx: &ExtractContext) -> Result<CanonicalFeed, FeedError> {
        let page = ctx.http.get_text(&self.archive_url).await?;
        parse_archive(&page)
    }

    fn name(&self) -> &'static str {
        "ruthe"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    const ARCHIVE: &str = include_str!("../../tests/fixtures/ruthe_archive.html");

    #[test]
    fn archive_entries_become_items_in_document_order() {
        let feed = parse_archive(ARCHIVE).unwrap();
        assert_eq!(feed.title, "Ruthe Comics");
        assert_eq!(feed.items.len(), 3);

        let first = &feed.items[0];
        assert_eq!(first.id, "1");
        assert_eq!(first.title, "Comic vom 27.05.2005");
        assert_eq!(first.link, "https://ruthe.de/cartoon/1/");
        assert_eq!(
            first.updated,
            Some(Utc.with_ymd_and_hms(2005, 5, 27, 0, 0, 0).unwrap())
        );
        assert_eq!(
            first.content,
            r#"<img alt="Comic" class="img-responsive img-comic" height="300" src="https://ruthe.de/cartoons/strip_1.jpg">"#
        );

        let ids: Vec<_> = feed.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn entry_with_bad_caption_keeps_item_without_date() {
        let feed = parse_archive(ARCHIVE).unwrap();
        let last = &feed.items[2];
        assert!(last.updated.is_none());
        assert_eq!(last.title, "Comic 3");
    }

    #[test]
    fn entry_without_thumbnail_fails_the_feed() {
        let html = r#"<div id="archiv_inner"><ul><li>eingestellt: 27.05.'05</li></ul></div>"#;
        assert!(matches!(parse_archive(html), Err(FeedError::Extract(_))));
    }

    #[test]
    fn archive_without_entries_is_an_extract_error() {
        let page = "<html><body><p>Wartungsarbeiten</p></body></html>";
        assert!(matches!(parse_archive(page), Err(FeedError::Extract(_))));

        let empty_list = r#"<div id="archiv_inner"><ul></ul></div>"#;
        assert!(matches!(parse_archive(empty_list), Err(FeedError::Extract(_))));
    }
}
