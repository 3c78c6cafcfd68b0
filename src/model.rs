// src/model.rs
//! Item/feed shapes shared by every extractor.
//!
//! `Source*` values come out of the upstream feed parser and are never touched
//! again; `Canonical*` values are what extractors mutate or synthesize and what
//! the assembler serializes.

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Author {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceItem {
    pub title: String,
    pub content: String,
    pub link: String,
    pub guid: String,
    pub author: Option<Author>,
    pub published: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceFeed {
    pub title: String,
    pub link: String,
    pub description: String,
    pub copyright: String,
    pub author: Option<Author>,
    pub items: Vec<SourceItem>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CanonicalItem {
    pub title: String,
    /// HTML fragment.
    pub content: String,
    pub link: String,
    pub id: String,
    pub author: Option<Author>,
    pub created: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CanonicalFeed {
    pub title: String,
    pub link: String,
    pub description: String,
    pub copyright: String,
    pub author: Option<Author>,
    pub items: Vec<CanonicalItem>,
    pub updated: Option<DateTime<Utc>>,
}

impl CanonicalFeed {
    /// Feed-level metadata copied from the upstream feed, with no items yet.
    pub fn header_from(source: &SourceFeed) -> Self {
        Self {
            title: source.title.clone(),
            link: source.link.clone(),
            description: source.description.clone(),
            copyright: source.copyright.clone(),
            author: source.author.clone(),
            items: Vec::new(),
            updated: None,
        }
    }

    /// Header for a feed synthesized from a non-feed source.
    pub fn generated(title: &str, link: &str) -> Self {
        Self {
            title: title.to_string(),
            link: link.to_string(),
            ..Self::default()
        }
    }
}

/// Total conversion of an upstream item into the canonical shape.
pub fn convert(src: &SourceItem) -> CanonicalItem {
    CanonicalItem {
        title: src.title.clone(),
        content: src.content.clone(),
        link: src.link.clone(),
        id: src.guid.clone(),
        author: src.author.clone(),
        created: src.published,
        updated: src.updated.or(src.published),
    }
}

/* ----------------------------
feed-rs -> SourceFeed
---------------------------- */

fn person_to_author(p: &feed_rs::model::Person) -> Author {
    Author {
        name: p.name.clone(),
        email: p.email.clone().unwrap_or_default(),
    }
}

fn text_or_empty(t: Option<&feed_rs::model::Text>) -> String {
    t.map(|t| t.content.clone()).unwrap_or_default()
}

impl From<feed_rs::model::Entry> for SourceItem {
    fn from(e: feed_rs::model::Entry) -> Self {
        // Prefer the full body; fall back to the summary for RSS feeds that only carry <description>.
        let content = e
            .content
            .as_ref()
            .and_then(|c| c.body.clone())
            .unwrap_or_else(|| text_or_empty(e.summary.as_ref()));

        Self {
            title: text_or_empty(e.title.as_ref()),
            content,
            link: e.links.first().map(|l| l.href.clone()).unwrap_or_default(),
            guid: e.id,
            author: e.authors.first().map(person_to_author),
            published: e.published,
            updated: e.updated,
        }
    }
}

impl From<feed_rs::model::Feed> for SourceFeed {
    fn from(f: feed_rs::model::Feed) -> Self {
        Self {
            title: text_or_empty(f.title.as_ref()),
            link: f.links.first().map(|l| l.href.clone()).unwrap_or_default(),
            description: text_or_empty(f.description.as_ref()),
            copyright: text_or_empty(f.rights.as_ref()),
            author: f.authors.first().map(person_to_author),
            items: f.entries.into_iter().map(SourceItem::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn convert_copies_fields_and_published_timestamp() {
        let published = Utc.with_ymd_and_hms(2020, 1, 2, 0, 0, 0).unwrap();
        let src = SourceItem {
            title: "T".into(),
            content: "<p>c</p>".into(),
            link: "https://x/y".into(),
            guid: "g1".into(),
            author: Some(Author {
                name: "A".into(),
                email: "a@x".into(),
            }),
            published: Some(published),
            updated: None,
        };

        let item = convert(&src);
        assert_eq!(item.title, "T");
        assert_eq!(item.content, "<p>c</p>");
        assert_eq!(item.link, "https://x/y");
        assert_eq!(item.id, "g1");
        assert_eq!(item.created, Some(published));
        assert_eq!(item.updated, Some(published));

        let author = item.author.expect("author copied");
        assert_eq!(author.name, "A");
        assert_eq!(author.email, "a@x", "email must come from the email field");
    }

    #[test]
    fn convert_without_dates_leaves_them_unset() {
        let item = convert(&SourceItem {
            title: "x".into(),
            ..SourceItem::default()
        });
        assert!(item.created.is_none());
        assert!(item.updated.is_none());
        assert!(item.author.is_none());
    }

    #[test]
    fn convert_prefers_explicit_updated_timestamp() {
        let published = Utc.with_ymd_and_hms(2021, 5, 1, 8, 0, 0).unwrap();
        let updated = Utc.with_ymd_and_hms(2021, 5, 3, 9, 30, 0).unwrap();
        let item = convert(&SourceItem {
            published: Some(published),
            updated: Some(updated),
            ..SourceItem::default()
        });
        assert_eq!(item.created, Some(published));
        assert_eq!(item.updated, Some(updated));
    }

    #[test]
    fn feed_rs_rss_maps_into_source_feed() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Cats</title>
    <link>https://cats.example/</link>
    <description>Daily cats</description>
    <copyright>(c) cats</copyright>
    <item>
      <title>First</title>
      <link>https://cats.example/1</link>
      <guid>cat-1</guid>
      <description>&lt;img src="a-200x150.png"&gt;</description>
      <pubDate>Thu, 02 Jan 2020 00:00:00 +0000</pubDate>
    </item>
  </channel>
</rss>"#;
        let parsed = feed_rs::parser::parse(xml.as_bytes()).expect("fixture parses");
        let feed = SourceFeed::from(parsed);

        assert_eq!(feed.title, "Cats");
        assert_eq!(feed.description, "Daily cats");
        assert_eq!(feed.copyright, "(c) cats");
        assert_eq!(feed.items.len(), 1);

        let it = &feed.items[0];
        assert_eq!(it.title, "First");
        assert_eq!(it.link, "https://cats.example/1");
        assert_eq!(it.guid, "cat-1");
        assert_eq!(it.content, r#"<img src="a-200x150.png">"#);
        assert_eq!(
            it.published,
            Some(Utc.with_ymd_and_hms(2020, 1, 2, 0, 0, 0).unwrap())
        );
    }
}
