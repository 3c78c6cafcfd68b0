// src/rss.rs
//! RSS 2.0 writer for [`CanonicalFeed`].

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::FeedError;
use crate::model::{Author, CanonicalFeed, CanonicalItem};

type XmlWriter = Writer<Vec<u8>>;

fn write_event(w: &mut XmlWriter, ev: Event<'_>) -> Result<(), FeedError> {
    w.write_event(ev).map_err(FeedError::serialize)
}

fn write_text_element(w: &mut XmlWriter, name: &str, text: &str) -> Result<(), FeedError> {
    write_event(w, Event::Start(BytesStart::new(name)))?;
    write_event(w, Event::Text(BytesText::new(text)))?;
    write_event(w, Event::End(BytesEnd::new(name)))
}

/// RSS wants a single `email (name)` string for people.
fn person(a: &Author) -> String {
    match (a.email.is_empty(), a.name.is_empty()) {
        (false, false) => format!("{} ({})", a.email, a.name),
        (false, true) => a.email.clone(),
        _ => a.name.clone(),
    }
}

fn write_item(w: &mut XmlWriter, item: &CanonicalItem) -> Result<(), FeedError> {
    write_event(w, Event::Start(BytesStart::new("item")))?;
    write_text_element(w, "title", &item.title)?;
    write_text_element(w, "link", &item.link)?;
    write_text_element(w, "description", &item.content)?;
    if let Some(a) = &item.author {
        write_text_element(w, "author", &person(a))?;
    }
    if !item.id.is_empty() {
        let mut guid = BytesStart::new("guid");
        guid.push_attribute(("isPermaLink", "false"));
        write_event(w, Event::Start(guid))?;
        write_event(w, Event::Text(BytesText::new(&item.id)))?;
        write_event(w, Event::End(BytesEnd::new("guid")))?;
    }
    if let Some(ts) = item.created.or(item.updated) {
        write_text_element(w, "pubDate", &ts.to_rfc2822())?;
    }
    write_event(w, Event::End(BytesEnd::new("item")))
}

pub fn to_rss(feed: &CanonicalFeed) -> Result<String, FeedError> {
    let mut w = Writer::new_with_indent(Vec::new(), b' ', 2);
    write_event(&mut w, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut rss = BytesStart::new("rss");
    rss.push_attribute(("version", "2.0"));
    write_event(&mut w, Event::Start(rss))?;
    write_event(&mut w, Event::Start(BytesStart::new("channel")))?;

    write_text_element(&mut w, "title", &feed.title)?;
    write_text_element(&mut w, "link", &feed.link)?;
    write_text_element(&mut w, "description", &feed.description)?;
    if !feed.copyright.is_empty() {
        write_text_element(&mut w, "copyright", &feed.copyright)?;
    }
    if let Some(a) = &feed.author {
        write_text_element(&mut w, "managingEditor", &person(a))?;
    }
    if let Some(ts) = feed.updated {
        write_text_element(&mut w, "lastBuildDate", &ts.to_rfc2822())?;
    }

    for item in &feed.items {
        write_item(&mut w, item)?;
    }

    write_event(&mut w, Event::End(BytesEnd::new("channel")))?;
    write_event(&mut w, Event::End(BytesEnd::new("rss")))?;

    String::from_utf8(w.into_inner()).map_err(FeedError::serialize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample() -> CanonicalFeed {
        let ts = Utc.with_ymd_and_hms(2020, 1, 2, 0, 0, 0).unwrap();
        CanonicalFeed {
            title: "Cats & Dogs".into(),
            link: "https://cats.example/".into(),
            description: "daily".into(),
            copyright: "(c) cats".into(),
            author: Some(Author {
                name: "Ann".into(),
                email: "ann@cats.example".into(),
            }),
            items: vec![CanonicalItem {
                title: "First".into(),
                content: r#"<img src="a.png">"#.into(),
                link: "https://cats.example/1".into(),
                id: "cat-1".into(),
                author: None,
                created: Some(ts),
                updated: Some(ts),
            }],
            updated: Some(ts),
        }
    }

    #[test]
    fn writes_escaped_rss_document() {
        let xml = to_rss(&sample()).unwrap();
        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(xml.contains(r#"<rss version="2.0">"#));
        assert!(xml.contains("<title>Cats &amp; Dogs</title>"));
        assert!(xml.contains("<managingEditor>ann@cats.example (Ann)</managingEditor>"));
        assert!(xml.contains("<lastBuildDate>Thu, "));
        assert!(xml.contains("Jan 2020 00:00:00 +0000</lastBuildDate>"));
        assert!(xml.contains("<description>&lt;img src="));
        assert!(xml.contains(r#"<guid isPermaLink="false">cat-1</guid>"#));
        assert!(xml.trim_end().ends_with("</rss>"));
    }

    #[test]
    fn output_parses_back_as_a_feed() {
        let xml = to_rss(&sample()).unwrap();
        let parsed = feed_rs::parser::parse(xml.as_bytes()).expect("valid rss");
        assert_eq!(parsed.entries.len(), 1);
        assert_eq!(parsed.entries[0].id, "cat-1");
        assert_eq!(
            parsed.entries[0].summary.as_ref().map(|t| t.content.as_str()),
            Some(r#"<img src="a.png">"#)
        );
    }
}
