// src/registry.rs
//! Feed identifier -> strategy. Built once at startup and only read afterwards.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::config::ProxyConfig;
use crate::error::FeedError;
use crate::extractors::{
    commitstrip::{COMMITSTRIP_FEED_URL, RSS_CLOSING_TAG},
    dilbert::{DilbertModifier, DILBERT_FEED_URL},
    gamercat::{GamercatModifier, GAMERCAT_FEED_URL},
    littlebobby::LittlebobbyGenerator,
    nichtlustig::NichtlustigGenerator,
    ruthe::RutheGenerator,
    webtoons::{WebtoonsModifier, DINOS_AND_COMICS_FEED_URL, TORTOISE_AND_DINO_FEED_URL},
    FeedGenerator, ItemModifier,
};

#[derive(Clone)]
pub enum ExtractorBinding {
    /// Parse the upstream feed and rewrite every item.
    Modify {
        source_url: String,
        modifier: Arc<dyn ItemModifier>,
    },
    /// Parse the upstream feed and keep items by link path.
    Filter {
        source_url: String,
        include: bool,
        whitelist: Vec<String>,
    },
    /// Build the whole feed from a non-feed page.
    Generate(Arc<dyn FeedGenerator>),
    /// Serve the upstream document text, cut after its root element.
    Verbatim {
        source_url: String,
        closing_tag: &'static str,
    },
}

impl ExtractorBinding {
    pub fn modify(source_url: &str, modifier: impl ItemModifier + 'static) -> Self {
        Self::Modify {
            source_url: source_url.to_string(),
            modifier: Arc::new(modifier),
        }
    }

    pub fn filter(source_url: &str, include: bool, whitelist: &[&str]) -> Self {
        Self::Filter {
            source_url: source_url.to_string(),
            include,
            whitelist: whitelist.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn generate(generator: impl FeedGenerator + 'static) -> Self {
        Self::Generate(Arc::new(generator))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Modify { .. } => "modify",
            Self::Filter { .. } => "filter",
            Self::Generate(_) => "generate",
            Self::Verbatim { .. } => "verbatim",
        }
    }
}

impl fmt::Debug for ExtractorBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Modify {
                source_url,
                modifier,
            } => f
                .debug_struct("Modify")
                .field("source_url", source_url)
                .field("modifier", &modifier.name())
                .finish(),
            Self::Filter {
                source_url,
                include,
                whitelist,
            } => f
                .debug_struct("Filter")
                .field("source_url", source_url)
                .field("include", include)
                .field("whitelist", whitelist)
                .finish(),
            Self::Generate(g) => f.debug_tuple("Generate").field(&g.name()).finish(),
            Self::Verbatim { source_url, .. } => f
                .debug_struct("Verbatim")
                .field("source_url", source_url)
                .finish(),
        }
    }
}

#[derive(Debug, Default)]
pub struct Registry {
    bindings: HashMap<String, ExtractorBinding>,
}

impl Registry {
    pub fn from_bindings<I, K>(bindings: I) -> Self
    where
        I: IntoIterator<Item = (K, ExtractorBinding)>,
        K: Into<String>,
    {
        Self {
            bindings: bindings.into_iter().map(|(k, b)| (k.into(), b)).collect(),
        }
    }

    /// The sites this proxy knows about.
    pub fn builtin(cfg: &ProxyConfig) -> Self {
        Self::from_bindings([
            ("dilbert", ExtractorBinding::modify(DILBERT_FEED_URL, DilbertModifier)),
            (
                "gamercat",
                ExtractorBinding::modify(GAMERCAT_FEED_URL, GamercatModifier::default()),
            ),
            (
                "dinosandcomics",
                ExtractorBinding::modify(
                    DINOS_AND_COMICS_FEED_URL,
                    WebtoonsModifier::new(&cfg.asset_origin),
                ),
            ),
            (
                "tortoiseanddino",
                ExtractorBinding::modify(
                    TORTOISE_AND_DINO_FEED_URL,
                    WebtoonsModifier::new(&cfg.asset_origin),
                ),
            ),
            ("ruthe", ExtractorBinding::generate(RutheGenerator::default())),
            (
                "commitstrip",
                ExtractorBinding::Verbatim {
                    source_url: COMMITSTRIP_FEED_URL.to_string(),
                    closing_tag: RSS_CLOSING_TAG,
                },
            ),
            (
                "nichtlustig",
                ExtractorBinding::generate(NichtlustigGenerator::default()),
            ),
            (
                "littlebobby",
                ExtractorBinding::generate(LittlebobbyGenerator::default()),
            ),
            (
                "heiseonline",
                ExtractorBinding::filter(
                    "https://www.heise.de/rss/heise-atom.xml",
                    false,
                    &["security", "developer", "select/ix"],
                ),
            ),
            (
                "heisesecurity",
                ExtractorBinding::filter(
                    "https://www.heise.de/security/rss/news-atom.xml",
                    true,
                    &["security"],
                ),
            ),
            (
                "heisedeveloper",
                ExtractorBinding::filter(
                    "https://www.heise.de/developer/rss/news-atom.xml",
                    true,
                    &["developer"],
                ),
            ),
            (
                "heiseix",
                ExtractorBinding::filter(
                    "https://www.heise.de/ix/rss/news-atom.xml",
                    true,
                    &["select/ix"],
                ),
            ),
        ])
    }

    /// Exact, case-sensitive lookup.
    pub fn get(&self, id: &str) -> Result<&ExtractorBinding, FeedError> {
        self.bindings
            .get(id)
            .ok_or_else(|| FeedError::UnknownFeed(id.to_string()))
    }

    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.bindings.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_knows_every_site() {
        let reg = Registry::builtin(&ProxyConfig::default());
        assert_eq!(reg.len(), 12);
        assert_eq!(
            reg.ids(),
            vec![
                "commitstrip",
                "dilbert",
                "dinosandcomics",
                "gamercat",
                "heisedeveloper",
                "heiseix",
                "heiseonline",
                "heisesecurity",
                "littlebobby",
                "nichtlustig",
                "ruthe",
                "tortoiseanddino",
            ]
        );
        assert_eq!(reg.get("ruthe").unwrap().kind(), "generate");
        assert_eq!(reg.get("commitstrip").unwrap().kind(), "verbatim");
        assert_eq!(reg.get("gamercat").unwrap().kind(), "modify");
    }

    #[test]
    fn lookup_is_exact_and_case_sensitive() {
        let reg = Registry::builtin(&ProxyConfig::default());
        assert!(matches!(reg.get("Dilbert"), Err(FeedError::UnknownFeed(_))));
        assert!(matches!(reg.get("heise"), Err(FeedError::UnknownFeed(_))));
        assert!(matches!(reg.get(""), Err(FeedError::UnknownFeed(_))));
    }

    #[test]
    fn heiseonline_is_a_block_list() {
        let reg = Registry::builtin(&ProxyConfig::default());
        match reg.get("heiseonline").unwrap() {
            ExtractorBinding::Filter {
                include, whitelist, ..
            } => {
                assert!(!include);
                assert_eq!(whitelist, &vec!["security", "developer", "select/ix"]);
            }
            other => panic!("unexpected binding {other:?}"),
        }
    }
}
