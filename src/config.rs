// src/config.rs
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

// --- env defaults & names ---
pub const DEFAULT_CONFIG_PATH: &str = "config/feedproxy.toml";

pub const ENV_CONFIG_PATH: &str = "FEEDPROXY_CONFIG_PATH";
pub const ENV_UPSTREAM_TIMEOUT_SECS: &str = "FEEDPROXY_UPSTREAM_TIMEOUT_SECS";
pub const ENV_ITEM_TIMEOUT_SECS: &str = "FEEDPROXY_ITEM_TIMEOUT_SECS";

const MAX_TIMEOUT_SECS: u64 = 300;

fn default_upstream_timeout_secs() -> u64 {
    20
}
fn default_item_timeout_secs() -> u64 {
    30
}
fn default_user_agent() -> String {
    concat!("feedproxy/", env!("CARGO_PKG_VERSION")).to_string()
}
fn default_public_scheme() -> String {
    "https".to_string()
}
fn default_asset_origin() -> String {
    "https://webtoon-phinf.pstatic.net".to_string()
}
fn default_asset_referer() -> String {
    "https://www.webtoons.com/en/".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProxyConfig {
    /// Timeout for every single upstream HTTP call.
    #[serde(default = "default_upstream_timeout_secs")]
    pub upstream_timeout_secs: u64,
    /// Bound on one item's enrichment (fetch + parse + rewrite).
    #[serde(default = "default_item_timeout_secs")]
    pub item_timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Scheme used when building the `<scheme>://<host>/<base>` prefix for proxied assets.
    #[serde(default = "default_public_scheme")]
    pub public_scheme: String,
    /// Image host that rejects hotlinking; no trailing slash.
    #[serde(default = "default_asset_origin")]
    pub asset_origin: String,
    #[serde(default = "default_asset_referer")]
    pub asset_referer: String,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            upstream_timeout_secs: default_upstream_timeout_secs(),
            item_timeout_secs: default_item_timeout_secs(),
            user_agent: default_user_agent(),
            public_scheme: default_public_scheme(),
            asset_origin: default_asset_origin(),
            asset_referer: default_asset_referer(),
        }
    }
}

impl ProxyConfig {
    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }

    pub fn item_timeout(&self) -> Duration {
        Duration::from_secs(self.item_timeout_secs)
    }

    /// Load from an explicit TOML path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading proxy config from {}", path.display()))?;
        let cfg = Self::parse(&content)
            .with_context(|| format!("parsing proxy config {}", path.display()))?;
        Ok(cfg.sanitized())
    }

    /// Load using env var + fallbacks, then apply env overrides:
    /// 1) $FEEDPROXY_CONFIG_PATH
    /// 2) config/feedproxy.toml
    /// 3) built-in defaults
    pub fn load_default() -> Result<Self> {
        let base = if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
            }
            Self::load_from(&pb)?
        } else {
            let fallback = PathBuf::from(DEFAULT_CONFIG_PATH);
            if fallback.exists() {
                Self::load_from(&fallback)?
            } else {
                Self::default()
            }
        };
        Ok(base.with_env_overrides())
    }

    fn parse(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    fn with_env_overrides(mut self) -> Self {
        if let Some(v) = parse_secs_env(std::env::var(ENV_UPSTREAM_TIMEOUT_SECS).ok()) {
            self.upstream_timeout_secs = v;
        }
        if let Some(v) = parse_secs_env(std::env::var(ENV_ITEM_TIMEOUT_SECS).ok()) {
            self.item_timeout_secs = v;
        }
        self.sanitized()
    }

    fn sanitized(mut self) -> Self {
        self.upstream_timeout_secs = self.upstream_timeout_secs.clamp(1, MAX_TIMEOUT_SECS);
        self.item_timeout_secs = self.item_timeout_secs.clamp(1, MAX_TIMEOUT_SECS);
        while self.asset_origin.ends_with('/') {
            self.asset_origin.pop();
        }
        self
    }
}

// parse optional seconds env; ignore garbage
fn parse_secs_env(raw: Option<String>) -> Option<u64> {
    raw.and_then(|s| s.trim().parse::<u64>().ok())
}
