// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod api;
pub mod assemble;
pub mod config;
pub mod error;
pub mod extractors;
pub mod fetch;
pub mod filter;
pub mod metrics;
pub mod model;
pub mod pipeline;
pub mod proxy;
pub mod registry;
pub mod rss;
pub mod transform;

// ---- Re-exports for stable public API ----
pub use crate::api::{router, AppState};
pub use crate::config::ProxyConfig;
pub use crate::error::FeedError;
pub use crate::registry::{ExtractorBinding, Registry};

use tracing::info;

/// Build the full router from config on disk/env with the built-in site registry.
pub async fn app() -> anyhow::Result<axum::Router> {
    let config = ProxyConfig::load_default()?;
    let state = AppState::new(config)?;
    info!(feeds = state.registry.len(), "feed registry ready");
    Ok(router(state))
}
