//! HTTP client for the community recommendation pages, with a per-commander
//! file cache so repeat builds for the same commander stay offline.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use decksmith_core::config::RecsConfig;
use decksmith_core::{Recommendation, RecommendationSource, RecsError};

use crate::payload::CommanderPage;
use crate::{commander_slug, DEFAULT_BASE_URL};

const REQUEST_TIMEOUT_SECS: u64 = 15;

#[derive(Serialize, Deserialize)]
struct CacheEntry {
    fetched_at: DateTime<Utc>,
    recommendations: Vec<Recommendation>,
}

pub struct EdhrecClient {
    http: reqwest::Client,
    base_url: String,
    cache_dir: Option<PathBuf>,
    cache_ttl: chrono::Duration,
}

impl EdhrecClient {
    pub fn new(config: &RecsConfig) -> Result<Self, RecsError> {
        Self::with_base_url(config, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(config: &RecsConfig, base_url: &str) -> Result<Self, RecsError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(concat!("decksmith/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|error| RecsError::SourceUnavailable(error.to_string()))?;

        let cache_dir = if config.cache_enabled {
            match std::fs::create_dir_all(&config.cache_dir) {
                Ok(()) => Some(config.cache_dir.clone()),
                Err(error) => {
                    warn!(dir = %config.cache_dir.display(), %error, "recommendation cache unavailable, running uncached");
                    None
                }
            }
        } else {
            None
        };

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            cache_dir,
            cache_ttl: chrono::Duration::hours(config.cache_ttl_hours as i64),
        })
    }

    fn cache_path(&self, slug: &str) -> Option<PathBuf> {
        self.cache_dir.as_ref().map(|dir| dir.join(format!("{slug}.json")))
    }

    async fn load_cached(&self, slug: &str) -> Option<Vec<Recommendation>> {
        let path = self.cache_path(slug)?;
        let raw = tokio::fs::read(&path).await.ok()?;
        let entry: CacheEntry = match serde_json::from_slice(&raw) {
            Ok(entry) => entry,
            Err(error) => {
                warn!(path = %path.display(), %error, "discarding corrupt recommendation cache entry");
                let _ = tokio::fs::remove_file(&path).await;
                return None;
            }
        };
        if Utc::now() - entry.fetched_at > self.cache_ttl {
            debug!(slug, "recommendation cache entry expired");
            return None;
        }
        Some(entry.recommendations)
    }

    async fn store_cached(&self, slug: &str, recommendations: &[Recommendation]) {
        let Some(path) = self.cache_path(slug) else {
            return;
        };
        let entry =
            CacheEntry { fetched_at: Utc::now(), recommendations: recommendations.to_vec() };
        match serde_json::to_vec(&entry) {
            Ok(bytes) => {
                if let Err(error) = tokio::fs::write(&path, bytes).await {
                    warn!(path = %path.display(), %error, "failed to write recommendation cache");
                }
            }
            Err(error) => {
                warn!(slug, %error, "failed to serialize recommendation cache entry");
            }
        }
    }
}

#[async_trait]
impl RecommendationSource for EdhrecClient {
    async fn recommendations_for(
        &self,
        commander_name: &str,
    ) -> Result<Vec<Recommendation>, RecsError> {
        let slug = commander_slug(commander_name);
        if let Some(cached) = self.load_cached(&slug).await {
            debug!(commander = %commander_name, count = cached.len(), "recommendation cache hit");
            return Ok(cached);
        }

        let url = format!("{}/pages/commanders/{slug}.json", self.base_url);
        info!(commander = %commander_name, %url, "fetching commander recommendations");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|error| RecsError::SourceUnavailable(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RecsError::SourceUnavailable(format!(
                "commander page returned HTTP {status}"
            )));
        }

        let page: CommanderPage = response
            .json()
            .await
            .map_err(|error| RecsError::Parse(error.to_string()))?;
        let recommendations = page.into_recommendations();
        info!(commander = %commander_name, count = recommendations.len(), "parsed recommendations");

        self.store_cached(&slug, &recommendations).await;
        Ok(recommendations)
    }
}
