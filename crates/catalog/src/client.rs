//! HTTP client for the card catalog with the full politeness stack: request
//! spacing, a concurrency cap, jittered exponential backoff, not-found
//! memoization, and a disk cache in front of the wire.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use tokio::sync::{Mutex, Semaphore};
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use decksmith_core::config::CatalogConfig;
use decksmith_core::{normalize_card_name, CardCatalog, CardProfile, CatalogError};

use crate::cache::DiskCache;
use crate::payload::ScryfallCard;
use crate::DEFAULT_BASE_URL;

struct Inner {
    http: reqwest::Client,
    base_url: String,
    semaphore: Semaphore,
    last_request: Mutex<Option<Instant>>,
    // Names the catalog has said do not exist; asking again within a run is
    // pointless.
    not_found: Mutex<BTreeSet<String>>,
    cache: Option<DiskCache>,
    min_request_interval: Duration,
    max_retries: u32,
    base_delay: Duration,
    max_delay: Duration,
}

#[derive(Clone)]
pub struct ScryfallClient {
    inner: Arc<Inner>,
}

impl ScryfallClient {
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        Self::with_base_url(config, DEFAULT_BASE_URL)
    }

    /// Point the client at an alternate catalog host, primarily for tests
    /// against a local stub server.
    pub fn with_base_url(config: &CatalogConfig, base_url: &str) -> Result<Self, CatalogError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(concat!("decksmith/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|error| CatalogError::Network(error.to_string()))?;

        let cache = match DiskCache::open(&config.cache_dir, config.cache_ttl_days as i64) {
            Ok(cache) => Some(cache),
            Err(error) => {
                warn!(dir = %config.cache_dir.display(), %error, "card cache unavailable, running uncached");
                None
            }
        };

        Ok(Self {
            inner: Arc::new(Inner {
                http,
                base_url: base_url.trim_end_matches('/').to_string(),
                semaphore: Semaphore::new(config.max_concurrent_requests.max(1)),
                last_request: Mutex::new(None),
                not_found: Mutex::new(BTreeSet::new()),
                cache,
                min_request_interval: Duration::from_millis(config.min_request_interval_ms),
                max_retries: config.max_retries,
                base_delay: Duration::from_millis(config.base_delay_ms),
                max_delay: Duration::from_millis(config.max_delay_ms),
            }),
        })
    }

    /// Sleep long enough to keep requests `min_request_interval` apart, then
    /// claim the current instant as the latest request time.
    async fn pace(&self) {
        let mut last = self.inner.last_request.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.inner.min_request_interval {
                tokio::time::sleep(self.inner.min_request_interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }

    fn backoff_delay(&self, attempt: u32) -> Duration {
        let exponential = self
            .inner
            .base_delay
            .saturating_mul(2u32.saturating_pow(attempt))
            .min(self.inner.max_delay);
        let jitter = Duration::from_millis(rand::thread_rng().gen_range(0..=250));
        exponential + jitter
    }

    async fn fetch(&self, name: &str) -> Result<ScryfallCard, CatalogError> {
        let url = format!("{}/cards/named", self.inner.base_url);
        let mut last_error = CatalogError::Network("no attempts made".to_string());

        for attempt in 0..self.inner.max_retries {
            self.pace().await;
            debug!(card = %name, attempt, "requesting card from catalog");

            let response =
                match self.inner.http.get(&url).query(&[("fuzzy", name)]).send().await {
                    Ok(response) => response,
                    Err(error) => {
                        last_error = CatalogError::Network(error.to_string());
                        warn!(card = %name, attempt, %error, "catalog request failed, backing off");
                        tokio::time::sleep(self.backoff_delay(attempt)).await;
                        continue;
                    }
                };

            let status = response.status();
            if status.is_success() {
                return response
                    .json::<ScryfallCard>()
                    .await
                    .map_err(|error| CatalogError::Network(error.to_string()));
            }
            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(CatalogError::NotFound { name: name.to_string() });
            }
            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                let retry_after = response
                    .headers()
                    .get(reqwest::header::RETRY_AFTER)
                    .and_then(|value| value.to_str().ok())
                    .and_then(|value| value.parse::<u64>().ok())
                    .unwrap_or(1);
                last_error = CatalogError::RateLimited { retry_after_secs: retry_after };
                let delay = self.backoff_delay(attempt).max(Duration::from_secs(retry_after));
                warn!(card = %name, retry_after, "catalog rate limited us, waiting");
                tokio::time::sleep(delay).await;
                continue;
            }
            if status.is_server_error() {
                last_error = CatalogError::Http { status: status.as_u16() };
                tokio::time::sleep(self.backoff_delay(attempt)).await;
                continue;
            }
            return Err(CatalogError::Http { status: status.as_u16() });
        }

        Err(last_error)
    }
}

#[async_trait]
impl CardCatalog for ScryfallClient {
    async fn resolve(&self, name: &str) -> Result<CardProfile, CatalogError> {
        let normalized = normalize_card_name(name);

        if self.inner.not_found.lock().await.contains(&normalized) {
            return Err(CatalogError::NotFound { name: name.to_string() });
        }
        if let Some(cache) = &self.inner.cache {
            if let Some(card) = cache.load(name).await {
                debug!(card = %name, "cache hit");
                return Ok(card.into_profile());
            }
        }

        let _permit = self
            .inner
            .semaphore
            .acquire()
            .await
            .map_err(|_| CatalogError::Network("catalog client shut down".to_string()))?;

        let result = self.fetch(name).await;
        match &result {
            Ok(_) => {}
            Err(error) if error.is_permanent() => {
                self.inner.not_found.lock().await.insert(normalized);
            }
            Err(_) => {}
        }
        let card = result?;

        if let Some(cache) = &self.inner.cache {
            cache.store(name, &card).await;
        }
        Ok(card.into_profile())
    }

    async fn resolve_batch(
        &self,
        names: &[String],
    ) -> BTreeMap<String, Result<CardProfile, CatalogError>> {
        info!(count = names.len(), "resolving card batch");
        let mut tasks = JoinSet::new();
        for name in names {
            let client = self.clone();
            let name = name.clone();
            tasks.spawn(async move {
                let result = client.resolve(&name).await;
                (name, result)
            });
        }

        let mut results = BTreeMap::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((name, result)) => {
                    results.insert(name, result);
                }
                Err(error) => {
                    warn!(%error, "card resolution task panicked");
                }
            }
        }
        results
    }
}
