//! Content-addressed disk cache for resolved cards. One JSON file per card,
//! keyed by the blake3 hash of the normalized name, with the fetch timestamp
//! embedded so staleness survives file-copy and backup round trips.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use decksmith_core::normalize_card_name;

use crate::payload::ScryfallCard;

#[derive(Serialize, Deserialize)]
struct CacheEntry {
    fetched_at: DateTime<Utc>,
    card: ScryfallCard,
}

#[derive(Clone, Debug)]
pub struct DiskCache {
    dir: PathBuf,
    ttl: Duration,
}

impl DiskCache {
    /// Open (and create if needed) a cache rooted at `dir`. Entries older than
    /// `ttl_days` are treated as absent and rewritten on the next fetch.
    pub fn open(dir: impl AsRef<Path>, ttl_days: i64) -> std::io::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir, ttl: Duration::days(ttl_days) })
    }

    fn path_for(&self, name: &str) -> PathBuf {
        let key = blake3::hash(normalize_card_name(name).as_bytes()).to_hex();
        self.dir.join(format!("{key}.json"))
    }

    /// Fetch a fresh entry, if any. Corrupt or stale entries read as a miss;
    /// the cache never fails a lookup.
    pub async fn load(&self, name: &str) -> Option<ScryfallCard> {
        let path = self.path_for(name);
        let raw = tokio::fs::read(&path).await.ok()?;
        let entry: CacheEntry = match serde_json::from_slice(&raw) {
            Ok(entry) => entry,
            Err(error) => {
                warn!(path = %path.display(), %error, "discarding corrupt cache entry");
                let _ = tokio::fs::remove_file(&path).await;
                return None;
            }
        };
        if Utc::now() - entry.fetched_at > self.ttl {
            debug!(card = %name, "cache entry expired");
            return None;
        }
        Some(entry.card)
    }

    /// Persist a card. Write failures are logged and swallowed; a broken cache
    /// only costs repeat network fetches.
    pub async fn store(&self, name: &str, card: &ScryfallCard) {
        let entry = CacheEntry { fetched_at: Utc::now(), card: card.clone() };
        let bytes = match serde_json::to_vec(&entry) {
            Ok(bytes) => bytes,
            Err(error) => {
                warn!(card = %name, %error, "failed to serialize cache entry");
                return;
            }
        };
        let path = self.path_for(name);
        if let Err(error) = tokio::fs::write(&path, bytes).await {
            warn!(path = %path.display(), %error, "failed to write cache entry");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(name: &str) -> ScryfallCard {
        ScryfallCard { name: name.to_string(), ..ScryfallCard::default() }
    }

    #[tokio::test]
    async fn store_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DiskCache::open(dir.path(), 30).unwrap();

        cache.store("Sol Ring", &card("Sol Ring")).await;
        let loaded = cache.load("Sol Ring").await.unwrap();
        assert_eq!(loaded.name, "Sol Ring");

        // Lookups are keyed by normalized name.
        assert!(cache.load("  SOL RING ").await.is_some());
    }

    #[tokio::test]
    async fn expired_entries_read_as_misses() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DiskCache::open(dir.path(), 30).unwrap();

        let entry = CacheEntry {
            fetched_at: Utc::now() - Duration::days(31),
            card: card("Old Card"),
        };
        let path = cache.path_for("Old Card");
        tokio::fs::write(&path, serde_json::to_vec(&entry).unwrap()).await.unwrap();

        assert!(cache.load("Old Card").await.is_none());
    }

    #[tokio::test]
    async fn corrupt_entries_are_removed_and_miss() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DiskCache::open(dir.path(), 30).unwrap();

        let path = cache.path_for("Broken");
        tokio::fs::write(&path, b"not json").await.unwrap();

        assert!(cache.load("Broken").await.is_none());
        assert!(!path.exists());
    }
}
