//! Scryfall-backed implementation of the `CardCatalog` capability.
//!
//! The client is deliberately polite: requests are spaced at least 150ms apart,
//! at most three run concurrently, and transient failures retry with jittered
//! exponential backoff. Resolved cards land in a disk cache so repeat builds
//! against the same collection stay offline.

mod cache;
mod client;
mod payload;

pub use cache::DiskCache;
pub use client::ScryfallClient;
pub use payload::ScryfallCard;

/// Public fuzzy-name endpoint. Handles misspellings and partial names on the
/// server side, which pairs well with messy collection CSVs.
pub const DEFAULT_BASE_URL: &str = "https://api.scryfall.com";
