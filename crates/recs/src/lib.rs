//! EDHREC-backed implementation of the `RecommendationSource` capability.
//!
//! Commander pages are public JSON documents keyed by a name slug. The client
//! caches parsed recommendations per commander; callers fall back to
//! `decksmith_core::static_staples()` when the source is unreachable.

mod client;
mod payload;

pub use client::EdhrecClient;
pub use payload::{categorize, synergy_score, CommanderPage};

pub const DEFAULT_BASE_URL: &str = "https://json.edhrec.com";

/// Derive the URL slug for a commander name: front face only, lowercased,
/// punctuation stripped, spaces hyphenated.
pub fn commander_slug(name: &str) -> String {
    let front = name.split("//").next().unwrap_or(name).trim();
    let mut slug = String::with_capacity(front.len());
    let mut last_was_hyphen = true;
    for ch in front.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if (ch.is_whitespace() || ch == '-') && !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}
