//! Fuzzy resolution of user-typed card names against the loaded collection.
//! Exact and variation-table lookups run first; Jaro-Winkler similarity is the
//! last resort so a single typo does not fail a build.

use std::collections::BTreeMap;

use strsim::jaro_winkler;
use tracing::debug;

use decksmith_core::{normalize_card_name, Collection};

/// Similarity floor for accepting a fuzzy match. Below this the input is more
/// likely a different card than a typo.
const FUZZY_THRESHOLD: f64 = 0.92;

pub struct NameResolver {
    // variation -> normalized name
    table: BTreeMap<String, String>,
    // normalized name -> display name
    displays: BTreeMap<String, String>,
}

impl NameResolver {
    pub fn new(collection: &Collection) -> Self {
        let mut table = BTreeMap::new();
        let mut displays = BTreeMap::new();

        for (normalized, entry) in collection {
            displays.insert(normalized.clone(), entry.name.clone());
            table.insert(normalized.clone(), normalized.clone());
            table.insert(entry.name.to_lowercase(), normalized.clone());

            let no_punct = strip_punctuation(&entry.name.to_lowercase());
            table.entry(no_punct).or_insert_with(|| normalized.clone());

            if let Some(without_the) = entry.name.to_lowercase().strip_prefix("the ") {
                table.entry(without_the.to_string()).or_insert_with(|| normalized.clone());
            }

            for variation in spelling_variations(&entry.name) {
                table.entry(variation).or_insert_with(|| normalized.clone());
            }
        }

        Self { table, displays }
    }

    /// Resolve to a normalized collection name, or `None` when nothing is
    /// close enough.
    pub fn resolve(&self, input: &str) -> Option<String> {
        let normalized = normalize_card_name(input);
        if let Some(found) = self.table.get(&normalized) {
            return Some(found.clone());
        }
        if let Some(found) = self.table.get(&input.to_lowercase()) {
            return Some(found.clone());
        }

        let cleaned = strip_punctuation(&normalized);
        if let Some(found) = self.table.get(&cleaned) {
            return Some(found.clone());
        }

        let mut best: Option<(f64, &String)> = None;
        for (key, target) in &self.table {
            let similarity = jaro_winkler(&cleaned, &strip_punctuation(key));
            if similarity >= FUZZY_THRESHOLD
                && best.map_or(true, |(score, _)| similarity > score)
            {
                best = Some((similarity, target));
            }
        }
        if let Some((score, target)) = best {
            debug!(input, target = %target, score, "fuzzy name match");
            return Some(target.clone());
        }
        None
    }

    /// Closest display names for error messages, best first.
    pub fn suggestions(&self, input: &str, limit: usize) -> Vec<String> {
        let cleaned = strip_punctuation(&normalize_card_name(input));
        let mut scored: Vec<(f64, &String)> = self
            .displays
            .iter()
            .map(|(normalized, display)| (jaro_winkler(&cleaned, normalized), display))
            .filter(|(score, _)| *score >= 0.6)
            .collect();
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.into_iter().take(limit).map(|(_, display)| display.clone()).collect()
    }
}

fn strip_punctuation(name: &str) -> String {
    let mut cleaned = String::with_capacity(name.len());
    let mut last_was_space = true;
    for ch in name.chars() {
        if ch.is_alphanumeric() {
            cleaned.push(ch);
            last_was_space = false;
        } else if ch.is_whitespace() && !last_was_space {
            cleaned.push(' ');
            last_was_space = true;
        }
    }
    cleaned.trim_end().to_string()
}

/// Alternate spellings people actually type: dropped diphthongs, British
/// spellings, missing apostrophes and hyphens, squashed spaces.
fn spelling_variations(name: &str) -> Vec<String> {
    let lowered = name.to_lowercase();
    const SUBSTITUTIONS: [(&str, &str); 6] =
        [("ae", "e"), ("ou", "o"), ("ise", "ize"), ("'", ""), ("-", " "), (" ", "")];

    SUBSTITUTIONS
        .iter()
        .filter(|(from, _)| lowered.contains(from))
        .map(|(from, to)| lowered.replace(from, to))
        .collect()
}
