use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::CardProfile;
use crate::domain::card::{normalize_card_name, CardType};
use crate::domain::deck::Deck;

/// Aggregate composition data for a finished deck, consumed by the renderer.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DeckStatistics {
    pub card_types: BTreeMap<String, usize>,
    pub mana_curve: BTreeMap<u32, usize>,
    pub color_distribution: BTreeMap<String, usize>,
    pub average_cmc: f64,
    pub total_cards: usize,
}

impl DeckStatistics {
    /// Compute statistics for the deck body plus commander. Catalog profiles are
    /// the authoritative source for type and mana value; cards that missed the
    /// catalog fall back to name heuristics and are only as good as those.
    pub fn compute(deck: &Deck, profiles: &BTreeMap<String, CardProfile>) -> Self {
        let mut stats = DeckStatistics { total_cards: deck.total_cards(), ..Default::default() };

        let mut nonland_cmc_total = 0.0;
        let mut nonland_count = 0usize;

        let all_names = std::iter::once(deck.commander.as_str())
            .chain(deck.cards.iter().map(String::as_str));

        for name in all_names {
            let profile = profiles.get(&normalize_card_name(name));

            let card_type = profile
                .and_then(CardProfile::primary_type)
                .unwrap_or_else(|| CardType::guess_from_name(name));
            *stats.card_types.entry(card_type.label().to_string()).or_default() += 1;

            match profile {
                Some(profile) => {
                    for color in &profile.color_identity {
                        *stats
                            .color_distribution
                            .entry(color.display_name().to_string())
                            .or_default() += 1;
                    }
                    if profile.color_identity.is_empty() {
                        *stats.color_distribution.entry("colorless".to_string()).or_default() += 1;
                    }
                }
                None => {
                    *stats.color_distribution.entry("colorless".to_string()).or_default() += 1;
                }
            }

            if card_type != CardType::Land {
                let cmc = match profile {
                    Some(profile) => profile.cmc,
                    None => estimate_cmc_from_name(name) as f64,
                };
                let bucket = (cmc.round().max(0.0) as u32).min(15);
                *stats.mana_curve.entry(bucket).or_default() += 1;
                nonland_cmc_total += cmc;
                nonland_count += 1;
            }
        }

        if nonland_count > 0 {
            stats.average_cmc = nonland_cmc_total / nonland_count as f64;
        }
        stats
    }

    pub fn creature_percentage(&self) -> f64 {
        self.type_percentage("creature")
    }

    pub fn land_percentage(&self) -> f64 {
        self.type_percentage("land")
    }

    fn type_percentage(&self, label: &str) -> f64 {
        if self.total_cards == 0 {
            return 0.0;
        }
        let count = self.card_types.get(label).copied().unwrap_or(0);
        count as f64 / self.total_cards as f64 * 100.0
    }
}

/// Rough mana-value guess from a card name. Degraded-confidence data used only
/// when the catalog could not resolve the card.
pub fn estimate_cmc_from_name(name: &str) -> u32 {
    let lowered = name.to_lowercase();
    if lowered.contains("sol ring") || lowered.contains("mana crypt") {
        return 0;
    }
    if lowered.contains("bolt") || lowered.contains("path") || lowered.contains("swords") {
        return 1;
    }
    if lowered.contains("signet") || lowered.contains("talisman") || lowered.contains("rampant") {
        return 2;
    }
    if lowered.contains("cultivate") || lowered.contains("kodama") {
        return 3;
    }
    match name.len() {
        0..=9 => 2,
        10..=14 => 3,
        15..=19 => 4,
        _ => 5,
    }
}
