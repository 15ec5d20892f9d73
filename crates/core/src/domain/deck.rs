use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::CardProfile;
use crate::domain::card::{is_basic_land, normalize_card_name, Color};

/// A Commander deck under construction: one commander plus up to 99 body cards.
/// `add_card` re-checks the singleton and size invariants at insertion time, so a
/// deck built exclusively through it cannot violate them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    pub commander: String,
    pub cards: Vec<String>,
    pub color_identity: Vec<Color>,
}

pub const DECK_SIZE: usize = 100;

impl Deck {
    pub fn new(commander: impl Into<String>, color_identity: Vec<Color>) -> Self {
        Self { commander: commander.into(), cards: Vec::new(), color_identity }
    }

    /// Total size including the commander slot.
    pub fn total_cards(&self) -> usize {
        self.cards.len() + 1
    }

    /// Add a card to the body. Returns false (without mutating) when the card is
    /// the commander, would break the singleton rule, or the deck is full.
    pub fn add_card(&mut self, card_name: &str) -> bool {
        let normalized = normalize_card_name(card_name);
        if normalized == normalize_card_name(&self.commander) {
            return false;
        }
        if !is_basic_land(card_name)
            && self.cards.iter().any(|existing| normalize_card_name(existing) == normalized)
        {
            return false;
        }
        if self.total_cards() >= DECK_SIZE {
            return false;
        }
        self.cards.push(card_name.to_string());
        true
    }

    /// Run every format check independently. `profiles` supplies catalog data for
    /// the color-identity and commander-eligibility checks; cards without a
    /// profile (e.g. generated basic lands) are treated as colorless.
    pub fn validate(&self, profiles: Option<&BTreeMap<String, CardProfile>>) -> DeckValidation {
        let card_count_ok = self.total_cards() == DECK_SIZE;
        let singleton_ok = self.check_singleton();
        let commander_legal_ok = self.check_commander(profiles);
        let color_identity_ok = self.check_color_identity(profiles);

        let mut violations = Vec::new();
        if !card_count_ok {
            violations.push(format!(
                "deck must have exactly {DECK_SIZE} cards (currently has {})",
                self.total_cards()
            ));
        }
        if !singleton_ok {
            violations
                .push("deck violates the singleton rule (duplicate non-basic card)".to_string());
        }
        if !commander_legal_ok {
            violations.push("commander is not legal for the Commander format".to_string());
        }
        if !color_identity_ok {
            violations
                .push("deck contains cards outside the commander's color identity".to_string());
        }

        DeckValidation {
            card_count_ok,
            singleton_ok,
            commander_legal_ok,
            color_identity_ok,
            violations,
        }
    }

    fn check_singleton(&self) -> bool {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for card in &self.cards {
            *counts.entry(card.to_lowercase()).or_default() += 1;
        }
        counts.iter().all(|(name, count)| *count <= 1 || is_basic_land(name))
    }

    fn check_commander(&self, profiles: Option<&BTreeMap<String, CardProfile>>) -> bool {
        if self.commander.trim().is_empty() {
            return false;
        }
        match profiles.and_then(|map| map.get(&normalize_card_name(&self.commander))) {
            Some(profile) => profile.commander_eligible(),
            // Without catalog data we can only assert a non-empty name.
            None => true,
        }
    }

    fn check_color_identity(&self, profiles: Option<&BTreeMap<String, CardProfile>>) -> bool {
        let Some(profiles) = profiles else {
            return true;
        };
        self.cards.iter().all(|card| {
            match profiles.get(&normalize_card_name(card)) {
                Some(profile) => {
                    profile.color_identity.iter().all(|color| self.color_identity.contains(color))
                }
                None => true,
            }
        })
    }
}

/// Per-rule validation outcome with human-readable violation messages.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeckValidation {
    pub card_count_ok: bool,
    pub singleton_ok: bool,
    pub commander_legal_ok: bool,
    pub color_identity_ok: bool,
    pub violations: Vec<String>,
}

impl DeckValidation {
    pub fn is_valid(&self) -> bool {
        self.card_count_ok && self.singleton_ok && self.commander_legal_ok && self.color_identity_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::profile;

    fn deck() -> Deck {
        Deck::new("Atraxa, Praetors' Voice", vec![Color::White, Color::Blue])
    }

    #[test]
    fn commander_never_enters_the_body() {
        let mut deck = deck();
        assert!(!deck.add_card("Atraxa, Praetors' Voice"));
        assert!(!deck.add_card("atraxa,   praetors' voice"));
        assert!(deck.cards.is_empty());
    }

    #[test]
    fn singleton_rule_blocks_duplicates_but_not_basics() {
        let mut deck = deck();
        assert!(deck.add_card("Sol Ring"));
        assert!(!deck.add_card("Sol Ring"));
        assert!(!deck.add_card("sol ring"));
        assert!(deck.add_card("Island"));
        assert!(deck.add_card("Island"));
        assert_eq!(deck.cards.len(), 3);
    }

    #[test]
    fn deck_refuses_cards_beyond_one_hundred() {
        let mut deck = deck();
        for i in 0..99 {
            assert!(deck.add_card(&format!("Filler Card {i}")));
        }
        assert!(!deck.add_card("One Too Many"));
        assert_eq!(deck.total_cards(), DECK_SIZE);
    }

    #[test]
    fn validator_reports_duplicate_non_basic() {
        let mut deck = deck();
        deck.add_card("Sol Ring");
        // Bypass add_card to simulate a corrupted deck.
        deck.cards.push("Sol Ring".to_string());

        let validation = deck.validate(None);
        assert!(!validation.singleton_ok);
        assert!(validation.violations.iter().any(|v| v.contains("singleton")));
    }

    #[test]
    fn validator_checks_color_identity_against_profiles() {
        let mut deck = deck();
        deck.add_card("Lightning Bolt");
        for i in 0..98 {
            deck.add_card(&format!("Filler Card {i}"));
        }

        let mut profiles = BTreeMap::new();
        profiles.insert(
            "lightning bolt".to_string(),
            profile("Lightning Bolt", "Instant", &["R"]),
        );

        let validation = deck.validate(Some(&profiles));
        assert!(validation.card_count_ok);
        assert!(!validation.color_identity_ok);
        assert!(!validation.is_valid());
    }

    #[test]
    fn validator_passes_a_conforming_deck() {
        let mut deck = deck();
        for i in 0..99 {
            deck.add_card(&format!("Filler Card {i}"));
        }
        let validation = deck.validate(None);
        assert!(validation.is_valid());
        assert!(validation.violations.is_empty());
    }

    #[test]
    fn blank_commander_fails_legality_check() {
        let deck = Deck::new("   ", vec![]);
        let validation = deck.validate(None);
        assert!(!validation.commander_legal_ok);
    }
}
