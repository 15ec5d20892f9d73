use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::card::{CardType, Color};

/// Format key used for every legality query in this application.
pub const COMMANDER_FORMAT: &str = "commander";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Legality {
    Legal,
    NotLegal,
    Banned,
    Restricted,
}

impl Legality {
    pub fn from_api(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "legal" => Legality::Legal,
            "banned" => Legality::Banned,
            "restricted" => Legality::Restricted,
            _ => Legality::NotLegal,
        }
    }
}

/// Planeswalkers from Commander preconstructed products that may lead a deck
/// despite lacking "can be your commander" oracle text in some data sources.
/// Offline fallback only; the oracle text check runs first.
const COMMANDER_PLANESWALKERS: [&str; 5] = [
    "freyalise, llanowar's fury",
    "nahiri, the lithomancer",
    "ob nixilis of the black oath",
    "teferi, temporal archmage",
    "daretti, scrap savant",
];

/// Authoritative card metadata resolved from the card catalog.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardProfile {
    pub name: String,
    pub color_identity: Vec<Color>,
    pub mana_cost: String,
    pub type_line: String,
    pub oracle_text: String,
    pub cmc: f64,
    pub legalities: BTreeMap<String, Legality>,
    pub purchase_uris: BTreeMap<String, String>,
    pub scryfall_uri: String,
}

impl CardProfile {
    pub fn is_legal_in(&self, format: &str) -> bool {
        matches!(self.legalities.get(format), Some(Legality::Legal))
    }

    pub fn primary_type(&self) -> Option<CardType> {
        CardType::from_type_line(&self.type_line)
    }

    /// Whether this card may lead a Commander deck: legendary creature, explicit
    /// commander-granting text, partner variants, or a known commander-product
    /// planeswalker.
    pub fn commander_eligible(&self) -> bool {
        let type_line = self.type_line.to_lowercase();
        let oracle = self.oracle_text.to_lowercase();

        if type_line.contains("legendary") && type_line.contains("creature") {
            return true;
        }

        const GRANTING_TEXT: [&str; 5] = [
            "can be your commander",
            "partner with",
            "partner",
            "friends forever",
            "choose a background",
        ];
        if GRANTING_TEXT.iter().any(|pattern| oracle.contains(pattern)) {
            return true;
        }

        type_line.contains("planeswalker")
            && COMMANDER_PLANESWALKERS.contains(&self.name.to_lowercase().as_str())
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("card not found in catalog: {name}")]
    NotFound { name: String },
    #[error("catalog rate limited us, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },
    #[error("catalog request failed with HTTP status {status}")]
    Http { status: u16 },
    #[error("catalog network failure: {0}")]
    Network(String),
    #[error("catalog cache failure: {0}")]
    Cache(String),
}

impl CatalogError {
    /// Permanent failures are memoized by clients and never retried in a run.
    pub fn is_permanent(&self) -> bool {
        matches!(self, CatalogError::NotFound { .. })
    }
}

/// Capability interface over the remote card catalog. The engine only ever
/// consumes this trait so it can be exercised with a deterministic fake.
#[async_trait]
pub trait CardCatalog: Send + Sync {
    async fn resolve(&self, name: &str) -> Result<CardProfile, CatalogError>;

    /// Resolve many names at once. Implementations should batch and parallelize;
    /// the default resolves sequentially, which is correct but slow.
    async fn resolve_batch(
        &self,
        names: &[String],
    ) -> BTreeMap<String, Result<CardProfile, CatalogError>> {
        let mut results = BTreeMap::new();
        for name in names {
            let result = self.resolve(name).await;
            results.insert(name.clone(), result);
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::profile;

    #[test]
    fn legality_parses_unknown_status_as_not_legal() {
        assert_eq!(Legality::from_api("Legal"), Legality::Legal);
        assert_eq!(Legality::from_api("mystery"), Legality::NotLegal);
    }

    #[test]
    fn legendary_creature_is_commander_eligible() {
        let card = profile("Atraxa, Praetors' Voice", "Legendary Creature — Phyrexian Angel", &["W", "U", "B", "G"]);
        assert!(card.commander_eligible());
    }

    #[test]
    fn oracle_text_grant_makes_planeswalker_eligible() {
        let mut card = profile("Commodore Guff", "Legendary Planeswalker — Guff", &["U", "R", "W"]);
        card.oracle_text = "Commodore Guff can be your commander.".to_string();
        assert!(card.commander_eligible());
    }

    #[test]
    fn known_commander_product_planeswalker_is_eligible_without_text() {
        let card = profile("Daretti, Scrap Savant", "Legendary Planeswalker — Daretti", &["R"]);
        assert!(card.commander_eligible());
    }

    #[test]
    fn ordinary_spell_is_not_eligible() {
        let card = profile("Counterspell", "Instant", &["U"]);
        assert!(!card.commander_eligible());
    }
}
