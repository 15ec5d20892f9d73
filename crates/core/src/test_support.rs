use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::catalog::{CardCatalog, CardProfile, CatalogError, Legality, COMMANDER_FORMAT};
use crate::domain::card::{normalize_card_name, CardEntry, Collection, Color};

/// Build a commander-legal profile from a name, type line, and identity symbols.
pub(crate) fn profile(name: &str, type_line: &str, identity: &[&str]) -> CardProfile {
    let symbols: Vec<String> = identity.iter().map(|s| s.to_string()).collect();
    let mut legalities = BTreeMap::new();
    legalities.insert(COMMANDER_FORMAT.to_string(), Legality::Legal);
    CardProfile {
        name: name.to_string(),
        color_identity: Color::parse_identity(&symbols),
        mana_cost: String::new(),
        type_line: type_line.to_string(),
        oracle_text: String::new(),
        cmc: 3.0,
        legalities,
        purchase_uris: BTreeMap::new(),
        scryfall_uri: String::new(),
    }
}

pub(crate) fn collection(entries: &[(&str, u32)]) -> Collection {
    let mut map = Collection::new();
    for (name, quantity) in entries {
        let entry = CardEntry::new(*name, *quantity, "");
        map.insert(entry.normalized_name.clone(), entry);
    }
    map
}

/// Deterministic in-memory catalog keyed by normalized name. Cards absent from
/// the map resolve as `NotFound`.
pub(crate) struct FakeCatalog {
    profiles: BTreeMap<String, CardProfile>,
}

impl FakeCatalog {
    pub(crate) fn new(profiles: Vec<CardProfile>) -> Self {
        let map = profiles
            .into_iter()
            .map(|profile| (normalize_card_name(&profile.name), profile))
            .collect();
        Self { profiles: map }
    }
}

#[async_trait]
impl CardCatalog for FakeCatalog {
    async fn resolve(&self, name: &str) -> Result<CardProfile, CatalogError> {
        self.profiles
            .get(&normalize_card_name(name))
            .cloned()
            .ok_or_else(|| CatalogError::NotFound { name: name.to_string() })
    }
}
