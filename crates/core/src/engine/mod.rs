//! Deck assembly engine. `DeckBuilder` is the single entry point: it validates
//! the commander, filters the collection, then either runs quota-driven
//! selection or the fallback chain depending on how deep the candidate pool is.

mod fallback;
mod filter;
mod scoring;
mod selection;

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::catalog::{CardCatalog, CardProfile};
use crate::domain::card::{normalize_card_name, CardType, Collection};
use crate::domain::deck::{Deck, DECK_SIZE};
use crate::domain::recommendation::Recommendation;
use crate::domain::stats::DeckStatistics;
use crate::errors::BuildError;
use crate::strategy::Strategy;

pub use fallback::generate_basic_lands;
pub use filter::{filter_collection, FilteredPool};
pub use scoring::{availability_score, card_score, quality_estimate, ScoreWeights};
pub use selection::{select_primary, target_counts};

/// Cards in the deck body, excluding the commander.
pub const TARGET_BODY_SIZE: usize = 99;

/// Per-type count overrides supplied by the user. `None` means the strategy
/// ratio decides.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TypeOverrides {
    pub creatures: Option<u32>,
    pub instants: Option<u32>,
    pub sorceries: Option<u32>,
    pub artifacts: Option<u32>,
    pub enchantments: Option<u32>,
    pub lands: Option<u32>,
}

impl TypeOverrides {
    pub fn for_type(&self, card_type: CardType) -> Option<u32> {
        match card_type {
            CardType::Creature => self.creatures,
            CardType::Instant => self.instants,
            CardType::Sorcery => self.sorceries,
            CardType::Artifact => self.artifacts,
            CardType::Enchantment => self.enchantments,
            CardType::Land => self.lands,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BuildConfig {
    pub strategy: Strategy,
    pub synergy_weight: f64,
    pub availability_weight: f64,
    pub min_lands: u32,
    pub max_lands: u32,
    pub overrides: TypeOverrides,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::Balanced,
            synergy_weight: 0.7,
            availability_weight: 0.3,
            min_lands: 35,
            max_lands: 40,
            overrides: TypeOverrides::default(),
        }
    }
}

impl BuildConfig {
    pub fn weights(&self) -> ScoreWeights {
        ScoreWeights { synergy: self.synergy_weight, availability: self.availability_weight }
    }
}

/// The fallback stages, in the order they run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FallbackStage {
    Recommended,
    Fill,
    LandPad,
}

impl std::fmt::Display for FallbackStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            FallbackStage::Recommended => "RECOMMENDED",
            FallbackStage::Fill => "FILL",
            FallbackStage::LandPad => "LAND_PAD",
        };
        f.write_str(label)
    }
}

/// What the fallback path had to do to reach a full deck. Only produced when
/// the filtered pool could not support quota-driven selection.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationReport {
    pub total_available: usize,
    pub target_size: usize,
    pub achieved_size: usize,
    pub missing_cards: usize,
    pub fallback_stages_used: Vec<FallbackStage>,
    pub recommendations_used: usize,
    pub recommendations_available: usize,
}

impl GenerationReport {
    pub fn new(total_available: usize, recommendations_available: usize) -> Self {
        Self {
            total_available,
            target_size: DECK_SIZE,
            recommendations_available,
            ..Default::default()
        }
    }
}

/// A finished build: the deck, its statistics, the profiles resolved along the
/// way, and a generation report when the fallback path ran.
#[derive(Clone, Debug)]
pub struct BuildOutcome {
    pub deck: Deck,
    pub statistics: DeckStatistics,
    pub report: Option<GenerationReport>,
    pub profiles: BTreeMap<String, CardProfile>,
}

/// A recommended card the user does not own, resolved for display with
/// purchase links.
#[derive(Clone, Debug, Serialize)]
pub struct PurchaseSuggestion {
    pub name: String,
    pub synergy: f64,
    pub category: String,
    pub purchase_uris: BTreeMap<String, String>,
    pub scryfall_uri: String,
}

pub struct DeckBuilder {
    config: BuildConfig,
    catalog: Arc<dyn CardCatalog>,
}

impl DeckBuilder {
    pub fn new(config: BuildConfig, catalog: Arc<dyn CardCatalog>) -> Self {
        Self { config, catalog }
    }

    /// Assemble a deck for `commander` from `collection`. Input errors are the
    /// only failures; an insufficient collection degrades through the fallback
    /// chain and reports what happened rather than erroring.
    pub async fn build(
        &self,
        commander: &str,
        collection: &Collection,
        recommendations: &[Recommendation],
    ) -> Result<BuildOutcome, BuildError> {
        if collection.is_empty() {
            return Err(BuildError::EmptyCollection);
        }
        let commander_normalized = normalize_card_name(commander);
        let commander_entry = collection
            .get(&commander_normalized)
            .ok_or_else(|| BuildError::CommanderNotInCollection(commander.to_string()))?;
        let commander_name = commander_entry.name.clone();

        // The commander profile drives color identity and eligibility. When the
        // catalog cannot resolve it the build continues with a colorless
        // identity, which restricts the pool rather than widening it.
        let commander_profile = match self.catalog.resolve(&commander_name).await {
            Ok(profile) => {
                if !profile.commander_eligible() {
                    return Err(BuildError::IneligibleCommander {
                        name: commander_name,
                        reason: "not a legendary creature and no text grants command".to_string(),
                    });
                }
                Some(profile)
            }
            Err(error) => {
                warn!(commander = %commander_name, %error, "commander unresolved, assuming colorless identity");
                None
            }
        };
        let colors = commander_profile
            .as_ref()
            .map(|profile| profile.color_identity.clone())
            .unwrap_or_default();

        let rec_map: BTreeMap<String, Recommendation> = recommendations
            .iter()
            .map(|rec| (normalize_card_name(&rec.name), rec.clone()))
            .collect();

        let pool =
            filter_collection(self.catalog.as_ref(), collection, &commander_normalized, &colors)
                .await;

        let mut report = None;
        let selected = if pool.cards.len() >= TARGET_BODY_SIZE {
            info!(candidates = pool.cards.len(), "pool is ample, running quota selection");
            select_primary(&pool, &rec_map, &self.config)
        } else {
            info!(
                candidates = pool.cards.len(),
                needed = TARGET_BODY_SIZE,
                "pool too shallow for quota selection, entering fallback chain"
            );
            let mut fallback_report = GenerationReport::new(pool.cards.len(), rec_map.len());
            let selected = fallback::select_with_fallback(
                &pool,
                &rec_map,
                &colors,
                &mut fallback_report,
            );
            report = Some(fallback_report);
            selected
        };

        let mut deck = Deck::new(&commander_name, colors);
        for name in &selected {
            deck.add_card(name);
        }
        if let Some(report) = report.as_mut() {
            report.achieved_size = deck.total_cards();
            report.missing_cards = DECK_SIZE.saturating_sub(deck.total_cards());
        }
        debug_assert!(deck.total_cards() <= DECK_SIZE);

        let mut profiles = pool.profiles;
        if let Some(profile) = commander_profile {
            profiles.insert(commander_normalized, profile);
        }
        let statistics = DeckStatistics::compute(&deck, &profiles);
        info!(
            commander = %deck.commander,
            cards = deck.total_cards(),
            fallback = report.is_some(),
            "deck assembly complete"
        );

        Ok(BuildOutcome { deck, statistics, report, profiles })
    }
}

/// Resolve the strongest recommended cards absent from the collection, for the
/// "consider acquiring" section of the output. Unresolvable names are skipped.
pub async fn purchase_suggestions(
    catalog: &dyn CardCatalog,
    recommendations: &[Recommendation],
    collection: &Collection,
    limit: usize,
) -> Vec<PurchaseSuggestion> {
    let mut missing: Vec<&Recommendation> = recommendations
        .iter()
        .filter(|rec| !collection.contains_key(&normalize_card_name(&rec.name)))
        .collect();
    missing.sort_by(|a, b| b.synergy.partial_cmp(&a.synergy).unwrap_or(std::cmp::Ordering::Equal));

    let mut suggestions = Vec::new();
    for rec in missing {
        if suggestions.len() >= limit {
            break;
        }
        match catalog.resolve(&rec.name).await {
            Ok(profile) => suggestions.push(PurchaseSuggestion {
                name: profile.name,
                synergy: rec.synergy,
                category: rec.category.clone(),
                purchase_uris: profile.purchase_uris,
                scryfall_uri: profile.scryfall_uri,
            }),
            Err(error) => {
                warn!(card = %rec.name, %error, "skipping unresolvable purchase suggestion");
            }
        }
    }
    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::card::CardEntry;
    use crate::test_support::{collection, profile, FakeCatalog};

    fn commander_profile() -> CardProfile {
        profile("Verdant Warlord", "Legendary Creature — Elf Warrior", &["G", "W"])
    }

    /// A two-color collection deep enough for quota selection, plus catalog
    /// profiles for every card in it.
    fn ample_fixture() -> (Collection, FakeCatalog) {
        let mut owned = Collection::new();
        let mut profiles = vec![commander_profile()];
        let mut push = |name: String, quantity: u32, type_line: &str, identity: &[&str]| {
            let entry = CardEntry::new(&name, quantity, "");
            profiles.push(profile(&name, type_line, identity));
            owned.insert(entry.normalized_name.clone(), entry);
        };

        push("Verdant Warlord".to_string(), 1, "Legendary Creature — Elf Warrior", &["G", "W"]);
        for i in 0..40 {
            push(format!("Grove Beast {i}"), 1, "Creature — Beast", &["G"]);
        }
        for i in 0..15 {
            push(format!("Swift Response {i}"), 1, "Instant", &["W"]);
        }
        for i in 0..15 {
            push(format!("Verdant Rite {i}"), 1, "Sorcery", &["G"]);
        }
        for i in 0..15 {
            push(format!("Relic {i}"), 1, "Artifact", &[]);
        }
        for i in 0..10 {
            push(format!("Oath {i}"), 1, "Enchantment", &["W"]);
        }
        for i in 0..45 {
            push(format!("Grove {i}"), 1, "Land", &[]);
        }
        (owned, FakeCatalog::new(profiles))
    }

    #[tokio::test]
    async fn ample_collection_builds_a_full_deck_without_fallback() {
        let (owned, catalog) = ample_fixture();
        let builder = DeckBuilder::new(BuildConfig::default(), Arc::new(catalog));

        let outcome =
            builder.build("Verdant Warlord", &owned, &[]).await.unwrap();
        assert_eq!(outcome.deck.total_cards(), DECK_SIZE);
        assert!(outcome.report.is_none());

        let validation = outcome.deck.validate(Some(&outcome.profiles));
        assert!(validation.is_valid(), "violations: {:?}", validation.violations);
    }

    #[tokio::test]
    async fn shallow_collection_falls_back_and_reports() {
        let mut owned = Collection::new();
        let mut profiles = vec![commander_profile()];
        for i in 0..19 {
            let name = format!("Grove Beast {i}");
            profiles.push(profile(&name, "Creature — Beast", &["G"]));
            let entry = CardEntry::new(&name, 1, "");
            owned.insert(entry.normalized_name.clone(), entry);
        }
        let entry = CardEntry::new("Verdant Warlord", 1, "");
        owned.insert(entry.normalized_name.clone(), entry);

        let builder =
            DeckBuilder::new(BuildConfig::default(), Arc::new(FakeCatalog::new(profiles)));
        let outcome = builder.build("Verdant Warlord", &owned, &[]).await.unwrap();

        assert_eq!(outcome.deck.total_cards(), DECK_SIZE);
        let report = outcome.report.expect("fallback must produce a report");
        assert_eq!(report.achieved_size, DECK_SIZE);
        assert_eq!(report.missing_cards, 0);
        assert!(report.fallback_stages_used.contains(&FallbackStage::LandPad));

        let forests = outcome.deck.cards.iter().filter(|name| *name == "Forest").count();
        let plains = outcome.deck.cards.iter().filter(|name| *name == "Plains").count();
        assert!(forests >= 8 && plains >= 8);
    }

    #[tokio::test]
    async fn colorless_commander_pads_with_wastes() {
        let mut owned = Collection::new();
        let commander = profile(
            "Chrome Overseer",
            "Legendary Creature — Golem",
            &[],
        );
        let entry = CardEntry::new("Chrome Overseer", 1, "");
        owned.insert(entry.normalized_name.clone(), entry);
        let entry = CardEntry::new("Relic of Old", 1, "");
        owned.insert(entry.normalized_name.clone(), entry);

        let catalog = FakeCatalog::new(vec![commander, profile("Relic of Old", "Artifact", &[])]);
        let builder = DeckBuilder::new(BuildConfig::default(), Arc::new(catalog));
        let outcome = builder.build("Chrome Overseer", &owned, &[]).await.unwrap();

        let wastes = outcome.deck.cards.iter().filter(|name| *name == "Wastes").count();
        assert!(wastes >= 20);
    }

    #[tokio::test]
    async fn recommended_but_unowned_cards_are_never_selected() {
        let (owned, catalog) = ample_fixture();
        let builder = DeckBuilder::new(BuildConfig::default(), Arc::new(catalog));

        let recs = vec![Recommendation::new("Sol Ring", 0.95, "staple", 87.0)];
        let outcome = builder.build("Verdant Warlord", &owned, &recs).await.unwrap();
        assert!(!outcome.deck.cards.iter().any(|name| name == "Sol Ring"));
    }

    #[tokio::test]
    async fn builds_are_deterministic() {
        let (owned, catalog) = ample_fixture();
        let catalog = Arc::new(catalog);
        let builder = DeckBuilder::new(BuildConfig::default(), catalog.clone());

        let first = builder.build("Verdant Warlord", &owned, &[]).await.unwrap();
        let second = builder.build("Verdant Warlord", &owned, &[]).await.unwrap();
        assert_eq!(first.deck.cards, second.deck.cards);
    }

    #[tokio::test]
    async fn missing_commander_is_an_input_error() {
        let (owned, catalog) = ample_fixture();
        let builder = DeckBuilder::new(BuildConfig::default(), Arc::new(catalog));

        let error = builder.build("Nonexistent Leader", &owned, &[]).await.unwrap_err();
        assert!(matches!(error, BuildError::CommanderNotInCollection(_)));
    }

    #[tokio::test]
    async fn empty_collection_is_an_input_error() {
        let (_, catalog) = ample_fixture();
        let builder = DeckBuilder::new(BuildConfig::default(), Arc::new(catalog));

        let error = builder.build("Verdant Warlord", &Collection::new(), &[]).await.unwrap_err();
        assert!(matches!(error, BuildError::EmptyCollection));
    }

    #[tokio::test]
    async fn noncommander_card_is_rejected_as_leader() {
        let mut owned = Collection::new();
        let entry = CardEntry::new("Counterspell", 1, "");
        owned.insert(entry.normalized_name.clone(), entry);

        let catalog = FakeCatalog::new(vec![profile("Counterspell", "Instant", &["U"])]);
        let builder = DeckBuilder::new(BuildConfig::default(), Arc::new(catalog));

        let error = builder.build("Counterspell", &owned, &[]).await.unwrap_err();
        assert!(matches!(error, BuildError::IneligibleCommander { .. }));
    }

    #[tokio::test]
    async fn purchase_suggestions_skip_owned_cards() {
        let catalog = FakeCatalog::new(vec![
            profile("Sol Ring", "Artifact", &[]),
            profile("Arcane Signet", "Artifact", &[]),
        ]);
        let owned = collection(&[("Sol Ring", 1)]);
        let recs = vec![
            Recommendation::new("Sol Ring", 0.95, "staple", 87.0),
            Recommendation::new("Arcane Signet", 0.93, "staple", 85.0),
        ];

        let suggestions = purchase_suggestions(&catalog, &recs, &owned, 10).await;
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].name, "Arcane Signet");
    }
}
