//! Primary, quota-driven selection: per-type targets derived from the strategy
//! ratios, greedy fill within each bucket, then cross-type backfill.

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::domain::card::{is_basic_land, CardEntry, CardType};
use crate::domain::recommendation::Recommendation;
use crate::engine::filter::FilteredPool;
use crate::engine::scoring::card_score;
use crate::engine::{BuildConfig, TARGET_BODY_SIZE};

/// Integer per-type targets. Land comes from its override or the land ratio
/// (clamped to the configured bounds); non-land ratios are renormalized among
/// themselves over the remaining budget. If the six targets exceed the body
/// size, the creature bucket absorbs the overflow.
pub fn target_counts(config: &BuildConfig) -> BTreeMap<CardType, usize> {
    let ratios = config.strategy.ratios();
    let mut targets = BTreeMap::new();

    let land = match config.overrides.lands {
        Some(count) => count as usize,
        None => {
            let derived = (TARGET_BODY_SIZE as f64 * ratios.land).round() as usize;
            derived.clamp(config.min_lands as usize, config.max_lands as usize)
        }
    };
    targets.insert(CardType::Land, land);

    // Overridden types are taken at face value and shrink the budget the
    // ratio-derived types are computed from.
    let nonland_budget = TARGET_BODY_SIZE.saturating_sub(land);
    let mut overridden_total = 0usize;
    let mut ratio_sum = 0.0;
    for card_type in CardType::NON_LAND {
        match config.overrides.for_type(card_type) {
            Some(count) => overridden_total += count as usize,
            None => ratio_sum += ratios.for_type(card_type),
        }
    }
    let remaining_budget = nonland_budget.saturating_sub(overridden_total);

    for card_type in CardType::NON_LAND {
        let target = match config.overrides.for_type(card_type) {
            Some(count) => count as usize,
            None if ratio_sum > 0.0 => {
                let share = ratios.for_type(card_type) / ratio_sum;
                (remaining_budget as f64 * share).round() as usize
            }
            None => 0,
        };
        targets.insert(card_type, target);
    }

    let total: usize = targets.values().sum();
    if total > TARGET_BODY_SIZE {
        let overflow = total - TARGET_BODY_SIZE;
        let creatures = targets.entry(CardType::Creature).or_default();
        *creatures = creatures.saturating_sub(overflow);
    }

    targets
}

/// Classify a candidate, preferring the catalog type line; the name heuristic
/// only covers cards the catalog missed.
fn classify(entry: &CardEntry, pool: &FilteredPool) -> CardType {
    pool.profiles
        .get(&entry.normalized_name)
        .and_then(|profile| profile.primary_type())
        .unwrap_or_else(|| CardType::guess_from_name(&entry.name))
}

/// Tracks what has been picked so far, enforcing the singleton rule while
/// letting basic lands repeat up to the owned quantity.
#[derive(Default)]
struct SelectionState {
    selected: Vec<String>,
    copies: BTreeMap<String, u32>,
}

impl SelectionState {
    fn len(&self) -> usize {
        self.selected.len()
    }

    fn is_full(&self) -> bool {
        self.selected.len() >= TARGET_BODY_SIZE
    }

    /// Add one copy if the singleton/size rules allow it.
    fn try_add(&mut self, entry: &CardEntry) -> bool {
        if self.is_full() {
            return false;
        }
        let used = self.copies.get(&entry.normalized_name).copied().unwrap_or(0);
        let limit = if is_basic_land(&entry.name) { entry.quantity } else { 1 };
        if used >= limit {
            return false;
        }
        self.copies.insert(entry.normalized_name.clone(), used + 1);
        self.selected.push(entry.name.clone());
        true
    }
}

/// Build the non-commander body when the filtered pool is ample. Returns up to
/// 99 names, strictly respecting the singleton and size invariants.
pub fn select_primary(
    pool: &FilteredPool,
    recommendations: &BTreeMap<String, Recommendation>,
    config: &BuildConfig,
) -> Vec<String> {
    let targets = target_counts(config);
    info!(strategy = %config.strategy, ?targets, "selecting with per-type targets");

    let mut buckets: BTreeMap<CardType, Vec<&CardEntry>> = BTreeMap::new();
    for entry in pool.cards.values() {
        buckets.entry(classify(entry, pool)).or_default().push(entry);
    }

    let mut state = SelectionState::default();

    for card_type in CardType::ALL {
        let quota = targets.get(&card_type).copied().unwrap_or(0);
        if quota == 0 {
            continue;
        }
        let Some(candidates) = buckets.get(&card_type) else {
            debug!(card_type = card_type.label(), "no candidates available for type");
            continue;
        };

        let mut scored: Vec<(&CardEntry, f64)> = candidates
            .iter()
            .map(|entry| {
                let rec = recommendations.get(&entry.normalized_name);
                (*entry, card_score(entry, rec, config.weights(), config.strategy))
            })
            .collect();
        // Stable sort keeps collection order as the tie-break.
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        let mut taken = 0usize;
        for (entry, score) in &scored {
            if taken >= quota || state.is_full() {
                break;
            }
            if is_basic_land(&entry.name) {
                // Basics may repeat; take as many owned copies as the quota allows.
                while taken < quota && state.try_add(entry) {
                    taken += 1;
                }
            } else if state.try_add(entry) {
                debug!(card = %entry.name, score, card_type = card_type.label(), "selected");
                taken += 1;
            }
        }
        info!(card_type = card_type.label(), taken, quota, "type bucket filled");
    }

    backfill(pool, recommendations, config, &mut state);

    debug_assert!(state.len() <= TARGET_BODY_SIZE);
    state.selected
}

/// Fill remaining slots from the whole pool by score, all types combined.
fn backfill(
    pool: &FilteredPool,
    recommendations: &BTreeMap<String, Recommendation>,
    config: &BuildConfig,
    state: &mut SelectionState,
) {
    if state.is_full() {
        return;
    }
    let remaining = TARGET_BODY_SIZE - state.len();
    info!(remaining, "backfilling remaining slots from full pool");

    let mut scored: Vec<(&CardEntry, f64)> = pool
        .cards
        .values()
        .map(|entry| {
            let rec = recommendations.get(&entry.normalized_name);
            (entry, card_score(entry, rec, config.weights(), config.strategy))
        })
        .collect();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    for (entry, _) in scored {
        if state.is_full() {
            break;
        }
        if is_basic_land(&entry.name) {
            while !state.is_full() && state.try_add(entry) {}
        } else {
            state.try_add(entry);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::card::Collection;
    use crate::engine::{BuildConfig, TypeOverrides};
    use crate::strategy::Strategy;
    use crate::test_support::profile;

    fn pool_of(cards: &[(&str, u32, &str)]) -> FilteredPool {
        let mut pool = FilteredPool::default();
        let mut collection = Collection::new();
        for (name, quantity, type_line) in cards {
            let entry = CardEntry::new(*name, *quantity, "");
            pool.profiles
                .insert(entry.normalized_name.clone(), profile(name, type_line, &[]));
            collection.insert(entry.normalized_name.clone(), entry);
        }
        pool.cards = collection;
        pool
    }

    fn big_pool() -> FilteredPool {
        let mut cards: Vec<(String, u32, &str)> = Vec::new();
        for i in 0..40 {
            cards.push((format!("Creature {i}"), 1, "Creature — Beast"));
        }
        for i in 0..20 {
            cards.push((format!("Trick {i}"), 1, "Instant"));
        }
        for i in 0..20 {
            cards.push((format!("Ritual {i}"), 1, "Sorcery"));
        }
        for i in 0..20 {
            cards.push((format!("Trinket {i}"), 1, "Artifact"));
        }
        for i in 0..15 {
            cards.push((format!("Pact {i}"), 1, "Enchantment"));
        }
        for i in 0..45 {
            cards.push((format!("Locale {i}"), 1, "Land"));
        }
        let borrowed: Vec<(&str, u32, &str)> =
            cards.iter().map(|(n, q, t)| (n.as_str(), *q, *t)).collect();
        pool_of(&borrowed)
    }

    #[test]
    fn balanced_targets_round_to_expected_counts() {
        let config = BuildConfig::default();
        let targets = target_counts(&config);
        // round(99 * 0.38) = 38 lands, leaving 61 non-land slots.
        assert_eq!(targets[&CardType::Land], 38);
        let total: usize = targets.values().sum();
        assert!(total <= TARGET_BODY_SIZE);
    }

    #[test]
    fn land_override_rebudgets_nonland_types() {
        let config = BuildConfig {
            overrides: TypeOverrides { lands: Some(30), ..TypeOverrides::default() },
            ..BuildConfig::default()
        };
        let targets = target_counts(&config);
        assert_eq!(targets[&CardType::Land], 30);
        let nonland: usize =
            CardType::NON_LAND.iter().map(|t| targets[t]).sum();
        assert!(nonland <= 69);
    }

    #[test]
    fn overflow_is_shaved_from_the_creature_bucket() {
        let config = BuildConfig {
            overrides: TypeOverrides {
                creatures: Some(40),
                instants: Some(30),
                sorceries: Some(30),
                artifacts: Some(10),
                enchantments: Some(10),
                lands: Some(10),
            },
            ..BuildConfig::default()
        };
        let targets = target_counts(&config);
        let total: usize = targets.values().sum();
        assert_eq!(total, TARGET_BODY_SIZE);
        assert!(targets[&CardType::Creature] < 40);
    }

    #[test]
    fn ample_pool_fills_the_whole_body() {
        let pool = big_pool();
        let selected = select_primary(&pool, &BTreeMap::new(), &BuildConfig::default());
        assert_eq!(selected.len(), TARGET_BODY_SIZE);

        let mut seen = std::collections::BTreeSet::new();
        for name in &selected {
            assert!(seen.insert(name.to_lowercase()), "duplicate non-basic {name}");
        }
    }

    #[test]
    fn selection_is_deterministic() {
        let pool = big_pool();
        let config = BuildConfig { strategy: Strategy::Control, ..BuildConfig::default() };
        let first = select_primary(&pool, &BTreeMap::new(), &config);
        let second = select_primary(&pool, &BTreeMap::new(), &config);
        assert_eq!(first, second);
    }

    #[test]
    fn creature_override_is_honored_up_to_availability() {
        let pool = big_pool();
        let config = BuildConfig {
            overrides: TypeOverrides { creatures: Some(40), ..TypeOverrides::default() },
            ..BuildConfig::default()
        };
        let selected = select_primary(&pool, &BTreeMap::new(), &config);
        let creatures =
            selected.iter().filter(|name| name.starts_with("Creature")).count();
        assert_eq!(creatures, 40);
    }

    #[test]
    fn empty_bucket_shortfall_is_absorbed_by_backfill() {
        // No instants at all; their quota should flow to other types.
        let mut cards: Vec<(String, u32, &str)> = Vec::new();
        for i in 0..70 {
            cards.push((format!("Creature {i}"), 1, "Creature — Beast"));
        }
        for i in 0..45 {
            cards.push((format!("Locale {i}"), 1, "Land"));
        }
        let borrowed: Vec<(&str, u32, &str)> =
            cards.iter().map(|(n, q, t)| (n.as_str(), *q, *t)).collect();
        let pool = pool_of(&borrowed);

        let selected = select_primary(&pool, &BTreeMap::new(), &BuildConfig::default());
        assert_eq!(selected.len(), TARGET_BODY_SIZE);
    }

    #[test]
    fn recommended_cards_outrank_unrecommended_peers() {
        let pool = pool_of(&[
            ("Alpha Beast", 1, "Creature — Beast"),
            ("Zeta Beast", 1, "Creature — Beast"),
        ]);
        let mut recs = BTreeMap::new();
        recs.insert(
            "zeta beast".to_string(),
            Recommendation::new("Zeta Beast", 0.9, "synergy", 50.0),
        );
        let selected = select_primary(&pool, &recs, &BuildConfig::default());
        assert_eq!(selected.first().map(String::as_str), Some("Zeta Beast"));
    }

    #[test]
    fn basic_lands_repeat_up_to_owned_quantity() {
        let mut cards: Vec<(String, u32, &str)> = vec![("Island".to_string(), 5, "Basic Land — Island")];
        for i in 0..10 {
            cards.push((format!("Creature {i}"), 1, "Creature — Beast"));
        }
        let borrowed: Vec<(&str, u32, &str)> =
            cards.iter().map(|(n, q, t)| (n.as_str(), *q, *t)).collect();
        let pool = pool_of(&borrowed);

        let selected = select_primary(&pool, &BTreeMap::new(), &BuildConfig::default());
        let islands = selected.iter().filter(|name| *name == "Island").count();
        assert_eq!(islands, 5);
    }
}
