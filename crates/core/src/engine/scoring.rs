//! Candidate scoring: a weighted blend of community synergy and ownership depth,
//! with a small strategy-affinity bonus. Pure and deterministic.

use crate::domain::card::CardEntry;
use crate::domain::recommendation::Recommendation;
use crate::strategy::Strategy;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoreWeights {
    pub synergy: f64,
    pub availability: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self { synergy: 0.7, availability: 0.3 }
    }
}

/// Owning 4+ copies counts as maximally available; depth of ownership is
/// rewarded without unbounded effect.
pub fn availability_score(quantity: u32) -> f64 {
    (f64::from(quantity) / 4.0).min(1.0)
}

pub fn card_score(
    entry: &CardEntry,
    recommendation: Option<&Recommendation>,
    weights: ScoreWeights,
    strategy: Strategy,
) -> f64 {
    let synergy = recommendation.map_or(0.0, |rec| rec.synergy);
    let mut score =
        weights.synergy * synergy + weights.availability * availability_score(entry.quantity);
    if strategy.matches_name(&entry.name) {
        score *= 1.1;
    }
    score
}

/// Coarse quality heuristic for the FILL fallback stage, when no recommendation
/// data covers a card. Name-keyword based and intentionally approximate.
pub fn quality_estimate(name: &str) -> f64 {
    let lowered = name.to_lowercase();
    let mut quality: f64 = 0.5;

    const STRONG_HINTS: [&str; 5] = ["legendary", "mythic", "rare", "powerful", "ancient"];
    if STRONG_HINTS.iter().any(|hint| lowered.contains(hint)) {
        quality += 0.3;
    }

    const UTILITY_HINTS: [&str; 5] = ["draw", "search", "tutor", "ramp", "removal"];
    if UTILITY_HINTS.iter().any(|hint| lowered.contains(hint)) {
        quality += 0.2;
    }

    const WEAK_HINTS: [&str; 4] = ["token", "basic", "common", "vanilla"];
    if WEAK_HINTS.iter().any(|hint| lowered.contains(hint)) {
        quality -= 0.2;
    }

    quality.clamp(0.0, 1.0)
}
