use async_trait::async_trait;
use thiserror::Error;

use crate::domain::recommendation::Recommendation;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RecsError {
    #[error("recommendation source unavailable: {0}")]
    SourceUnavailable(String),
    #[error("recommendation payload could not be parsed: {0}")]
    Parse(String),
}

/// Capability interface over the community recommendation source. On
/// `SourceUnavailable` the engine's callers substitute `static_staples()`.
#[async_trait]
pub trait RecommendationSource: Send + Sync {
    async fn recommendations_for(
        &self,
        commander_name: &str,
    ) -> Result<Vec<Recommendation>, RecsError>;
}

/// Generic staples that perform in nearly any deck, used when the
/// recommendation source is down. Content is a curated constant, not logic.
pub fn static_staples() -> Vec<Recommendation> {
    const STAPLES: [(&str, f64, &str, f64); 12] = [
        ("Sol Ring", 0.95, "staple", 85.0),
        ("Command Tower", 0.90, "staple", 80.0),
        ("Lightning Greaves", 0.85, "staple", 70.0),
        ("Swiftfoot Boots", 0.80, "staple", 65.0),
        ("Arcane Signet", 0.85, "staple", 75.0),
        ("Cultivate", 0.75, "ramp", 60.0),
        ("Kodama's Reach", 0.75, "ramp", 58.0),
        ("Swords to Plowshares", 0.80, "removal", 55.0),
        ("Path to Exile", 0.78, "removal", 52.0),
        ("Counterspell", 0.70, "control", 45.0),
        ("Rhystic Study", 0.88, "draw", 68.0),
        ("Mystic Remora", 0.82, "draw", 62.0),
    ];

    STAPLES
        .iter()
        .map(|(name, synergy, category, inclusion)| {
            Recommendation::new(*name, *synergy, *category, *inclusion)
        })
        .collect()
}
