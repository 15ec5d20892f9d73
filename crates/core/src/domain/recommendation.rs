use serde::{Deserialize, Serialize};

/// A community recommendation for a commander: how strongly a card synergizes
/// with the commander and how often it is actually played alongside it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub name: String,
    /// Synergy weight in [0, 1].
    pub synergy: f64,
    /// Source category tag, e.g. "staple", "synergy", "ramp".
    pub category: String,
    /// Inclusion frequency in [0, 100].
    pub inclusion_rate: f64,
}

impl Recommendation {
    pub fn new(
        name: impl Into<String>,
        synergy: f64,
        category: impl Into<String>,
        inclusion_rate: f64,
    ) -> Self {
        Self {
            name: name.into(),
            synergy: synergy.clamp(0.0, 1.0),
            category: category.into(),
            inclusion_rate: inclusion_rate.clamp(0.0, 100.0),
        }
    }
}
