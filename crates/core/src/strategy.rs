use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::card::CardType;

/// Named deck-building strategy biasing the target type ratios and the keyword
/// bonus in candidate scoring.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    #[default]
    Balanced,
    Aggro,
    Control,
    Combo,
    Ramp,
}

/// Target fraction of the deck per card type. Non-land fractions are
/// renormalized among themselves when integer targets are computed, so they do
/// not need to sum to one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TypeRatios {
    pub creature: f64,
    pub instant: f64,
    pub sorcery: f64,
    pub artifact: f64,
    pub enchantment: f64,
    pub land: f64,
}

impl TypeRatios {
    pub fn for_type(&self, card_type: CardType) -> f64 {
        match card_type {
            CardType::Creature => self.creature,
            CardType::Instant => self.instant,
            CardType::Sorcery => self.sorcery,
            CardType::Artifact => self.artifact,
            CardType::Enchantment => self.enchantment,
            CardType::Land => self.land,
        }
    }

    pub fn non_land_sum(&self) -> f64 {
        self.creature + self.instant + self.sorcery + self.artifact + self.enchantment
    }
}

impl Strategy {
    pub const ALL: [Strategy; 5] =
        [Strategy::Balanced, Strategy::Aggro, Strategy::Control, Strategy::Combo, Strategy::Ramp];

    pub fn ratios(self) -> TypeRatios {
        match self {
            Strategy::Balanced => TypeRatios {
                creature: 0.30,
                instant: 0.12,
                sorcery: 0.12,
                artifact: 0.15,
                enchantment: 0.08,
                land: 0.38,
            },
            Strategy::Aggro => TypeRatios {
                creature: 0.45,
                instant: 0.15,
                sorcery: 0.08,
                artifact: 0.10,
                enchantment: 0.05,
                land: 0.35,
            },
            Strategy::Control => TypeRatios {
                creature: 0.15,
                instant: 0.25,
                sorcery: 0.20,
                artifact: 0.12,
                enchantment: 0.10,
                land: 0.40,
            },
            Strategy::Combo => TypeRatios {
                creature: 0.20,
                instant: 0.20,
                sorcery: 0.18,
                artifact: 0.15,
                enchantment: 0.12,
                land: 0.37,
            },
            Strategy::Ramp => TypeRatios {
                creature: 0.25,
                instant: 0.10,
                sorcery: 0.15,
                artifact: 0.20,
                enchantment: 0.08,
                land: 0.42,
            },
        }
    }

    /// Name-based strategy affinity used for the 1.1x scoring bonus. This is an
    /// approximate substring heuristic standing in for card-text classification,
    /// not an authoritative signal.
    pub fn matches_name(self, card_name: &str) -> bool {
        let lowered = card_name.to_lowercase();
        let keywords: &[&str] = match self {
            Strategy::Balanced => return false,
            Strategy::Aggro => &[
                "bolt", "haste", "first strike", "double strike", "trample", "attack", "combat",
                "warrior", "soldier",
            ],
            Strategy::Control => &[
                "counter", "draw", "wrath", "destroy", "exile", "bounce", "control", "permission",
                "removal",
            ],
            Strategy::Combo => &[
                "tutor", "search", "protection", "hexproof", "indestructible", "combo", "infinite",
                "engine",
            ],
            Strategy::Ramp => &[
                "mana", "ramp", "cultivate", "sol ring", "signet", "talisman", "dragon", "titan",
                "colossus",
            ],
        };
        keywords.iter().any(|keyword| lowered.contains(keyword))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Balanced => "balanced",
            Strategy::Aggro => "aggro",
            Strategy::Control => "control",
            Strategy::Combo => "combo",
            Strategy::Ramp => "ramp",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown strategy `{0}`, expected one of: balanced, aggro, control, combo, ramp")]
pub struct UnknownStrategy(pub String);

impl FromStr for Strategy {
    type Err = UnknownStrategy;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "balanced" => Ok(Strategy::Balanced),
            "aggro" => Ok(Strategy::Aggro),
            "control" => Ok(Strategy::Control),
            "combo" => Ok(Strategy::Combo),
            "ramp" => Ok(Strategy::Ramp),
            other => Err(UnknownStrategy(other.to_string())),
        }
    }
}
