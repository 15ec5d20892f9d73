//! Wire representation of a Scryfall card object, reduced to the fields the
//! engine consumes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use decksmith_core::{CardProfile, Color, Legality};

/// One face of a double-faced or split card.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CardFace {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub mana_cost: String,
    #[serde(default)]
    pub type_line: String,
    #[serde(default)]
    pub oracle_text: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ScryfallCard {
    pub name: String,
    #[serde(default)]
    pub mana_cost: Option<String>,
    #[serde(default)]
    pub type_line: Option<String>,
    #[serde(default)]
    pub oracle_text: Option<String>,
    #[serde(default)]
    pub cmc: Option<f64>,
    #[serde(default)]
    pub color_identity: Vec<String>,
    #[serde(default)]
    pub legalities: BTreeMap<String, String>,
    #[serde(default)]
    pub purchase_uris: BTreeMap<String, String>,
    #[serde(default)]
    pub scryfall_uri: Option<String>,
    #[serde(default)]
    pub card_faces: Vec<CardFace>,
}

impl ScryfallCard {
    /// Flatten the wire object into the engine's profile. Multi-faced cards
    /// take top-level fields when present and fall back to the front face.
    pub fn into_profile(self) -> CardProfile {
        let front = self.card_faces.first();

        let mana_cost = self
            .mana_cost
            .filter(|cost| !cost.is_empty())
            .or_else(|| front.map(|face| face.mana_cost.clone()))
            .unwrap_or_default();
        let type_line = self
            .type_line
            .filter(|line| !line.is_empty())
            .or_else(|| front.map(|face| face.type_line.clone()))
            .unwrap_or_default();
        let oracle_text = match self.oracle_text {
            Some(text) if !text.is_empty() => text,
            _ => self
                .card_faces
                .iter()
                .map(|face| face.oracle_text.as_str())
                .filter(|text| !text.is_empty())
                .collect::<Vec<_>>()
                .join("\n//\n"),
        };

        let legalities = self
            .legalities
            .into_iter()
            .map(|(format, status)| (format, Legality::from_api(&status)))
            .collect();

        CardProfile {
            name: self.name,
            color_identity: Color::parse_identity(&self.color_identity),
            mana_cost,
            type_line,
            oracle_text,
            cmc: self.cmc.unwrap_or(0.0),
            legalities,
            purchase_uris: self.purchase_uris,
            scryfall_uri: self.scryfall_uri.unwrap_or_default(),
        }
    }
}
