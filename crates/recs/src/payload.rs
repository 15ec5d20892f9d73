//! Wire representation of an EDHREC commander page, reduced to the card lists
//! the scorer consumes.

use serde::{Deserialize, Serialize};

use decksmith_core::Recommendation;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct CommanderPage {
    #[serde(default)]
    pub container: Container,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Container {
    #[serde(default)]
    pub json_dict: JsonDict,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct JsonDict {
    #[serde(default)]
    pub cardlists: Vec<CardList>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct CardList {
    #[serde(default)]
    pub header: String,
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub cardviews: Vec<CardView>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CardView {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub inclusion_percentage: Option<f64>,
}

/// Map an EDHREC section to one of our recommendation categories.
pub fn categorize(header: &str, tag: &str) -> &'static str {
    let header = header.to_lowercase();
    let tag = tag.to_lowercase();

    if header.contains("high synergy") || tag.contains("synergy") {
        "synergy"
    } else if header.contains("top cards") || tag.contains("staple") {
        "staple"
    } else if header.contains("creature") || tag.contains("creature") {
        "creature"
    } else if header.contains("instant") || tag.contains("instant") {
        "instant"
    } else if header.contains("sorcery") || tag.contains("sorcery") {
        "sorcery"
    } else if header.contains("artifact") || tag.contains("artifact") {
        "artifact"
    } else if header.contains("enchantment") || tag.contains("enchantment") {
        "enchantment"
    } else if header.contains("land") || tag.contains("land") {
        "land"
    } else if header.contains("planeswalker") || tag.contains("planeswalker") {
        "planeswalker"
    } else if header.contains("budget") || tag.contains("budget") {
        "budget"
    } else {
        "other"
    }
}

fn category_base_score(category: &str) -> f64 {
    match category {
        "synergy" => 0.85,
        "staple" => 0.90,
        "creature" => 0.75,
        "instant" => 0.70,
        "sorcery" => 0.70,
        "artifact" => 0.80,
        "enchantment" => 0.75,
        "land" => 0.65,
        "planeswalker" => 0.80,
        "budget" => 0.60,
        _ => 0.50,
    }
}

/// Category base score plus up to 0.2 for broad inclusion across decks.
pub fn synergy_score(card: &CardView, category: &str) -> f64 {
    let base = category_base_score(category);
    let inclusion = card.inclusion_percentage.unwrap_or(0.0);
    let fraction = if inclusion > 1.0 { inclusion / 100.0 } else { inclusion };
    (base + fraction.clamp(0.0, 1.0) * 0.2).min(1.0)
}

impl CommanderPage {
    /// Flatten all card lists into scored recommendations.
    pub fn into_recommendations(self) -> Vec<Recommendation> {
        let mut recommendations = Vec::new();
        for cardlist in self.container.json_dict.cardlists {
            let category = categorize(&cardlist.header, &cardlist.tag);
            for card in cardlist.cardviews {
                if card.name.is_empty() {
                    continue;
                }
                let synergy = synergy_score(&card, category);
                let inclusion = card.inclusion_percentage.unwrap_or(0.0);
                let inclusion = if inclusion <= 1.0 { inclusion * 100.0 } else { inclusion };
                recommendations.push(Recommendation::new(&card.name, synergy, category, inclusion));
            }
        }
        recommendations
    }
}
