use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Owned collection keyed by normalized card name. A `BTreeMap` keeps iteration
/// order deterministic, which the selection algorithm relies on for tie-breaks.
pub type Collection = BTreeMap<String, CardEntry>;

/// Normalize a card name into a stable lookup key: case-folded, whitespace
/// collapsed, trailing parenthetical set info and double-faced back names removed.
pub fn normalize_card_name(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    let front = match lowered.split_once("//") {
        Some((front, _)) => front,
        None => lowered.as_str(),
    };
    let stripped = strip_trailing_parenthetical(front.trim_end());
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn strip_trailing_parenthetical(name: &str) -> &str {
    if name.ends_with(')') {
        if let Some(open) = name.rfind('(') {
            return name[..open].trim_end();
        }
    }
    name
}

/// A single owned card with quantity. Immutable after ingestion except for
/// quantity accumulation on duplicate normalized names.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardEntry {
    pub name: String,
    pub quantity: u32,
    pub set_code: String,
    pub normalized_name: String,
}

impl CardEntry {
    pub fn new(name: impl Into<String>, quantity: u32, set_code: impl Into<String>) -> Self {
        let name = name.into();
        let normalized_name = normalize_card_name(&name);
        Self { name, quantity, set_code: set_code.into(), normalized_name }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Color {
    White,
    Blue,
    Black,
    Red,
    Green,
}

impl Color {
    pub const ALL: [Color; 5] =
        [Color::White, Color::Blue, Color::Black, Color::Red, Color::Green];

    pub fn symbol(self) -> char {
        match self {
            Color::White => 'W',
            Color::Blue => 'U',
            Color::Black => 'B',
            Color::Red => 'R',
            Color::Green => 'G',
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol.trim().to_ascii_uppercase().as_str() {
            "W" => Some(Color::White),
            "U" => Some(Color::Blue),
            "B" => Some(Color::Black),
            "R" => Some(Color::Red),
            "G" => Some(Color::Green),
            _ => None,
        }
    }

    pub fn basic_land(self) -> &'static str {
        match self {
            Color::White => "Plains",
            Color::Blue => "Island",
            Color::Black => "Swamp",
            Color::Red => "Mountain",
            Color::Green => "Forest",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Color::White => "white",
            Color::Blue => "blue",
            Color::Black => "black",
            Color::Red => "red",
            Color::Green => "green",
        }
    }

    /// Parse an API color-identity array like `["W", "U"]`, dropping symbols we
    /// do not recognize (e.g. "C" markers some sources emit for colorless).
    pub fn parse_identity(symbols: &[String]) -> Vec<Color> {
        let mut colors: Vec<Color> =
            symbols.iter().filter_map(|s| Color::from_symbol(s)).collect();
        colors.sort();
        colors.dedup();
        colors
    }
}

const BASIC_LAND_NAMES: [&str; 11] = [
    "plains",
    "island",
    "swamp",
    "mountain",
    "forest",
    "wastes",
    "snow-covered plains",
    "snow-covered island",
    "snow-covered swamp",
    "snow-covered mountain",
    "snow-covered forest",
];

/// Basic lands are exempt from the singleton rule.
pub fn is_basic_land(name: &str) -> bool {
    let lowered = name.trim().to_lowercase();
    BASIC_LAND_NAMES.contains(&lowered.as_str())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardType {
    Creature,
    Instant,
    Sorcery,
    Artifact,
    Enchantment,
    Land,
}

impl CardType {
    pub const ALL: [CardType; 6] = [
        CardType::Creature,
        CardType::Instant,
        CardType::Sorcery,
        CardType::Artifact,
        CardType::Enchantment,
        CardType::Land,
    ];

    pub const NON_LAND: [CardType; 5] = [
        CardType::Creature,
        CardType::Instant,
        CardType::Sorcery,
        CardType::Artifact,
        CardType::Enchantment,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CardType::Creature => "creature",
            CardType::Instant => "instant",
            CardType::Sorcery => "sorcery",
            CardType::Artifact => "artifact",
            CardType::Enchantment => "enchantment",
            CardType::Land => "land",
        }
    }

    /// Classify from a catalog type line. Creature wins over artifact and
    /// enchantment so that "Artifact Creature" lands in the creature bucket.
    pub fn from_type_line(type_line: &str) -> Option<Self> {
        let lowered = type_line.to_lowercase();
        if lowered.contains("land") {
            Some(CardType::Land)
        } else if lowered.contains("creature") {
            Some(CardType::Creature)
        } else if lowered.contains("instant") {
            Some(CardType::Instant)
        } else if lowered.contains("sorcery") {
            Some(CardType::Sorcery)
        } else if lowered.contains("artifact") {
            Some(CardType::Artifact)
        } else if lowered.contains("enchantment") {
            Some(CardType::Enchantment)
        } else {
            None
        }
    }

    /// Degraded-confidence classification from name substrings, used only when a
    /// card could not be resolved through the catalog. Defaults to creature.
    pub fn guess_from_name(name: &str) -> Self {
        let lowered = name.to_lowercase();

        const LAND_HINTS: [&str; 10] = [
            "plains", "island", "swamp", "mountain", "forest", "wastes", "command tower",
            "temple", "gate", "haven",
        ];
        if LAND_HINTS.iter().any(|hint| lowered.contains(hint)) {
            return CardType::Land;
        }

        const ARTIFACT_HINTS: [&str; 10] = [
            "sol ring", "signet", "talisman", "mox", "vault", "sphere", "golem", "greaves",
            "boots", "monolith",
        ];
        if ARTIFACT_HINTS.iter().any(|hint| lowered.contains(hint)) {
            return CardType::Artifact;
        }

        const ENCHANTMENT_HINTS: [&str; 6] =
            ["pacifism", "fetters", "aura", "curse", "blessing", "court"];
        if ENCHANTMENT_HINTS.iter().any(|hint| lowered.contains(hint)) {
            return CardType::Enchantment;
        }

        const INSTANT_HINTS: [&str; 4] =
            ["path to exile", "swords to plowshares", "counterspell", "lightning bolt"];
        if INSTANT_HINTS.iter().any(|hint| lowered.contains(hint)) {
            return CardType::Instant;
        }

        const SORCERY_HINTS: [&str; 5] =
            ["wrath of god", "day of judgment", "cultivate", "tutor", "rampant growth"];
        if SORCERY_HINTS.iter().any(|hint| lowered.contains(hint)) {
            return CardType::Sorcery;
        }

        CardType::Creature
    }
}
