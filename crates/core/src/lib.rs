pub mod catalog;
pub mod config;
pub mod domain;
pub mod engine;
pub mod errors;
pub mod recs;
pub mod strategy;

#[cfg(test)]
pub(crate) mod test_support;

pub use catalog::{CardCatalog, CardProfile, CatalogError, Legality, COMMANDER_FORMAT};
pub use domain::card::{
    is_basic_land, normalize_card_name, CardEntry, CardType, Collection, Color,
};
pub use domain::deck::{Deck, DeckValidation};
pub use domain::recommendation::Recommendation;
pub use domain::stats::DeckStatistics;
pub use engine::{
    purchase_suggestions, BuildConfig, BuildOutcome, DeckBuilder, FallbackStage,
    GenerationReport, PurchaseSuggestion, TypeOverrides, TARGET_BODY_SIZE,
};
pub use errors::{ApplicationError, BuildError};
pub use recs::{static_staples, RecommendationSource, RecsError};
pub use strategy::{Strategy, TypeRatios, UnknownStrategy};
