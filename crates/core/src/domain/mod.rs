pub mod card;
pub mod deck;
pub mod recommendation;
pub mod stats;
