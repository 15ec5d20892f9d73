//! Check one card's Commander-format legality and whether it can lead a deck.

use std::sync::Arc;

use decksmith_catalog::ScryfallClient;
use decksmith_core::config::AppConfig;
use decksmith_core::{CardCatalog, CatalogError, COMMANDER_FORMAT};

use super::CommandResult;

pub async fn run(config: &AppConfig, card: &str) -> CommandResult {
    let catalog = match ScryfallClient::new(&config.catalog) {
        Ok(client) => Arc::new(client) as Arc<dyn CardCatalog>,
        Err(error) => return CommandResult::failure(format!("card catalog unavailable: {error}")),
    };
    execute(card, catalog).await
}

pub async fn execute(card: &str, catalog: Arc<dyn CardCatalog>) -> CommandResult {
    let profile = match catalog.resolve(card).await {
        Ok(profile) => profile,
        Err(CatalogError::NotFound { name }) => {
            return CommandResult::input_error(format!("no card matches '{name}'"))
        }
        Err(error) => return CommandResult::failure(error.to_string()),
    };

    let legality = if profile.is_legal_in(COMMANDER_FORMAT) { "legal" } else { "not legal" };
    let leads = if profile.commander_eligible() { "yes" } else { "no" };

    CommandResult::success(format!(
        "{}\n  Type: {}\n  Commander format: {legality}\n  Can lead a deck: {leads}",
        profile.name, profile.type_line,
    ))
}
