//! List every card in the collection that could lead a deck.

use std::path::Path;
use std::sync::Arc;

use decksmith_catalog::ScryfallClient;
use decksmith_collection::{list_available_commanders, load_collection};
use decksmith_core::config::AppConfig;
use decksmith_core::CardCatalog;

use super::CommandResult;

pub async fn run(config: &AppConfig, collection_path: &Path) -> CommandResult {
    let catalog = match ScryfallClient::new(&config.catalog) {
        Ok(client) => Arc::new(client) as Arc<dyn CardCatalog>,
        Err(error) => return CommandResult::failure(format!("card catalog unavailable: {error}")),
    };
    execute(collection_path, catalog).await
}

pub async fn execute(collection_path: &Path, catalog: Arc<dyn CardCatalog>) -> CommandResult {
    let collection = match load_collection(collection_path) {
        Ok(collection) => collection,
        Err(error) => return CommandResult::input_error(error.to_string()),
    };

    let commanders = list_available_commanders(catalog.as_ref(), &collection).await;
    if commanders.is_empty() {
        return CommandResult::success(
            "No commander-eligible cards found in this collection.".to_string(),
        );
    }

    let mut lines = vec![format!("{} possible commanders:", commanders.len())];
    for name in commanders {
        lines.push(format!("  {name}"));
    }
    CommandResult::success(lines.join("\n"))
}
