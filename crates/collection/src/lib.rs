//! Collection ingestion: CSV loading with format sniffing, plus fuzzy name
//! resolution so user-typed names match what the collection actually contains.

mod csv;
mod resolver;

use std::path::PathBuf;

use thiserror::Error;

pub use csv::load_collection;
pub use resolver::NameResolver;

use decksmith_core::{normalize_card_name, CardCatalog, Collection};
use tracing::debug;

#[derive(Debug, Error)]
pub enum CollectionError {
    #[error("failed to read collection file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not identify a card name column among headers: {headers:?}")]
    MissingNameColumn { headers: Vec<String> },
    #[error("collection file {path} contains no cards")]
    Empty { path: PathBuf },
    #[error("commander '{name}' not found in collection{}", format_suggestions(.suggestions))]
    CommanderNotFound { name: String, suggestions: Vec<String> },
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!("; did you mean: {}", suggestions.join(", "))
    }
}

/// Resolve a user-typed commander name against the collection, trying exact,
/// variation, and fuzzy matches in that order. Returns the normalized name.
pub fn resolve_commander(
    commander: &str,
    collection: &Collection,
) -> Result<String, CollectionError> {
    let normalized = normalize_card_name(commander);
    if collection.contains_key(&normalized) {
        return Ok(normalized);
    }

    let resolver = NameResolver::new(collection);
    if let Some(resolved) = resolver.resolve(commander) {
        debug!(input = %commander, resolved = %resolved, "commander resolved through fuzzy match");
        return Ok(resolved);
    }

    Err(CollectionError::CommanderNotFound {
        name: commander.to_string(),
        suggestions: resolver.suggestions(commander, 3),
    })
}

/// List owned cards that could lead a deck, resolved through the catalog.
/// Unresolvable cards are silently skipped.
pub async fn list_available_commanders(
    catalog: &dyn CardCatalog,
    collection: &Collection,
) -> Vec<String> {
    let names: Vec<String> = collection.values().map(|entry| entry.name.clone()).collect();
    let resolved = catalog.resolve_batch(&names).await;

    let mut commanders: Vec<String> = resolved
        .into_values()
        .filter_map(|result| result.ok())
        .filter(|profile| profile.commander_eligible())
        .map(|profile| profile.name)
        .collect();
    commanders.sort();
    commanders.dedup();
    commanders
}

#[cfg(test)]
mod tests {
    use super::*;
    use decksmith_core::CardEntry;

    fn collection_of(names: &[&str]) -> Collection {
        let mut map = Collection::new();
        for name in names {
            let entry = CardEntry::new(*name, 1, "");
            map.insert(entry.normalized_name.clone(), entry);
        }
        map
    }

    #[test]
    fn exact_commander_resolves_directly() {
        let owned = collection_of(&["Atraxa, Praetors' Voice"]);
        let resolved = resolve_commander("Atraxa, Praetors' Voice", &owned).unwrap();
        assert_eq!(resolved, "atraxa, praetors' voice");
    }

    #[test]
    fn misspelled_commander_resolves_fuzzily() {
        let owned = collection_of(&["Atraxa, Praetors' Voice", "Sol Ring"]);
        let resolved = resolve_commander("Atraxa Praetors Voice", &owned).unwrap();
        assert_eq!(resolved, "atraxa, praetors' voice");
    }

    #[test]
    fn unknown_commander_errors_with_suggestions() {
        let owned = collection_of(&["Atraxa, Praetors' Voice", "Sol Ring"]);
        let error = resolve_commander("Totally Different Card", &owned).unwrap_err();
        match error {
            CollectionError::CommanderNotFound { name, .. } => {
                assert_eq!(name, "Totally Different Card");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
