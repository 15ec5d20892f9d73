//! Collection filtering pipeline: narrow the owned-card set to cards legally
//! includable under this commander before any scoring happens.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::catalog::{CardCatalog, CardProfile, COMMANDER_FORMAT};
use crate::domain::card::{Collection, Color};

/// The filtered candidate set plus the catalog profiles resolved along the way,
/// so later stages never re-query the catalog.
#[derive(Clone, Debug, Default)]
pub struct FilteredPool {
    pub cards: Collection,
    pub profiles: BTreeMap<String, CardProfile>,
}

/// Apply the color-identity subset rule, the format-legality rule, and commander
/// self-exclusion, resolving metadata through one batched catalog call. A card
/// the catalog cannot resolve is excluded; a single bad card never aborts the
/// pipeline.
pub async fn filter_collection(
    catalog: &dyn CardCatalog,
    collection: &Collection,
    commander_normalized: &str,
    commander_colors: &[Color],
) -> FilteredPool {
    let names: Vec<String> = collection.values().map(|entry| entry.name.clone()).collect();
    info!(total = names.len(), "resolving collection through card catalog");
    let resolved = catalog.resolve_batch(&names).await;

    let mut pool = FilteredPool::default();
    let mut excluded_color = 0usize;
    let mut excluded_legality = 0usize;
    let mut unresolved = 0usize;

    for (normalized, entry) in collection {
        if normalized == commander_normalized {
            continue;
        }

        let profile = match resolved.get(&entry.name) {
            Some(Ok(profile)) => profile.clone(),
            Some(Err(error)) => {
                debug!(card = %entry.name, %error, "excluding unresolvable card");
                unresolved += 1;
                continue;
            }
            None => {
                debug!(card = %entry.name, "catalog returned no result for card");
                unresolved += 1;
                continue;
            }
        };

        let subset =
            profile.color_identity.iter().all(|color| commander_colors.contains(color));
        if !subset {
            debug!(card = %entry.name, "excluding card outside commander color identity");
            excluded_color += 1;
            continue;
        }

        if !profile.is_legal_in(COMMANDER_FORMAT) {
            debug!(card = %entry.name, "excluding card not legal in commander");
            excluded_legality += 1;
            continue;
        }

        pool.profiles.insert(normalized.clone(), profile);
        pool.cards.insert(normalized.clone(), entry.clone());
    }

    info!(
        retained = pool.cards.len(),
        excluded_color,
        excluded_legality,
        unresolved,
        "collection filtering complete"
    );
    // Widespread resolution failure silently changes deck composition, so shout.
    if unresolved > collection.len() / 2 {
        warn!(
            unresolved,
            total = collection.len(),
            "more than half the collection failed catalog resolution; deck quality will degrade"
        );
    }

    pool
}
