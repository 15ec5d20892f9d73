//! The build command: load a collection, gather recommendations, assemble the
//! deck, and write the deck list (and optionally an HTML report) to disk.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use tracing::{info, warn};

use decksmith_catalog::ScryfallClient;
use decksmith_collection::{load_collection, resolve_commander};
use decksmith_core::config::AppConfig;
use decksmith_core::{
    purchase_suggestions, static_staples, BuildConfig, CardCatalog, DeckBuilder,
    PurchaseSuggestion, Recommendation, RecommendationSource, Strategy, TypeOverrides,
};
use decksmith_recs::{commander_slug, EdhrecClient};
use decksmith_render::{report_summary, statistics_summary, DeckRenderer};

use super::CommandResult;

#[derive(Debug, Args)]
pub struct BuildArgs {
    #[arg(help = "Path to the collection CSV")]
    pub collection: PathBuf,
    #[arg(help = "Commander name (fuzzy matching against the collection)")]
    pub commander: String,
    #[arg(long, help = "Deck strategy: balanced, aggro, control, combo, ramp")]
    pub strategy: Option<Strategy>,
    #[arg(long, help = "Exact number of lands")]
    pub lands: Option<u32>,
    #[arg(long, help = "Exact number of creatures")]
    pub creatures: Option<u32>,
    #[arg(long, help = "Exact number of instants")]
    pub instants: Option<u32>,
    #[arg(long, help = "Exact number of sorceries")]
    pub sorceries: Option<u32>,
    #[arg(long, help = "Exact number of artifacts")]
    pub artifacts: Option<u32>,
    #[arg(long, help = "Exact number of enchantments")]
    pub enchantments: Option<u32>,
    #[arg(long, help = "Output directory (default from config)")]
    pub output: Option<PathBuf>,
    #[arg(long, help = "Also write an HTML build report with purchase suggestions")]
    pub report: bool,
    #[arg(long, help = "Skip community recommendations entirely")]
    pub no_recommendations: bool,
}

impl BuildArgs {
    fn overrides(&self) -> TypeOverrides {
        TypeOverrides {
            creatures: self.creatures,
            instants: self.instants,
            sorceries: self.sorceries,
            artifacts: self.artifacts,
            enchantments: self.enchantments,
            lands: self.lands,
        }
    }
}

pub async fn run(config: &AppConfig, args: &BuildArgs) -> CommandResult {
    let catalog = match ScryfallClient::new(&config.catalog) {
        Ok(client) => Arc::new(client) as Arc<dyn CardCatalog>,
        Err(error) => return CommandResult::failure(format!("card catalog unavailable: {error}")),
    };
    let recs = match EdhrecClient::new(&config.recs) {
        Ok(client) => client,
        Err(error) => {
            return CommandResult::failure(format!("recommendation source unavailable: {error}"))
        }
    };
    execute(config, args, catalog, &recs).await
}

/// Command body with collaborators injected, so tests can run it against
/// deterministic fakes.
pub async fn execute(
    config: &AppConfig,
    args: &BuildArgs,
    catalog: Arc<dyn CardCatalog>,
    recs: &dyn RecommendationSource,
) -> CommandResult {
    let collection = match load_collection(&args.collection) {
        Ok(collection) => collection,
        Err(error) => return CommandResult::input_error(error.to_string()),
    };
    if collection.len() < config.build.min_deck_size {
        warn!(
            cards = collection.len(),
            minimum = config.build.min_deck_size,
            "collection is small; expect generated basic lands"
        );
    }

    let commander_key = match resolve_commander(&args.commander, &collection) {
        Ok(key) => key,
        Err(error) => return CommandResult::input_error(error.to_string()),
    };
    let commander_name = collection[&commander_key].name.clone();
    info!(commander = %commander_name, cards = collection.len(), "starting deck build");

    let recommendations = gather_recommendations(args, recs, &commander_name).await;

    let build_config = BuildConfig {
        strategy: args.strategy.unwrap_or(config.build.strategy),
        synergy_weight: config.build.synergy_weight,
        availability_weight: config.build.availability_weight,
        min_lands: config.build.min_lands,
        max_lands: config.build.max_lands,
        overrides: args.overrides(),
    };
    let strategy = build_config.strategy;

    let builder = DeckBuilder::new(build_config, catalog.clone());
    let outcome = match builder.build(&commander_name, &collection, &recommendations).await {
        Ok(outcome) => outcome,
        Err(error) => return CommandResult::input_error(error.to_string()),
    };

    let suggestions: Vec<PurchaseSuggestion> = if args.report {
        purchase_suggestions(catalog.as_ref(), &recommendations, &collection, 10).await
    } else {
        Vec::new()
    };

    let renderer = match DeckRenderer::new() {
        Ok(renderer) => renderer,
        Err(error) => return CommandResult::failure(error.to_string()),
    };
    let decklist = match renderer.render_decklist(&outcome, strategy) {
        Ok(text) => text,
        Err(error) => return CommandResult::failure(error.to_string()),
    };

    let output_dir = args.output.clone().unwrap_or_else(|| config.output.directory.clone());
    if let Err(error) = std::fs::create_dir_all(&output_dir) {
        return CommandResult::failure(format!(
            "cannot create output directory {}: {error}",
            output_dir.display()
        ));
    }

    let slug = commander_slug(&commander_name);
    let decklist_path = output_dir.join(format!("{slug}-decklist.txt"));
    if let Err(error) = std::fs::write(&decklist_path, &decklist) {
        return CommandResult::failure(format!(
            "cannot write {}: {error}",
            decklist_path.display()
        ));
    }

    let mut lines = Vec::new();
    lines.push(format!("Deck for {commander_name} ({strategy})"));
    lines.push(statistics_summary(&outcome.statistics));
    lines.push(format!("Deck list written to {}", decklist_path.display()));

    if args.report {
        let report_path = output_dir.join(format!("{slug}-report.html"));
        match renderer.render_report(&outcome, strategy, &suggestions) {
            Ok(html) => {
                if let Err(error) = std::fs::write(&report_path, html) {
                    return CommandResult::failure(format!(
                        "cannot write {}: {error}",
                        report_path.display()
                    ));
                }
                lines.push(format!("Report written to {}", report_path.display()));
            }
            Err(error) => return CommandResult::failure(error.to_string()),
        }
    }

    if let Some(report) = &outcome.report {
        lines.push(format!("Note: {}", report_summary(report)));
    }

    let validation = outcome.deck.validate(Some(&outcome.profiles));
    if !validation.is_valid() {
        for violation in &validation.violations {
            lines.push(format!("Warning: {violation}"));
        }
    }

    CommandResult::success(lines.join("\n"))
}

async fn gather_recommendations(
    args: &BuildArgs,
    recs: &dyn RecommendationSource,
    commander_name: &str,
) -> Vec<Recommendation> {
    if args.no_recommendations {
        return Vec::new();
    }
    match recs.recommendations_for(commander_name).await {
        Ok(recommendations) => recommendations,
        Err(error) => {
            warn!(%error, "recommendation source failed, using static staples");
            static_staples()
        }
    }
}
