//! Rendering of finished builds: a plain-text deck list for import into play
//! tools, and an HTML report with composition statistics.

use std::collections::BTreeMap;

use serde::Serialize;
use tera::{Context, Tera};
use thiserror::Error;
use tracing::debug;

use decksmith_core::{
    BuildOutcome, DeckStatistics, GenerationReport, PurchaseSuggestion, Strategy,
};

const DECKLIST_TEMPLATE: &str = "decklist.txt";
const REPORT_TEMPLATE: &str = "report.html";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("template rendering failed: {0}")]
    Template(#[from] tera::Error),
}

#[derive(Serialize)]
struct CardLine {
    quantity: u32,
    name: String,
}

/// Renderer over compiled-in templates. Construction only fails if a template
/// is syntactically broken, which a test pins down.
pub struct DeckRenderer {
    tera: Tera,
}

impl DeckRenderer {
    pub fn new() -> Result<Self, RenderError> {
        let mut tera = Tera::default();
        tera.add_raw_template(
            DECKLIST_TEMPLATE,
            include_str!("../templates/decklist.txt.tera"),
        )?;
        tera.add_raw_template(REPORT_TEMPLATE, include_str!("../templates/report.html.tera"))?;
        Ok(Self { tera })
    }

    pub fn render_decklist(
        &self,
        outcome: &BuildOutcome,
        strategy: Strategy,
    ) -> Result<String, RenderError> {
        let context = self.context(outcome, strategy, &[]);
        debug!(template = DECKLIST_TEMPLATE, "rendering deck list");
        Ok(self.tera.render(DECKLIST_TEMPLATE, &context)?)
    }

    pub fn render_report(
        &self,
        outcome: &BuildOutcome,
        strategy: Strategy,
        suggestions: &[PurchaseSuggestion],
    ) -> Result<String, RenderError> {
        let context = self.context(outcome, strategy, suggestions);
        debug!(template = REPORT_TEMPLATE, "rendering build report");
        Ok(self.tera.render(REPORT_TEMPLATE, &context)?)
    }

    fn context(
        &self,
        outcome: &BuildOutcome,
        strategy: Strategy,
        suggestions: &[PurchaseSuggestion],
    ) -> Context {
        let mut context = Context::new();
        context.insert("commander", &outcome.deck.commander);
        context.insert("strategy", &strategy.to_string());
        context.insert("generated_at", &chrono::Utc::now().format("%Y-%m-%d %H:%M UTC").to_string());
        context.insert(
            "color_identity",
            &outcome
                .deck
                .color_identity
                .iter()
                .map(|color| color.display_name().to_string())
                .collect::<Vec<_>>(),
        );
        context.insert("cards", &card_lines(&outcome.deck.cards));
        context.insert("statistics", &outcome.statistics);
        context.insert("total_cards", &outcome.deck.total_cards());
        context.insert("average_cmc", &format!("{:.2}", outcome.statistics.average_cmc));
        context.insert("report", &outcome.report);
        context.insert("suggestions", suggestions);
        context
    }
}

/// Collapse repeated basics into "8 Forest" style lines, alphabetical order.
fn card_lines(cards: &[String]) -> Vec<CardLine> {
    let mut counts: BTreeMap<&str, u32> = BTreeMap::new();
    for card in cards {
        *counts.entry(card.as_str()).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(name, quantity)| CardLine { quantity, name: name.to_string() })
        .collect()
}

/// Expose statistics as plain text for terminal output when no template fits.
pub fn statistics_summary(statistics: &DeckStatistics) -> String {
    let mut lines = Vec::new();
    lines.push(format!("Total cards: {}", statistics.total_cards));
    lines.push(format!("Average mana value: {:.2}", statistics.average_cmc));
    for (card_type, count) in &statistics.card_types {
        lines.push(format!("  {card_type}: {count}"));
    }
    lines.join("\n")
}

/// One-line human summary of a fallback report for terminal output.
pub fn report_summary(report: &GenerationReport) -> String {
    let stages: Vec<String> =
        report.fallback_stages_used.iter().map(ToString::to_string).collect();
    format!(
        "collection provided {} usable cards for a {} card deck (stages: {})",
        report.total_available,
        report.target_size,
        if stages.is_empty() { "none".to_string() } else { stages.join(", ") }
    )
}
