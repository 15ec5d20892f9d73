//! Degraded assembly for insufficient collections: a linear
//! RECOMMENDED -> FILL -> LAND_PAD sequence that always terminates and never
//! fails, reporting what it had to do instead.

use std::collections::BTreeMap;

use tracing::info;

use crate::domain::card::{is_basic_land, CardEntry, Color};
use crate::domain::recommendation::Recommendation;
use crate::engine::filter::FilteredPool;
use crate::engine::scoring::quality_estimate;
use crate::engine::{FallbackStage, GenerationReport, TARGET_BODY_SIZE};

/// Select a best-effort body. Every stage runs unconditionally in sequence;
/// the report records the stages that actually contributed cards.
pub fn select_with_fallback(
    pool: &FilteredPool,
    recommendations: &BTreeMap<String, Recommendation>,
    commander_colors: &[Color],
    report: &mut GenerationReport,
) -> Vec<String> {
    let mut selected: Vec<String> = Vec::new();
    let mut taken: BTreeMap<String, u32> = BTreeMap::new();

    // Stage RECOMMENDED: every owned card the community recommends, strongest
    // synergy first.
    let mut recommended: Vec<(&CardEntry, f64)> = pool
        .cards
        .values()
        .filter_map(|entry| {
            recommendations.get(&entry.normalized_name).map(|rec| (entry, rec.synergy))
        })
        .collect();
    recommended.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let mut stage_count = 0usize;
    for (entry, _) in recommended {
        if selected.len() >= TARGET_BODY_SIZE {
            break;
        }
        if try_take(entry, &mut selected, &mut taken) {
            stage_count += 1;
        }
    }
    report.recommendations_used = stage_count;
    if stage_count > 0 {
        report.fallback_stages_used.push(FallbackStage::Recommended);
    }
    info!(recommended_used = stage_count, "fallback stage RECOMMENDED complete");

    // Stage FILL: everything else we own, by coarse quality.
    let mut remaining: Vec<(&CardEntry, f64)> = pool
        .cards
        .values()
        .filter(|entry| !taken.contains_key(&entry.normalized_name))
        .map(|entry| (entry, quality_estimate(&entry.name)))
        .collect();
    remaining.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    stage_count = 0;
    for (entry, _) in remaining {
        if selected.len() >= TARGET_BODY_SIZE {
            break;
        }
        if try_take(entry, &mut selected, &mut taken) {
            stage_count += 1;
        }
    }
    if stage_count > 0 {
        report.fallback_stages_used.push(FallbackStage::Fill);
    }
    info!(filled = stage_count, "fallback stage FILL complete");

    // Stage LAND_PAD: generated basics in the commander's colors.
    if selected.len() < TARGET_BODY_SIZE {
        let needed = TARGET_BODY_SIZE - selected.len();
        let lands = generate_basic_lands(commander_colors, needed);
        let padded = lands.len().min(needed);
        selected.extend(lands.into_iter().take(needed));
        if padded > 0 {
            report.fallback_stages_used.push(FallbackStage::LandPad);
        }
        info!(padded, "fallback stage LAND_PAD complete");
    }

    debug_assert!(selected.len() <= TARGET_BODY_SIZE);
    selected
}

fn try_take(
    entry: &CardEntry,
    selected: &mut Vec<String>,
    taken: &mut BTreeMap<String, u32>,
) -> bool {
    let used = taken.get(&entry.normalized_name).copied().unwrap_or(0);
    let limit = if is_basic_land(&entry.name) { entry.quantity } else { 1 };
    if used >= limit {
        return false;
    }
    taken.insert(entry.normalized_name.clone(), used + 1);
    selected.push(entry.name.clone());
    true
}

/// Generate basic land names for a color identity: 8 of each color present, or
/// 20 Wastes for a colorless commander. The generator overproduces by cycling
/// when `needed` exceeds the base allotment, so the pad stage can always reach
/// the target.
pub fn generate_basic_lands(colors: &[Color], needed: usize) -> Vec<String> {
    let mut lands: Vec<String> = Vec::new();
    if colors.is_empty() {
        lands.extend(std::iter::repeat_with(|| "Wastes".to_string()).take(20));
    } else {
        for color in colors {
            lands.extend(
                std::iter::repeat_with(|| color.basic_land().to_string()).take(8),
            );
        }
    }

    let cycle: Vec<String> = if colors.is_empty() {
        vec!["Wastes".to_string()]
    } else {
        colors.iter().map(|color| color.basic_land().to_string()).collect()
    };
    let mut index = 0usize;
    while lands.len() < needed {
        lands.push(cycle[index % cycle.len()].clone());
        index += 1;
    }
    lands
}
