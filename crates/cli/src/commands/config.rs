//! Print the effective configuration after file and environment merging.

use decksmith_core::config::AppConfig;

use super::CommandResult;

pub fn run(config: &AppConfig) -> CommandResult {
    let lines = vec![
        "effective config (source precedence: env > file > default):".to_string(),
        format!("  catalog.cache_dir          = {}", config.catalog.cache_dir.display()),
        format!("  catalog.cache_ttl_days     = {}", config.catalog.cache_ttl_days),
        format!("  catalog.min_interval_ms    = {}", config.catalog.min_request_interval_ms),
        format!("  catalog.max_concurrent     = {}", config.catalog.max_concurrent_requests),
        format!("  catalog.max_retries        = {}", config.catalog.max_retries),
        format!("  recs.cache_dir             = {}", config.recs.cache_dir.display()),
        format!("  recs.cache_ttl_hours       = {}", config.recs.cache_ttl_hours),
        format!("  recs.cache_enabled         = {}", config.recs.cache_enabled),
        format!("  build.strategy             = {}", config.build.strategy),
        format!("  build.synergy_weight       = {}", config.build.synergy_weight),
        format!("  build.availability_weight  = {}", config.build.availability_weight),
        format!("  build.min_lands            = {}", config.build.min_lands),
        format!("  build.max_lands            = {}", config.build.max_lands),
        format!("  build.min_deck_size        = {}", config.build.min_deck_size),
        format!("  output.directory           = {}", config.output.directory.display()),
        format!("  output.include_statistics  = {}", config.output.include_statistics),
        format!("  logging.level              = {}", config.logging.level),
        format!("  logging.format             = {:?}", config.logging.format),
    ];
    CommandResult::success(lines.join("\n"))
}
