use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::strategy::Strategy;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub catalog: CatalogConfig,
    pub recs: RecsConfig,
    pub build: BuildDefaults,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct CatalogConfig {
    pub cache_dir: PathBuf,
    pub cache_ttl_days: u64,
    pub min_request_interval_ms: u64,
    pub max_concurrent_requests: usize,
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
    pub request_timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct RecsConfig {
    pub cache_dir: PathBuf,
    pub cache_ttl_hours: u64,
    pub cache_enabled: bool,
}

#[derive(Clone, Debug)]
pub struct BuildDefaults {
    pub strategy: Strategy,
    pub synergy_weight: f64,
    pub availability_weight: f64,
    pub min_lands: u32,
    pub max_lands: u32,
    pub min_deck_size: usize,
}

#[derive(Clone, Debug)]
pub struct OutputConfig {
    pub directory: PathBuf,
    pub include_statistics: bool,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub cache_dir: Option<PathBuf>,
    pub log_level: Option<String>,
    pub strategy: Option<Strategy>,
    pub output_dir: Option<PathBuf>,
    pub cache_enabled: Option<bool>,
    pub min_deck_size: Option<usize>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

/// TOML mirror of `AppConfig` with every field optional; file values layer over
/// built-in defaults, then environment variables, then explicit overrides.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    catalog: Option<FileCatalog>,
    recs: Option<FileRecs>,
    build: Option<FileBuild>,
    output: Option<FileOutput>,
    logging: Option<FileLogging>,
}

#[derive(Debug, Default, Deserialize)]
struct FileCatalog {
    cache_dir: Option<PathBuf>,
    cache_ttl_days: Option<u64>,
    min_request_interval_ms: Option<u64>,
    max_concurrent_requests: Option<usize>,
    max_retries: Option<u32>,
    base_delay_ms: Option<u64>,
    max_delay_ms: Option<u64>,
    request_timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct FileRecs {
    cache_dir: Option<PathBuf>,
    cache_ttl_hours: Option<u64>,
    cache_enabled: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct FileBuild {
    strategy: Option<Strategy>,
    synergy_weight: Option<f64>,
    availability_weight: Option<f64>,
    min_lands: Option<u32>,
    max_lands: Option<u32>,
    min_deck_size: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct FileOutput {
    directory: Option<PathBuf>,
    include_statistics: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct FileLogging {
    level: Option<String>,
    format: Option<LogFormat>,
}

fn default_data_dir() -> PathBuf {
    env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".decksmith")
}

impl Default for AppConfig {
    fn default() -> Self {
        let data_dir = default_data_dir();
        Self {
            catalog: CatalogConfig {
                cache_dir: data_dir.join("scryfall_cache"),
                cache_ttl_days: 30,
                min_request_interval_ms: 150,
                max_concurrent_requests: 3,
                max_retries: 5,
                base_delay_ms: 1_000,
                max_delay_ms: 60_000,
                request_timeout_secs: 15,
            },
            recs: RecsConfig {
                cache_dir: data_dir.join("edhrec_cache"),
                cache_ttl_hours: 24,
                cache_enabled: true,
            },
            build: BuildDefaults {
                strategy: Strategy::Balanced,
                synergy_weight: 0.7,
                availability_weight: 0.3,
                min_lands: 35,
                max_lands: 40,
                min_deck_size: 60,
            },
            output: OutputConfig { directory: PathBuf::from("."), include_statistics: true },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = AppConfig::default();

        let path = options
            .config_path
            .clone()
            .or_else(|| env::var_os("DECKSMITH_CONFIG").map(PathBuf::from))
            .unwrap_or_else(|| default_data_dir().join("config.toml"));

        if path.exists() {
            let file = read_file_config(&path)?;
            config.apply_file(file);
        } else if options.require_file {
            return Err(ConfigError::MissingConfigFile(path));
        }

        config.apply_env()?;
        config.apply_overrides(&options.overrides);
        config.validate()?;
        Ok(config)
    }

    fn apply_file(&mut self, file: FileConfig) {
        if let Some(catalog) = file.catalog {
            apply_opt(&mut self.catalog.cache_dir, catalog.cache_dir);
            apply_opt(&mut self.catalog.cache_ttl_days, catalog.cache_ttl_days);
            apply_opt(&mut self.catalog.min_request_interval_ms, catalog.min_request_interval_ms);
            apply_opt(&mut self.catalog.max_concurrent_requests, catalog.max_concurrent_requests);
            apply_opt(&mut self.catalog.max_retries, catalog.max_retries);
            apply_opt(&mut self.catalog.base_delay_ms, catalog.base_delay_ms);
            apply_opt(&mut self.catalog.max_delay_ms, catalog.max_delay_ms);
            apply_opt(&mut self.catalog.request_timeout_secs, catalog.request_timeout_secs);
        }
        if let Some(recs) = file.recs {
            apply_opt(&mut self.recs.cache_dir, recs.cache_dir);
            apply_opt(&mut self.recs.cache_ttl_hours, recs.cache_ttl_hours);
            apply_opt(&mut self.recs.cache_enabled, recs.cache_enabled);
        }
        if let Some(build) = file.build {
            apply_opt(&mut self.build.strategy, build.strategy);
            apply_opt(&mut self.build.synergy_weight, build.synergy_weight);
            apply_opt(&mut self.build.availability_weight, build.availability_weight);
            apply_opt(&mut self.build.min_lands, build.min_lands);
            apply_opt(&mut self.build.max_lands, build.max_lands);
            apply_opt(&mut self.build.min_deck_size, build.min_deck_size);
        }
        if let Some(output) = file.output {
            apply_opt(&mut self.output.directory, output.directory);
            apply_opt(&mut self.output.include_statistics, output.include_statistics);
        }
        if let Some(logging) = file.logging {
            apply_opt(&mut self.logging.level, logging.level);
            apply_opt(&mut self.logging.format, logging.format);
        }
    }

    fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Some(level) = env_string("DECKSMITH_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(value) = env_string("DECKSMITH_LOG_FORMAT") {
            self.logging.format = match value.as_str() {
                "compact" => LogFormat::Compact,
                "pretty" => LogFormat::Pretty,
                "json" => LogFormat::Json,
                _ => {
                    return Err(ConfigError::InvalidEnvOverride {
                        key: "DECKSMITH_LOG_FORMAT".to_string(),
                        value,
                    })
                }
            };
        }
        if let Some(value) = env_string("DECKSMITH_STRATEGY") {
            self.build.strategy =
                value.parse::<Strategy>().map_err(|_| ConfigError::InvalidEnvOverride {
                    key: "DECKSMITH_STRATEGY".to_string(),
                    value,
                })?;
        }
        if let Some(value) = env_string("DECKSMITH_SYNERGY_WEIGHT") {
            self.build.synergy_weight = parse_env("DECKSMITH_SYNERGY_WEIGHT", &value)?;
        }
        if let Some(value) = env_string("DECKSMITH_AVAILABILITY_WEIGHT") {
            self.build.availability_weight = parse_env("DECKSMITH_AVAILABILITY_WEIGHT", &value)?;
        }
        if let Some(value) = env_string("DECKSMITH_MIN_DECK_SIZE") {
            self.build.min_deck_size = parse_env("DECKSMITH_MIN_DECK_SIZE", &value)?;
        }
        if let Some(value) = env_string("DECKSMITH_CACHE_DIR") {
            let base = PathBuf::from(value);
            self.catalog.cache_dir = base.join("scryfall_cache");
            self.recs.cache_dir = base.join("edhrec_cache");
        }
        if let Some(value) = env_string("DECKSMITH_OUTPUT_DIR") {
            self.output.directory = PathBuf::from(value);
        }
        Ok(())
    }

    fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(dir) = &overrides.cache_dir {
            self.catalog.cache_dir = dir.join("scryfall_cache");
            self.recs.cache_dir = dir.join("edhrec_cache");
        }
        if let Some(level) = &overrides.log_level {
            self.logging.level = level.clone();
        }
        if let Some(strategy) = overrides.strategy {
            self.build.strategy = strategy;
        }
        if let Some(dir) = &overrides.output_dir {
            self.output.directory = dir.clone();
        }
        if let Some(enabled) = overrides.cache_enabled {
            self.recs.cache_enabled = enabled;
        }
        if let Some(size) = overrides.min_deck_size {
            self.build.min_deck_size = size;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.build.synergy_weight < 0.0 || self.build.availability_weight < 0.0 {
            return Err(ConfigError::Validation(
                "scoring weights must be non-negative".to_string(),
            ));
        }
        if self.build.min_lands > self.build.max_lands {
            return Err(ConfigError::Validation(format!(
                "min_lands ({}) exceeds max_lands ({})",
                self.build.min_lands, self.build.max_lands
            )));
        }
        if self.catalog.max_concurrent_requests == 0 {
            return Err(ConfigError::Validation(
                "catalog.max_concurrent_requests must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn read_file_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;
    toml::from_str(&raw)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn apply_opt<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}

fn env_string(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.parse::<T>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}
