pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use decksmith_core::config::{AppConfig, ConfigOverrides, LoadOptions};

#[derive(Debug, Parser)]
#[command(
    name = "decksmith",
    about = "Build Commander decks from your collection",
    long_about = "Assemble legal 100-card Commander decks from a collection CSV, \
guided by community recommendations and a chosen strategy.",
    after_help = "Examples:\n  decksmith build collection.csv \"Atraxa, Praetors' Voice\"\n  decksmith build collection.csv \"Krenko, Mob Boss\" --strategy aggro --lands 36\n  decksmith commanders collection.csv\n  decksmith legality \"Golos, Tireless Pilgrim\""
)]
pub struct Cli {
    #[arg(long, global = true, help = "Path to a config file (default: ~/.decksmith/config.toml)")]
    config: Option<PathBuf>,
    #[arg(long, global = true, help = "Log level override (trace, debug, info, warn, error)")]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Build a deck for a commander from a collection CSV")]
    Build(commands::build::BuildArgs),
    #[command(about = "List cards in the collection that can lead a deck")]
    Commanders {
        #[arg(help = "Path to the collection CSV")]
        collection: PathBuf,
    },
    #[command(about = "Check a card's Commander legality and eligibility to lead")]
    Legality {
        #[arg(help = "Card name to check")]
        card: String,
    },
    #[command(about = "Print the effective configuration")]
    Config,
}

fn init_logging(config: &AppConfig) {
    use decksmith_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

pub async fn run() -> ExitCode {
    let cli = Cli::parse();

    let options = LoadOptions {
        config_path: cli.config.clone(),
        require_file: cli.config.is_some(),
        overrides: ConfigOverrides { log_level: cli.log_level.clone(), ..Default::default() },
    };
    let config = match AppConfig::load(options) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("configuration error: {error}");
            return ExitCode::from(commands::EXIT_INPUT_ERROR);
        }
    };
    init_logging(&config);

    let result = match cli.command {
        Command::Build(args) => commands::build::run(&config, &args).await,
        Command::Commanders { collection } => {
            commands::commanders::run(&config, &collection).await
        }
        Command::Legality { card } => commands::legality::run(&config, &card).await,
        Command::Config => commands::config::run(&config),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
