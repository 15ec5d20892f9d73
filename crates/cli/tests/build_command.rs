//! End-to-end command tests with deterministic collaborators standing in for
//! the network services.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;

use decksmith_cli::commands::{build, commanders, legality, EXIT_INPUT_ERROR};
use decksmith_core::config::AppConfig;
use decksmith_core::{
    normalize_card_name, CardCatalog, CardProfile, CatalogError, Color, Legality,
    Recommendation, RecommendationSource, RecsError, COMMANDER_FORMAT,
};

struct StubCatalog {
    profiles: BTreeMap<String, CardProfile>,
}

impl StubCatalog {
    fn new(cards: Vec<(&str, &str, Vec<&str>)>) -> Self {
        let profiles = cards
            .into_iter()
            .map(|(name, type_line, identity)| {
                let mut legalities = BTreeMap::new();
                legalities.insert(COMMANDER_FORMAT.to_string(), Legality::Legal);
                let identity: Vec<String> =
                    identity.into_iter().map(str::to_string).collect();
                let profile = CardProfile {
                    name: name.to_string(),
                    color_identity: Color::parse_identity(&identity),
                    mana_cost: String::new(),
                    type_line: type_line.to_string(),
                    oracle_text: String::new(),
                    cmc: 3.0,
                    legalities,
                    purchase_uris: BTreeMap::new(),
                    scryfall_uri: String::new(),
                };
                (normalize_card_name(name), profile)
            })
            .collect();
        Self { profiles }
    }
}

#[async_trait]
impl CardCatalog for StubCatalog {
    async fn resolve(&self, name: &str) -> Result<CardProfile, CatalogError> {
        self.profiles
            .get(&normalize_card_name(name))
            .cloned()
            .ok_or_else(|| CatalogError::NotFound { name: name.to_string() })
    }
}

struct StubRecs {
    recommendations: Vec<Recommendation>,
}

#[async_trait]
impl RecommendationSource for StubRecs {
    async fn recommendations_for(
        &self,
        _commander_name: &str,
    ) -> Result<Vec<Recommendation>, RecsError> {
        Ok(self.recommendations.clone())
    }
}

struct DownRecs;

#[async_trait]
impl RecommendationSource for DownRecs {
    async fn recommendations_for(
        &self,
        _commander_name: &str,
    ) -> Result<Vec<Recommendation>, RecsError> {
        Err(RecsError::SourceUnavailable("connection refused".to_string()))
    }
}

fn test_config(dir: &std::path::Path) -> AppConfig {
    let mut config = AppConfig::default();
    config.output.directory = dir.join("decks");
    config.catalog.cache_dir = dir.join("scryfall_cache");
    config.recs.cache_dir = dir.join("edhrec_cache");
    config
}

fn write_collection(dir: &std::path::Path, rows: &[(&str, u32)]) -> PathBuf {
    let path = dir.join("collection.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "Name,Quantity").unwrap();
    for (name, quantity) in rows {
        writeln!(file, "\"{name}\",{quantity}").unwrap();
    }
    path
}

fn small_green_fixture() -> (Vec<(&'static str, u32)>, StubCatalog) {
    let rows = vec![
        ("Thorn Elemental", 1),
        ("Grizzly Bears", 1),
        ("Llanowar Elves", 1),
        ("Forest", 12),
        ("Gruun, the Lonely King", 1),
    ];
    let catalog = StubCatalog::new(vec![
        ("Thorn Elemental", "Creature — Elemental", vec!["G"]),
        ("Grizzly Bears", "Creature — Bear", vec!["G"]),
        ("Llanowar Elves", "Creature — Elf Druid", vec!["G"]),
        ("Forest", "Basic Land — Forest", vec![]),
        ("Gruun, the Lonely King", "Legendary Creature — Ape", vec!["G"]),
    ]);
    (rows, catalog)
}

fn build_args(collection: PathBuf, commander: &str, output: PathBuf) -> build::BuildArgs {
    build::BuildArgs {
        collection,
        commander: commander.to_string(),
        strategy: None,
        lands: None,
        creatures: None,
        instants: None,
        sorceries: None,
        artifacts: None,
        enchantments: None,
        output: Some(output),
        report: false,
        no_recommendations: false,
    }
}

#[tokio::test]
async fn small_collection_builds_a_padded_deck() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let (rows, catalog) = small_green_fixture();
    let csv = write_collection(dir.path(), &rows);

    let args = build_args(csv, "Gruun, the Lonely King", dir.path().join("out"));
    let recs = StubRecs { recommendations: vec![] };
    let result = build::execute(&config, &args, Arc::new(catalog), &recs).await;

    assert_eq!(result.exit_code, 0, "output: {}", result.output);
    assert!(result.output.contains("Deck for Gruun, the Lonely King"));
    assert!(result.output.contains("Note:"), "fallback note expected: {}", result.output);

    let decklist_path = dir.path().join("out/gruun-the-lonely-king-decklist.txt");
    let decklist = std::fs::read_to_string(decklist_path).unwrap();
    assert!(decklist.contains("1 Gruun, the Lonely King"));
    assert!(decklist.contains("Forest"));
}

#[tokio::test]
async fn misspelled_commander_still_resolves() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let (rows, catalog) = small_green_fixture();
    let csv = write_collection(dir.path(), &rows);

    let args = build_args(csv, "Gruun the Lonely King", dir.path().join("out"));
    let recs = StubRecs { recommendations: vec![] };
    let result = build::execute(&config, &args, Arc::new(catalog), &recs).await;

    assert_eq!(result.exit_code, 0, "output: {}", result.output);
}

#[tokio::test]
async fn unknown_commander_is_an_input_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let (rows, catalog) = small_green_fixture();
    let csv = write_collection(dir.path(), &rows);

    let args = build_args(csv, "Definitely Not Owned", dir.path().join("out"));
    let recs = StubRecs { recommendations: vec![] };
    let result = build::execute(&config, &args, Arc::new(catalog), &recs).await;

    assert_eq!(result.exit_code, EXIT_INPUT_ERROR);
    assert!(result.output.contains("not found in collection"));
}

#[tokio::test]
async fn missing_collection_file_is_an_input_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let (_, catalog) = small_green_fixture();

    let args = build_args(
        dir.path().join("nope.csv"),
        "Gruun, the Lonely King",
        dir.path().join("out"),
    );
    let recs = StubRecs { recommendations: vec![] };
    let result = build::execute(&config, &args, Arc::new(catalog), &recs).await;

    assert_eq!(result.exit_code, EXIT_INPUT_ERROR);
}

#[tokio::test]
async fn recommendation_outage_degrades_to_staples() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let (rows, catalog) = small_green_fixture();
    let csv = write_collection(dir.path(), &rows);

    let args = build_args(csv, "Gruun, the Lonely King", dir.path().join("out"));
    let result = build::execute(&config, &args, Arc::new(catalog), &DownRecs).await;

    // The build still succeeds on static staples.
    assert_eq!(result.exit_code, 0, "output: {}", result.output);
}

#[tokio::test]
async fn report_flag_writes_html() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let (rows, catalog) = small_green_fixture();
    let csv = write_collection(dir.path(), &rows);

    let mut args = build_args(csv, "Gruun, the Lonely King", dir.path().join("out"));
    args.report = true;
    let recs = StubRecs {
        recommendations: vec![Recommendation::new("Thorn Elemental", 0.8, "creature", 40.0)],
    };
    let result = build::execute(&config, &args, Arc::new(catalog), &recs).await;

    assert_eq!(result.exit_code, 0, "output: {}", result.output);
    let report_path = dir.path().join("out/gruun-the-lonely-king-report.html");
    let html = std::fs::read_to_string(report_path).unwrap();
    assert!(html.contains("Gruun, the Lonely King"));
}

#[tokio::test]
async fn commanders_command_lists_eligible_leaders() {
    let dir = tempfile::tempdir().unwrap();
    let (rows, catalog) = small_green_fixture();
    let csv = write_collection(dir.path(), &rows);

    let result = commanders::execute(&csv, Arc::new(catalog)).await;
    assert_eq!(result.exit_code, 0);
    assert!(result.output.contains("Gruun, the Lonely King"));
    assert!(!result.output.contains("Grizzly Bears"));
}

#[tokio::test]
async fn legality_command_reports_eligibility() {
    let (_, catalog) = small_green_fixture();
    let catalog = Arc::new(catalog);

    let result = legality::execute("Gruun, the Lonely King", catalog.clone()).await;
    assert_eq!(result.exit_code, 0);
    assert!(result.output.contains("Can lead a deck: yes"));

    let result = legality::execute("Grizzly Bears", catalog.clone()).await;
    assert!(result.output.contains("Can lead a deck: no"));

    let result = legality::execute("Unknown Card", catalog).await;
    assert_eq!(result.exit_code, EXIT_INPUT_ERROR);
}
