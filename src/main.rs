//! # Law-Text Search Driver
//!
//! ## Purpose
//! Command-line entry point for the search engine: loads the three tabular
//! sources, runs every query from the query table, reports summary statistics,
//! and exports the aggregated results to CSV.
//!
//! ## Architecture Flow
//! 1. Parse command line arguments and load configuration
//! 2. Initialize logging and tracing
//! 3. Assemble the corpus and load the query table
//! 4. Run the aggregation pass over all query terms
//! 5. Print run statistics and save results

use clap::{Arg, Command};
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use lawtext_search::{
    config::{Config, FailurePolicy, LoggingConfig, QueryMode},
    errors::{Result, SearchError},
    export, SearchEngine,
};

fn main() -> Result<()> {
    let matches = Command::new("lawtext-search")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Legal Search Team")
        .about("Word-boundary term search over court-case law-text sections")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("config.toml"),
        )
        .arg(
            Arg::new("dataset")
                .long("dataset")
                .value_name("FILE")
                .help("Full case dataset CSV"),
        )
        .arg(
            Arg::new("law")
                .long("law")
                .value_name("FILE")
                .help("Law-text sections CSV"),
        )
        .arg(
            Arg::new("queries")
                .long("queries")
                .value_name("FILE")
                .help("Query table CSV"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Results CSV path")
                .default_value("search_results.csv"),
        )
        .arg(
            Arg::new("radius")
                .long("radius")
                .value_name("WORDS")
                .help("Context words on each side of a match")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("rows")
                .long("rows")
                .value_name("N")
                .help("Cap on law-text rows, for fast iteration")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("query-mode")
                .long("query-mode")
                .value_name("MODE")
                .help("Interpret query terms as 'literal' words or 'regex' patterns")
                .value_parser(["literal", "regex"]),
        )
        .arg(
            Arg::new("best-effort")
                .long("best-effort")
                .help("Log failing query terms and continue instead of aborting")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("full-text")
                .long("full-text")
                .help("Include the THE_LAW column in the exported results")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let config_path = matches.get_one::<String>("config").unwrap();
    let mut config = Config::from_file(config_path)?;

    if let Some(path) = matches.get_one::<String>("dataset") {
        config.sources.dataset_path = PathBuf::from(path);
    }
    if let Some(path) = matches.get_one::<String>("law") {
        config.sources.law_path = PathBuf::from(path);
    }
    if let Some(path) = matches.get_one::<String>("queries") {
        config.sources.queries_path = PathBuf::from(path);
    }
    if let Some(rows) = matches.get_one::<usize>("rows") {
        config.sources.law_row_cap = Some(*rows);
    }
    if let Some(radius) = matches.get_one::<usize>("radius") {
        config.search.context_radius = *radius;
    }
    if let Some(mode) = matches.get_one::<String>("query-mode") {
        config.search.query_mode = match mode.as_str() {
            "literal" => QueryMode::Literal,
            _ => QueryMode::Regex,
        };
    }
    if matches.get_flag("best-effort") {
        config.search.failure_policy = FailurePolicy::BestEffort;
    }

    init_logging(&config.logging)?;

    info!("Starting law-text search");
    if std::path::Path::new(config_path).exists() {
        info!("Configuration loaded from: {}", config_path);
    } else {
        warn!(
            "Configuration file not found: {}, using defaults",
            config_path
        );
    }

    let engine = SearchEngine::new(&config)?;
    let summaries = engine.search_all(config.search.context_radius)?;

    if summaries.is_empty() {
        println!("No matches found!");
        return Ok(());
    }

    println!("\nFound {} unique matches:", summaries.len());
    println!("{}", "=".repeat(80));
    for summary in &summaries {
        println!("Item ID: {}", summary.itemid);
        println!("Language: {}", summary.language.as_deref().unwrap_or("-"));
        println!(
            "Query: '{}' ({})",
            summary.query_word,
            summary.query_language.as_deref().unwrap_or("-")
        );
        println!("Matches: {}", summary.match_count);
        println!("Context: {}", summary.combined_context);
        println!("{}", "-".repeat(80));
    }

    let output = matches.get_one::<String>("output").unwrap();
    export::write_summaries(output, &summaries, matches.get_flag("full-text"))?;

    let items: HashSet<&str> = summaries.iter().map(|s| s.itemid.as_str()).collect();
    let languages: HashSet<&str> = summaries
        .iter()
        .filter_map(|s| s.language.as_deref())
        .collect();
    let words: HashSet<&str> = summaries.iter().map(|s| s.query_word.as_str()).collect();

    println!("\nSummary:");
    println!("Total unique matches: {}", summaries.len());
    println!("Items with matches: {}", items.len());
    println!("Languages found: {:?}", languages);
    println!("Query words that found matches: {}", words.len());

    Ok(())
}

/// Initialize logging and tracing
fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.level));
    let filter = filter.map_err(|e| SearchError::Config {
        message: format!("Invalid log level '{}': {}", config.level, e),
    })?;

    let registry = tracing_subscriber::registry().with(filter);
    if config.json_format {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init();
    }

    Ok(())
}
