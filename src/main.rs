//! Pattern-Scrape main entry point
//!
//! This is the command-line interface for the Pattern-Scrape crawl-and-extract
//! engine.

use anyhow::Context;
use clap::Parser;
use pattern_scrape::config::{load_config_with_hash, Config, Strategy};
use pattern_scrape::crawler::CrawlEngine;
use pattern_scrape::output::{aggregate, export, print_statistics, CrawlStatistics};
use pattern_scrape::url::build_search_url;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Pattern-Scrape: a polite crawl-and-extract engine
///
/// Pattern-Scrape discovers pages through search-engine results or by walking
/// a single site, extracts fields with CSS selectors and regular expressions,
/// and exports the results as a table.
#[derive(Parser, Debug)]
#[command(name = "pattern-scrape")]
#[command(version = "1.0.0")]
#[command(about = "A polite crawl-and-extract engine", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Print crawl statistics after the run
    #[arg(long)]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);

    let engine = CrawlEngine::from_config(&config).context("Failed to build crawl engine")?;

    if cli.dry_run {
        handle_dry_run(&config, &engine);
        return Ok(());
    }

    handle_crawl(&config, &engine, cli.stats).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("pattern_scrape=info,warn"),
            1 => EnvFilter::new("pattern_scrape=debug,info"),
            2 => EnvFilter::new("pattern_scrape=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the validated plan without fetching
fn handle_dry_run(config: &Config, engine: &CrawlEngine) {
    println!("=== Pattern-Scrape Dry Run ===\n");

    match config.strategy() {
        Some(Strategy::Search(search)) => {
            println!("Strategy: search");
            println!("  Engine: {:?}", search.engine);
            println!("  Query: {}", search.query);
            println!("  Result pages: {}", search.max_pages);
            println!("  Workers: {}", search.max_workers);
            println!("  Results per page: {}", search.results_per_page);
            println!("  Result selector: {}", search.result_selector());
            println!("  Excluded suffixes: {}", search.excluded_suffixes.join(" "));
            println!("  Listing URLs:");
            for page in 1..=search.max_pages {
                println!(
                    "    * {}",
                    build_search_url(&search.engine, search.base_url(), &search.query, page)
                );
            }
        }
        Some(Strategy::Site(site)) => {
            println!("Strategy: site");
            println!("  Seed: {}", site.seed_url);
            println!("  Max internal pages: {}", site.max_internal_pages);
        }
        None => println!("Strategy: none"),
    }

    println!("\nFetch delays:");
    println!("  Page: {:?}", config.fetch.page_delay());
    println!("  Between result pages: {:?}", config.fetch.search_delay());

    let plan = engine.plan();
    println!("\nPatterns ({}):", plan.patterns().len());
    for name in plan.patterns().names() {
        println!("  - {}", name);
    }
    for name in plan.patterns().rejected() {
        println!("  - {} (invalid, will never match)", name);
    }

    println!("\nSelector fields ({}):", plan.selectors().len());
    for group in plan.selectors() {
        println!("  - {} ({} selectors)", group.field(), group.len());
    }

    println!("\nOutput:");
    println!(
        "  JSON: {}",
        config.output.json_path.as_deref().unwrap_or("(none)")
    );
    println!(
        "  Markdown: {}",
        config.output.markdown_path.as_deref().unwrap_or("(none)")
    );

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, engine: &CrawlEngine, show_stats: bool) -> anyhow::Result<()> {
    let outcome = engine.run(config).await.context("Crawl failed")?;

    let table = aggregate(&outcome.records);
    if table.is_empty() {
        println!("No results.");
    } else {
        let written = export(&table, &config.output).context("Failed to export results")?;
        if written == 0 {
            tracing::warn!("No output path configured; {} rows were not saved", table.len());
        }
        println!("✓ {} rows from {} records", table.len(), outcome.records.len());
    }

    if show_stats {
        println!();
        print_statistics(&CrawlStatistics::new(&outcome.stats, &table));
    }

    Ok(())
}
