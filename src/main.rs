// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Set up logging (to stderr, so JSON on stdout stays clean)
// 2. Parse command-line arguments using clap
// 3. Dispatch to the appropriate subcommand handler
// 4. Print the harvested pages
// 5. Exit with proper code (0 = success, 2 = error)
//
// Rust concepts used:
// - async/await: Pages are fetched concurrently
// - Result<T, E>: For error handling
// - match: Pattern matching to handle different subcommands
// =============================================================================

mod cli;           // src/cli.rs - command-line parsing
mod config;        // src/config.rs - crawl limits and defaults
mod content;       // src/content/ - HTML to clean text
mod crawl;         // src/crawl/ - frontier scheduler and page fetcher
mod error;         // src/error.rs - error types
mod handler;       // src/handler.rs - JSON request/response harness
mod links;         // src/links/ - URL normalization and classification
mod render;        // src/render/ - page renderers

use anyhow::{Context, Result};
use clap::Parser;
use std::io::Read;
use std::path::Path;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use config::CrawlConfig;
use crawl::{CrawlReport, PageResult};
use render::HttpRenderer;

#[tokio::main]
async fn main() {
    init_logging();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// RUST_LOG wins; otherwise show our own info-level events only
fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("site_harvester=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// Returns:
//   Ok(0) = crawl finished (even if some pages were dropped)
//   Ok(2) = the harness answered with a 500
//   Err   = the crawl could not run
async fn run() -> Result<i32> {
    let cli = Cli::parse();
    let config = cli.limits.to_config();

    match cli.command {
        Commands::Crawl {
            seed_url,
            allow,
            deny,
            mode,
            concurrency,
            json,
        } => {
            let request = cli::crawl_request(seed_url, allow, deny, mode, concurrency);
            handle_crawl(request, &config, json).await
        }
        Commands::Invoke { event } => handle_invoke(&event, &config).await,
    }
}

// Handles the 'crawl' subcommand
async fn handle_crawl(request: crawl::CrawlRequest, config: &CrawlConfig, json: bool) -> Result<i32> {
    // Keep stdout pure JSON when --json is set
    if !json {
        println!("🔍 Crawling website: {}", request.seed_url);
        println!("📊 Mode: {:?}, concurrency: {}", request.mode, request.concurrency);
    }

    let renderer = HttpRenderer::launch(config)?;
    let report = crawl::crawl_website(&renderer, &request, config)
        .await
        .with_context(|| format!("crawl of {} failed", request.seed_url))?;

    print_results(&report, json)?;
    Ok(0)
}

// Handles the 'invoke' subcommand
async fn handle_invoke(event_path: &Path, config: &CrawlConfig) -> Result<i32> {
    let raw = read_event(event_path)?;

    let response = match handler::parse_event(&raw) {
        Ok(event) => handler::handle(event, config).await,
        Err(response) => response,
    };

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(if response.status_code == 200 { 0 } else { 2 })
}

fn read_event(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut raw = String::new();
        std::io::stdin()
            .read_to_string(&mut raw)
            .context("failed to read request from stdin")?;
        Ok(raw)
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read request file {}", path.display()))
    }
}

// Prints the pages either as a table or JSON
fn print_results(report: &CrawlReport, json: bool) -> Result<()> {
    if json {
        let json_output = serde_json::to_string_pretty(&report.pages)?;
        println!("{}", json_output);
    } else {
        print_table(&report.pages);
        print_summary(report);
    }
    Ok(())
}

fn print_table(pages: &[PageResult]) {
    println!("{:<60} {:<40} {:>10}", "URL", "TITLE", "CHARS");
    println!("{}", "=".repeat(112));

    for page in pages {
        println!(
            "{:<60} {:<40} {:>10}",
            truncate(&page.url, 57),
            truncate(&page.title, 37),
            page.content.chars().count()
        );
    }

    println!();
}

fn print_summary(report: &CrawlReport) {
    println!("📊 Summary:");
    println!("   ✅ Pages: {}", report.pages_visited);
    println!("   ❌ Dropped: {}", report.dropped);
    println!("   📦 Batches: {}", report.batches);
}

// Shortens text for display, respecting char boundaries
fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let head: String = text.chars().take(max_chars).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}
