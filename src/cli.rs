// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Two subcommands:
// - crawl:  crawl a site and print what was harvested
// - invoke: run the JSON request/response harness on a request file (or stdin)
//
// The crawl limits (page budget, attempts, timeout, user agent, body size) are
// global flags, and each one can also come from an environment variable.
//
// Rust concepts:
// - Derive macros: clap generates the parser from these structs
// - #[command(flatten)]: Reuses one group of flags across subcommands
// =============================================================================

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use crate::config::{CrawlConfig, DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_BODY_BYTES, DEFAULT_PAGE_LIMIT};
use crate::crawl::CrawlRequest;
use crate::links::Mode;

#[derive(Parser, Debug)]
#[command(
    name = "site-harvester",
    version,
    about = "Crawl a website breadth-first and harvest the title and text of every page",
    long_about = "site-harvester starts from one URL, follows the links you allow, and \
                  returns a cleaned title and text for every page it could load."
)]
pub struct Cli {
    #[command(flatten)]
    pub limits: LimitArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl a website starting from a seed URL
    ///
    /// Example: site-harvester crawl example.com --mode scope --allow https://example.com/docs
    Crawl {
        /// Seed URL; bare hosts and http:// URLs are upgraded to https://
        seed_url: String,

        /// Allow-list entry (repeatable); meaning depends on --mode
        #[arg(long = "allow", value_name = "PATTERN")]
        allow: Vec<String>,

        /// Deny-list entry (repeatable); meaning depends on --mode
        #[arg(long = "deny", value_name = "PATTERN")]
        deny: Vec<String>,

        /// How allow/deny entries are matched against discovered links
        #[arg(long, value_enum, default_value_t = Mode::None)]
        mode: Mode,

        /// Pages fetched at the same time
        #[arg(long, default_value_t = 5)]
        concurrency: usize,

        /// Output results in JSON format instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Run one JSON request through the harness and print the JSON response
    ///
    /// Example: echo '{"url":"example.com"}' | site-harvester invoke
    Invoke {
        /// File holding the request; "-" reads from stdin
        #[arg(long, default_value = "-")]
        event: PathBuf,
    },
}

/// Crawl limits shared by every subcommand
#[derive(Args, Debug)]
pub struct LimitArgs {
    /// Stop starting new batches after this many pages
    #[arg(long, global = true, env = "HARVESTER_PAGE_LIMIT", default_value_t = DEFAULT_PAGE_LIMIT)]
    pub page_limit: usize,

    /// Render attempts per page before it is dropped
    #[arg(long, global = true, env = "HARVESTER_MAX_ATTEMPTS", default_value_t = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: usize,

    /// Timeout for a single navigation attempt, in seconds
    #[arg(long, global = true, env = "HARVESTER_NAV_TIMEOUT_SECS", default_value_t = 100)]
    pub nav_timeout_secs: u64,

    /// User-Agent header sent with every request
    #[arg(long, global = true, env = "HARVESTER_USER_AGENT")]
    pub user_agent: Option<String>,

    /// Pages whose body is larger than this many bytes are dropped
    #[arg(long, global = true, env = "HARVESTER_MAX_BODY_BYTES", default_value_t = DEFAULT_MAX_BODY_BYTES)]
    pub max_body_bytes: usize,
}

impl LimitArgs {
    pub fn to_config(&self) -> CrawlConfig {
        let defaults = CrawlConfig::default();
        CrawlConfig {
            page_limit: self.page_limit,
            max_attempts: self.max_attempts,
            navigation_timeout: Duration::from_secs(self.nav_timeout_secs),
            user_agent: self.user_agent.clone().unwrap_or(defaults.user_agent),
            max_body_bytes: self.max_body_bytes,
            ..defaults
        }
    }
}

/// Builds a crawl request from the `crawl` subcommand's arguments
pub fn crawl_request(
    seed_url: String,
    allow: Vec<String>,
    deny: Vec<String>,
    mode: Mode,
    concurrency: usize,
) -> CrawlRequest {
    CrawlRequest {
        seed_url,
        allow_list: allow,
        deny_list: deny,
        mode,
        concurrency,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_crawl_command() {
        let cli = Cli::parse_from([
            "site-harvester",
            "crawl",
            "example.com",
            "--mode",
            "scope",
            "--allow",
            "https://example.com/docs",
            "--allow",
            "https://example.com/guide",
            "--concurrency",
            "8",
            "--page-limit",
            "40",
        ]);

        match cli.command {
            Commands::Crawl {
                seed_url,
                allow,
                mode,
                concurrency,
                ..
            } => {
                assert_eq!(seed_url, "example.com");
                assert_eq!(allow.len(), 2);
                assert_eq!(mode, Mode::Scope);
                assert_eq!(concurrency, 8);
            }
            other => panic!("unexpected command {:?}", other),
        }
        assert_eq!(cli.limits.to_config().page_limit, 40);
    }

    #[test]
    fn test_limit_defaults_match_config_defaults() {
        let cli = Cli::parse_from(["site-harvester", "invoke"]);
        let config = cli.limits.to_config();
        let defaults = CrawlConfig::default();
        assert_eq!(config.page_limit, defaults.page_limit);
        assert_eq!(config.max_attempts, defaults.max_attempts);
        assert_eq!(config.navigation_timeout, defaults.navigation_timeout);
        assert_eq!(config.max_body_bytes, defaults.max_body_bytes);
    }

    #[test]
    fn test_body_limit_flag() {
        let cli = Cli::parse_from(["site-harvester", "--max-body-bytes", "4096", "invoke"]);
        assert_eq!(cli.limits.to_config().max_body_bytes, 4096);
    }
}
