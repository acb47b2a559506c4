// src/config.rs
// =============================================================================
// Tunable limits for a crawl.
//
// Every field has a sensible default (see `Default` below). The CLI in
// cli.rs can override each one, either with a flag or an environment
// variable.
// =============================================================================

use std::time::Duration;

/// Maximum number of successfully fetched pages per crawl
pub const DEFAULT_PAGE_LIMIT: usize = 250;

/// Total render attempts per page (the first try plus two retries)
pub const DEFAULT_MAX_ATTEMPTS: usize = 3;

/// Timeout for a single navigation attempt
pub const DEFAULT_NAVIGATION_TIMEOUT: Duration = Duration::from_secs(100);

/// Pages fetched concurrently per batch when the request does not say
pub const DEFAULT_CONCURRENCY: usize = 5;

/// Largest response body the HTTP renderer will hold in memory (10 MiB)
pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// The scheduler stops pulling new batches once this many pages were fetched
    pub page_limit: usize,
    /// Render attempts before a page is dropped
    pub max_attempts: usize,
    /// Independent timeout applied to every navigation attempt
    pub navigation_timeout: Duration,
    /// Batch size used when a request asks for concurrency 0 or none at all
    pub default_concurrency: usize,
    /// User-Agent header sent by the HTTP renderer
    pub user_agent: String,
    /// Pages with a bigger body are dropped instead of read to the end
    pub max_body_bytes: usize,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            page_limit: DEFAULT_PAGE_LIMIT,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            navigation_timeout: DEFAULT_NAVIGATION_TIMEOUT,
            default_concurrency: DEFAULT_CONCURRENCY,
            user_agent: concat!("site-harvester/", env!("CARGO_PKG_VERSION")).to_string(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl CrawlConfig {
    /// Resolves a requested batch size, treating 0 as "use the default"
    pub fn effective_concurrency(&self, requested: usize) -> usize {
        if requested == 0 {
            self.default_concurrency.max(1)
        } else {
            requested
        }
    }
}
