// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling.
//
// Features:
// - Breadth-first crawling starting from a seed URL
// - Batches of concurrent page fetches, one batch at a time
// - A visited set so no page is fetched twice
// - A page budget (250 by default)
// - Retries with per-attempt timeouts; pages that keep failing are dropped
//
// Submodules:
// - queue: the frontier scheduler (the BFS loop)
// - fetch: fetching, extracting and retrying a single page
// =============================================================================

mod fetch;
mod queue;

pub use fetch::PageResult;
pub use queue::{crawl_website, CrawlReport, CrawlRequest};
