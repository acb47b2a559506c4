// src/crawl/queue.rs
// =============================================================================
// This module implements website crawling with a breadth-first approach.
//
// How it works:
// 1. Start with the seed URL in a queue (the "frontier")
// 2. Take up to `concurrency` URLs from the front of the queue as a batch
// 3. CLAIM each one in the visited set before any fetching starts; URLs that
//    were already claimed are skipped
// 4. Fetch the whole batch concurrently and wait for all of it
// 5. For every page that loaded: record it, then run its links through the
//    link pipeline (normalize -> scope check -> policy) and push the new ones
//    to the back of the queue. A dropped page feeds whatever anchors it still
//    exposed through the same pipeline.
// 6. Repeat until the queue is empty or the page budget is spent
//
// Budget:
// - The budget is checked between batches only, so the last batch can push
//   the page count past the limit by at most `concurrency - 1`
//
// Rust concepts:
// - HashSet: To track claimed URLs (O(1) lookup)
// - VecDeque: Double-ended queue for breadth-first crawling
// - join_all: Runs a batch of futures concurrently on the current task
// =============================================================================

use futures::future::join_all;
use std::collections::{HashSet, VecDeque};
use tracing::{debug, info};

use super::fetch::{FetchOutcome, PageFetcher, PageResult};
use crate::config::CrawlConfig;
use crate::content::HtmlExtractor;
use crate::error::CrawlError;
use crate::links::{discover_links, normalize, LinkPolicy, Mode};
use crate::render::Renderer;

/// Everything one crawl needs to know about what to crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlRequest {
    pub seed_url: String,
    pub allow_list: Vec<String>,
    pub deny_list: Vec<String>,
    pub mode: Mode,
    /// Batch size; 0 means "use the configured default"
    pub concurrency: usize,
}

impl CrawlRequest {
    /// An unrestricted request for `seed_url` with default concurrency
    pub fn new(seed_url: impl Into<String>) -> Self {
        Self {
            seed_url: seed_url.into(),
            allow_list: Vec::new(),
            deny_list: Vec::new(),
            mode: Mode::None,
            concurrency: 0,
        }
    }
}

/// What a finished crawl produced
#[derive(Debug, Clone, Default)]
pub struct CrawlReport {
    /// Fetched pages, in the order their batches completed
    pub pages: Vec<PageResult>,
    pub pages_visited: usize,
    /// URLs that were claimed but produced no page
    pub dropped: usize,
    pub batches: usize,
}

// State that lives for exactly one crawl and is only touched by the loop in
// crawl_with; fetch tasks hand back outcomes instead of mutating it
struct CrawlState {
    visited: HashSet<String>,
    frontier: VecDeque<String>,
    report: CrawlReport,
}

impl CrawlState {
    fn new(seed_url: &str) -> Self {
        let mut frontier = VecDeque::new();
        frontier.push_back(seed_url.to_string());

        Self {
            visited: HashSet::new(),
            frontier,
            report: CrawlReport::default(),
        }
    }

    // Marks a URL as taken; false when someone already claimed it
    //
    // The key is the normalized URL, so "example.com" and
    // "https://example.com" count as the same page.
    fn claim(&mut self, url: &str) -> bool {
        let key = normalize(url).unwrap_or_else(|| url.to_string());
        self.visited.insert(key)
    }

    // Pops up to `size` URLs and keeps the ones this call managed to claim
    fn next_batch(&mut self, size: usize) -> Vec<String> {
        let take = size.min(self.frontier.len());
        let popped: Vec<String> = self.frontier.drain(..take).collect();
        popped.into_iter().filter(|url| self.claim(url)).collect()
    }

    fn enqueue(&mut self, links: Vec<String>) {
        for link in links {
            if !self.visited.contains(&link) {
                self.frontier.push_back(link);
            }
        }
    }

    fn record(&mut self, outcome: FetchOutcome, policy: &LinkPolicy) {
        match outcome {
            FetchOutcome::Fetched { page, hrefs } => {
                let links = policy.classify(discover_links(&hrefs, &page.url));
                debug!(url = %page.url, found = hrefs.len(), accepted = links.len(), "page crawled");
                self.enqueue(links);
                self.report.pages_visited += 1;
                self.report.pages.push(page);
            }
            FetchOutcome::Dropped { url, reason, hrefs } => {
                let links = policy.classify(discover_links(&hrefs, &url));
                debug!(url = %url, ?reason, salvaged = links.len(), "page dropped");
                self.enqueue(links);
                self.report.dropped += 1;
            }
        }
    }
}

/// Crawls a website starting from `request.seed_url`
///
/// Pages are loaded through `renderer` and their text is pulled out with the
/// default HtmlExtractor.
pub async fn crawl_website(
    renderer: &dyn Renderer,
    request: &CrawlRequest,
    config: &CrawlConfig,
) -> Result<CrawlReport, CrawlError> {
    let extractor = HtmlExtractor::new();
    let fetcher = PageFetcher::new(renderer, &extractor, config);
    crawl_with(&fetcher, request, config).await
}

// The crawl loop proper, over an already assembled fetcher
async fn crawl_with(
    fetcher: &PageFetcher<'_>,
    request: &CrawlRequest,
    config: &CrawlConfig,
) -> Result<CrawlReport, CrawlError> {
    // Bad patterns fail the crawl before anything is fetched
    let policy = LinkPolicy::new(request.mode, &request.allow_list, &request.deny_list)?;
    let concurrency = config.effective_concurrency(request.concurrency);

    info!(
        seed = %request.seed_url,
        mode = ?request.mode,
        concurrency,
        page_limit = config.page_limit,
        "starting crawl"
    );

    let mut state = CrawlState::new(&request.seed_url);

    while !state.frontier.is_empty() && state.report.pages_visited < config.page_limit {
        let batch = state.next_batch(concurrency);
        if batch.is_empty() {
            // Everything popped was already claimed
            continue;
        }

        state.report.batches += 1;
        debug!(
            batch = state.report.batches,
            size = batch.len(),
            queued = state.frontier.len(),
            "dispatching batch"
        );

        let outcomes = join_all(batch.iter().map(|url| fetcher.fetch(url))).await;
        for outcome in outcomes {
            state.record(outcome?, &policy);
        }
    }

    info!(
        pages = state.report.pages_visited,
        dropped = state.report.dropped,
        batches = state.report.batches,
        left_in_queue = state.frontier.len(),
        "crawl finished"
    );

    Ok(state.report)
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why claim before fetching?
//    - The fetches of one batch run at the same time
//    - If two entries of a batch are the same URL, only the first claim()
//      returns true, so the page is fetched once
//    - Claiming happens in plain synchronous code, before any .await, so no
//      fetch can sneak in between "check" and "insert"
//
// 2. Why do fetch tasks return outcomes instead of pushing results?
//    - Only this loop owns CrawlState, so nothing needs a Mutex
//    - Results are recorded in batch order, which keeps output stable
//
// 3. What is join_all?
//    - Takes many futures and waits for all of them
//    - They make progress concurrently on the same task (no threads needed)
//    - Like Promise.all() in JavaScript
//
// 4. Why `outcome?` inside the loop?
//    - Per-page problems are already folded into FetchOutcome::Dropped
//    - An Err here means the renderer itself broke, so the crawl stops
// -----------------------------------------------------------------------------
