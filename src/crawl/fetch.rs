// src/crawl/fetch.rs
// =============================================================================
// This module fetches ONE page: render it, pull out its text, retry on
// failure, and give up quietly when the page will not load.
//
// How it works:
// 1. Normalize the URL (bare hosts get https://, http is upgraded)
//    - Not a URL at all?  -> Dropped(Rejected)
//    - Points at a PDF?    -> Dropped(NotHtml), the renderer is never called
// 2. Open a page handle from the renderer
// 3. Try to navigate up to `max_attempts` times, each attempt with its own
//    timeout. A successful attempt also reads the HTML and the anchor hrefs.
// 4. Extract (title, body text), sanitize both, build a PageResult
// 5. Close the page handle, whatever happened
//
// When every attempt failed, the anchors the page still exposes (a browser
// that timed out on "load" usually has most of the DOM) travel with the drop
// so the scheduler can keep growing the frontier.
//
// A page that keeps failing is DROPPED, not reported as an error: one bad
// page must never take the whole crawl down. The only error this module
// returns is the renderer refusing to open a page at all.
//
// Rust concepts:
// - Lifetimes: PageFetcher<'a> borrows the renderer, extractor and config
//   that the scheduler owns
// - Enums with data: FetchOutcome says exactly what happened to a URL
// - tokio::time::timeout: Caps how long one navigation attempt may take
// =============================================================================

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::CrawlConfig;
use crate::content::{sanitize, Extractor};
use crate::error::{CrawlError, RenderError};
use crate::links::normalize;
use crate::render::{PageHandle, Renderer};

/// What we keep for every page that loaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResult {
    /// Normalized (HTTPS) URL of the page
    pub url: String,
    /// Page title, or the URL when the page has no usable title
    pub title: String,
    /// Visible body text with whitespace squeezed
    pub content: String,
}

/// Why a URL produced no PageResult
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropReason {
    /// The string did not look like a URL
    Rejected,
    /// PDF links are followed as links, never rendered
    NotHtml,
    /// Every attempt failed (or a failure ruled out further attempts)
    Exhausted { attempts: usize, last_error: String },
}

/// The result of fetching one URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Fetched {
        page: PageResult,
        /// Raw anchor hrefs found on the page, in document order
        hrefs: Vec<String>,
    },
    Dropped {
        url: String,
        reason: DropReason,
        /// Anchors the page still exposed after its last failed attempt;
        /// empty when nothing was ever rendered
        hrefs: Vec<String>,
    },
}

pub struct PageFetcher<'a> {
    renderer: &'a dyn Renderer,
    extractor: &'a dyn Extractor,
    config: &'a CrawlConfig,
}

impl<'a> PageFetcher<'a> {
    pub fn new(
        renderer: &'a dyn Renderer,
        extractor: &'a dyn Extractor,
        config: &'a CrawlConfig,
    ) -> Self {
        Self {
            renderer,
            extractor,
            config,
        }
    }

    /// Fetches one page, see the module notes for the full protocol
    pub async fn fetch(&self, raw_url: &str) -> Result<FetchOutcome, CrawlError> {
        let url = match normalize(raw_url) {
            Some(url) => url,
            None => {
                debug!(url = raw_url, "dropping malformed url");
                return Ok(dropped(raw_url, DropReason::Rejected));
            }
        };

        if url.ends_with(".pdf") {
            debug!(url = %url, "not rendering pdf");
            return Ok(dropped(&url, DropReason::NotHtml));
        }

        let mut page = self.renderer.open().await?;
        let outcome = self.fetch_with_retries(page.as_mut(), &url).await;
        page.close().await;

        Ok(outcome)
    }

    async fn fetch_with_retries(&self, page: &mut dyn PageHandle, url: &str) -> FetchOutcome {
        let max_attempts = self.config.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            match self.attempt(page, url).await {
                Ok((html, hrefs)) => {
                    return FetchOutcome::Fetched {
                        page: self.build_result(url, &html),
                        hrefs,
                    };
                }
                Err(err) if attempt >= max_attempts || !err.is_retryable() => {
                    warn!(url, attempt, error = %err, "giving up on page");
                    // A page that never finished loading may still have a
                    // partial DOM worth mining for links
                    let hrefs = page.anchor_hrefs().await.unwrap_or_default();
                    return FetchOutcome::Dropped {
                        url: url.to_string(),
                        reason: DropReason::Exhausted {
                            attempts: attempt,
                            last_error: err.to_string(),
                        },
                        hrefs,
                    };
                }
                Err(err) => {
                    debug!(url, attempt, error = %err, "navigation failed, retrying");
                }
            }
        }
    }

    // One navigation attempt; the timeout also covers renderers that ignore
    // the timeout they are handed
    async fn attempt(
        &self,
        page: &mut dyn PageHandle,
        url: &str,
    ) -> Result<(String, Vec<String>), RenderError> {
        let timeout = self.config.navigation_timeout;
        tokio::time::timeout(timeout, page.navigate(url, timeout))
            .await
            .map_err(|_| RenderError::Timeout(timeout))??;

        let html = page.rendered_html().await?;
        let hrefs = page.anchor_hrefs().await?;
        Ok((html, hrefs))
    }

    fn build_result(&self, url: &str, html: &str) -> PageResult {
        let extracted = self.extractor.extract(html);
        let title = sanitize(&extracted.title);
        let content = sanitize(&extracted.body_text);

        PageResult {
            url: url.to_string(),
            title: if title.is_empty() { url.to_string() } else { title },
            content,
        }
    }
}

fn dropped(url: &str, reason: DropReason) -> FetchOutcome {
    FetchOutcome::Dropped {
        url: url.to_string(),
        reason,
        hrefs: Vec::new(),
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why does fetch() return Result<FetchOutcome, _> and not Option?
//    - A drop is a normal outcome, so it lives in FetchOutcome with a reason
//    - The Err side is reserved for "the renderer is broken", which stops the
//      crawl
//
// 2. Why the double `??` in attempt()?
//    - tokio::time::timeout wraps the navigation result in another Result
//    - The first ? handles the timeout, the second the navigation error
//
// 3. Why close the page outside fetch_with_retries?
//    - fetch_with_retries returns on every path without `?`, so the single
//      close() call after it always runs
// -----------------------------------------------------------------------------
