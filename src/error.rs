// src/error.rs
// =============================================================================
// Error types for the crawl engine.
//
// Two levels of failure exist:
// - RenderError: one navigation (or one page handle) went wrong. The page
//   fetcher retries these and finally drops the page; they never abort a crawl
//   unless the renderer itself cannot hand out pages.
// - CrawlError: the whole crawl cannot go on (renderer failed to start, a
//   regex pattern in the request is invalid, ...).
//
// Rust concepts:
// - thiserror: derives std::error::Error and Display from attributes
// - #[from]: lets the ? operator convert one error type into another
// =============================================================================

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    /// The renderer could not be started (no client, no browser, ...)
    #[error("renderer failed to launch: {0}")]
    Launch(String),

    #[error("navigation timed out after {0:?}")]
    Timeout(Duration),

    #[error("navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("navigation to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// The target answered with something that is not an HTML document
    #[error("{url} is not an HTML document ({content_type})")]
    UnsupportedContent { url: String, content_type: String },

    /// The body is bigger than the renderer is willing to buffer
    #[error("{url} is larger than the {limit}-byte body limit")]
    TooLarge { url: String, limit: usize },

    /// HTML or links were requested before a successful navigation
    #[error("page has no document loaded")]
    NoDocument,
}

impl RenderError {
    /// Whether another attempt at the same URL could plausibly succeed
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self,
            RenderError::UnsupportedContent { .. }
                | RenderError::TooLarge { .. }
                | RenderError::Launch(_)
        )
    }
}

#[derive(Debug, Error)]
pub enum CrawlError {
    #[error(transparent)]
    Renderer(#[from] RenderError),

    #[error("invalid regex pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
