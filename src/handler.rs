// src/handler.rs
// =============================================================================
// The invocation harness: one JSON request in, one JSON response out.
//
// Request:
//   { "url": "example.com", "whiteList": [...], "blackList": [...],
//     "type": "link" | "regex" | "scope", "concurrency": 5 }
//
// Response:
//   { "statusCode": 200, "body": [ { "url", "title", "content" }, ... ] }
//   { "statusCode": 500, "body": { "error": "..." } }
//
// Only failures of the crawl as a whole become a 500; pages that failed to
// load were already dropped by the crawler and simply do not show up.
// =============================================================================

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use crate::config::CrawlConfig;
use crate::crawl::{crawl_website, CrawlRequest};
use crate::links::Mode;
use crate::render::{HttpRenderer, Renderer};

/// The request object, as the caller sends it
///
/// Every field except `url` may be missing or null.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlEvent {
    pub url: String,
    #[serde(default)]
    pub white_list: Option<Vec<String>>,
    #[serde(default)]
    pub black_list: Option<Vec<String>>,
    /// Unknown or empty values mean "follow every in-scope link"
    #[serde(default, rename = "type")]
    pub mode: Option<Mode>,
    #[serde(default)]
    pub concurrency: Option<usize>,
}

impl From<CrawlEvent> for CrawlRequest {
    fn from(event: CrawlEvent) -> Self {
        CrawlRequest {
            seed_url: event.url,
            allow_list: event.white_list.unwrap_or_default(),
            deny_list: event.black_list.unwrap_or_default(),
            mode: event.mode.unwrap_or_default(),
            concurrency: event.concurrency.unwrap_or(0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HandlerResponse {
    pub status_code: u16,
    pub body: serde_json::Value,
}

impl HandlerResponse {
    pub fn error(message: impl std::fmt::Display) -> Self {
        Self {
            status_code: 500,
            body: json!({ "error": message.to_string() }),
        }
    }
}

/// Parses a raw JSON request; a malformed request becomes a 500 response
pub fn parse_event(raw: &str) -> Result<CrawlEvent, HandlerResponse> {
    serde_json::from_str(raw).map_err(|e| {
        error!(error = %e, "malformed request");
        HandlerResponse::error(format!("invalid request: {}", e))
    })
}

/// Handles one request with the default HTTP renderer
pub async fn handle(event: CrawlEvent, config: &CrawlConfig) -> HandlerResponse {
    match HttpRenderer::launch(config) {
        Ok(renderer) => handle_with(&renderer, event, config).await,
        Err(e) => {
            error!(error = %e, "renderer failed to start");
            HandlerResponse::error(e)
        }
    }
}

/// Handles one request with any renderer
pub async fn handle_with(
    renderer: &dyn Renderer,
    event: CrawlEvent,
    config: &CrawlConfig,
) -> HandlerResponse {
    let request = CrawlRequest::from(event);

    match crawl_website(renderer, &request, config).await {
        Ok(report) => match serde_json::to_value(&report.pages) {
            Ok(body) => HandlerResponse {
                status_code: 200,
                body,
            },
            Err(e) => HandlerResponse::error(e),
        },
        Err(e) => {
            error!(seed = %request.seed_url, error = %e, "crawl failed");
            HandlerResponse::error(e)
        }
    }
}
