// src/render/mod.rs
// =============================================================================
// This module defines how the crawler loads pages.
//
// A Renderer is acquired once per crawl and hands out one PageHandle per URL.
// The page fetcher drives the handle:
//   open() -> navigate(url, timeout) [retried] -> rendered_html()
//          -> anchor_hrefs() -> close()
//
// Any backend (plain HTTP, a headless browser, a test double) fits behind
// these two traits. The crate ships HttpRenderer, which fetches pages with
// reqwest and reads anchors out of the served HTML.
//
// Rust concepts:
// - Traits: Define the interface without fixing the implementation
// - async-trait: Lets trait methods be async while staying object-safe, so
//   the crawler can hold a `&dyn Renderer`
// - Box<dyn Trait>: An owned value of "some type implementing the trait"
// =============================================================================

mod http;
#[cfg(test)]
pub mod mock;

use async_trait::async_trait;
use std::time::Duration;

use crate::error::RenderError;

pub use http::HttpRenderer;

#[async_trait]
pub trait Renderer: Send + Sync {
    /// Opens a fresh page to navigate with
    async fn open(&self) -> Result<Box<dyn PageHandle>, RenderError>;
}

#[async_trait]
pub trait PageHandle: Send {
    /// Loads `url` and waits for the load-complete signal
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<(), RenderError>;

    /// HTML of the loaded document
    async fn rendered_html(&mut self) -> Result<String, RenderError>;

    /// The href of every anchor in the loaded document
    async fn anchor_hrefs(&mut self) -> Result<Vec<String>, RenderError>;

    /// Releases the page; called exactly once, whatever happened before
    async fn close(&mut self);
}
