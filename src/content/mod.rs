// src/content/mod.rs
// =============================================================================
// This module turns a rendered page into the text we keep.
//
// Submodules:
// - html: pulls the <title> and the visible body text out of raw HTML
// - sanitize: squeezes whitespace in whatever the extractor returned
// =============================================================================

mod html;
mod sanitize;

pub use html::{Extracted, Extractor, HtmlExtractor};
pub use sanitize::sanitize;
