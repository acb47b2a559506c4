// src/links/mod.rs
// =============================================================================
// This module contains all link handling logic.
//
// Submodules:
// - normalize: validates URLs, forces HTTPS, resolves "/routes" and decides
//   which discovered links are in scope
// - classify: applies the request's allow/deny policy to in-scope links
//
// Rust concepts:
// - pub use: Re-export items so callers write `links::normalize()` instead of
//   `links::normalize::normalize()`
// =============================================================================

mod classify;
mod normalize;

pub use classify::{LinkPolicy, Mode};
pub use normalize::{discover_links, normalize};
