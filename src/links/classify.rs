// src/links/classify.rs
// =============================================================================
// This module decides which in-scope links the crawler follows.
//
// A request picks one of four policies (the "mode"):
// - link:  allow/deny lists hold exact URLs
// - regex: allow/deny lists hold regular expressions
// - scope: allow/deny lists hold URL prefixes
// - none:  every in-scope link is followed
//
// Patterns are compiled once, up front, so an invalid regex fails the crawl
// before a single page is fetched.
//
// Rust concepts:
// - Enums with data: each policy variant carries its own compiled lists
// - serde(other): unknown mode names fall back to the unrestricted policy
// =============================================================================

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CrawlError;

/// Which classification policy to apply to discovered links
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Link,
    Regex,
    Scope,
    #[default]
    #[serde(other)]
    None,
}

/// A compiled allow/deny policy
#[derive(Debug, Clone)]
pub enum LinkPolicy {
    Link { allow: Vec<String>, deny: Vec<String> },
    Regex { allow: Vec<Regex>, deny: Vec<Regex> },
    Scope { allow: Vec<String>, deny: Vec<String> },
    Unrestricted,
}

impl LinkPolicy {
    pub fn new(mode: Mode, allow: &[String], deny: &[String]) -> Result<Self, CrawlError> {
        let policy = match mode {
            Mode::Link => LinkPolicy::Link {
                allow: allow.to_vec(),
                deny: deny.to_vec(),
            },
            Mode::Regex => LinkPolicy::Regex {
                allow: compile_all(allow)?,
                deny: compile_all(deny)?,
            },
            Mode::Scope => LinkPolicy::Scope {
                allow: allow.to_vec(),
                deny: deny.to_vec(),
            },
            Mode::None => LinkPolicy::Unrestricted,
        };
        Ok(policy)
    }

    /// Whether a single link passes this policy
    pub fn accepts(&self, link: &str) -> bool {
        match self {
            LinkPolicy::Link { allow, deny } => {
                (allow.is_empty() || allow.iter().any(|entry| entry == link))
                    && !deny.iter().any(|entry| entry == link)
            }
            LinkPolicy::Regex { allow, deny } => {
                (allow.is_empty() || allow.iter().any(|re| re.is_match(link)))
                    && !deny.iter().any(|re| re.is_match(link))
            }
            // An empty allow list accepts nothing in this mode
            LinkPolicy::Scope { allow, deny } => {
                allow.iter().any(|prefix| link.starts_with(prefix.as_str()))
                    && !deny.iter().any(|prefix| link.starts_with(prefix.as_str()))
            }
            LinkPolicy::Unrestricted => true,
        }
    }

    /// Keeps the accepted links, in their original order
    pub fn classify(&self, links: Vec<String>) -> Vec<String> {
        links.into_iter().filter(|link| self.accepts(link)).collect()
    }
}

fn compile_all(patterns: &[String]) -> Result<Vec<Regex>, CrawlError> {
    patterns
        .iter()
        .map(|pattern| {
            Regex::new(pattern).map_err(|source| CrawlError::InvalidPattern {
                pattern: pattern.clone(),
                source,
            })
        })
        .collect()
}
