// src/content/sanitize.rs
// Whitespace cleanup applied to every extracted title and body text.

use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Turns newlines into spaces, squeezes whitespace runs into a single space
/// and trims both ends.
///
/// Example:
///   "  Hello\n\n   world \t" -> "Hello world"
pub fn sanitize(text: &str) -> String {
    let single_line = text.replace('\n', " ");
    WHITESPACE_RUN
        .replace_all(&single_line, " ")
        .trim()
        .to_string()
}
