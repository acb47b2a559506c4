// src/content/html.rs
// =============================================================================
// This module turns raw HTML into a (title, body text) pair.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Lets us walk the tree node by node
//
// What counts as "visible text":
// - Every text node under <body>
// - Except text inside <script>, <style>, <head> and <noscript> subtrees
//
// Rust concepts:
// - Traits: Extractor is the seam the page fetcher depends on
// - Recursion: Walking the DOM tree child by child
// - Pattern matching: Telling text nodes from element nodes
// =============================================================================

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Node, Selector};

// Selectors are constant and known to be valid, so unwrap() cannot fail here
static TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("title").unwrap());
static BODY: Lazy<Selector> = Lazy::new(|| Selector::parse("body").unwrap());

// Subtrees whose text never reaches the page content
const HIDDEN_TAGS: [&str; 4] = ["script", "style", "head", "noscript"];

// Elements that start a new line when rendered; their text is kept apart from
// whatever follows. Inline elements (a, b, em, span, ...) join their
// neighbours directly, so "wor<b>ld</b>!" stays "world!".
const BLOCK_TAGS: [&str; 35] = [
    "address", "article", "aside", "blockquote", "br", "dd", "details", "div", "dl", "dt",
    "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6",
    "header", "hr", "li", "main", "nav", "ol", "p", "pre", "section", "table", "td", "th", "tr",
    "ul",
];

/// Raw text pulled out of a document, before sanitizing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extracted {
    pub title: String,
    pub body_text: String,
}

/// Anything that can turn an HTML document into title + body text
pub trait Extractor: Send + Sync {
    fn extract(&self, html: &str) -> Extracted;
}

/// The default extractor, built on scraper
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlExtractor;

impl HtmlExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Extractor for HtmlExtractor {
    fn extract(&self, html: &str) -> Extracted {
        let document = Html::parse_document(html);

        // Only the first <title> counts; inline SVGs may carry their own
        let title = document
            .select(&TITLE)
            .next()
            .map(|element| element.text().collect::<String>())
            .unwrap_or_default();

        let mut body_text = String::new();
        // html5ever always synthesizes a <body>, but stay safe
        if let Some(body) = document.select(&BODY).next() {
            collect_visible_text(body, &mut body_text);
        }

        Extracted { title, body_text }
    }
}

// Appends the text of every visible descendant of `element` to `out`
//
// Block elements are wrapped in spaces so "<p>a</p><p>b</p>" reads "a b"
// instead of "ab"; the sanitizer squeezes the extra spaces later.
fn collect_visible_text(element: ElementRef, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => {
                if HIDDEN_TAGS.contains(&el.name()) {
                    continue;
                }
                if let Some(child_element) = ElementRef::wrap(child) {
                    let is_block = BLOCK_TAGS.contains(&el.name());
                    if is_block {
                        out.push(' ');
                    }
                    collect_visible_text(child_element, out);
                    if is_block {
                        out.push(' ');
                    }
                }
            }
            _ => {}
        }
    }
}
