// src/links/normalize.rs
// =============================================================================
// This module validates URLs and rewrites them into the one canonical shape
// the crawler works with: absolute and HTTPS.
//
// Three small steps, used both for the seed URL and for discovered links:
// 1. resolve_route: "/about" on page "https://a.com" -> "https://a.com/about"
// 2. force_https:   "a.com" -> "https://a.com", "http://a.com" -> "https://a.com"
// 3. is_valid_url:  a liberal shape check (dotted host, 2+ letter TLD)
//
// A discovered link is only worth following when it stays under the page it
// was found on (or points at a PDF), carries no fragment, and still looks like
// a URL after the rewriting above. See `is_in_scope`.
//
// Rust concepts:
// - Option<T>: normalize() returns None for strings that are not URLs
// - Iterators: discover_links chains map/filter over the raw hrefs
// =============================================================================

use once_cell::sync::Lazy;
use regex::Regex;

// Optional http(s) scheme, one or more dotted labels ending in a letters-only
// TLD, then an optional port and anything non-blank after /, ? or #.
static URL_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(https?://)?[a-z0-9-]+(\.[a-z0-9-]+)*\.[a-z]{2,}(:\d+)?([/?#]\S*)?$").unwrap()
});

/// Checks that a string looks like a web URL
///
/// Examples:
///   "example.com"             -> true
///   "https://a.com/x?y=1#top" -> true
///   "localhost:8080"          -> false (no TLD)
///   "mailto:me@a.com"         -> false
pub fn is_valid_url(url: &str) -> bool {
    URL_SHAPE.is_match(url)
}

/// Rewrites a URL to use HTTPS
///
/// Already-HTTPS URLs are returned unchanged, so this is idempotent.
pub fn force_https(url: &str) -> String {
    if starts_with_ignore_case(url, "https://") {
        url.to_string()
    } else if starts_with_ignore_case(url, "http://") {
        // The first 7 bytes are ASCII, so slicing here is on a char boundary
        format!("https://{}", &url[7..])
    } else {
        format!("https://{}", url)
    }
}

/// Validates a candidate and returns its absolute HTTPS form
///
/// Returns None when the string does not look like a URL at all.
pub fn normalize(url: &str) -> Option<String> {
    let url = url.trim();
    if !is_valid_url(url) {
        return None;
    }
    Some(force_https(url))
}

/// Resolves a root-relative route against the page it was found on
///
/// Only links starting with "/" are touched; everything else passes through.
/// The base and route are concatenated without doubling the slash.
pub fn resolve_route(link: &str, base_url: &str) -> String {
    match link.strip_prefix('/') {
        Some(route) if base_url.ends_with('/') => format!("{}{}", base_url, route),
        Some(_) => format!("{}{}", base_url, link),
        None => link.to_string(),
    }
}

/// Decides whether an (already resolved, HTTPS-forced) link may be followed
/// from the page at `base_url`
pub fn is_in_scope(link: &str, base_url: &str) -> bool {
    (link.starts_with(base_url) || link.ends_with(".pdf"))
        && !link.contains('#')
        && is_valid_url(link)
}

/// Turns the raw anchor hrefs of one page into the in-scope links worth
/// classifying, keeping their discovery order
pub fn discover_links(hrefs: &[String], base_url: &str) -> Vec<String> {
    hrefs
        .iter()
        .map(|href| resolve_route(href.trim(), base_url))
        .map(|link| force_https(&link))
        .filter(|link| is_in_scope(link, base_url))
        .collect()
}

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.len() >= prefix.len()
        && text.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_host_gets_https() {
        assert_eq!(normalize("example.com"), Some("https://example.com".to_string()));
    }

    #[test]
    fn test_http_is_upgraded() {
        assert_eq!(
            normalize("http://www.example.com/a?b=1"),
            Some("https://www.example.com/a?b=1".to_string())
        );
    }

    #[test]
    fn test_https_passes_through() {
        let url = "https://docs.example.co.uk:8443/guide/intro";
        assert_eq!(normalize(url), Some(url.to_string()));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for raw in ["example.com", "http://a.com/x", "https://b.org/y?z=1", "HTTP://C.NET"] {
            let once = normalize(raw).unwrap();
            assert_eq!(normalize(&once), Some(once.clone()));
        }
    }

    #[test]
    fn test_rejects_non_urls() {
        assert_eq!(normalize("not a url"), None);
        assert_eq!(normalize("localhost:3000"), None);
        assert_eq!(normalize("mailto:someone@example.com"), None);
        assert_eq!(normalize("javascript:void(0)"), None);
        assert_eq!(normalize("https://127.0.0.1/admin"), None);
        assert_eq!(normalize(""), None);
    }

    #[test]
    fn test_resolve_route() {
        assert_eq!(resolve_route("/about", "https://a.com"), "https://a.com/about");
        assert_eq!(resolve_route("/about", "https://a.com/"), "https://a.com/about");
        assert_eq!(resolve_route("https://b.com/x", "https://a.com"), "https://b.com/x");
        assert_eq!(resolve_route("relative/path", "https://a.com"), "relative/path");
    }

    #[test]
    fn test_in_scope_requires_base_prefix_or_pdf() {
        let base = "https://a.com";
        assert!(is_in_scope("https://a.com/docs", base));
        assert!(is_in_scope("https://cdn.other.com/report.pdf", base));
        assert!(!is_in_scope("https://other.com/docs", base));
    }

    #[test]
    fn test_fragment_is_out_of_scope() {
        assert!(!is_in_scope("https://a.com/page#section", "https://a.com"));
    }

    #[test]
    fn test_discover_links() {
        let hrefs = vec![
            "/about".to_string(),
            "http://a.com/contact".to_string(),
            "https://a.com/page#section".to_string(),
            "https://elsewhere.org/".to_string(),
            "mailto:team@a.com".to_string(),
            "https://files.org/manual.pdf".to_string(),
        ];
        let links = discover_links(&hrefs, "https://a.com");
        assert_eq!(
            links,
            vec![
                "https://a.com/about",
                "https://a.com/contact",
                "https://files.org/manual.pdf",
            ]
        );
    }
}
