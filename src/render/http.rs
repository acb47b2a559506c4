// src/render/http.rs
// =============================================================================
// A renderer that loads pages over plain HTTP.
//
// How it works:
// - One reqwest Client is built when the renderer launches and shared (cheaply
//   cloned) by every page handle
// - navigate() issues a GET with the per-attempt timeout and keeps the body,
//   read chunk by chunk and cut off at the configured size limit
// - anchor_hrefs() parses the body with scraper and resolves every href
//   against the final (post-redirect) URL, the same absolute value a browser
//   reports for `a.href`
//
// No JavaScript runs here: what the server sends is what we read.
//
// Failure mapping (see categorize_error):
// - timeouts            -> RenderError::Timeout
// - 4xx / 5xx           -> RenderError::Status
// - non-HTML documents  -> RenderError::UnsupportedContent (not retried)
// - oversized bodies    -> RenderError::TooLarge (not retried)
// - anything else       -> RenderError::Navigation
// =============================================================================

use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response};
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::{PageHandle, Renderer};
use crate::config::CrawlConfig;
use crate::error::RenderError;

static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());

/// Renderer backed by a shared reqwest client
#[derive(Debug, Clone)]
pub struct HttpRenderer {
    client: Client,
    max_body_bytes: usize,
}

impl HttpRenderer {
    /// Builds the HTTP client; failing here fails the whole crawl
    pub fn launch(config: &CrawlConfig) -> Result<Self, RenderError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .redirect(reqwest::redirect::Policy::limited(10))
            // Crawled sites with broken certificates are still crawled
            .danger_accept_invalid_certs(true)
            .build()
            .map_err(|e| RenderError::Launch(e.to_string()))?;

        Ok(Self {
            client,
            max_body_bytes: config.max_body_bytes,
        })
    }
}

#[async_trait]
impl Renderer for HttpRenderer {
    async fn open(&self) -> Result<Box<dyn PageHandle>, RenderError> {
        Ok(Box::new(HttpPage {
            client: self.client.clone(),
            max_body_bytes: self.max_body_bytes,
            document: None,
        }))
    }
}

// The document a successful navigation left behind
struct LoadedDocument {
    final_url: Url,
    html: String,
}

struct HttpPage {
    client: Client,
    max_body_bytes: usize,
    document: Option<LoadedDocument>,
}

#[async_trait]
impl PageHandle for HttpPage {
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<(), RenderError> {
        // A failed attempt must not leave the previous document readable
        self.document = None;

        let target = Url::parse(url).map_err(|e| RenderError::Navigation {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        let response = self
            .client
            .get(target)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| categorize_error(url, e, timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RenderError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        // Servers that omit Content-Type get the benefit of the doubt
        if let Some(content_type) = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
        {
            if !content_type.contains("html") {
                return Err(RenderError::UnsupportedContent {
                    url: url.to_string(),
                    content_type: content_type.to_string(),
                });
            }
        }

        let final_url = response.url().clone();
        let body = read_body(response, url, self.max_body_bytes, timeout).await?;
        // Pages in legacy charsets lose their non-ASCII characters here; the
        // markup and the links survive
        let html = String::from_utf8_lossy(&body).into_owned();

        debug!(url, final_url = %final_url, bytes = html.len(), "page loaded");
        self.document = Some(LoadedDocument { final_url, html });
        Ok(())
    }

    async fn rendered_html(&mut self) -> Result<String, RenderError> {
        self.document
            .as_ref()
            .map(|doc| doc.html.clone())
            .ok_or(RenderError::NoDocument)
    }

    async fn anchor_hrefs(&mut self) -> Result<Vec<String>, RenderError> {
        let doc = self.document.as_ref().ok_or(RenderError::NoDocument)?;
        Ok(extract_anchor_hrefs(&doc.html, &doc.final_url))
    }

    async fn close(&mut self) {
        self.document = None;
    }
}

// Reads the response body, giving up as soon as it grows past `limit` bytes
//
// A declared Content-Length over the limit fails before anything is read;
// bodies without one (chunked, or closed by the server) are counted as they
// arrive.
async fn read_body(
    mut response: Response,
    url: &str,
    limit: usize,
    timeout: Duration,
) -> Result<Vec<u8>, RenderError> {
    let too_large = || RenderError::TooLarge {
        url: url.to_string(),
        limit,
    };

    if let Some(length) = response.content_length() {
        if length > limit as u64 {
            return Err(too_large());
        }
    }

    let mut body = Vec::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| categorize_error(url, e, timeout))?
    {
        if body.len() + chunk.len() > limit {
            return Err(too_large());
        }
        body.extend_from_slice(&chunk);
    }

    Ok(body)
}

// Reads every <a href> and resolves it against the page URL
//
// Hrefs that cannot be resolved are kept as written; the link pipeline
// filters them out later.
fn extract_anchor_hrefs(html: &str, base: &Url) -> Vec<String> {
    let document = Html::parse_document(html);
    document
        .select(&ANCHOR)
        .filter_map(|element| element.value().attr("href"))
        .map(|href| match base.join(href) {
            Ok(url) => url.to_string(),
            Err(_) => href.to_string(),
        })
        .collect()
}

// Turns a reqwest error into the matching RenderError
fn categorize_error(url: &str, error: reqwest::Error, timeout: Duration) -> RenderError {
    if error.is_timeout() {
        return RenderError::Timeout(timeout);
    }

    let message = if error.is_redirect() {
        "too many redirects".to_string()
    } else if error.is_connect() {
        format!("connection failed: {}", error)
    } else {
        error.to_string()
    };

    RenderError::Navigation {
        url: url.to_string(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.com/docs/page").unwrap()
    }

    #[test]
    fn test_resolves_root_relative_href() {
        let hrefs = extract_anchor_hrefs(r#"<a href="/about">About</a>"#, &base());
        assert_eq!(hrefs, vec!["https://example.com/about"]);
    }

    #[test]
    fn test_resolves_document_relative_href() {
        let hrefs = extract_anchor_hrefs(r#"<a href="../intro">Intro</a>"#, &base());
        assert_eq!(hrefs, vec!["https://example.com/intro"]);
    }

    #[test]
    fn test_keeps_absolute_href_and_skips_anchor_without_href() {
        let html = r#"
            <a href="https://other.org/x">Other</a>
            <a name="top">No href</a>
            <a href="mailto:team@example.com">Mail</a>
        "#;
        let hrefs = extract_anchor_hrefs(html, &base());
        assert_eq!(hrefs, vec!["https://other.org/x", "mailto:team@example.com"]);
    }

    // Answers exactly one request on a local port with `head` followed by
    // `body`, then hangs up
    async fn serve_once(head: String, body: Vec<u8>) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 2048];
            let _ = socket.read(&mut request).await;
            let _ = socket.write_all(head.as_bytes()).await;
            let _ = socket.write_all(&body).await;
            let _ = socket.shutdown().await;
        });
        format!("http://{}/", addr)
    }

    async fn get(url: &str) -> Response {
        Client::builder()
            .no_proxy()
            .build()
            .unwrap()
            .get(url)
            .send()
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_body_within_limit_is_read() {
        let body = b"<html><body>small</body></html>".to_vec();
        let head = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        );
        let url = serve_once(head, body.clone()).await;

        let read = read_body(get(&url).await, &url, 1024, Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(read, body);
    }

    #[tokio::test]
    async fn test_declared_length_over_limit_is_refused() {
        let body = vec![b'x'; 64];
        let head = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        );
        let url = serve_once(head, body).await;

        let err = read_body(get(&url).await, &url, 16, Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, RenderError::TooLarge { limit: 16, .. }));
    }

    #[tokio::test]
    async fn test_undeclared_length_is_cut_off_while_streaming() {
        // No Content-Length: the body ends when the server closes the socket
        let head = "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nConnection: close\r\n\r\n".to_string();
        let url = serve_once(head, vec![b'x'; 4096]).await;

        let response = get(&url).await;
        assert_eq!(response.content_length(), None);
        let err = read_body(response, &url, 100, Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, RenderError::TooLarge { limit: 100, .. }));
    }

    #[tokio::test]
    async fn test_reading_before_navigation_fails() {
        let renderer = HttpRenderer::launch(&CrawlConfig::default()).unwrap();
        let mut page = renderer.open().await.unwrap();
        assert!(matches!(page.rendered_html().await, Err(RenderError::NoDocument)));
        assert!(matches!(page.anchor_hrefs().await, Err(RenderError::NoDocument)));
        page.close().await;
    }

    #[tokio::test]
    async fn test_unparseable_url_is_a_navigation_error() {
        let renderer = HttpRenderer::launch(&CrawlConfig::default()).unwrap();
        let mut page = renderer.open().await.unwrap();
        let err = page
            .navigate("not a url", Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, RenderError::Navigation { .. }));
    }
}
