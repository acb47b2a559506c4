// src/render/mock.rs
// In-memory renderer for tests: a fixed map of URL -> page, plus a log of
// how often each URL was navigated to and how many handles were opened/closed.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::{PageHandle, Renderer};
use crate::error::RenderError;

#[derive(Debug, Clone, Default)]
struct MockPage {
    html: String,
    hrefs: Vec<String>,
    // Navigations that fail before one succeeds
    failures: usize,
    // Never finishes loading; only the caller's timeout ends it
    hangs: bool,
    // A failed navigation still leaves the DOM readable, like a browser
    // that gave up waiting for "load" after the markup arrived
    keeps_dom_on_failure: bool,
}

#[derive(Debug, Default)]
pub struct MockLog {
    pub navigations: HashMap<String, usize>,
    pub opened: usize,
    pub closed: usize,
}

#[derive(Debug, Clone, Default)]
pub struct MockRenderer {
    pages: HashMap<String, MockPage>,
    refuse_open: bool,
    log: Arc<Mutex<MockLog>>,
}

impl MockRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a page with a title, a paragraph of text and some anchors
    pub fn page(mut self, url: &str, title: &str, body: &str, hrefs: &[&str]) -> Self {
        let html = format!(
            "<html><head><title>{}</title></head><body><p>{}</p></body></html>",
            title, body
        );
        self.pages.insert(
            url.to_string(),
            MockPage {
                html,
                hrefs: hrefs.iter().map(|h| h.to_string()).collect(),
                ..MockPage::default()
            },
        );
        self
    }

    /// Makes the first `failures` navigations to an existing page fail
    pub fn flaky(mut self, url: &str, failures: usize) -> Self {
        if let Some(page) = self.pages.get_mut(url) {
            page.failures = failures;
        }
        self
    }

    /// Lets anchors of an existing page be read even when its navigation fails
    pub fn keeps_dom_on_failure(mut self, url: &str) -> Self {
        if let Some(page) = self.pages.get_mut(url) {
            page.keeps_dom_on_failure = true;
        }
        self
    }

    /// Adds a page that never finishes loading
    pub fn hanging(mut self, url: &str) -> Self {
        self.pages.insert(
            url.to_string(),
            MockPage {
                hangs: true,
                ..MockPage::default()
            },
        );
        self
    }

    /// Makes open() fail, like a browser that died
    pub fn refusing_to_open(mut self) -> Self {
        self.refuse_open = true;
        self
    }

    pub fn navigations(&self, url: &str) -> usize {
        let log = self.log.lock().unwrap();
        log.navigations.get(url).copied().unwrap_or(0)
    }

    pub fn total_navigations(&self) -> usize {
        self.log.lock().unwrap().navigations.values().sum()
    }

    pub fn opened(&self) -> usize {
        self.log.lock().unwrap().opened
    }

    pub fn closed(&self) -> usize {
        self.log.lock().unwrap().closed
    }
}

#[async_trait]
impl Renderer for MockRenderer {
    async fn open(&self) -> Result<Box<dyn PageHandle>, RenderError> {
        if self.refuse_open {
            return Err(RenderError::Launch("browser is gone".to_string()));
        }
        self.log.lock().unwrap().opened += 1;
        Ok(Box::new(MockHandle {
            pages: self.pages.clone(),
            log: Arc::clone(&self.log),
            loaded: None,
        }))
    }
}

struct MockHandle {
    pages: HashMap<String, MockPage>,
    log: Arc<Mutex<MockLog>>,
    loaded: Option<MockPage>,
}

#[async_trait]
impl PageHandle for MockHandle {
    async fn navigate(&mut self, url: &str, _timeout: Duration) -> Result<(), RenderError> {
        self.loaded = None;
        let attempt = {
            let mut log = self.log.lock().unwrap();
            let count = log.navigations.entry(url.to_string()).or_insert(0);
            *count += 1;
            *count
        };

        let page = self.pages.get(url).cloned().ok_or_else(|| RenderError::Status {
            url: url.to_string(),
            status: 404,
        })?;

        if page.hangs {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        if attempt <= page.failures {
            if page.keeps_dom_on_failure {
                self.loaded = Some(page);
            }
            return Err(RenderError::Navigation {
                url: url.to_string(),
                message: format!("flaky failure #{}", attempt),
            });
        }

        self.loaded = Some(page);
        Ok(())
    }

    async fn rendered_html(&mut self) -> Result<String, RenderError> {
        self.loaded
            .as_ref()
            .map(|page| page.html.clone())
            .ok_or(RenderError::NoDocument)
    }

    async fn anchor_hrefs(&mut self) -> Result<Vec<String>, RenderError> {
        self.loaded
            .as_ref()
            .map(|page| page.hrefs.clone())
            .ok_or(RenderError::NoDocument)
    }

    async fn close(&mut self) {
        self.log.lock().unwrap().closed += 1;
    }
}
