//! In-memory driver serving canned markup per URL.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use super::{DriverLauncher, PageDriver, OUTER_HTML_JS, SCROLL_VIEWPORT_JS};
use crate::config::ScrapeConfig;
use crate::error::DriverError;

#[derive(Debug, Default)]
pub struct FakeLog {
    pub launches: usize,
    pub navigations: Vec<String>,
    pub scrolls: usize,
    pub screenshots: Vec<PathBuf>,
    pub closes: usize,
}

#[derive(Clone, Default)]
pub struct FakeSite {
    pages: HashMap<String, String>,
    broken: HashSet<String>,
    launch_fails: bool,
    pub log: Arc<Mutex<FakeLog>>,
}

impl FakeSite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, html: impl Into<String>) -> Self {
        self.pages.insert(url.to_string(), html.into());
        self
    }

    pub fn fixture(self, url: &str, name: &str) -> Self {
        let html = std::fs::read_to_string(format!("tests/fixtures/{}.html", name)).unwrap();
        self.page(url, html)
    }

    /// Navigation to `url` fails.
    pub fn broken(mut self, url: &str) -> Self {
        self.broken.insert(url.to_string());
        self
    }

    pub fn failing_launch(mut self) -> Self {
        self.launch_fails = true;
        self
    }

    pub fn driver(&self) -> FakeDriver {
        FakeDriver {
            site: self.clone(),
            current: None,
            closed: false,
        }
    }
}

#[async_trait]
impl DriverLauncher for FakeSite {
    async fn launch(&self, _config: &ScrapeConfig) -> Result<Box<dyn PageDriver>, DriverError> {
        if self.launch_fails {
            return Err(DriverError::Launch("no browser in test".into()));
        }
        self.log.lock().unwrap().launches += 1;
        Ok(Box::new(self.driver()))
    }
}

pub struct FakeDriver {
    site: FakeSite,
    current: Option<String>,
    closed: bool,
}

#[async_trait]
impl PageDriver for FakeDriver {
    async fn navigate(&mut self, url: &str, _timeout: Duration) -> Result<(), DriverError> {
        if self.closed {
            return Err(DriverError::Closed);
        }
        self.site.log.lock().unwrap().navigations.push(url.to_string());
        if self.site.broken.contains(url) {
            return Err(DriverError::Timeout {
                url: url.to_string(),
                secs: 30,
            });
        }
        self.current = Some(url.to_string());
        Ok(())
    }

    async fn evaluate(&mut self, script: &str) -> Result<serde_json::Value, DriverError> {
        if self.closed {
            return Err(DriverError::Closed);
        }
        match script {
            OUTER_HTML_JS => {
                let html = self
                    .current
                    .as_ref()
                    .and_then(|url| self.site.pages.get(url))
                    .cloned()
                    .unwrap_or_else(|| "<html><body></body></html>".to_string());
                Ok(serde_json::Value::String(html))
            }
            SCROLL_VIEWPORT_JS => {
                self.site.log.lock().unwrap().scrolls += 1;
                Ok(serde_json::Value::Null)
            }
            other => Err(DriverError::Evaluation(format!("unexpected script: {}", other))),
        }
    }

    async fn screenshot(&mut self, path: &Path) -> Result<(), DriverError> {
        self.site.log.lock().unwrap().screenshots.push(path.to_path_buf());
        Ok(())
    }

    async fn close(&mut self) -> Result<(), DriverError> {
        self.closed = true;
        self.site.log.lock().unwrap().closes += 1;
        Ok(())
    }
}
