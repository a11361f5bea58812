pub mod chromium;
#[cfg(test)]
pub mod fake;

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::ScrapeConfig;
use crate::error::DriverError;

pub const OUTER_HTML_JS: &str = "document.documentElement.outerHTML";
pub const SCROLL_VIEWPORT_JS: &str = "window.scrollBy(0, window.innerHeight)";

/// One browsing context. Not shared: a session handles one navigation at a
/// time and must be closed by whoever launched it.
#[async_trait]
pub trait PageDriver: Send {
    /// Load `url` and wait for the network to go quiet, bounded by `timeout`.
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<(), DriverError>;

    async fn evaluate(&mut self, script: &str) -> Result<serde_json::Value, DriverError>;

    async fn screenshot(&mut self, path: &Path) -> Result<(), DriverError>;

    async fn close(&mut self) -> Result<(), DriverError>;

    async fn scroll_viewport(&mut self) -> Result<(), DriverError> {
        self.evaluate(SCROLL_VIEWPORT_JS).await.map(|_| ())
    }

    /// Serialized DOM of the current page.
    async fn html(&mut self) -> Result<String, DriverError> {
        match self.evaluate(OUTER_HTML_JS).await? {
            serde_json::Value::String(html) => Ok(html),
            other => Err(DriverError::Evaluation(format!(
                "expected page markup, got {}",
                other
            ))),
        }
    }
}

/// Opens a fresh session per scrape request.
#[async_trait]
pub trait DriverLauncher: Send + Sync {
    async fn launch(&self, config: &ScrapeConfig) -> Result<Box<dyn PageDriver>, DriverError>;
}
