use std::path::Path;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::{Page, ScreenshotParams};
use futures_util::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{DriverLauncher, PageDriver};
use crate::config::ScrapeConfig;
use crate::error::DriverError;

/// Resource count must hold steady this long before the page counts as idle.
const IDLE_WINDOW_MS: u64 = 500;
const IDLE_POLL_MS: u64 = 100;

/// Whole scrollable page, not just the viewport.
fn full_page_png() -> ScreenshotParams {
    ScreenshotParams::builder()
        .format(CaptureScreenshotFormat::Png)
        .full_page(true)
        .build()
}

/// Launches a local Chromium through the DevTools protocol.
pub struct ChromiumLauncher;

#[async_trait]
impl DriverLauncher for ChromiumLauncher {
    async fn launch(&self, config: &ScrapeConfig) -> Result<Box<dyn PageDriver>, DriverError> {
        let session = ChromiumSession::launch(config).await?;
        Ok(Box::new(session))
    }
}

pub struct ChromiumSession {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
    slow_mo: Duration,
    closed: bool,
}

impl ChromiumSession {
    pub async fn launch(config: &ScrapeConfig) -> Result<Self, DriverError> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .arg("--disable-setuid-sandbox")
            .arg("--disable-blink-features=AutomationControlled")
            .arg("--disable-dev-shm-usage")
            .arg(format!("--user-agent={}", config.user_agent))
            .window_size(1280, 1024);
        if !config.headless {
            builder = builder.with_head();
        }
        if let Some(exe) = &config.chrome_executable {
            builder = builder.chrome_executable(exe);
        }
        let browser_config = builder.build().map_err(DriverError::Launch)?;

        info!("Launching browser (headless={})", config.headless);
        let (mut browser, mut events) = Browser::launch(browser_config)
            .await
            .map_err(|e| DriverError::Launch(e.to_string()))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = events.next().await {
                if let Err(e) = event {
                    debug!("CDP handler event error: {}", e);
                }
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                let _ = browser.close().await;
                handler.abort();
                return Err(DriverError::Launch(format!("new page: {}", e)));
            }
        };

        Ok(Self {
            browser,
            page,
            handler,
            slow_mo: config.slow_mo(),
            closed: false,
        })
    }

    async fn pace(&self) -> Result<(), DriverError> {
        if self.closed {
            return Err(DriverError::Closed);
        }
        if !self.slow_mo.is_zero() {
            tokio::time::sleep(self.slow_mo).await;
        }
        Ok(())
    }

    /// Poll the resource timeline until it stops growing. Best effort: a page
    /// that never settles is used as-is once the budget runs out.
    async fn wait_for_network_idle(&self, budget: Duration) {
        let script = format!(
            r#"(async () => {{
                const budgetMs = {budget};
                const start = Date.now();
                let last = performance.getEntriesByType('resource').length;
                let stable = 0;
                while (Date.now() - start < budgetMs) {{
                    await new Promise(r => setTimeout(r, {poll}));
                    const cur = performance.getEntriesByType('resource').length;
                    if (document.readyState === 'complete' && cur === last) {{
                        stable += {poll};
                        if (stable >= {window}) return {{ idle: true, waitedMs: Date.now() - start }};
                    }} else {{
                        stable = 0;
                    }}
                    last = cur;
                }}
                return {{ idle: false, waitedMs: Date.now() - start }};
            }})()"#,
            budget = budget.as_millis(),
            poll = IDLE_POLL_MS,
            window = IDLE_WINDOW_MS,
        );

        match self.page.evaluate(script).await {
            Ok(result) => {
                let info = result.into_value::<serde_json::Value>().unwrap_or_default();
                let idle = info.get("idle").and_then(|v| v.as_bool()).unwrap_or(false);
                let waited = info.get("waitedMs").and_then(|v| v.as_u64()).unwrap_or(0);
                if idle {
                    debug!("Network idle after {}ms", waited);
                } else {
                    warn!("Network never went idle ({}ms), continuing", waited);
                }
            }
            Err(e) => warn!("Network idle check failed: {}", e),
        }
    }
}

#[async_trait]
impl PageDriver for ChromiumSession {
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<(), DriverError> {
        self.pace().await?;
        let start = Instant::now();

        tokio::time::timeout(timeout, self.page.goto(url))
            .await
            .map_err(|_| DriverError::Timeout {
                url: url.to_string(),
                secs: timeout.as_secs(),
            })?
            .map_err(|e| DriverError::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let remaining = timeout.saturating_sub(start.elapsed());
        if !remaining.is_zero() {
            self.wait_for_network_idle(remaining).await;
        }
        Ok(())
    }

    async fn evaluate(&mut self, script: &str) -> Result<serde_json::Value, DriverError> {
        self.pace().await?;
        let result = self
            .page
            .evaluate(script)
            .await
            .map_err(|e| DriverError::Evaluation(e.to_string()))?;
        // Statements such as scrollBy evaluate to undefined.
        Ok(result.into_value().unwrap_or(serde_json::Value::Null))
    }

    async fn screenshot(&mut self, path: &Path) -> Result<(), DriverError> {
        self.pace().await?;
        let png = self
            .page
            .screenshot(full_page_png())
            .await
            .map_err(|e| DriverError::Screenshot(e.to_string()))?;
        tokio::fs::write(path, png)
            .await
            .map_err(|e| DriverError::Screenshot(format!("{}: {}", path.display(), e)))
    }

    async fn close(&mut self) -> Result<(), DriverError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        let closed = self.browser.close().await;
        if let Err(e) = self.browser.wait().await {
            warn!("Waiting for browser exit failed: {}", e);
        }
        self.handler.abort();
        closed
            .map(|_| ())
            .map_err(|e| DriverError::Close(e.to_string()))
    }
}

impl Drop for ChromiumSession {
    fn drop(&mut self) {
        // Browser's own Drop kills the child process if close() never ran.
        if !self.closed {
            warn!("Browser session dropped without close");
        }
        self.handler.abort();
    }
}
