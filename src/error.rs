use thiserror::Error;

/// Failures reported by a page-automation session.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("browser launch failed: {0}")]
    Launch(String),

    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("navigation to {url} timed out after {secs}s")]
    Timeout { url: String, secs: u64 },

    #[error("page evaluation failed: {0}")]
    Evaluation(String),

    #[error("screenshot failed: {0}")]
    Screenshot(String),

    #[error("browser close failed: {0}")]
    Close(String),

    #[error("browser session already closed")]
    Closed,
}

/// Errors that abort a whole scrape request. Per-item failures never
/// surface here; they are logged and skipped.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("could not start browser session: {0}")]
    Launch(#[source] DriverError),

    #[error("search page unavailable: {0}")]
    Search(#[source] DriverError),
}
