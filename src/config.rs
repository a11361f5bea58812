use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Scrape settings, built once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    /// Run the browser without a window. Only `DEBUG_HEADLESS=false` turns it off.
    pub headless: bool,
    /// Save full-page screenshots of search and item pages.
    pub debug_screenshots: bool,
    pub screenshot_dir: PathBuf,
    pub chrome_executable: Option<PathBuf>,
    pub user_agent: String,
    pub nav_timeout: Duration,
    pub settle_delay: Duration,
    pub scroll_iterations: usize,
    pub scroll_interval: Duration,
    pub max_items: usize,
    /// Pause between driver actions when the browser is visible.
    pub slow_mo: Duration,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            headless: true,
            debug_screenshots: false,
            screenshot_dir: PathBuf::from("."),
            chrome_executable: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            nav_timeout: Duration::from_secs(30),
            settle_delay: Duration::from_secs(3),
            scroll_iterations: 15,
            scroll_interval: Duration::from_secs(1),
            max_items: 3,
            slow_mo: Duration::from_millis(100),
        }
    }
}

impl ScrapeConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            headless: get("DEBUG_HEADLESS").as_deref() != Some("false"),
            debug_screenshots: get("DEBUG_SCREENSHOTS").as_deref() == Some("true"),
            screenshot_dir: get("SCREENSHOT_DIR")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.screenshot_dir),
            chrome_executable: get("CHROME_EXECUTABLE")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
            ..defaults
        }
    }

    pub fn slow_mo(&self) -> Duration {
        if self.headless {
            Duration::ZERO
        } else {
            self.slow_mo
        }
    }
}

/// HTTP surface settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// Allowed CORS origins; empty means any origin.
    pub cors_origins: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from(pairs: &[(&str, &str)]) -> ScrapeConfig {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ScrapeConfig::from_lookup(|k| env.get(k).cloned())
    }

    #[test]
    fn defaults_without_env() {
        let c = from(&[]);
        assert!(c.headless);
        assert!(!c.debug_screenshots);
        assert_eq!(c.nav_timeout, Duration::from_secs(30));
        assert_eq!(c.scroll_iterations, 15);
        assert_eq!(c.max_items, 3);
        assert_eq!(c.slow_mo(), Duration::ZERO);
    }

    #[test]
    fn headless_only_off_for_literal_false() {
        assert!(!from(&[("DEBUG_HEADLESS", "false")]).headless);
        assert!(from(&[("DEBUG_HEADLESS", "0")]).headless);
        assert!(from(&[("DEBUG_HEADLESS", "FALSE")]).headless);
    }

    #[test]
    fn screenshots_only_on_for_literal_true() {
        assert!(from(&[("DEBUG_SCREENSHOTS", "true")]).debug_screenshots);
        assert!(!from(&[("DEBUG_SCREENSHOTS", "1")]).debug_screenshots);
    }

    #[test]
    fn visible_browser_is_slowed_down() {
        let c = from(&[("DEBUG_HEADLESS", "false")]);
        assert_eq!(c.slow_mo(), Duration::from_millis(100));
    }
}
