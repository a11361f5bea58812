use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::LazyLock;

use html_scraper::{Html, Selector};
use tracing::{debug, info, warn};
use url::Url;

use crate::config::ScrapeConfig;
use crate::driver::PageDriver;
use crate::error::DriverError;
use crate::models::Query;

/// Item-link selectors, most specific first.
static LINK_CASCADE: LazyLock<Vec<(&'static str, Selector)>> = LazyLock::new(|| {
    [
        ("video-link", r#"a[href*="/video/"]"#),
        (
            "result-item",
            r#"[data-e2e*="search"] a[href], [class*="DivItemContainer"] a[href]"#,
        ),
        ("profile-link", r#"a[href*="/@"]"#),
    ]
    .into_iter()
    .map(|(name, css)| (name, Selector::parse(css).unwrap()))
    .collect()
});

/// Load the search page for `query` and return up to `max_items` item URLs.
/// No links is a valid outcome, not an error.
pub async fn discover_items(
    driver: &mut dyn PageDriver,
    query: &Query,
    config: &ScrapeConfig,
) -> Result<Vec<String>, DriverError> {
    let search_url = query.search_url();
    info!("Searching: {}", search_url);
    driver.navigate(&search_url, config.nav_timeout).await?;
    tokio::time::sleep(config.settle_delay).await;

    let html = driver.html().await?;
    let links = find_item_links(&html, &search_url, config.max_items);
    info!("Found {} video links: {:?}", links.len(), links);

    if links.is_empty() {
        warn!("No video links found. The search page may have changed selectors or be blocking.");
        debug_screenshot(driver, config, "search_page_debug").await;
    }
    Ok(links)
}

/// Open an item page, scroll to trigger lazy comment loading, and return the
/// resulting markup.
pub async fn reveal_content(
    driver: &mut dyn PageDriver,
    item_url: &str,
    config: &ScrapeConfig,
) -> Result<String, DriverError> {
    driver.navigate(item_url, config.nav_timeout).await?;
    tokio::time::sleep(config.settle_delay).await;

    auto_scroll(driver, config).await?;
    debug_screenshot(driver, config, "tiktok_debug").await;

    driver.html().await
}

async fn auto_scroll(driver: &mut dyn PageDriver, config: &ScrapeConfig) -> Result<(), DriverError> {
    for _ in 0..config.scroll_iterations {
        driver.scroll_viewport().await?;
        tokio::time::sleep(config.scroll_interval).await;
    }
    debug!("Scrolled {} viewports", config.scroll_iterations);
    Ok(())
}

async fn debug_screenshot(driver: &mut dyn PageDriver, config: &ScrapeConfig, prefix: &str) {
    if !config.debug_screenshots {
        return;
    }
    let path: PathBuf = config.screenshot_dir.join(format!(
        "{}_{}.png",
        prefix,
        chrono::Utc::now().timestamp_millis()
    ));
    match driver.screenshot(&path).await {
        Ok(()) => info!("Saved screenshot {}", path.display()),
        Err(e) => warn!("Screenshot failed: {}", e),
    }
}

/// Run the link cascade over search-page markup. Hrefs are resolved against
/// `base_url`; repeats collapse to their first occurrence.
pub fn find_item_links(html: &str, base_url: &str, limit: usize) -> Vec<String> {
    let Ok(base) = Url::parse(base_url) else {
        warn!("Unparseable search URL: {}", base_url);
        return Vec::new();
    };
    let doc = Html::parse_document(html);

    for (name, selector) in LINK_CASCADE.iter() {
        let mut seen = HashSet::new();
        let links: Vec<String> = doc
            .select(selector)
            .filter_map(|a| a.value().attr("href"))
            .filter_map(|href| resolve(&base, href))
            .filter(|url| seen.insert(url.clone()))
            .take(limit)
            .collect();
        if !links.is_empty() {
            debug!("Item links via {}", name);
            return links;
        }
    }
    Vec::new()
}

fn resolve(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }
    let url = base.join(href).ok()?;
    matches!(url.scheme(), "http" | "https").then(|| url.to_string())
}

// ── Tests ──
