use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use crate::config::ScrapeConfig;
use crate::driver::{DriverLauncher, PageDriver};
use crate::error::{DriverError, ScrapeError};
use crate::extract::Extractor;
use crate::models::{CommentRecord, Query, ResultSet, ScoredRecord};
use crate::navigator;

/// Runs one query end to end: search, visit each item, extract, rank.
pub struct Scraper {
    launcher: Arc<dyn DriverLauncher>,
    config: Arc<ScrapeConfig>,
    extractor: Extractor,
}

impl Scraper {
    pub fn new(launcher: Arc<dyn DriverLauncher>, config: Arc<ScrapeConfig>) -> Self {
        Self {
            launcher,
            config,
            extractor: Extractor::default(),
        }
    }

    /// One browser session per call, closed on every path out. Items are
    /// visited sequentially; a failing item contributes nothing and the rest
    /// still run.
    pub async fn run(&self, query: &Query) -> Result<ResultSet, ScrapeError> {
        let t0 = Instant::now();
        info!("Starting scrape for query: {}", query.as_str());

        let mut driver = self
            .launcher
            .launch(&self.config)
            .await
            .map_err(ScrapeError::Launch)?;

        let collected = self.collect(driver.as_mut(), query).await;

        if let Err(e) = driver.close().await {
            warn!("Closing browser session failed: {}", e);
        }

        let scored = collected?.into_iter().map(ScoredRecord::score).collect();
        let results = ResultSet::ranked(query, scored);
        info!(
            "Found {} comments for '{}' in {:.1}s",
            results.total(),
            query.as_str(),
            t0.elapsed().as_secs_f64()
        );
        Ok(results)
    }

    async fn collect(
        &self,
        driver: &mut dyn PageDriver,
        query: &Query,
    ) -> Result<Vec<CommentRecord>, ScrapeError> {
        let items = navigator::discover_items(driver, query, &self.config)
            .await
            .map_err(ScrapeError::Search)?;

        let mut all = Vec::new();
        for item in &items {
            info!("Processing video: {}", item);
            match self.scrape_item(driver, item).await {
                Ok(records) => {
                    info!("Extracted {} comments from {}", records.len(), item);
                    all.extend(records);
                }
                Err(e) => warn!("Error processing video {}: {}", item, e),
            }
        }
        Ok(all)
    }

    async fn scrape_item(
        &self,
        driver: &mut dyn PageDriver,
        item: &str,
    ) -> Result<Vec<CommentRecord>, DriverError> {
        let html = navigator::reveal_content(driver, item, &self.config).await?;
        let extraction = self.extractor.extract(&html, item);
        match extraction.strategy {
            Some(strategy) => info!("{} matched on {}", strategy, item),
            None => warn!("Every extraction strategy came up empty on {}", item),
        }
        Ok(extraction.records)
    }
}

// ── Tests ──
