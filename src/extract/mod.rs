pub mod dom;
pub mod exact;
pub mod generic;
pub mod marker;
pub mod structural;
pub mod styled;

use html_scraper::Html;
use tracing::debug;

use crate::models::CommentRecord;

pub const MAX_RECORDS_PER_PAGE: usize = 15;

/// One way of locating comments in a rendered page. Every strategy gates its
/// candidates through the shared classifier before returning them.
pub trait Strategy: Send + Sync {
    fn name(&self) -> &'static str;
    fn extract(&self, doc: &Html, item_url: &str) -> Vec<CommentRecord>;
}

pub struct Extraction {
    pub records: Vec<CommentRecord>,
    /// Strategy that produced the records, `None` if every one came up empty.
    pub strategy: Option<&'static str>,
}

/// Ordered strategy cascade. A strategy runs only when everything before it
/// produced nothing.
pub struct Extractor {
    strategies: Vec<Box<dyn Strategy>>,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(vec![
            Box::new(exact::ExactContainer),
            Box::new(structural::StructuralPath),
            Box::new(marker::CommentMarker),
            Box::new(styled::StyledParagraph),
            Box::new(generic::GenericScan),
        ])
    }
}

impl Extractor {
    pub fn new(strategies: Vec<Box<dyn Strategy>>) -> Self {
        Self { strategies }
    }

    /// Parse `html` and run the cascade. Synchronous so the parsed document
    /// never lives across an await point.
    pub fn extract(&self, html: &str, item_url: &str) -> Extraction {
        let doc = Html::parse_document(html);

        for strategy in &self.strategies {
            let mut records = strategy.extract(&doc, item_url);
            debug!("{}: {} candidates on {}", strategy.name(), records.len(), item_url);
            if !records.is_empty() {
                records.truncate(MAX_RECORDS_PER_PAGE);
                return Extraction {
                    records,
                    strategy: Some(strategy.name()),
                };
            }
        }

        Extraction {
            records: Vec::new(),
            strategy: None,
        }
    }
}

// ── Tests ──
