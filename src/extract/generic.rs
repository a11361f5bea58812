use std::sync::LazyLock;

use html_scraper::{Html, Selector};

use super::dom;
use super::Strategy;
use crate::models::{CommentRecord, UNKNOWN_AUTHOR};

static TEXT_BEARING: LazyLock<Selector> = LazyLock::new(|| Selector::parse("p, span, div").unwrap());

const SCAN_LIMIT: usize = 50;
const ACCEPT_LIMIT: usize = 10;

/// Last resort: classify the first few text-bearing elements on the page.
pub struct GenericScan;

impl Strategy for GenericScan {
    fn name(&self) -> &'static str {
        "generic-scan"
    }

    fn extract(&self, doc: &Html, item_url: &str) -> Vec<CommentRecord> {
        doc.select(&TEXT_BEARING)
            .filter(|el| !dom::own_text(*el).is_empty())
            .take(SCAN_LIMIT)
            .filter_map(|el| dom::accept(&dom::full_text(el), true))
            .take(ACCEPT_LIMIT)
            .map(|comment_text| CommentRecord {
                source_item_url: item_url.to_string(),
                comment_text,
                author_name: UNKNOWN_AUTHOR.to_string(),
                author_profile_url: None,
            })
            .collect()
    }
}
