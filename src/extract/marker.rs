use html_scraper::Html;

use super::dom::{self, COMMENT_MARKER};
use super::Strategy;
use crate::models::CommentRecord;

/// Any element carrying the comment-level marker, wherever it sits.
pub struct CommentMarker;

impl Strategy for CommentMarker {
    fn name(&self) -> &'static str {
        "comment-marker"
    }

    fn extract(&self, doc: &Html, item_url: &str) -> Vec<CommentRecord> {
        doc.select(&COMMENT_MARKER)
            .filter_map(|marker| {
                let raw = dom::first_text_node(marker)?;
                let comment_text = dom::accept(&raw, false)?;
                let author = dom::author_near(marker);
                Some(CommentRecord {
                    source_item_url: item_url.to_string(),
                    comment_text,
                    author_name: author.name,
                    author_profile_url: author.profile_url,
                })
            })
            .collect()
    }
}
