use std::sync::LazyLock;

use html_scraper::{Html, Selector};

use super::dom;
use super::Strategy;
use crate::models::CommentRecord;

static STYLED_PARAGRAPH: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"p[class*="PCommentText"], p[class*="TUXText"]"#).unwrap()
});

/// Paragraphs styled as comment text, independent of comment structure.
pub struct StyledParagraph;

impl Strategy for StyledParagraph {
    fn name(&self) -> &'static str {
        "styled-paragraph"
    }

    fn extract(&self, doc: &Html, item_url: &str) -> Vec<CommentRecord> {
        doc.select(&STYLED_PARAGRAPH)
            .filter_map(|p| {
                let comment_text = dom::accept(&dom::full_text(p), true)?;
                let author = dom::author_near(p);
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
