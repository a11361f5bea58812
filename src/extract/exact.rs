use std::sync::LazyLock;

use html_scraper::{Html, Selector};

use super::dom::{self, COMMENT_MARKER};
use super::Strategy;
use crate::models::CommentRecord;

static ITEM_CONTAINER: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.css-1i7ohvi-DivCommentItemContainer").unwrap());

/// Known build-specific comment container. Cheapest and most precise when the
/// current class hash is still live.
pub struct ExactContainer;

impl Strategy for ExactContainer {
    fn name(&self) -> &'static str {
        "exact-container"
    }

    fn extract(&self, doc: &Html, item_url: &str) -> Vec<CommentRecord> {
        doc.select(&ITEM_CONTAINER)
            .filter_map(|container| {
                let text_el = container.select(&COMMENT_MARKER).next()?;
                let comment_text = dom::accept(&dom::full_text(text_el), false)?;
                let author = dom::author_in(container);
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
