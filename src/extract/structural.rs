use std::collections::HashSet;
use std::sync::LazyLock;

use html_scraper::{ElementRef, Html, Selector};

use super::dom::{self, COMMENT_MARKER};
use super::Strategy;
use crate::models::CommentRecord;

/// List → item → content wrapper, matched on the stable part of generated
/// class names. The marker may sit at any depth below the wrapper, and the
/// outer comment panel is not required.
static PATH: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    [
        r#"[class*="DivCommentListContainer"]"#,
        r#"[class*="DivCommentItemWrapper"], [class*="DivCommentObjectWrapper"], [class*="DivCommentItemContainer"]"#,
        r#"[class*="DivCommentContentContainer"]"#,
    ]
    .iter()
    .map(|css| Selector::parse(css).unwrap())
    .collect()
});

pub struct StructuralPath;

/// Descend one step, dropping elements already reached through a nested match.
fn descend<'a>(scopes: &[ElementRef<'a>], step: &Selector) -> Vec<ElementRef<'a>> {
    let mut seen = HashSet::new();
    scopes
        .iter()
        .flat_map(|scope| scope.select(step))
        .filter(|el| seen.insert(el.id()))
        .collect()
}

impl Strategy for StructuralPath {
    fn name(&self) -> &'static str {
        "structural-path"
    }

    fn extract(&self, doc: &Html, item_url: &str) -> Vec<CommentRecord> {
        let Some((first, rest)) = PATH.split_first() else {
            return Vec::new();
        };
        let roots: Vec<ElementRef> = doc.select(first).collect();
        let contents = rest.iter().fold(roots, |scopes, step| descend(&scopes, step));

        contents
            .into_iter()
            .filter_map(|content| {
                let marker = content.select(&COMMENT_MARKER).next()?;
                let comment_text = dom::accept(&dom::full_text(marker), false)?;
                let author = dom::author_in(content);
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
