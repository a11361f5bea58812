use std::sync::LazyLock;

use html_scraper::{ElementRef, Selector};

use crate::classifier;
use crate::models::{SITE_ORIGIN, UNKNOWN_AUTHOR};

pub static COMMENT_MARKER: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"[data-e2e="comment-level-1"]"#).unwrap());
pub static USERNAME_SPAN: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"span[data-e2e="comment-username-1"]"#).unwrap());
static PROFILE_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"a[href^="/@"]"#).unwrap());
static USER_LINK_NAME: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"a[class*="StyledUserLinkName"]"#).unwrap());

/// How far up the tree a loose comment node may look for its author.
const AUTHOR_SEARCH_DEPTH: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub name: String,
    pub profile_url: Option<String>,
}

impl Author {
    pub fn unknown() -> Self {
        Self {
            name: UNKNOWN_AUTHOR.to_string(),
            profile_url: None,
        }
    }
}

/// Collapse whitespace runs and trim.
pub fn normalize<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    parts
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn full_text(el: ElementRef) -> String {
    normalize(el.text())
}

/// Text from direct text children only.
pub fn own_text(el: ElementRef) -> String {
    normalize(
        el.children()
            .filter_map(|n| n.value().as_text())
            .map(|t| &**t),
    )
}

/// First non-blank text node below `el`.
pub fn first_text_node(el: ElementRef) -> Option<String> {
    el.text().map(str::trim).find(|t| !t.is_empty()).map(|t| normalize(std::iter::once(t)))
}

/// Normalize `raw` and keep it only if it reads like a comment.
pub fn accept(raw: &str, check_handle: bool) -> Option<String> {
    let text = normalize(std::iter::once(raw));
    classifier::is_plausible_comment(&text, check_handle).then_some(text)
}

pub fn profile_url(href: &str) -> Option<String> {
    let href = href.trim();
    if href.starts_with("https://") || href.starts_with("http://") {
        Some(href.to_string())
    } else if href.starts_with('/') {
        Some(format!("{}{}", SITE_ORIGIN, href))
    } else {
        None
    }
}

/// Author link and display name inside `scope`. The name prefers the
/// dedicated username span and falls back to the link text.
pub fn author_in(scope: ElementRef) -> Author {
    let link = scope
        .select(&PROFILE_LINK)
        .next()
        .or_else(|| scope.select(&USER_LINK_NAME).next());

    let span_name = link
        .and_then(|l| l.select(&USERNAME_SPAN).next())
        .or_else(|| scope.select(&USERNAME_SPAN).next())
        .map(full_text)
        .filter(|n| !n.is_empty());

    let name = span_name
        .or_else(|| link.map(full_text).filter(|n| !n.is_empty()))
        .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());

    let profile_url = link
        .and_then(|l| l.value().attr("href"))
        .and_then(profile_url);

    Author { name, profile_url }
}

fn has_author(scope: ElementRef) -> bool {
    scope.select(&USERNAME_SPAN).next().is_some()
        || scope.select(&PROFILE_LINK).next().is_some()
        || scope.select(&USER_LINK_NAME).next().is_some()
}

/// Author for a comment node found outside any known container: the nearest
/// ancestor that holds a username span or profile link.
pub fn author_near(el: ElementRef) -> Author {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .take(AUTHOR_SEARCH_DEPTH)
        .find(|a| has_author(*a))
        .map(author_in)
        .unwrap_or_else(Author::unknown)
}
