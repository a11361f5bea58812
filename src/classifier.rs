use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

// ── Platform chrome ──

static CHROME_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // Navigation and buttons
        r"(?i)^(For You|Following|Upload|LIVE|Profile|More|Log in|Sign up)$",
        r"(?i)TikTok(Search|Log in|For You)",
        r"(?i)^(Search|Explore|Company|Program|Terms|Policies)",
        // Footer and copyright
        r"(?i)© \d{4} TikTok",
        r"(?i)Terms & Policies",
        r"(?i)CompanyProgramTerms",
        // Sibling nodes collapsed into one text node
        r"(?i)^(For YouExplore|ExploreFollowing|FollowingUpload|UploadLIVE|LIVEProfile)",
        r"(?i)SearchFor YouExplore",
        r"(?i)ProfileMoreLog in",
        r"(?i)^(TikTok|Search|Explore|Following|Upload|LIVE|Profile|More)$",
        r"(?i)(For YouExplore|CompanyProgram|Terms & Policies)",
        r"(?i)TikTokSearch.*Log in",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

// ── Handles ──

static HANDLE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._]+$").unwrap());
static NUMERIC_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]+$").unwrap());
const HANDLE_GLYPHS: &[&str] = &["🌹", "××"];

// ── Comment signals ──

/// Whole-word, case-insensitive match where only ASCII letters, digits and `_`
/// count as word characters. Accented or non-Latin letters act as separators.
fn ascii_words(words: &str) -> Regex {
    Regex::new(&format!(r"(?:^|[^0-9A-Za-z_])(?i-u:{words})(?:[^0-9A-Za-z_]|$)")).unwrap()
}

static QUESTION_WORDS_RE: LazyLock<Regex> = LazyLock::new(|| {
    ascii_words("how|what|where|when|why|love|like|nice|great|cost|price|much|this|that|can|will|would|could|should")
});
static MULTI_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9A-Za-z_]+\s+[0-9A-Za-z_]+").unwrap());
static REACTION_WORDS_RE: LazyLock<Regex> = LazyLock::new(|| {
    ascii_words("love|hate|like|want|need|get|see|look|think|feel|know|wow|omg|lol")
});
static EMOTION_WORDS_RE: LazyLock<Regex> = LazyLock::new(|| {
    ascii_words("amazing|beautiful|gorgeous|awesome|terrible|bad|good|best|worst")
});

const MIN_COMMENT_CHARS: usize = 5;
const MAX_COMMENT_CHARS: usize = 500;

// ── Intent keywords ──

const HIGH_INTENT: &[&str] = &[
    "quote", "how much", "price", "cost", "pm me", "contact", "hire", "book", "schedule",
];
const MEDIUM_INTENT: &[&str] = &[
    "interested", "need this", "want this", "dm me", "info", "details", "available",
];
const LOW_INTENT: &[&str] = &["nice", "love this", "amazing", "cool", "awesome", "great job"];

/// Coarse buyer-readiness tier. Declaration order gives `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntentTier {
    Low,
    Medium,
    High,
}

impl fmt::Display for IntentTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            IntentTier::Low => "low",
            IntentTier::Medium => "medium",
            IntentTier::High => "high",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentScore {
    pub tier: IntentTier,
    pub matched_terms: Vec<String>,
}

/// Navigation, footer and branding text that leaks into text scans.
/// Empty text counts as chrome.
pub fn is_chrome_text(text: &str) -> bool {
    if text.is_empty() {
        return true;
    }
    CHROME_PATTERNS.iter().any(|re| re.is_match(text))
}

/// Short or handle-shaped strings. Leans toward false positives: losing a
/// real two-word reply is cheaper than storing a username as a comment.
pub fn is_author_handle(text: &str) -> bool {
    text.chars().count() < 3
        || text.starts_with('@')
        || HANDLE_RE.is_match(text)
        || NUMERIC_RE.is_match(text)
        || HANDLE_GLYPHS.iter().any(|g| text.contains(g))
}

/// Whether `text` reads like human commentary. `check_handle` is off for
/// structural sources that are already known to hold comment bodies.
pub fn is_plausible_comment(text: &str, check_handle: bool) -> bool {
    let len = text.chars().count();
    if len < MIN_COMMENT_CHARS || len >= MAX_COMMENT_CHARS {
        return false;
    }
    if is_chrome_text(text) {
        return false;
    }
    if check_handle && is_author_handle(text) {
        return false;
    }

    let natural_language = text.contains(' ')
        || text.contains('?')
        || text.contains('!')
        || text.contains('.')
        || QUESTION_WORDS_RE.is_match(text);

    let comment_like = MULTI_WORD_RE.is_match(text)
        || text.contains('?')
        || text.contains('!')
        || REACTION_WORDS_RE.is_match(text)
        || EMOTION_WORDS_RE.is_match(text);

    natural_language && comment_like
}

/// Keyword tiering. Low-tier words are only consulted when nothing in the
/// high or medium lists matched, and the tier stays `Low` with zero matches.
pub fn score_intent(text: &str) -> IntentScore {
    let lower = text.to_lowercase();
    let mut tier = IntentTier::Low;
    let mut matched_terms = Vec::new();

    for kw in HIGH_INTENT {
        if lower.contains(kw) {
            tier = IntentTier::High;
            matched_terms.push(kw.to_string());
        }
    }

    if tier != IntentTier::High {
        for kw in MEDIUM_INTENT {
            if lower.contains(kw) {
                tier = IntentTier::Medium;
                matched_terms.push(kw.to_string());
            }
        }
    }

    if matched_terms.is_empty() {
        for kw in LOW_INTENT {
            if lower.contains(kw) {
                matched_terms.push(kw.to_string());
            }
        }
    }

    IntentScore { tier, matched_terms }
}

// ── Tests ──
