use serde::Serialize;
use thiserror::Error;

use crate::classifier::{self, IntentTier};

pub const UNKNOWN_AUTHOR: &str = "Unknown";
pub const SITE_ORIGIN: &str = "https://www.tiktok.com";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("Query parameter is required")]
    Empty,
}

/// Trimmed, non-empty search string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query(String);

impl Query {
    pub fn parse(raw: &str) -> Result<Self, QueryError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(QueryError::Empty);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Search page for this query, percent-encoded like `encodeURIComponent`.
    pub fn search_url(&self) -> String {
        format!("{}/search?q={}", SITE_ORIGIN, urlencoding::encode(&self.0))
    }
}

/// One comment recovered from a content item page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRecord {
    #[serde(rename = "videoUrl")]
    pub source_item_url: String,
    pub comment_text: String,
    #[serde(rename = "username")]
    pub author_name: String,
    #[serde(rename = "profileUrl")]
    pub author_profile_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredRecord {
    #[serde(flatten)]
    pub record: CommentRecord,
    #[serde(rename = "intentScore")]
    pub intent_tier: IntentTier,
    #[serde(rename = "matchedKeywords")]
    pub matched_terms: Vec<String>,
}

impl ScoredRecord {
    pub fn score(record: CommentRecord) -> Self {
        let score = classifier::score_intent(&record.comment_text);
        Self {
            record,
            intent_tier: score.tier,
            matched_terms: score.matched_terms,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultSet {
    pub query: String,
    pub records: Vec<ScoredRecord>,
}

impl ResultSet {
    /// Orders `records` high → medium → low. `sort_by` is stable, so discovery
    /// order survives within a tier.
    pub fn ranked(query: &Query, mut records: Vec<ScoredRecord>) -> Self {
        records.sort_by(|a, b| b.intent_tier.cmp(&a.intent_tier));
        Self {
            query: query.as_str().to_string(),
            records,
        }
    }

    pub fn total(&self) -> usize {
        self.records.len()
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn record(text: &str) -> CommentRecord {
        CommentRecord {
            source_item_url: "https://www.tiktok.com/@a/video/1".into(),
            comment_text: text.into(),
            author_name: UNKNOWN_AUTHOR.into(),
            author_profile_url: None,
        }
    }

    #[test]
    fn query_is_trimmed() {
        let q = Query::parse("  kitchen renovation ").unwrap();
        assert_eq!(q.as_str(), "kitchen renovation");
        assert_eq!(q.search_url(), "https://www.tiktok.com/search?q=kitchen%20renovation");
    }

    #[test]
    fn blank_query_is_rejected() {
        assert_eq!(Query::parse(""), Err(QueryError::Empty));
        assert_eq!(Query::parse("   \t"), Err(QueryError::Empty));
    }

    #[test]
    fn ranking_groups_tiers_and_is_stable() {
        let q = Query::parse("bathroom").unwrap();
        let texts = [
            "Love this renovation!",          // low
            "How much would this cost?",      // high
            "I need this for my kitchen",     // medium
            "Wow this looks amazing",         // low
            "Can you PM me the details?",     // high
            "Any info on the paint?",         // medium
        ];
        let scored = texts.iter().map(|t| ScoredRecord::score(record(t))).collect();
        let rs = ResultSet::ranked(&q, scored);

        let order: Vec<&str> = rs.records.iter().map(|r| r.record.comment_text.as_str()).collect();
        assert_eq!(
            order,
            vec![
                "How much would this cost?",
                "Can you PM me the details?",
                "I need this for my kitchen",
                "Any info on the paint?",
                "Love this renovation!",
                "Wow this looks amazing",
            ]
        );
        assert_eq!(rs.total(), 6);
    }

    #[test]
    fn wire_format_matches_client() {
        let mut r = record("How much would this cost?");
        r.author_name = "Mel ya later".into();
        r.author_profile_url = Some("https://www.tiktok.com/@melizaaorellana".into());
        let json = serde_json::to_value(ScoredRecord::score(r)).unwrap();

        assert_eq!(json["videoUrl"], "https://www.tiktok.com/@a/video/1");
        assert_eq!(json["commentText"], "How much would this cost?");
        assert_eq!(json["username"], "Mel ya later");
        assert_eq!(json["profileUrl"], "https://www.tiktok.com/@melizaaorellana");
        assert_eq!(json["intentScore"], "high");
        assert_eq!(json["matchedKeywords"], serde_json::json!(["how much", "cost"]));
    }

    #[test]
    fn missing_profile_serializes_as_null() {
        let json = serde_json::to_value(ScoredRecord::score(record("Love this renovation!"))).unwrap();
        assert!(json["profileUrl"].is_null());
        assert_eq!(json["username"], "Unknown");
    }
}
