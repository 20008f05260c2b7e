//! Query tokenization and domain-term detection.
//!
//! There is no word segmentation. Text is split on punctuation and
//! whitespace, and each piece also contributes its 4- and 6-character
//! prefixes so that CJK compounds can match on their leading part.

use serde::Serialize;
use studio_core::types::{Dimension, Dynasty, HotTopic, Query};

use crate::tables::DomainTables;

pub const MAX_TOKENS: usize = 50;
pub const MIN_TOKEN_CHARS: usize = 2;
const PREFIX_LENGTHS: [usize; 2] = [4, 6];

/// What the matcher looks for: search tokens plus detected eras and themes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryProfile {
    pub tokens: Vec<String>,
    pub dimensions: Vec<Dimension>,
    pub dynasties: Vec<Dynasty>,
}

impl QueryProfile {
    /// Build the profile of `query`. Never fails; empty input gives an
    /// empty profile.
    pub fn extract(query: &Query, tables: &DomainTables) -> Self {
        let (text, raw_tokens) = match query {
            Query::Text(s) => (normalize_text(s), split_tokens(s)),
            Query::Topic(topic) => (normalize_text(&topic_text(topic)), topic_tokens(topic)),
        };

        let mut tokens: Vec<String> = Vec::new();
        for t in raw_tokens.iter().map(|t| normalize_text(t)) {
            if t.chars().count() >= MIN_TOKEN_CHARS && !tokens.contains(&t) {
                tokens.push(t);
            }
        }
        tokens.truncate(MAX_TOKENS);

        Self {
            tokens,
            dimensions: tables.detect_dimensions(&text),
            dynasties: tables.detect_dynasties(&text),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty() && self.dimensions.is_empty() && self.dynasties.is_empty()
    }
}

/// Lowercase, collapse whitespace runs to one space, trim.
pub fn normalize_text(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || matches!(c, ',' | '，' | '。' | '！' | '？' | '、' | '|' | '/' | '\\')
}

/// Split raw text into pieces and their 4/6-character prefixes, unnormalized.
pub fn split_tokens(s: &str) -> Vec<String> {
    let mut out = Vec::new();
    for piece in s.split(is_delimiter).filter(|p| !p.is_empty()) {
        out.push(piece.to_string());
        let len = piece.chars().count();
        for n in PREFIX_LENGTHS {
            if len >= n {
                out.push(piece.chars().take(n).collect());
            }
        }
    }
    out
}

fn topic_text(topic: &HotTopic) -> String {
    let keywords = topic.keywords.join(" ");
    [topic.title.as_str(), topic.summary.as_deref().unwrap_or(""), keywords.as_str()].join(" ")
}

// Split each field on its own so prefixes never straddle two fields.
fn topic_tokens(topic: &HotTopic) -> Vec<String> {
    std::iter::once(topic.title.as_str())
        .chain(std::iter::once(topic.summary.as_deref().unwrap_or("")))
        .chain(topic.keywords.iter().map(String::as_str))
        .flat_map(split_tokens)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(q: impl Into<Query>) -> QueryProfile {
        QueryProfile::extract(&q.into(), DomainTables::standard())
    }

    #[test]
    fn splits_on_cjk_punctuation_and_emits_prefixes() {
        let p = profile("王安石变法与青苗法，财政/改革");
        assert_eq!(
            p.tokens,
            vec!["王安石变法与青苗法", "王安石变", "王安石变法与", "财政", "改革"]
        );
    }

    #[test]
    fn single_characters_are_dropped() {
        let p = profile("税 a 财政");
        assert_eq!(p.tokens, vec!["财政"]);
    }

    #[test]
    fn tokens_are_lowercased_and_deduplicated() {
        let p = profile("AI ai Ai芯片");
        assert_eq!(p.tokens, vec!["ai", "ai芯片"]);
        assert_eq!(p.dimensions, vec![Dimension::Technology]);
    }

    #[test]
    fn topic_fields_are_split_separately() {
        let topic = HotTopic {
            summary: Some("财政压力".to_string()),
            keywords: vec!["宋元".to_string(), "青苗法".to_string()],
            ..HotTopic::new("限购")
        };
        let p = profile(topic);
        assert_eq!(p.tokens, vec!["限购", "财政压力", "宋元", "青苗法"]);
        assert_eq!(p.dynasties, vec![Dynasty::SongYuan]);
        assert_eq!(p.dimensions, vec![Dimension::Fiscal]);
    }

    #[test]
    fn token_list_is_capped() {
        let text: Vec<String> = (0..80).map(|i| format!("t{i:02}")).collect();
        let p = profile(text.join(" "));
        assert_eq!(p.tokens.len(), MAX_TOKENS);
        assert_eq!(p.tokens[0], "t00");
    }

    #[test]
    fn duplicates_are_removed_before_the_cap() {
        let mut words = vec!["dup".to_string(); 60];
        words.extend((0..60).map(|i| format!("u{i:02}")));
        let p = profile(words.join(" "));
        assert_eq!(p.tokens.len(), MAX_TOKENS);
        assert_eq!(p.tokens[0], "dup");
        assert_eq!(p.tokens.last().map(String::as_str), Some("u48"));
    }

    #[test]
    fn empty_query_gives_empty_profile() {
        assert!(profile("").is_empty());
        assert!(profile(" ，。 ").is_empty());
    }
}
