//! Relevance-ranked text search.
//!
//! Every record is checked against a ladder of match reasons, strongest
//! first; the first reason that applies fixes the record's score. Records
//! where no reason applies are not results. Ties keep enumeration order.

use crate::index::ContentIndex;
use crate::similarity::{normalize, similarity, tokenize, CONTAINS_SCORE};
use serde::Serialize;
use shared::ContentRecord;
use std::sync::Arc;

/// Result cap for text search
pub const DEFAULT_SEARCH_LIMIT: usize = 50;

/// Why a record matched, strongest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchReason {
    ExactTitle,
    TitleContainsQuery,
    AllWordsInTitle,
    CastMatch,
    CastWordsMatch,
    DirectorMatch,
    DirectorWordsMatch,
    GenreExact,
}

impl MatchReason {
    pub fn score(&self) -> u32 {
        match self {
            MatchReason::ExactTitle => 100,
            MatchReason::TitleContainsQuery => 80,
            MatchReason::AllWordsInTitle => 60,
            MatchReason::CastMatch => 40,
            MatchReason::CastWordsMatch => 35,
            MatchReason::DirectorMatch => 35,
            MatchReason::DirectorWordsMatch => 30,
            MatchReason::GenreExact => 25,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchReason::ExactTitle => "exact_title",
            MatchReason::TitleContainsQuery => "title_contains_query",
            MatchReason::AllWordsInTitle => "all_words_in_title",
            MatchReason::CastMatch => "cast_match",
            MatchReason::CastWordsMatch => "cast_words_match",
            MatchReason::DirectorMatch => "director_match",
            MatchReason::DirectorWordsMatch => "director_words_match",
            MatchReason::GenreExact => "genre_exact",
        }
    }
}

impl std::fmt::Display for MatchReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One ranked search result
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub record: Arc<ContentRecord>,
    pub score: u32,
    pub reason: MatchReason,
}

/// A normalized query, ready to be matched against records
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    normalized: String,
    tokens: Vec<String>,
}

impl SearchQuery {
    /// Normalize and tokenize `raw`
    ///
    /// Returns `None` for queries too short to search: under two characters
    /// after normalization, or without any token of two or more characters.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = normalize(raw);
        if normalized.chars().count() < 2 {
            return None;
        }

        let tokens: Vec<String> = tokenize(&normalized).into_iter().map(String::from).collect();
        if tokens.is_empty() {
            return None;
        }

        Some(Self { normalized, tokens })
    }

    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    fn all_tokens_in(&self, text: &str) -> bool {
        self.tokens.iter().all(|t| text.contains(t.as_str()))
    }

    /// First ladder rule that applies to `record`
    pub fn match_reason(&self, record: &ContentRecord) -> Option<MatchReason> {
        let title = normalize(&record.title);
        if title == self.normalized {
            return Some(MatchReason::ExactTitle);
        }
        if title.contains(&self.normalized) {
            return Some(MatchReason::TitleContainsQuery);
        }
        if self.all_tokens_in(&title) {
            return Some(MatchReason::AllWordsInTitle);
        }

        let cast: Vec<String> = record
            .cast
            .iter()
            .map(|name| normalize(name))
            .filter(|name| !name.is_empty())
            .collect();
        if !cast.is_empty() {
            if cast
                .iter()
                .any(|name| similarity(name, &self.normalized) >= CONTAINS_SCORE)
            {
                return Some(MatchReason::CastMatch);
            }
            if self
                .tokens
                .iter()
                .all(|t| cast.iter().any(|name| name.contains(t.as_str())))
            {
                return Some(MatchReason::CastWordsMatch);
            }
        }

        if let Some(director) = &record.director {
            let director = normalize(&director.joined());
            if !director.is_empty() {
                if similarity(&director, &self.normalized) >= CONTAINS_SCORE {
                    return Some(MatchReason::DirectorMatch);
                }
                if self.all_tokens_in(&director) {
                    return Some(MatchReason::DirectorWordsMatch);
                }
            }
        }

        if record
            .genres
            .iter()
            .any(|genre| normalize(genre) == self.normalized)
        {
            return Some(MatchReason::GenreExact);
        }

        None
    }
}

/// Ranked hits for `query`, best first, at most `limit`
pub fn search_with_reasons(index: &ContentIndex, query: &str, limit: usize) -> Vec<SearchHit> {
    let Some(query) = SearchQuery::parse(query) else {
        return Vec::new();
    };

    let mut hits: Vec<SearchHit> = index
        .iter()
        .filter_map(|record| {
            query.match_reason(record).map(|reason| SearchHit {
                record: Arc::clone(record),
                score: reason.score(),
                reason,
            })
        })
        .collect();

    // Stable: equal scores keep enumeration order
    hits.sort_by(|a, b| b.score.cmp(&a.score));
    hits.truncate(limit);

    tracing::debug!(query = %query.normalized, hits = hits.len(), "Search complete");
    hits
}

/// Ranked records for `query`, best first, at most `limit`
pub fn search(index: &ContentIndex, query: &str, limit: usize) -> Vec<Arc<ContentRecord>> {
    search_with_reasons(index, query, limit)
        .into_iter()
        .map(|hit| hit.record)
        .collect()
}
