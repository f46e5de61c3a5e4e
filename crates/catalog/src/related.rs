//! Related-content scoring for a record's detail view.
//!
//! Additive model over each candidate: +3 per shared genre, +2 for the same
//! industry, +1 when ratings are within 1.0, +1 for the same type.

use shared::ContentRecord;
use std::collections::HashSet;
use std::sync::Arc;

/// Result cap for related content
pub const DEFAULT_RELATED_LIMIT: usize = 9;

const SHARED_GENRE_POINTS: u32 = 3;
const SAME_INDUSTRY_POINTS: u32 = 2;
const CLOSE_RATING_POINTS: u32 = 1;
const SAME_TYPE_POINTS: u32 = 1;
const CLOSE_RATING_DELTA: f64 = 1.0;

/// Relatedness of `candidate` to `record`; 0 means unrelated
pub fn relatedness(record: &ContentRecord, candidate: &ContentRecord) -> u32 {
    let genres: HashSet<String> = record.genres_lower().into_iter().collect();
    let candidate_genres: HashSet<String> = candidate.genres_lower().into_iter().collect();
    let shared_genres = genres.intersection(&candidate_genres).count() as u32;

    let mut score = shared_genres * SHARED_GENRE_POINTS;

    let industry = record.industry_lower();
    if !industry.is_empty() && industry == candidate.industry_lower() {
        score += SAME_INDUSTRY_POINTS;
    }

    if let (Some(a), Some(b)) = (record.rating_value(), candidate.rating_value()) {
        if (a - b).abs() <= CLOSE_RATING_DELTA {
            score += CLOSE_RATING_POINTS;
        }
    }

    let content_type = record.type_lower();
    if !content_type.is_empty() && content_type == candidate.type_lower() {
        score += SAME_TYPE_POINTS;
    }

    score
}

/// Candidates ranked by relatedness to `record`, best first
///
/// The record itself and zero-score candidates are left out; equal scores
/// keep candidate order.
pub fn related<'a>(
    record: &ContentRecord,
    candidates: impl IntoIterator<Item = &'a Arc<ContentRecord>>,
    limit: usize,
) -> Vec<Arc<ContentRecord>> {
    let mut scored: Vec<(u32, &Arc<ContentRecord>)> = candidates
        .into_iter()
        .filter(|candidate| candidate.id != record.id)
        .map(|candidate| (relatedness(record, candidate), candidate))
        .filter(|(score, _)| *score > 0)
        .collect();

    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored
        .into_iter()
        .take(limit)
        .map(|(_, candidate)| Arc::clone(candidate))
        .collect()
}
