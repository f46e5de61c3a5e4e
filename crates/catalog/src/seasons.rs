//! Season grouping.
//!
//! Each season of a multi-season series is its own record; siblings share a
//! base id made by stripping the trailing season number (`dark1`, `dark2`,
//! `dark3` → `dark`).

use crate::index::ContentIndex;
use shared::ContentRecord;
use std::sync::Arc;

/// `id` without its trailing one or two ASCII digits
///
/// An id made only of digits is returned unchanged.
pub fn season_base_id(id: &str) -> &str {
    let trimmed = id.trim_end_matches(|c: char| c.is_ascii_digit());
    let digits = id.len() - trimmed.len();
    if trimmed.is_empty() || digits == 0 {
        return id;
    }
    // Strip at most two digits
    &id[..id.len() - digits.min(2)]
}

/// All seasons of the series `id` belongs to, ordered by season number
///
/// Only records carrying a `season` are grouped. A record without siblings
/// comes back alone; an unknown id gives an empty list.
pub fn seasons_of(index: &ContentIndex, id: &str) -> Vec<Arc<ContentRecord>> {
    let Some(record) = index.get_by_id(id) else {
        return Vec::new();
    };
    if record.season_number().is_none() {
        return vec![record];
    }

    let base = season_base_id(&record.id);
    let mut seasons: Vec<Arc<ContentRecord>> = index
        .iter()
        .filter(|r| r.season_number().is_some() && season_base_id(&r.id) == base)
        .cloned()
        .collect();
    seasons.sort_by_key(|r| r.season_number());
    seasons
}
