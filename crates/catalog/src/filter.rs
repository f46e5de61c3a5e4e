//! Category filter engine.
//!
//! Structured queries over `type`, `industry` and `genres`. Two taxonomies
//! overlap the regular fields and get special treatment:
//!
//! - anime: a `type` value and an `industry` value
//! - cartoon/animation: a `type` value, a genre, and the "animation" industry
//!
//! A query that names one of them is answered from that taxonomy only. Any
//! other query never returns anime or cartoon content, so e.g. an anime film
//! does not show up in the "movie" listing.

use crate::index::ContentIndex;
use serde::{Deserialize, Serialize};
use shared::ContentRecord;
use std::sync::Arc;

/// Result cap for category listings
pub const DEFAULT_CATEGORY_LIMIT: usize = 50;

const ANIME: &str = "anime";
const CARTOON: &str = "cartoon";
const ANIMATION: &str = "animation";

/// Filter query
///
/// `type`, `industry` and `genre` accept comma-separated lists;
/// `industries` and `genres` add explicit lists. Values are compared
/// case-insensitively. Several values for one field match any of them;
/// different fields must all match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub industries: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub genres: Vec<String>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_industry(mut self, industry: impl Into<String>) -> Self {
        self.industry = Some(industry.into());
        self
    }

    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    pub fn with_industries(mut self, industries: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.industries.extend(industries.into_iter().map(Into::into));
        self
    }

    pub fn with_genres(mut self, genres: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.genres.extend(genres.into_iter().map(Into::into));
        self
    }

    /// Lowercased, trimmed value lists per field
    fn normalized(&self) -> Normalized {
        let mut industries = split_values(self.industry.as_deref());
        industries.extend(self.industries.iter().flat_map(|i| split_values(Some(i))));

        let mut genres = split_values(self.genre.as_deref());
        genres.extend(self.genres.iter().flat_map(|g| split_values(Some(g))));

        Normalized {
            types: split_values(self.content_type.as_deref()),
            industries,
            genres,
        }
    }
}

fn split_values(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(|v| v.trim().to_lowercase())
            .filter(|v| !v.is_empty())
            .collect()
    })
    .unwrap_or_default()
}

struct Normalized {
    types: Vec<String>,
    industries: Vec<String>,
    genres: Vec<String>,
}

impl Normalized {
    fn is_empty(&self) -> bool {
        self.types.is_empty() && self.industries.is_empty() && self.genres.is_empty()
    }

    fn view(&self) -> View {
        let has = |values: &[String], wanted: &str| values.iter().any(|v| v == wanted);

        if has(&self.types, ANIME) || has(&self.industries, ANIME) {
            View::Anime
        } else if has(&self.industries, ANIMATION) {
            View::Cartoon { animation: true }
        } else if has(&self.types, CARTOON) || has(&self.genres, CARTOON) {
            View::Cartoon { animation: false }
        } else {
            View::General
        }
    }
}

/// Which taxonomy a query is answered from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    Anime,
    /// `animation` also admits the "animation" industry
    Cartoon { animation: bool },
    General,
}

/// Lowercased classifier fields of one record
struct Fields {
    content_type: String,
    industry: String,
    genres: Vec<String>,
}

impl Fields {
    fn of(record: &ContentRecord) -> Self {
        Self {
            content_type: record.type_lower(),
            industry: record.industry_lower(),
            genres: record.genres_lower(),
        }
    }

    fn is_anime(&self) -> bool {
        self.content_type == ANIME || self.industry == ANIME
    }

    fn has_cartoon_genre(&self) -> bool {
        self.genres.iter().any(|g| g.contains(CARTOON))
    }

    fn is_cartoon(&self) -> bool {
        self.content_type == CARTOON || self.has_cartoon_genre() || self.industry == ANIMATION
    }
}

/// Exact match or containment of `wanted` in `value`
fn field_matches(value: &str, wanted: &str) -> bool {
    value == wanted || value.contains(wanted)
}

/// OR over the wanted values; an empty list places no constraint
fn any_matches<'a>(value: &str, wanted: impl IntoIterator<Item = &'a String>) -> Option<bool> {
    let mut wanted = wanted.into_iter().peekable();
    wanted.peek()?;
    Some(wanted.any(|w| field_matches(value, w)))
}

fn any_genre_matches<'a>(genres: &[String], wanted: impl IntoIterator<Item = &'a String>) -> Option<bool> {
    let mut wanted = wanted.into_iter().peekable();
    wanted.peek()?;
    Some(wanted.any(|w| genres.iter().any(|g| field_matches(g, w))))
}

fn matches(fields: &Fields, criteria: &Normalized, view: View) -> bool {
    match view {
        View::Anime => {
            if !fields.is_anime() {
                return false;
            }
            let content_type = any_matches(
                &fields.content_type,
                criteria.types.iter().filter(|t| *t != ANIME),
            );
            let industry = any_matches(
                &fields.industry,
                criteria.industries.iter().filter(|i| *i != ANIME),
            );
            let genre = any_genre_matches(&fields.genres, &criteria.genres);
            content_type.unwrap_or(true) && industry.unwrap_or(true) && genre.unwrap_or(true)
        }
        View::Cartoon { animation } => {
            let eligible = fields.content_type == CARTOON
                || fields.has_cartoon_genre()
                || (animation && fields.industry == ANIMATION);
            if !eligible {
                return false;
            }
            let content_type = any_matches(
                &fields.content_type,
                criteria.types.iter().filter(|t| *t != CARTOON),
            );
            let industry = any_matches(
                &fields.industry,
                criteria.industries.iter().filter(|i| *i != ANIMATION),
            );
            let genre = any_genre_matches(
                &fields.genres,
                criteria.genres.iter().filter(|g| *g != CARTOON),
            );
            content_type.unwrap_or(true) && industry.unwrap_or(true) && genre.unwrap_or(true)
        }
        View::General => {
            if fields.is_anime() || fields.is_cartoon() {
                return false;
            }
            let content_type = any_matches(&fields.content_type, &criteria.types);
            let industry = any_matches(&fields.industry, &criteria.industries);
            let genre = any_genre_matches(&fields.genres, &criteria.genres);
            content_type.unwrap_or(true) && industry.unwrap_or(true) && genre.unwrap_or(true)
        }
    }
}

fn collect(
    index: &ContentIndex,
    limit: Option<usize>,
    mut keep: impl FnMut(&ContentRecord) -> bool,
) -> Vec<Arc<ContentRecord>> {
    let limit = limit.unwrap_or(usize::MAX);
    if limit == 0 {
        return Vec::new();
    }

    let mut results = Vec::new();
    for record in index.iter() {
        if keep(record.as_ref()) {
            results.push(Arc::clone(record));
            if results.len() >= limit {
                break;
            }
        }
    }
    results
}

/// Records matching `criteria`, in enumeration order, stopping at `limit`
///
/// Empty criteria match every record.
pub fn filter(
    index: &ContentIndex,
    criteria: &FilterCriteria,
    limit: Option<usize>,
) -> Vec<Arc<ContentRecord>> {
    let normalized = criteria.normalized();
    if normalized.is_empty() {
        return collect(index, limit, |_| true);
    }

    let view = normalized.view();
    collect(index, limit, |record| {
        matches(&Fields::of(record), &normalized, view)
    })
}

/// Records whose `type` or `industry` equals `category` (case-insensitive)
///
/// "anime", "cartoon" and "animation" select their taxonomy the same way
/// [`filter`] does; any other category excludes anime and cartoon content.
pub fn by_category(index: &ContentIndex, category: &str, limit: usize) -> Vec<Arc<ContentRecord>> {
    let category = category.trim().to_lowercase();
    if category.is_empty() {
        return Vec::new();
    }

    collect(index, Some(limit), |record| {
        let fields = Fields::of(record);
        match category.as_str() {
            ANIME => fields.is_anime(),
            CARTOON => fields.content_type == CARTOON || fields.has_cartoon_genre(),
            ANIMATION => fields.is_cartoon(),
            _ => {
                !fields.is_anime()
                    && !fields.is_cartoon()
                    && (fields.content_type == category || fields.industry == category)
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> ContentIndex {
        ContentIndex::from_records([
            ContentRecord::new("heat", "Heat")
                .with_type("Movie")
                .with_industry("Hollywood")
                .with_genres(["Crime", "Thriller"]),
            ContentRecord::new("dangal", "Dangal")
                .with_type("movie")
                .with_industry("Bollywood")
                .with_genres(["Drama", "Sport"]),
            ContentRecord::new("dark", "Dark")
                .with_type("series")
                .with_industry("Hollywood")
                .with_genres(["Sci-Fi", "Drama"]),
            ContentRecord::new("akira", "Akira")
                .with_type("movie")
                .with_industry("Anime")
                .with_genres(["Sci-Fi", "Action"]),
            ContentRecord::new("naruto", "Naruto")
                .with_type("anime")
                .with_industry("Japanese")
                .with_genres(["Action", "Adventure"]),
            ContentRecord::new("tom", "Tom and Jerry")
                .with_type("cartoon")
                .with_industry("Hollywood")
                .with_genres(["Comedy"]),
            ContentRecord::new("shrek", "Shrek")
                .with_type("movie")
                .with_industry("Hollywood")
                .with_genres(["Cartoon", "Comedy"]),
            ContentRecord::new("coco", "Coco")
                .with_type("movie")
                .with_industry("Animation")
                .with_genres(["Family", "Music"]),
        ])
    }

    fn ids(records: &[Arc<ContentRecord>]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_type_excludes_anime_and_cartoon() {
        let results = filter(&index(), &FilterCriteria::new().with_type("movie"), None);
        assert_eq!(ids(&results), vec!["heat", "dangal"]);
    }

    #[test]
    fn test_anime_type_targets_anime() {
        let results = filter(&index(), &FilterCriteria::new().with_type("anime"), None);
        assert_eq!(ids(&results), vec!["akira", "naruto"]);
    }

    #[test]
    fn test_anime_industry_targets_anime() {
        let results = filter(&index(), &FilterCriteria::new().with_industry("Anime"), None);
        assert_eq!(ids(&results), vec!["akira", "naruto"]);
    }

    #[test]
    fn test_anime_narrowed_by_genre() {
        let criteria = FilterCriteria::new().with_type("anime").with_genre("sci-fi");
        assert_eq!(ids(&filter(&index(), &criteria, None)), vec!["akira"]);
    }

    #[test]
    fn test_anime_narrowed_by_other_industry() {
        let criteria = FilterCriteria::new().with_industry("anime,japanese");
        assert_eq!(ids(&filter(&index(), &criteria, None)), vec!["naruto"]);
    }

    #[test]
    fn test_anime_narrowed_by_other_type() {
        let criteria = FilterCriteria::new().with_type("anime,movie");
        assert_eq!(ids(&filter(&index(), &criteria, None)), vec!["akira"]);

        let criteria = FilterCriteria::new().with_industry("anime").with_type("series");
        assert!(filter(&index(), &criteria, None).is_empty());
    }

    #[test]
    fn test_cartoon_type_or_genre() {
        let results = filter(&index(), &FilterCriteria::new().with_type("cartoon"), None);
        assert_eq!(ids(&results), vec!["tom", "shrek"]);

        let results = filter(&index(), &FilterCriteria::new().with_genre("Cartoon"), None);
        assert_eq!(ids(&results), vec!["tom", "shrek"]);
    }

    #[test]
    fn test_cartoon_genre_record_leaves_movie_listing() {
        let movies = filter(&index(), &FilterCriteria::new().with_type("movie"), None);
        assert!(!ids(&movies).contains(&"shrek"));

        let cartoons = filter(&index(), &FilterCriteria::new().with_type("cartoon"), None);
        assert!(ids(&cartoons).contains(&"shrek"));
    }

    #[test]
    fn test_cartoon_narrowed_by_other_type() {
        let criteria = FilterCriteria::new().with_type("cartoon,movie");
        assert_eq!(ids(&filter(&index(), &criteria, None)), vec!["shrek"]);
    }

    #[test]
    fn test_animation_industry_variant() {
        let criteria = FilterCriteria::new().with_industry("animation");
        assert_eq!(ids(&filter(&index(), &criteria, None)), vec!["tom", "shrek", "coco"]);
    }

    #[test]
    fn test_or_within_field_and_across_fields() {
        let criteria = FilterCriteria::new()
            .with_industries(["Hollywood", "Bollywood"])
            .with_genre("drama");
        assert_eq!(ids(&filter(&index(), &criteria, None)), vec!["dangal", "dark"]);

        let criteria = FilterCriteria::new().with_type("series").with_industry("bollywood");
        assert!(filter(&index(), &criteria, None).is_empty());
    }

    #[test]
    fn test_substring_match() {
        let criteria = FilterCriteria::new().with_industry("holly");
        assert_eq!(ids(&filter(&index(), &criteria, None)), vec!["heat", "dark"]);
    }

    #[test]
    fn test_substring_does_not_leak_taxonomy() {
        // "anim" is a substring of "animation" and "anime" but names neither
        let criteria = FilterCriteria::new().with_industry("anim");
        assert!(filter(&index(), &criteria, None).is_empty());
    }

    #[test]
    fn test_limit() {
        let criteria = FilterCriteria::new().with_industry("hollywood");
        assert_eq!(ids(&filter(&index(), &criteria, Some(1))), vec!["heat"]);
        assert!(filter(&index(), &criteria, Some(0)).is_empty());
    }

    #[test]
    fn test_empty_criteria_returns_everything() {
        assert_eq!(filter(&index(), &FilterCriteria::new(), None).len(), 8);
        assert_eq!(filter(&index(), &FilterCriteria::new().with_type(" , "), Some(3)).len(), 3);
    }

    #[test]
    fn test_empty_index() {
        let empty = ContentIndex::new();
        assert!(filter(&empty, &FilterCriteria::new().with_type("anime"), None).is_empty());
        assert!(by_category(&empty, "movie", 50).is_empty());
    }

    #[test]
    fn test_by_category() {
        let idx = index();
        assert_eq!(ids(&by_category(&idx, "Hollywood", 50)), vec!["heat", "dark"]);
        assert_eq!(ids(&by_category(&idx, "series", 50)), vec!["dark"]);
        assert_eq!(ids(&by_category(&idx, "Anime", 50)), vec!["akira", "naruto"]);
        assert_eq!(ids(&by_category(&idx, "Animation", 50)), vec!["tom", "shrek", "coco"]);
        assert_eq!(ids(&by_category(&idx, "movie", 1)), vec!["heat"]);
        assert!(by_category(&idx, "  ", 50).is_empty());
    }

    #[test]
    fn test_criteria_deserialize() {
        let criteria: FilterCriteria =
            serde_json::from_str(r#"{"type": "movie", "industries": ["Hollywood"]}"#).unwrap();
        assert_eq!(criteria.content_type.as_deref(), Some("movie"));
        assert_eq!(criteria.industries, vec!["Hollywood"]);
    }
}
