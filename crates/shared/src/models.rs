//! Data models for the catalog.
//!
//! This module defines the content record as it arrives from the data sources
//! and the envelope used to persist the merged collection between sessions.
//!
//! Sources are hand-maintained JSON files, so every field except `id` is
//! deserialized leniently: a field of the wrong shape degrades to its empty
//! value instead of rejecting the whole record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One catalog entry (movie, series, or one season of a series)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRecord {
    /// Primary key, unique across all sources
    #[serde(deserialize_with = "lenient::id")]
    pub id: String,

    #[serde(default, deserialize_with = "lenient::string")]
    pub title: String,

    /// Classifier such as "movie", "series", "anime", "cartoon"
    #[serde(rename = "type", default, deserialize_with = "lenient::string")]
    pub content_type: String,

    /// Classifier such as "hollywood", "bollywood", "anime", "animation"
    #[serde(default, deserialize_with = "lenient::string")]
    pub industry: String,

    #[serde(default, deserialize_with = "lenient::string_list")]
    pub genres: Vec<String>,

    #[serde(default, deserialize_with = "lenient::string_list")]
    pub cast: Vec<String>,

    #[serde(
        default,
        deserialize_with = "lenient::director",
        skip_serializing_if = "Option::is_none"
    )]
    pub director: Option<Director>,

    // Descriptive fields, not validated
    #[serde(
        default,
        deserialize_with = "lenient::scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub rating: Option<Scalar>,
    #[serde(
        default,
        deserialize_with = "lenient::scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub year: Option<Scalar>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub duration: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub image: Option<String>,

    /// Set when the record is one season of a multi-season series
    #[serde(
        default,
        deserialize_with = "lenient::scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub season: Option<Scalar>,

    /// Episode sub-records; opaque apart from their count
    #[serde(
        default,
        deserialize_with = "lenient::value_list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub episodes: Vec<Value>,

    /// Any other source fields (links, download tables, ...), kept verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Director field: sources use either a single name or a list of names
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Director {
    One(String),
    Many(Vec<String>),
}

impl Director {
    /// All director names in source order
    pub fn names(&self) -> Vec<&str> {
        match self {
            Director::One(name) => vec![name.as_str()],
            Director::Many(names) => names.iter().map(String::as_str).collect(),
        }
    }

    /// Names joined with a single space, as used by text search
    pub fn joined(&self) -> String {
        self.names().join(" ")
    }
}

/// A scalar that sources write either as a number or as a string ("8.7", "2019")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    /// Numeric value, if the scalar is a number or a numeric string
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Int(n) => Some(*n as f64),
            Scalar::Float(f) => Some(*f),
            Scalar::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }

    /// Integer value, if the scalar is integral or an integer string
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::Int(n) => Some(*n),
            Scalar::Float(f) if f.fract() == 0.0 => Some(*f as i64),
            Scalar::Float(_) => None,
            Scalar::Text(s) => s.trim().parse::<i64>().ok(),
        }
    }
}

impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scalar::Int(n) => write!(f, "{}", n),
            Scalar::Float(x) => write!(f, "{}", x),
            Scalar::Text(s) => write!(f, "{}", s),
        }
    }
}

impl ContentRecord {
    /// Create a record with only the required fields set
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content_type: String::new(),
            industry: String::new(),
            genres: Vec::new(),
            cast: Vec::new(),
            director: None,
            rating: None,
            year: None,
            duration: None,
            description: None,
            image: None,
            season: None,
            episodes: Vec::new(),
            extra: Map::new(),
        }
    }

    pub fn with_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    pub fn with_industry(mut self, industry: impl Into<String>) -> Self {
        self.industry = industry.into();
        self
    }

    pub fn with_genres(mut self, genres: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.genres = genres.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_cast(mut self, cast: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.cast = cast.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_director(mut self, director: Director) -> Self {
        self.director = Some(director);
        self
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(Scalar::Float(rating));
        self
    }

    pub fn with_season(mut self, season: i64) -> Self {
        self.season = Some(Scalar::Int(season));
        self
    }

    /// Lowercased `type`, for comparisons
    pub fn type_lower(&self) -> String {
        self.content_type.to_lowercase()
    }

    /// Lowercased `industry`, for comparisons
    pub fn industry_lower(&self) -> String {
        self.industry.to_lowercase()
    }

    /// Lowercased genres, for comparisons
    pub fn genres_lower(&self) -> Vec<String> {
        self.genres.iter().map(|g| g.to_lowercase()).collect()
    }

    pub fn rating_value(&self) -> Option<f64> {
        self.rating.as_ref().and_then(Scalar::as_f64)
    }

    pub fn season_number(&self) -> Option<i64> {
        self.season.as_ref().and_then(Scalar::as_i64)
    }

    pub fn episode_count(&self) -> usize {
        self.episodes.len()
    }
}

/// Persisted form of the merged collection
///
/// A mismatch between `version` and the running build's cache version means
/// the whole envelope is discarded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEnvelope {
    pub version: String,
    pub saved_at: DateTime<Utc>,
    pub entries: Vec<ContentRecord>,
}

impl CacheEnvelope {
    pub fn new(version: impl Into<String>, entries: Vec<ContentRecord>) -> Self {
        Self {
            version: version.into(),
            saved_at: Utc::now(),
            entries,
        }
    }
}

/// Deserializers that coerce malformed source fields to empty values
mod lenient {
    use super::*;
    use serde::de::Error;

    /// Ids must be usable as lookup keys: a blank string is rejected, while
    /// every number (including 0) is a valid key.
    pub fn id<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        match Value::deserialize(d)? {
            Value::String(s) if !s.trim().is_empty() => Ok(s),
            Value::Number(n) => Ok(n.to_string()),
            other => Err(D::Error::custom(format!("unusable id: {}", other))),
        }
    }

    pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(opt_string(d)?.unwrap_or_default())
    }

    pub fn opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
    }

    pub fn string_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        })
    }

    pub fn value_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Value>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Array(items) => items,
            _ => Vec::new(),
        })
    }

    pub fn director<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Director>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) if !s.trim().is_empty() => Some(Director::One(s)),
            Value::Array(items) => {
                let names: Vec<String> = items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::String(s) => Some(s),
                        _ => None,
                    })
                    .collect();
                if names.is_empty() {
                    None
                } else {
                    Some(Director::Many(names))
                }
            }
            _ => None,
        })
    }

    pub fn scalar<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Scalar>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Number(n) => n
                .as_i64()
                .map(Scalar::Int)
                .or_else(|| n.as_f64().map(Scalar::Float)),
            Value::String(s) if !s.trim().is_empty() => Some(Scalar::Text(s)),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_record() {
        let record: ContentRecord = serde_json::from_value(json!({
            "id": "inception",
            "title": "Inception",
            "type": "Movie",
            "industry": "Hollywood",
            "genres": ["Sci-Fi", "Thriller"],
            "cast": ["Leonardo DiCaprio"],
            "director": "Christopher Nolan",
            "rating": "8.8",
            "year": 2010,
            "urls": {"720p": "https://example.com/a"}
        }))
        .unwrap();

        assert_eq!(record.id, "inception");
        assert_eq!(record.content_type, "Movie");
        assert_eq!(record.type_lower(), "movie");
        assert_eq!(record.genres, vec!["Sci-Fi", "Thriller"]);
        assert_eq!(record.director, Some(Director::One("Christopher Nolan".into())));
        assert_eq!(record.rating_value(), Some(8.8));
        assert_eq!(record.year.as_ref().and_then(Scalar::as_i64), Some(2010));
        assert!(record.extra.contains_key("urls"));
    }

    #[test]
    fn test_malformed_fields_coerce_to_empty() {
        let record: ContentRecord = serde_json::from_value(json!({
            "id": "x1",
            "title": null,
            "genres": "Drama",
            "cast": [1, "Someone", null],
            "director": 42,
            "episodes": {"1": "link"},
            "rating": "N/A"
        }))
        .unwrap();

        assert_eq!(record.title, "");
        assert!(record.genres.is_empty());
        assert_eq!(record.cast, vec!["Someone"]);
        assert_eq!(record.director, None);
        assert_eq!(record.episode_count(), 0);
        assert_eq!(record.rating_value(), None);
        assert_eq!(record.rating, Some(Scalar::Text("N/A".into())));
    }

    #[test]
    fn test_missing_or_empty_id_is_rejected() {
        assert!(serde_json::from_value::<ContentRecord>(json!({"title": "No id"})).is_err());
        assert!(serde_json::from_value::<ContentRecord>(json!({"id": "", "title": "x"})).is_err());
        assert!(serde_json::from_value::<ContentRecord>(json!({"id": null})).is_err());
        assert!(serde_json::from_value::<ContentRecord>(json!({"id": "   ", "title": "x"})).is_err());
    }

    #[test]
    fn test_numeric_id_is_stringified() {
        let zero: ContentRecord = serde_json::from_value(json!({"id": 0, "title": "z"})).unwrap();
        assert_eq!(zero.id, "0");

        let record: ContentRecord = serde_json::from_value(json!({"id": 17, "title": "t"})).unwrap();
        assert_eq!(record.id, "17");
    }

    #[test]
    fn test_director_list() {
        let record: ContentRecord = serde_json::from_value(json!({
            "id": "m",
            "director": ["Joel Coen", "Ethan Coen"]
        }))
        .unwrap();
        let director = record.director.unwrap();
        assert_eq!(director.names(), vec!["Joel Coen", "Ethan Coen"]);
        assert_eq!(director.joined(), "Joel Coen Ethan Coen");
    }

    #[test]
    fn test_season_and_episodes() {
        let record: ContentRecord = serde_json::from_value(json!({
            "id": "dark2",
            "season": "2",
            "episodes": [{"episode": 1}, {"episode": 2}]
        }))
        .unwrap();
        assert_eq!(record.season_number(), Some(2));
        assert_eq!(record.episode_count(), 2);
    }

    #[test]
    fn test_serialize_keeps_type_and_extra_fields() {
        let mut record = ContentRecord::new("a", "A").with_type("series");
        record.extra.insert("download_links".into(), json!({"hd": "x"}));

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["type"], "series");
        assert_eq!(value["download_links"]["hd"], "x");

        let back: ContentRecord = serde_json::from_value(value).unwrap();
        assert_eq!(back, record);
    }
}
