//! Source payload shapes.
//!
//! A source is either a bare JSON array of records or a wrapper object that
//! keeps the array under a known field (`{"movies": [...]}`).

use serde_json::Value;
use shared::ContentRecord;
use tracing::{debug, warn};

/// Field holding the record list in wrapper-object sources
pub const DEFAULT_WRAPPER_FIELD: &str = "movies";

/// Records pulled out of one source payload
#[derive(Debug, Default)]
pub struct ExtractedRecords {
    pub records: Vec<ContentRecord>,
    /// Array elements found in the payload
    pub seen: usize,
    /// Elements that could not be used as records (no id, not an object)
    pub dropped: usize,
}

/// Pull the record list out of a payload, whatever its shape
///
/// Unknown shapes yield zero records; that is not treated as an error.
pub fn extract_records(source: &str, payload: Value, wrapper_field: &str) -> ExtractedRecords {
    let items = match payload {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove(wrapper_field) {
            Some(Value::Array(items)) => items,
            _ => {
                warn!(
                    source = source,
                    wrapper_field = wrapper_field,
                    "Source object has no record list, skipping"
                );
                return ExtractedRecords::default();
            }
        },
        other => {
            warn!(
                source = source,
                kind = json_kind(&other),
                "Unsupported source payload, skipping"
            );
            return ExtractedRecords::default();
        }
    };

    let seen = items.len();
    let mut records = Vec::with_capacity(seen);
    let mut dropped = 0;

    for item in items {
        match serde_json::from_value::<ContentRecord>(item) {
            Ok(record) => records.push(record),
            Err(e) => {
                debug!(source = source, error = %e, "Dropping unusable record");
                dropped += 1;
            }
        }
    }

    ExtractedRecords {
        records,
        seen,
        dropped,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
