//! Revue id extraction from the `GET /api/Revue/All` response.
//!
//! The service does not pin down the shape of its listing response, so this
//! module accepts every shape seen so far:
//!
//! | Root value | Revues taken from |
//! |------------|-------------------|
//! | array | the root itself |
//! | object with array `data` | `data` |
//! | object with array `revues` | `revues` |
//!
//! Within a revue object the id is the first string-typed field among
//! `revueId`, `id` and `_id`.

use serde_json::Value;
use thiserror::Error;

/// Object keys that may hold the revue array, in priority order.
pub const COLLECTION_KEYS: &[&str] = &["data", "revues"];

/// Object keys that may hold a revue id, in priority order.
pub const ID_KEYS: &[&str] = &["revueId", "id", "_id"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListingError {
    #[error("Expected an array of revues.")]
    NotAnArray,

    #[error("No revues returned.")]
    Empty,

    #[error("Could not read revue id from the last item.")]
    MissingId,
}

/// Locates the revue array in a listing response.
pub fn revues(root: &Value) -> Option<&[Value]> {
    match root {
        Value::Array(items) => Some(items.as_slice()),
        Value::Object(map) => COLLECTION_KEYS
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_array))
            .map(Vec::as_slice),
        _ => None,
    }
}

/// Reads the id of a single revue object.
pub fn revue_id(revue: &Value) -> Option<&str> {
    let map = revue.as_object()?;
    ID_KEYS
        .iter()
        .find_map(|key| map.get(*key).and_then(Value::as_str))
}

/// Reads the title of a single revue object.
pub fn revue_title(revue: &Value) -> Option<&str> {
    revue.get("title").and_then(Value::as_str)
}

/// Returns the last revue in a listing response.
pub fn last_revue(root: &Value) -> Result<&Value, ListingError> {
    let items = revues(root).ok_or(ListingError::NotAnArray)?;
    items.last().ok_or(ListingError::Empty)
}

/// Returns the id of the last revue in a listing response.
pub fn last_revue_id(root: &Value) -> Result<String, ListingError> {
    match revue_id(last_revue(root)?) {
        Some(id) if !id.trim().is_empty() => Ok(id.to_string()),
        _ => Err(ListingError::MissingId),
    }
}
