//! Conversion between host JSON values and typed models

use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::diagnostics::Diagnostic;

/// Decode a plan, state or config object into its model.
pub fn decode<T: DeserializeOwned>(value: &Value, what: &str) -> Result<T, Diagnostic> {
    T::deserialize(value).map_err(|e| {
        Diagnostic::error(
            format!("Invalid {}", what),
            format!("Could not decode {}: {}", what, e),
        )
    })
}

pub fn encode<T: Serialize>(model: &T) -> Result<Value, Diagnostic> {
    serde_json::to_value(model)
        .map_err(|e| Diagnostic::error("Invalid state", format!("Could not encode state: {}", e)))
}

/// RFC 3339, whole seconds, `Z` suffix.
pub fn timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Identifier of an already created object, as stored in prior state.
pub fn require_id(id: Option<i32>, what: &str) -> Result<i32, Diagnostic> {
    id.ok_or_else(|| {
        Diagnostic::error(
            format!("Missing {} id", what),
            format!("The {} state has no id; it may not have been created", what),
        )
        .with_attribute("id")
    })
}

/// Parse an import identifier into a numeric id.
pub fn parse_import_id(id: &str) -> Result<i32, Diagnostic> {
    id.trim().parse::<i32>().map_err(|_| {
        Diagnostic::error(
            "Error importing state",
            format!("Import id must be a numeric id, got {:?}", id),
        )
    })
}
