//! Storage encoding of event data values.
//!
//! Event data values are stored as a JSON document per event. PostgreSQL
//! `jsonb` rejects the NUL character, so a value containing one cannot be
//! stored even though it serializes as JSON.

use serde::Serialize;
use thiserror::Error;
use tracker_model::DataValue;

use crate::services::ValueEncoder;

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("failed to serialize data value: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported Unicode escape sequence \\u0000 in data value")]
    NulCharacter,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StoredDataValue<'a> {
    value: Option<&'a str>,
    provided_elsewhere: bool,
}

/// Encodes data values as `jsonb`-compatible JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonbValueEncoder;

impl ValueEncoder for JsonbValueEncoder {
    fn encode(&self, value: &DataValue) -> Result<String, EncodeError> {
        if value.value.as_deref().is_some_and(|raw| raw.contains('\0')) {
            return Err(EncodeError::NulCharacter);
        }
        let stored = StoredDataValue {
            value: value.value.as_deref(),
            provided_elsewhere: value.provided_elsewhere,
        };
        Ok(serde_json::to_string(&stored)?)
    }
}
