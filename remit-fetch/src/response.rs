//! Response body parsing and error message extraction.

use reqwest::StatusCode;
use reqwest::header::{CONTENT_TYPE, HeaderMap};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;

/// Parsed body of a gateway response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseBody {
    /// JSON payload. A declared-JSON body that fails to parse is
    /// [`Value::Null`].
    Json(Value),
    /// Anything not declared as JSON.
    Text(String),
}

impl ResponseBody {
    /// Parses a body according to its `Content-Type`.
    ///
    /// Only content types containing `json` are parsed as JSON.
    pub fn parse(headers: &HeaderMap, bytes: &[u8]) -> Self {
        let is_json = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.to_ascii_lowercase().contains("json"));

        if is_json {
            Self::Json(serde_json::from_slice(bytes).unwrap_or(Value::Null))
        } else {
            Self::Text(String::from_utf8_lossy(bytes).into_owned())
        }
    }

    /// Returns the JSON payload, if any.
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Text(_) => None,
        }
    }

    /// Returns the text payload, if any.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Json(_) => None,
        }
    }

    /// Decodes into `T`.
    ///
    /// A text body decodes as a JSON string, so `String` works for both
    /// shapes.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Decode`] if the payload does not match `T`.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        let value = match self {
            Self::Json(value) => value,
            Self::Text(text) => Value::String(text),
        };
        serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Decodes a list that may arrive bare or wrapped.
    ///
    /// Accepts `[...]`, `{"<key>": [...]}`, or `{"data": [...]}`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Decode`] if no list is found or items do not
    /// match `T`.
    pub fn decode_list<T: DeserializeOwned>(self, key: &str) -> Result<Vec<T>, ApiError> {
        match self {
            Self::Json(Value::Object(mut map)) => {
                let list = map
                    .remove(key)
                    .or_else(|| map.remove("data"))
                    .ok_or_else(|| ApiError::Decode(format!("expected a list under `{key}`")))?;
                Self::Json(list).decode()
            }
            other => other.decode(),
        }
    }

    /// Builds the error message for a non-2xx response.
    ///
    /// Priority: `error` field, `message` field, raw body text, status
    /// reason phrase, `HTTP <code>`.
    pub(crate) fn error_message(&self, raw: &[u8], status: StatusCode) -> String {
        let field = |name: &str| {
            self.as_json()
                .and_then(|v| v.get(name))
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(String::from)
        };

        field("error")
            .or_else(|| field("message"))
            .or_else(|| {
                let text = String::from_utf8_lossy(raw);
                let text = text.trim();
                (!text.is_empty()).then(|| text.to_string())
            })
            .or_else(|| status.canonical_reason().map(String::from))
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
    }
}
