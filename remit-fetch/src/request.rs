//! Request descriptions.
//!
//! A [`RequestOptions`] is what callers hand to
//! [`crate::ApiClient::request`]: method, caller headers, and body. The
//! client fills in the ambient headers and turns it into an
//! [`crate::transport::HttpRequest`].

use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Serialize;

use crate::error::ApiError;

/// Header carrying the device identifier.
pub const DEVICE_ID_HEADER: &str = "x-device-id";

/// Header carrying the CSRF token.
pub const CSRF_HEADER: &str = "x-csrf-token";

/// Header carrying the idempotency key.
pub const IDEMPOTENCY_KEY_HEADER: &str = "idempotency-key";

/// Returns true for methods without side effects.
pub fn is_safe_method(method: &Method) -> bool {
    *method == Method::GET || *method == Method::HEAD || *method == Method::OPTIONS
}

// ============================================================================
// Request Body
// ============================================================================

/// Body of an outgoing request.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestBody {
    /// No body.
    #[default]
    Empty,
    /// JSON document.
    Json(serde_json::Value),
    /// Pre-serialized text, sent verbatim.
    Text(String),
    /// Multipart form; the transport sets its own content type.
    Multipart(MultipartForm),
}

impl RequestBody {
    /// Returns true for multipart bodies.
    pub fn is_multipart(&self) -> bool {
        matches!(self, RequestBody::Multipart(_))
    }
}

/// A multipart form that can be rebuilt for every attempt.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultipartForm {
    parts: Vec<FormPart>,
}

/// One field of a [`MultipartForm`].
#[derive(Debug, Clone, PartialEq)]
pub enum FormPart {
    /// Plain text field.
    Text {
        /// Field name.
        name: String,
        /// Field value.
        value: String,
    },
    /// File upload.
    File {
        /// Field name.
        name: String,
        /// File name reported to the server.
        file_name: String,
        /// MIME type, if known.
        mime: Option<String>,
        /// File contents.
        bytes: Vec<u8>,
    },
}

impl MultipartForm {
    /// Creates an empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a text field.
    #[must_use]
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(FormPart::Text {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Adds a file field.
    #[must_use]
    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        mime: Option<&str>,
        bytes: Vec<u8>,
    ) -> Self {
        self.parts.push(FormPart::File {
            name: name.into(),
            file_name: file_name.into(),
            mime: mime.map(String::from),
            bytes,
        });
        self
    }

    /// Returns the fields in insertion order.
    pub fn parts(&self) -> &[FormPart] {
        &self.parts
    }

    /// Converts into a reqwest form.
    pub(crate) fn to_reqwest(&self) -> Result<reqwest::multipart::Form, reqwest::Error> {
        let mut form = reqwest::multipart::Form::new();
        for part in &self.parts {
            form = match part {
                FormPart::Text { name, value } => form.text(name.clone(), value.clone()),
                FormPart::File {
                    name,
                    file_name,
                    mime,
                    bytes,
                } => {
                    let mut file =
                        reqwest::multipart::Part::bytes(bytes.clone()).file_name(file_name.clone());
                    if let Some(mime) = mime {
                        file = file.mime_str(mime)?;
                    }
                    form.part(name.clone(), file)
                }
            };
        }
        Ok(form)
    }
}

// ============================================================================
// Request Options
// ============================================================================

/// Method, caller headers, and body of a gateway request.
///
/// Headers set here take precedence over the ones the client adds.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// HTTP method.
    pub method: Method,
    /// Caller-supplied headers.
    pub headers: HeaderMap,
    /// Request body.
    pub body: RequestBody,
}

impl RequestOptions {
    /// Creates options for a method with no body.
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    /// GET request.
    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    /// POST request.
    pub fn post() -> Self {
        Self::new(Method::POST)
    }

    /// PUT request.
    pub fn put() -> Self {
        Self::new(Method::PUT)
    }

    /// PATCH request.
    pub fn patch() -> Self {
        Self::new(Method::PATCH)
    }

    /// DELETE request.
    pub fn delete() -> Self {
        Self::new(Method::DELETE)
    }

    /// Sets a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Serialize`] if `body` cannot be serialized.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ApiError> {
        self.body = RequestBody::Json(serde_json::to_value(body).map_err(ApiError::Serialize)?);
        Ok(self)
    }

    /// Sets a text body.
    #[must_use]
    pub fn text(mut self, body: impl Into<String>) -> Self {
        self.body = RequestBody::Text(body.into());
        self
    }

    /// Sets a multipart body.
    #[must_use]
    pub fn multipart(mut self, form: MultipartForm) -> Self {
        self.body = RequestBody::Multipart(form);
        self
    }

    /// Sets a caller header.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidHeader`] for values HTTP does not allow.
    pub fn header(mut self, name: &'static str, value: &str) -> Result<Self, ApiError> {
        let value =
            HeaderValue::from_str(value).map_err(|_| ApiError::InvalidHeader(name.to_string()))?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Attaches an idempotency key, making the request retryable.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidHeader`] for keys HTTP does not allow.
    pub fn idempotency_key(self, key: &str) -> Result<Self, ApiError> {
        self.header(IDEMPOTENCY_KEY_HEADER, key)
    }
}
