//! Cookie token decoding errors.

use thiserror::Error;

/// A present but malformed token cookie.
///
/// An absent cookie is not an error; extractors report it as `Ok(None)`.
#[derive(Debug, Error)]
pub enum TokenDecodeError {
    /// Cookie value is not valid base64 in either alphabet.
    #[error("cookie is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Decoded bytes are not UTF-8 text.
    #[error("decoded cookie is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Decoded text is not JSON.
    #[error("decoded cookie is not JSON: {0}")]
    Json(#[source] serde_json::Error),

    /// Envelope has no `message` field, or it is null.
    #[error("token envelope has no message")]
    MissingMessage,

    /// `message` does not have the expected token shape.
    #[error("token payload has unexpected shape: {0}")]
    Payload(#[source] serde_json::Error),
}

impl TokenDecodeError {
    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            TokenDecodeError::Base64(_) => "E_TOKEN_BASE64",
            TokenDecodeError::Utf8(_) => "E_TOKEN_UTF8",
            TokenDecodeError::Json(_) => "E_TOKEN_JSON",
            TokenDecodeError::MissingMessage => "E_TOKEN_NO_MESSAGE",
            TokenDecodeError::Payload(_) => "E_TOKEN_PAYLOAD",
        }
    }
}
