//! Error types for the MegaSigns API client.
//!
//! # Design
//! Failures raised before any I/O carry an `SdkErrorCode` from a closed set.
//! Failures reported by the server keep the server's own code string, since
//! the service may return codes this crate has never heard of. Both origins
//! expose the same `api_code()` so callers compare a single string.

use std::fmt;

use serde::Deserialize;
use thiserror::Error;

use crate::http::HttpResponse;

/// Codes produced by client-side request validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SdkErrorCode {
    /// No access token was supplied at all.
    NoAccessTokenHeader,
    /// An access token was supplied but it is empty.
    InvalidAccessToken,
    /// The `x-api-user` header value is empty.
    InvalidXApiUserHeader,
    /// The MegaSign id is empty or missing.
    InvalidMegaSignId,
}

impl SdkErrorCode {
    /// Every code, in the order validation checks for them.
    pub const ALL: [SdkErrorCode; 4] = [
        SdkErrorCode::NoAccessTokenHeader,
        SdkErrorCode::InvalidAccessToken,
        SdkErrorCode::InvalidXApiUserHeader,
        SdkErrorCode::InvalidMegaSignId,
    ];

    /// Stable identifier shared with the server's error vocabulary.
    pub fn api_code(self) -> &'static str {
        match self {
            SdkErrorCode::NoAccessTokenHeader => "NO_ACCESS_TOKEN_HEADER",
            SdkErrorCode::InvalidAccessToken => "INVALID_ACCESS_TOKEN",
            SdkErrorCode::InvalidXApiUserHeader => "INVALID_X_API_USER_HEADER",
            SdkErrorCode::InvalidMegaSignId => "INVALID_MEGASIGN_ID",
        }
    }

    /// Human-readable description carried alongside the code.
    pub fn message(self) -> &'static str {
        match self {
            SdkErrorCode::NoAccessTokenHeader => "Access token header not provided",
            SdkErrorCode::InvalidAccessToken => "Access token provided is invalid or has expired",
            SdkErrorCode::InvalidXApiUserHeader => "Value provided in x-api-user header is invalid",
            SdkErrorCode::InvalidMegaSignId => "The MegaSign ID specified is invalid",
        }
    }

    /// Reverse of `api_code`; `None` for codes outside this set.
    pub fn from_api_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.api_code() == code)
    }
}

impl fmt::Display for SdkErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.api_code(), self.message())
    }
}

/// Errors returned by `MegaSignsClient` and `MegaSignsApi`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request was rejected before it reached the network.
    #[error("{0}")]
    Sdk(SdkErrorCode),

    /// The server answered with a structured error body.
    #[error("HTTP {status} {code}: {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    /// The server returned a non-2xx status without a recognizable error body.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The HTTP round-trip itself failed.
    #[error("transport failed: {0}")]
    Transport(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),
}

impl From<SdkErrorCode> for ApiError {
    fn from(code: SdkErrorCode) -> Self {
        ApiError::Sdk(code)
    }
}

impl ApiError {
    /// The stable error code, whether raised locally or by the server.
    pub fn api_code(&self) -> Option<&str> {
        match self {
            ApiError::Sdk(code) => Some(code.api_code()),
            ApiError::Api { code, .. } => Some(code),
            _ => None,
        }
    }

    /// The error code as a member of the closed SDK set, if it is one.
    pub fn sdk_code(&self) -> Option<SdkErrorCode> {
        match self {
            ApiError::Sdk(code) => Some(*code),
            ApiError::Api { code, .. } => SdkErrorCode::from_api_code(code),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    code: String,
    #[serde(default)]
    message: String,
}

/// Turn a non-success response into an `ApiError`.
pub fn classify(response: &HttpResponse) -> ApiError {
    match serde_json::from_slice::<ErrorBody>(&response.body) {
        Ok(err) => ApiError::Api {
            status: response.status,
            code: err.code,
            message: err.message,
        },
        Err(_) => ApiError::HttpError {
            status: response.status,
            body: String::from_utf8_lossy(&response.body).into_owned(),
        },
    }
}
