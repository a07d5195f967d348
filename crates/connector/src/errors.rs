//! Connector error types
//!
//! One error enum for every failure a call can produce. `kind()` groups
//! the variants into the transport / server / parsing / validation split
//! callers branch on.

use serde::Deserialize;
use thiserror::Error;

/// Result type for connector operations
pub type Result<T> = std::result::Result<T, ConnectorError>;

/// Connector operation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConnectorError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("API error {code} (HTTP {status}): {msg}")]
    ApiError { status: u16, code: i64, msg: String },

    #[error("HTTP error {0}: {1}")]
    HttpError(u16, String),

    #[error("Parse error: field `{field}` expected {expected}")]
    ParseError { field: String, expected: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Validation error: field `{field}` = {value} violates {constraint}")]
    ValidationError { field: String, value: String, constraint: String },

    #[error("Missing parameter: {0}")]
    MissingParameter(String),

    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Signing error: {0}")]
    SigningError(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

/// Coarse failure classes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The network call could not complete
    Transport,
    /// The server answered with a non-2xx status
    Server,
    /// The body did not match the requested shape
    Parsing,
    /// A parsed field broke a declared invariant
    Validation,
    /// The request was rejected before anything was sent
    Request,
}

impl ConnectorError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NetworkError(_) | Self::Timeout(_) | Self::InvalidUrl(_) => ErrorKind::Transport,
            Self::ApiError { .. } | Self::HttpError(..) => ErrorKind::Server,
            Self::ParseError { .. } | Self::SerializationError(_) => ErrorKind::Parsing,
            Self::ValidationError { .. } => ErrorKind::Validation,
            Self::MissingParameter(_)
            | Self::MissingCredentials(_)
            | Self::InvalidCredentials
            | Self::SigningError(_)
            | Self::ConfigurationError(_) => ErrorKind::Request,
        }
    }

    /// Binance error code, when the server supplied one
    pub fn api_code(&self) -> Option<i64> {
        match self {
            Self::ApiError { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// HTTP status of a server-reported failure
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::ApiError { status, .. } | Self::HttpError(status, _) => Some(*status),
            _ => None,
        }
    }

    pub(crate) fn parse(field: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::ParseError {
            field: field.into(),
            expected: expected.into(),
        }
    }

    /// Build the server-reported failure for a non-2xx response
    ///
    /// Binance bodies look like `{"code": -1100, "msg": "..."}`; anything
    /// else keeps the raw body.
    pub fn from_error_body(status: u16, body: &str) -> Self {
        #[derive(Deserialize)]
        struct BinanceErrorBody {
            code: i64,
            msg: String,
        }

        match serde_json::from_str::<BinanceErrorBody>(body) {
            Ok(err) => Self::ApiError {
                status,
                code: err.code,
                msg: err.msg,
            },
            Err(_) => Self::HttpError(status, body.to_string()),
        }
    }
}

impl From<serde_json::Error> for ConnectorError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

impl From<url::ParseError> for ConnectorError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}
