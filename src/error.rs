//! Error types for the utility portal clients.
//!
//! Every failure a client can report is one of the [`Error`] variants. Parsers
//! report their own [`ParseError`], which the client facades wrap into
//! [`Error::InvalidData`] together with the raw payload that failed to parse.

use serde_json::Value;
use thiserror::Error;

/// Result type alias using our custom error types.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Top-level error type returned by the portal clients.
#[derive(Error, Debug)]
pub enum Error {
    /// The portal answered with a non-200 status
    #[error("invalid response: {status} - {reason}")]
    RequestFailed { status: u16, reason: String },

    /// Well-formed response, but the portal reported a failure
    #[error("command not successful: {data}")]
    Command { data: Value },

    /// Response does not match the expected schema
    #[error("invalid data from server: {data}")]
    InvalidData {
        data: Value,
        #[source]
        source: ParseError,
    },

    /// The portal rejected the contract selection
    #[error("invalid contract code: {id:?}")]
    InvalidContract { id: String },

    /// The portal reports that the user account has expired
    #[error("user account expired: {data}")]
    UserExpired { data: Value },

    /// Transport-level failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Body could not be decoded into JSON
    #[error("failed to decode response body")]
    Decode(#[from] DecodeError),

    /// Configuration-related errors
    #[error("configuration error")]
    Config(#[from] ConfigError),

    /// The provider does not offer this operation
    #[error("{provider} does not support {operation}")]
    Unsupported {
        provider: &'static str,
        operation: &'static str,
    },
}

/// Errors raised while turning a decoded payload into typed records.
#[derive(Error, Debug, PartialEq)]
pub enum ParseError {
    /// Expected key is absent
    #[error("missing key: {key}")]
    MissingKey { key: String },

    /// Key is present but holds the wrong JSON type
    #[error("unexpected type for '{key}': expected {expected}")]
    UnexpectedType { key: String, expected: &'static str },

    /// Failed to parse numeric value
    #[error("failed to parse number from '{text}': {message}")]
    NumberParse { text: String, message: String },

    /// Failed to parse date/time
    #[error("failed to parse date/time from '{text}': {message}")]
    DateTimeParse { text: String, message: String },

    /// Parallel arrays disagree in length
    #[error("length mismatch in {what}: expected {expected}, got {actual}")]
    LengthMismatch {
        what: String,
        expected: usize,
        actual: usize,
    },

    /// Unexpected payload structure
    #[error("unexpected payload structure: {0}")]
    UnexpectedStructure(String),
}

/// Errors raised while decoding a raw response body.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// Bytes are not valid for the declared charset
    #[error("body is not valid {charset}: {message}")]
    Charset {
        charset: &'static str,
        message: String,
    },

    /// Text is not valid JSON
    #[error("body is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-related errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Environment variable parsing failed
    #[error("failed to parse environment variables: {0}")]
    EnvParse(String),

    /// Required configuration value is missing
    #[error("missing required configuration: {0}")]
    Missing(String),

    /// Configuration value is invalid
    #[error("invalid configuration value for {field}: {message}")]
    Invalid { field: String, message: String },

    /// Credentials file could not be read or parsed
    #[error("failed to load credentials from {path}: {message}")]
    CredentialsFile { path: String, message: String },
}

impl Error {
    /// Creates a request failed error from an HTTP status.
    pub fn request_failed(status: reqwest::StatusCode) -> Self {
        Self::RequestFailed {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
        }
    }

    /// Creates a command error carrying the raw payload.
    pub fn command(data: &Value) -> Self {
        Self::Command { data: data.clone() }
    }

    /// Creates an invalid data error carrying the raw payload.
    pub fn invalid_data(data: &Value, source: ParseError) -> Self {
        Self::InvalidData {
            data: data.clone(),
            source,
        }
    }

    /// Creates an invalid contract error.
    pub fn invalid_contract(id: impl Into<String>) -> Self {
        Self::InvalidContract { id: id.into() }
    }

    /// Creates a user expired error carrying the raw payload.
    pub fn user_expired(data: &Value) -> Self {
        Self::UserExpired { data: data.clone() }
    }

    /// Creates an unsupported operation error.
    pub fn unsupported(provider: &'static str, operation: &'static str) -> Self {
        Self::Unsupported {
            provider,
            operation,
        }
    }
}

impl ParseError {
    /// Creates a missing key error.
    pub fn missing_key(key: impl Into<String>) -> Self {
        Self::MissingKey { key: key.into() }
    }

    /// Creates an unexpected type error.
    pub fn unexpected_type(key: impl Into<String>, expected: &'static str) -> Self {
        Self::UnexpectedType {
            key: key.into(),
            expected,
        }
    }

    /// Creates a number parse error.
    pub fn number_parse(text: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::NumberParse {
            text: text.into(),
            message: err.to_string(),
        }
    }

    /// Creates a datetime parse error.
    pub fn datetime_parse(text: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::DateTimeParse {
            text: text.into(),
            message: err.to_string(),
        }
    }

    /// Creates a length mismatch error.
    pub fn length_mismatch(what: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::LengthMismatch {
            what: what.into(),
            expected,
            actual,
        }
    }
}

impl ConfigError {
    /// Creates a new environment parse error.
    pub fn env_parse(err: impl std::fmt::Display) -> Self {
        Self::EnvParse(err.to_string())
    }

    /// Creates a new missing configuration error.
    pub fn missing(field: impl Into<String>) -> Self {
        Self::Missing(field.into())
    }

    /// Creates a new invalid configuration error.
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates a new credentials file error.
    pub fn credentials_file(path: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::CredentialsFile {
            path: path.into(),
            message: err.to_string(),
        }
    }
}
