//! Error types for bulk-records
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//!
//! No variant is ever retried internally: the first failure of any page
//! aborts the fetch and is returned to the caller.

use thiserror::Error;

/// The main error type for bulk-records
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Query Errors
    // ============================================================================
    #[error("Invalid query: {message}")]
    Validation { message: String },

    // ============================================================================
    // Authentication Errors
    // ============================================================================
    #[error("Authentication failed ({status}): {message}")]
    Auth { status: u16, message: String },

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Rate limited, retry after {retry_after_seconds}s")]
    RateLimited { retry_after_seconds: u64 },

    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    // ============================================================================
    // Cursor Errors
    // ============================================================================
    #[error("Cursor '{cursor_id}' expired or is no longer valid")]
    CursorExpired { cursor_id: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network, HTTP status, or response decoding failure
    Transport,
    /// Credentials rejected
    Auth,
    /// Throttled by the service
    RateLimit,
    /// Server-side cursor expired or unknown
    CursorExpired,
    /// Malformed query or out-of-range parameters
    Validation,
    /// Local configuration problem
    Config,
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create an auth error
    pub fn auth(status: u16, message: impl Into<String>) -> Self {
        Self::Auth {
            status,
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create a cursor expired error
    pub fn cursor_expired(cursor_id: impl Into<String>) -> Self {
        Self::CursorExpired {
            cursor_id: cursor_id.into(),
        }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Http(_) | Error::HttpStatus { .. } | Error::Decode { .. } => {
                ErrorKind::Transport
            }
            Error::Auth { .. } => ErrorKind::Auth,
            Error::RateLimited { .. } => ErrorKind::RateLimit,
            Error::CursorExpired { .. } => ErrorKind::CursorExpired,
            Error::Validation { .. } => ErrorKind::Validation,
            Error::Config { .. }
            | Error::MissingConfigField { .. }
            | Error::YamlParse(_)
            | Error::JsonParse(_)
            | Error::InvalidUrl(_)
            | Error::Io(_) => ErrorKind::Config,
        }
    }

    /// Check if this is a cursor expiry
    pub fn is_cursor_expired(&self) -> bool {
        matches!(self, Error::CursorExpired { .. })
    }
}

/// Result type alias for bulk-records
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::missing_field("base_url");
        assert_eq!(err.to_string(), "Missing required config field: base_url");

        let err = Error::http_status(404, "Not found");
        assert_eq!(err.to_string(), "HTTP 404: Not found");

        let err = Error::cursor_expired("abc");
        assert_eq!(err.to_string(), "Cursor 'abc' expired or is no longer valid");
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(Error::http_status(500, "").kind(), ErrorKind::Transport);
        assert_eq!(Error::decode("bad").kind(), ErrorKind::Transport);
        assert_eq!(Error::auth(401, "nope").kind(), ErrorKind::Auth);
        assert_eq!(
            Error::RateLimited {
                retry_after_seconds: 5
            }
            .kind(),
            ErrorKind::RateLimit
        );
        assert_eq!(Error::cursor_expired("c").kind(), ErrorKind::CursorExpired);
        assert_eq!(Error::validation("x").kind(), ErrorKind::Validation);
        assert_eq!(Error::missing_field("app").kind(), ErrorKind::Config);
    }

    #[test]
    fn test_is_cursor_expired() {
        assert!(Error::cursor_expired("c").is_cursor_expired());
        assert!(!Error::validation("c").is_cursor_expired());
    }
}
