//! Error types for Fastly operations.
//!
//! This module provides the error type shared by every Fastly service crate,
//! including the sentinels raised before any request is sent when an
//! identifying input is missing.

use std::fmt;
use thiserror::Error;

/// Identifying inputs that must be set before a request can be built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequiredField {
    /// Web application firewall id
    WafId,
    /// WAF version number
    WafVersionNumber,
    /// WAF version resource id
    WafVersionId,
    /// Resource id (TLS subscriptions)
    Id,
    /// At least one TLS domain
    TlsDomain,
}

impl RequiredField {
    /// Returns the input name as shown in error messages.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::WafId => "WAF ID",
            Self::WafVersionNumber => "WAF version number",
            Self::WafVersionId => "WAF version ID",
            Self::Id => "ID",
            Self::TlsDomain => "TLS domain",
        }
    }
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Main error type for Fastly operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A required identifying input was empty
    #[error("Missing required field: {0}")]
    MissingRequiredField(RequiredField),

    /// Fastly API is unavailable
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Response body could not be decoded
    #[error("Failed to decode response: {0}")]
    DecodeError(String),

    /// Decoded resource was not of the requested kind
    #[error("Unexpected response type: expected `{expected}`, got `{found}`")]
    UnexpectedResponseType {
        /// Resource type that was requested
        expected: &'static str,
        /// Resource type found in the response
        found: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Operation timed out
    #[error("Timeout waiting for service: {0}")]
    Timeout(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Bad request with details
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Conflict error
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Invalid endpoint
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

/// Specialized result type for Fastly operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns the error code for this error type.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingRequiredField(_) => "MISSING_REQUIRED_FIELD",
            Self::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            Self::DecodeError(_) => "DECODE_ERROR",
            Self::UnexpectedResponseType { .. } => "UNEXPECTED_RESPONSE_TYPE",
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::HttpError(_) => "HTTP_ERROR",
            Self::Timeout(_) => "TIMEOUT",
            Self::NotFound(_) => "NOT_FOUND",
            Self::InvalidRequest(_) => "INVALID_REQUEST",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::InvalidEndpoint(_) => "INVALID_ENDPOINT",
        }
    }

    /// Returns true if this error should be logged as a serious error.
    #[must_use]
    pub const fn should_log(&self) -> bool {
        matches!(
            self,
            Self::ConfigError(_)
                | Self::DecodeError(_)
                | Self::UnexpectedResponseType { .. }
                | Self::ServiceUnavailable(_)
        )
    }

    /// Returns true if a request failing with this error may be sent again.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Timeout(_) | Self::ServiceUnavailable(_) | Self::HttpError(_)
        )
    }
}

// Conversions from external error types
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::ServiceUnavailable(err.to_string())
        } else if err.is_decode() {
            Self::DecodeError(err.to_string())
        } else {
            Self::HttpError(err.to_string())
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidEndpoint(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::DecodeError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::ValidationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            Error::MissingRequiredField(RequiredField::WafId).error_code(),
            "MISSING_REQUIRED_FIELD"
        );
        assert_eq!(
            Error::ServiceUnavailable("test".to_string()).error_code(),
            "SERVICE_UNAVAILABLE"
        );
        assert_eq!(
            Error::DecodeError("test".to_string()).error_code(),
            "DECODE_ERROR"
        );
        assert_eq!(
            Error::UnexpectedResponseType {
                expected: "tls_domain",
                found: "tls_subscription".to_string()
            }
            .error_code(),
            "UNEXPECTED_RESPONSE_TYPE"
        );
        assert_eq!(
            Error::ConfigError("test".to_string()).error_code(),
            "CONFIG_ERROR"
        );
        assert_eq!(
            Error::HttpError("test".to_string()).error_code(),
            "HTTP_ERROR"
        );
        assert_eq!(Error::Timeout("test".to_string()).error_code(), "TIMEOUT");
        assert_eq!(
            Error::NotFound("test".to_string()).error_code(),
            "NOT_FOUND"
        );
        assert_eq!(
            Error::InvalidRequest("test".to_string()).error_code(),
            "INVALID_REQUEST"
        );
        assert_eq!(
            Error::BadRequest("test".to_string()).error_code(),
            "BAD_REQUEST"
        );
        assert_eq!(
            Error::ValidationError("test".to_string()).error_code(),
            "VALIDATION_ERROR"
        );
        assert_eq!(Error::Conflict("test".to_string()).error_code(), "CONFLICT");
        assert_eq!(
            Error::InvalidEndpoint("test".to_string()).error_code(),
            "INVALID_ENDPOINT"
        );
    }

    #[test]
    fn test_error_display() {
        let err = Error::MissingRequiredField(RequiredField::WafVersionNumber);
        assert_eq!(
            err.to_string(),
            "Missing required field: WAF version number"
        );

        let err = Error::UnexpectedResponseType {
            expected: "waf_firewall_version",
            found: "waf_firewall".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Unexpected response type: expected `waf_firewall_version`, got `waf_firewall`"
        );
    }

    #[test]
    fn test_missing_field_sentinels_are_distinct() {
        let waf = Error::MissingRequiredField(RequiredField::WafId);
        let number = Error::MissingRequiredField(RequiredField::WafVersionNumber);
        let id = Error::MissingRequiredField(RequiredField::Id);

        assert_ne!(waf, number);
        assert_ne!(waf, id);
        assert_ne!(number, id);
        assert_eq!(waf, Error::MissingRequiredField(RequiredField::WafId));
    }

    #[test]
    fn test_should_log() {
        assert!(Error::ConfigError("test".to_string()).should_log());
        assert!(Error::DecodeError("test".to_string()).should_log());
        assert!(Error::ServiceUnavailable("test".to_string()).should_log());

        assert!(!Error::NotFound("test".to_string()).should_log());
        assert!(!Error::MissingRequiredField(RequiredField::Id).should_log());
    }

    #[test]
    fn test_is_retryable() {
        assert!(Error::Timeout("slow".to_string()).is_retryable());
        assert!(Error::ServiceUnavailable("503".to_string()).is_retryable());
        assert!(!Error::NotFound("gone".to_string()).is_retryable());
        assert!(!Error::DecodeError("bad".to_string()).is_retryable());
    }

    #[test]
    fn test_from_url_parse_error() {
        let err = url::Url::parse("not a url").unwrap_err();
        let fastly_err: Error = err.into();
        assert!(matches!(fastly_err, Error::InvalidEndpoint(_)));
    }

    #[test]
    fn test_from_serde_json_error() {
        let err = serde_json::from_str::<serde_json::Value>("{invalid json}").unwrap_err();
        let fastly_err: Error = err.into();
        assert!(matches!(fastly_err, Error::DecodeError(_)));
    }

    #[test]
    fn test_error_partial_eq() {
        let err1 = Error::NotFound("test".to_string());
        let err2 = Error::NotFound("test".to_string());
        let err3 = Error::NotFound("other".to_string());

        assert_eq!(err1, err2);
        assert_ne!(err1, err3);
    }
}
