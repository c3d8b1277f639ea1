//! Error types for DHIS2 API access.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while configuring or talking to a DHIS2 server.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    /// Required configuration keys are absent or empty.
    #[error("configuration does not include required keys: {}", missing.join(", "))]
    MissingKeys {
        /// Names of the missing keys, in declaration order.
        missing: Vec<&'static str>,
    },

    /// Configuration file could not be read.
    #[error("failed to read configuration {path}: {source}")]
    ConfigRead {
        /// Configuration file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not valid JSON of the expected shape.
    #[error("invalid configuration: {0}")]
    ConfigParse(String),

    /// The configured server does not form a valid URL.
    #[error("invalid server url '{url}': {message}")]
    InvalidUrl {
        /// The URL that failed to parse.
        url: String,
        /// Parser message.
        message: String,
    },

    /// The request could not be sent or the response could not be read.
    #[error("request to {endpoint} failed: {message}")]
    Transport {
        /// Endpoint relative to the server.
        endpoint: String,
        /// Transport error message.
        message: String,
    },

    /// The server answered with a non-success status.
    #[error("{endpoint} returned HTTP {status}: {body}")]
    Http {
        /// Endpoint relative to the server.
        endpoint: String,
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// The response body does not match the expected schema.
    #[error("unexpected response from {endpoint}: {message}")]
    MalformedResponse {
        /// Endpoint relative to the server.
        endpoint: String,
        /// Deserialization message.
        message: String,
    },
}

impl ApiError {
    /// Returns true for errors detected before any request is sent.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::MissingKeys { .. }
                | Self::ConfigRead { .. }
                | Self::ConfigParse(_)
                | Self::InvalidUrl { .. }
        )
    }

    pub(crate) fn transport(endpoint: &str, err: &reqwest::Error) -> Self {
        Self::Transport {
            endpoint: endpoint.to_string(),
            message: err.to_string(),
        }
    }

    pub(crate) fn malformed(endpoint: &str, err: &serde_json::Error) -> Self {
        Self::MalformedResponse {
            endpoint: endpoint.to_string(),
            message: err.to_string(),
        }
    }
}

/// Result type alias for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_keys_message() {
        let err = ApiError::MissingKeys {
            missing: vec!["server", "password"],
        };
        assert_eq!(
            err.to_string(),
            "configuration does not include required keys: server, password"
        );
        assert!(err.is_configuration());
    }

    #[test]
    fn test_http_error_is_not_configuration() {
        let err = ApiError::Http {
            endpoint: "api/metadata".to_string(),
            status: 409,
            body: "{}".to_string(),
        };
        assert!(err.to_string().contains("HTTP 409"));
        assert!(!err.is_configuration());
    }
}
