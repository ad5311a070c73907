//! Error types for logscope
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for logscope
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Failed to parse XML: {message}")]
    XmlParse { message: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Remote Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status} ({kind}): {message}")]
    Api {
        status: u16,
        kind: String,
        message: String,
    },

    #[error("Fetch from '{source_id}' failed: {message}")]
    Adapter { source_id: String, message: String },

    // ============================================================================
    // Pagination Errors
    // ============================================================================
    #[error("No next page")]
    NoNextPage,

    // ============================================================================
    // Parsing Errors
    // ============================================================================
    #[error("Could not parse '{input}': {message}")]
    Parse { input: String, message: String },

    // ============================================================================
    // Live Tail Errors
    // ============================================================================
    #[error("Live tail failed: {message}")]
    Stream { message: String },

    // ============================================================================
    // Runtime Errors
    // ============================================================================
    #[error("Task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an adapter error for a given source
    pub fn adapter(source_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Adapter {
            source_id: source_id.into(),
            message: message.into(),
        }
    }

    /// Create an API error from a non-success response
    pub fn api(status: u16, kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse(input: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            input: input.into(),
            message: message.into(),
        }
    }

    /// Create an XML parse error
    pub fn xml(message: impl Into<String>) -> Self {
        Self::XmlParse {
            message: message.into(),
        }
    }

    /// Create a live tail stream error
    pub fn stream(message: impl Into<String>) -> Self {
        Self::Stream {
            message: message.into(),
        }
    }

    /// Check if this error came from the remote side (network or API)
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Error::Http(_) | Error::Api { .. } | Error::Adapter { .. }
        )
    }
}

/// Result type alias for logscope
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::parse("2hX", "trailing characters");
        assert_eq!(err.to_string(), "Could not parse '2hX': trailing characters");

        let err = Error::api(400, "ResourceNotFoundException", "group missing");
        assert_eq!(
            err.to_string(),
            "API error 400 (ResourceNotFoundException): group missing"
        );

        assert_eq!(Error::NoNextPage.to_string(), "No next page");

        let err = Error::xml("missing <ListAllMyBucketsResult> element");
        assert_eq!(
            err.to_string(),
            "Failed to parse XML: missing <ListAllMyBucketsResult> element"
        );
    }

    #[test]
    fn test_is_remote() {
        assert!(Error::api(500, "InternalFailure", "").is_remote());
        assert!(Error::adapter("group-a", "boom").is_remote());

        assert!(!Error::NoNextPage.is_remote());
        assert!(!Error::parse("x", "y").is_remote());
        assert!(!Error::stream("closed").is_remote());
    }

    #[test]
    fn test_result_context() {
        let result: Result<()> = Err(Error::config("inner"));
        let with_context = result.context("outer");
        assert!(with_context
            .unwrap_err()
            .to_string()
            .contains("outer: Configuration error: inner"));
    }

    #[test]
    fn test_io_error_with_lazy_context() {
        let result: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "no such file",
        ));
        let err = result
            .with_context(|| format!("Reading '{}'", "logscope.yaml"))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Reading 'logscope.yaml': IO error: no such file"
        );
    }
}
