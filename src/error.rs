//! Unified error handling for the crossforge crate
//!
//! This module provides a unified error type that consolidates all domain-specific
//! errors into a single `Error` enum, while maintaining the ability to use
//! domain-specific errors when needed.
//!
//! # Architecture
//!
//! - [`CrossforgeErrorTrait`] - Common interface implemented by all error types
//! - [`ErrorCategory`] - Classification of errors for handling strategies
//! - [`Error`] - Unified error enum wrapping all domain-specific errors
//!
//! # Categories
//!
//! | Category | Meaning | Handling |
//! |----------|---------|----------|
//! | `Network` | Platform API or network failure inside a job | logged, next tick tries again |
//! | `Storage` | Storage collaborator failure | propagated to the caller |
//! | `Config` | Missing credentials or invalid settings | fails only the dependent task |
//! | `Llm` | Language model unavailable or malformed reply | logged by the insight job |
//! | `Scheduler` | Task registration / lookup errors | returned to the caller |

use std::io;
use thiserror::Error;

pub use crate::platforms::error::ClientError;
pub use crate::scheduler::error::SchedulerError;

/// Common trait for all crossforge error types
pub trait CrossforgeErrorTrait: std::error::Error {
    /// Check if this error is recoverable (a later attempt may succeed)
    fn is_recoverable(&self) -> bool;

    /// Get the error category for handling strategies
    fn category(&self) -> ErrorCategory;
}

/// Classification of errors for handling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Network-related errors (HTTP, timeout, rate limit)
    Network,
    /// Storage and I/O errors
    Storage,
    /// LLM processing errors
    Llm,
    /// Configuration and validation errors
    Config,
    /// Scheduler errors
    Scheduler,
    /// Other/unknown errors
    Other,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Storage => "storage",
            Self::Llm => "llm",
            Self::Config => "config",
            Self::Scheduler => "scheduler",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unified error type for the crossforge crate
#[derive(Error, Debug)]
pub enum Error {
    /// Platform API client errors
    #[error("Platform client error: {0}")]
    Client(#[from] ClientError),

    /// Scheduler errors
    #[error("Scheduler error: {0}")]
    Scheduler(#[from] SchedulerError),

    /// Database errors
    #[error("Database error: {0}")]
    Database(#[source] rusqlite::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP client errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Language model errors
    #[error("LLM error: {0}")]
    Llm(String),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),

    /// Invalid caller input (unknown platform, bad range, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Generic error with context
    #[error("{context}")]
    Other {
        context: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl CrossforgeErrorTrait for Error {
    fn is_recoverable(&self) -> bool {
        match self {
            Self::Client(e) => e.is_recoverable(),
            Self::Scheduler(e) => e.is_recoverable(),
            Self::Database(_) => false,
            Self::Io(_) => true,
            Self::Json(_) => false,
            Self::Http(_) => true,
            Self::Llm(_) => true,
            Self::Config(_) => false,
            Self::InvalidInput(_) => false,
            Self::Other { .. } => false,
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Client(e) => e.category(),
            Self::Http(_) => ErrorCategory::Network,
            Self::Scheduler(_) => ErrorCategory::Scheduler,
            Self::Database(_) | Self::Io(_) => ErrorCategory::Storage,
            Self::Json(_) => ErrorCategory::Other,
            Self::Llm(_) => ErrorCategory::Llm,
            Self::Config(_) => ErrorCategory::Config,
            Self::InvalidInput(_) | Self::Other { .. } => ErrorCategory::Other,
        }
    }
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create an LLM error
    pub fn llm(msg: impl Into<String>) -> Self {
        Self::Llm(msg.into())
    }

    /// Create a generic error with context
    pub fn other(context: impl Into<String>) -> Self {
        Self::Other {
            context: context.into(),
            source: None,
        }
    }

    /// Create a generic error with context and source
    pub fn with_source(
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Other {
            context: context.into(),
            source: Some(Box::new(source)),
        }
    }
}

// Conversion from rusqlite::Error
impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Self::Database(err)
    }
}

// Conversion from anyhow::Error
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other {
            context: format!("{err:#}"),
            source: None,
        }
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Platform;

    #[test]
    fn test_error_category() {
        let client_err = Error::Client(ClientError::status(Platform::X, "/2/users/1", 503));
        assert_eq!(client_err.category(), ErrorCategory::Network);

        let db_err: Error = rusqlite::Error::InvalidQuery.into();
        assert_eq!(db_err.category(), ErrorCategory::Storage);
    }

    #[test]
    fn test_missing_credentials_is_config() {
        let err: Error = ClientError::missing_credentials(Platform::YouTube, "api_key").into();
        assert_eq!(err.category(), ErrorCategory::Config);
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_is_recoverable() {
        let transient: Error = ClientError::status(Platform::LinkedIn, "/rest/posts", 502).into();
        assert!(transient.is_recoverable());

        let config = Error::config("Invalid API key");
        assert!(!config.is_recoverable());
    }

    #[test]
    fn test_error_conversion() {
        let scheduler_err = SchedulerError::task_not_found("fetch-x");
        let unified: Error = scheduler_err.into();
        assert!(matches!(unified, Error::Scheduler(_)));
        assert_eq!(unified.category(), ErrorCategory::Scheduler);
    }

    #[test]
    fn test_other_error() {
        let err = Error::other("Something went wrong");
        assert_eq!(err.category(), ErrorCategory::Other);
        assert_eq!(err.to_string(), "Something went wrong");
    }

    #[test]
    fn test_category_display() {
        assert_eq!(ErrorCategory::Network.to_string(), "network");
        assert_eq!(ErrorCategory::Llm.to_string(), "llm");
    }
}
