//! Error types for the platform API clients

use thiserror::Error;

use crate::error::{CrossforgeErrorTrait, ErrorCategory};
use crate::models::Platform;

/// Errors that can occur while talking to a platform API
#[derive(Error, Debug)]
pub enum ClientError {
    /// Required credential is not configured
    #[error("{platform} is not configured: missing {field}")]
    MissingCredentials {
        platform: Platform,
        field: &'static str,
    },

    /// Non-success HTTP status
    #[error("{platform} request to {endpoint} failed with status {status}")]
    Status {
        platform: Platform,
        endpoint: String,
        status: u16,
    },

    /// Transport failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Response did not have the expected shape
    #[error("Invalid {platform} response: {message}")]
    InvalidResponse { platform: Platform, message: String },
}

impl ClientError {
    pub fn missing_credentials(platform: Platform, field: &'static str) -> Self {
        Self::MissingCredentials { platform, field }
    }

    pub fn status(platform: Platform, endpoint: impl Into<String>, status: u16) -> Self {
        Self::Status {
            platform,
            endpoint: endpoint.into(),
            status,
        }
    }

    pub fn invalid_response(platform: Platform, message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            platform,
            message: message.into(),
        }
    }

    /// HTTP status code, when the failure came from one
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

impl CrossforgeErrorTrait for ClientError {
    fn is_recoverable(&self) -> bool {
        match self {
            Self::MissingCredentials { .. } => false,
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::Http(e) => !e.is_builder(),
            Self::InvalidResponse { .. } => false,
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingCredentials { .. } => ErrorCategory::Config,
            Self::Status { status: 401 | 403, .. } => ErrorCategory::Config,
            Self::Status { .. } | Self::Http(_) => ErrorCategory::Network,
            Self::InvalidResponse { .. } => ErrorCategory::Other,
        }
    }
}
