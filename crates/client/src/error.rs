//! Error types for the SSRS client.

use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur during report server operations.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Authentication failed.
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// HTTP request error.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The server answered with a SOAP fault; the message is the extracted
    /// fault string.
    #[error("SOAP fault at {url}: {message}")]
    SoapFault { url: String, message: String },

    /// Non-success HTTP response that did not carry a SOAP fault.
    #[error("API error ({status}) at {url}: {message}")]
    ApiError {
        status: u16,
        url: String,
        message: String,
    },

    /// The response envelope was missing an expected element.
    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    /// A required report parameter had no value under strict-null checking.
    #[error("Parameter '{0}' cannot be undefined")]
    MissingParameter(String),

    /// A caller-supplied argument failed validation before any remote call.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Local filesystem error while reading or writing definitions.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// True for errors raised synchronously before any remote call.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingParameter(_) | Self::InvalidArgument(_) | Self::InvalidUrl(_)
        )
    }

    /// True when the server itself rejected the operation.
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::SoapFault { .. } | Self::ApiError { .. })
    }
}

/// A non-fatal failure collected during a multi-item operation.
///
/// The sync engine and reference resolver record individual item failures
/// as warnings and keep going; the caller decides whether the collected
/// list is fatal.
#[derive(Debug, Clone)]
pub struct Warning {
    /// The action that failed, e.g. `create folder /Reports/Demo/Sub`.
    pub action: String,
    /// The failure message.
    pub message: String,
}

impl Warning {
    pub fn new(action: impl Into<String>, error: &ClientError) -> Self {
        Self {
            action: action.into(),
            message: error.to_string(),
        }
    }
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.action, self.message)
    }
}
