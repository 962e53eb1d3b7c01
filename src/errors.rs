/*!
 * Error types for the lingotutor application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 *
 * The split mirrors how failures are handled:
 * - `ProviderError`: a single HTTP exchange with an LLM backend went wrong
 * - `TutorError`: one of the four tutor operations could not produce a result
 * - `AppError`: anything surfaced to the command line
 */

use thiserror::Error;

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails (timeouts, broken bodies)
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

impl ProviderError {
    /// Classify an unsuccessful HTTP status into a provider error
    pub fn from_status(status_code: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status_code {
            401 | 403 => Self::AuthenticationError(message),
            429 => Self::RateLimitExceeded(message),
            _ => Self::ApiError { status_code, message },
        }
    }

    /// Classify a transport-level reqwest failure
    pub fn from_transport(error: reqwest::Error) -> Self {
        if error.is_connect() {
            Self::ConnectionError(error.to_string())
        } else {
            Self::RequestFailed(error.to_string())
        }
    }

    /// Whether the failure is transient and the request may be sent again.
    ///
    /// Network-class failures, 429 and 5xx responses are retryable. Client
    /// errors, authentication problems and unparseable payloads are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RequestFailed(_) | Self::ConnectionError(_) | Self::RateLimitExceeded(_) => true,
            Self::ApiError { status_code, .. } => *status_code >= 500,
            Self::ParseError(_) | Self::AuthenticationError(_) => false,
        }
    }
}

/// Errors produced by the tutor operations (generate, analyze, lookup, evaluate)
#[derive(Error, Debug)]
pub enum TutorError {
    /// Missing credential or otherwise unusable configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Error from the provider API, after retries were exhausted
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The model answered but the payload could not be understood
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// The caller passed something the operation cannot work with
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Errors from the flashcard review state machine
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ReviewError {
    /// A review needs at least one card
    #[error("Cannot start a review without words")]
    EmptyDeck,

    /// Grading or flipping outside of a running review
    #[error("No review in progress")]
    NotInProgress,
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file or database operation
    #[error("Storage error: {0}")]
    Storage(String),

    /// Error from a tutor operation
    #[error("Tutor error: {0}")]
    Tutor(#[from] TutorError),

    /// A session id or prefix did not resolve
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// Error from the review state machine
    #[error("Review error: {0}")]
    Review(#[from] ReviewError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<ProviderError> for AppError {
    fn from(error: ProviderError) -> Self {
        Self::Tutor(TutorError::Provider(error))
    }
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::Storage(error.to_string())
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(error: rusqlite::Error) -> Self {
        Self::Storage(error.to_string())
    }
}
