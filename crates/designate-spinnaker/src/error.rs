//! Error types for Spinnaker triggers

use thiserror::Error;

/// Trigger failures. None of them is retried.
#[derive(Debug, Error)]
pub enum SpinnakerError {
    #[error("HTTP error: {status} from {url}")]
    Http { status: u16, url: String },

    #[error("Request to {url} timed out after {seconds}s")]
    Timeout { url: String, seconds: u64 },

    #[error("Network error calling {url}: {message}")]
    Network { url: String, message: String },

    #[error("Invalid trigger mode: {value} (expected pipeline or webhook)")]
    InvalidMode { value: String },

    #[error("Cannot build HTTP client: {message}")]
    Client { message: String },
}

/// Result type for trigger operations
pub type Result<T> = std::result::Result<T, SpinnakerError>;
