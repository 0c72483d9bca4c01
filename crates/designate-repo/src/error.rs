//! Error types for registry source operations

use thiserror::Error;

/// Registry source errors.
///
/// All of these surface to the operator as a GitHub error.
#[derive(Debug, Error)]
pub enum RepoError {
    // ============ Configuration Errors ============
    #[error("Invalid repository name: {name} (expected owner/repo)")]
    InvalidRepository { name: String },

    #[error("Invalid API URL: {url} - {reason}")]
    InvalidApiUrl { url: String, reason: String },

    // ============ Network Errors ============
    #[error("HTTP error: {status} - {message}")]
    HttpError { status: u16, message: String },

    #[error("Network error: {message}")]
    NetworkError { message: String },

    #[error("Request timeout after {seconds}s")]
    Timeout { seconds: u64 },

    // ============ Authentication Errors ============
    #[error("Authentication failed: {message}")]
    AuthFailed { message: String },

    #[error("Invalid GitHub App private key: {message}")]
    InvalidPrivateKey { message: String },

    // ============ Content Errors ============
    #[error("Unexpected response from {url}: {message}")]
    InvalidResponse { url: String, message: String },

    #[error("Cannot decode {path}: {message}")]
    Decode { path: String, message: String },

    // ============ IO Errors ============
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot walk {path}: {message}")]
    Walk { path: String, message: String },
}

/// Result type for registry source operations
pub type Result<T> = std::result::Result<T, RepoError>;

/// Timeout applied to every GitHub API request
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

impl From<reqwest::Error> for RepoError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            RepoError::Timeout {
                seconds: REQUEST_TIMEOUT_SECS,
            }
        } else if e.is_connect() {
            RepoError::NetworkError {
                message: format!("Connection failed: {}", e),
            }
        } else if let Some(status) = e.status() {
            RepoError::HttpError {
                status: status.as_u16(),
                message: e.to_string(),
            }
        } else {
            RepoError::NetworkError {
                message: e.to_string(),
            }
        }
    }
}

impl From<walkdir::Error> for RepoError {
    fn from(e: walkdir::Error) -> Self {
        RepoError::Walk {
            path: e
                .path()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            message: e.to_string(),
        }
    }
}

impl From<jsonwebtoken::errors::Error> for RepoError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        RepoError::InvalidPrivateKey {
            message: e.to_string(),
        }
    }
}
