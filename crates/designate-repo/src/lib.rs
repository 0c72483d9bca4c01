//! Designate Registry Sources
//!
//! This crate fetches the raw documents of a registry:
//!
//! - **GitHub**: walks a branch through the contents API
//! - **Local**: walks a checked out registry directory
//!
//! and provides the credentials used against GitHub:
//!
//! - **Static token**: personal access or CI token
//! - **GitHub App**: signed JWT exchanged for an installation token
//!
//! ## Example
//!
//! ```rust,no_run
//! use designate_repo::{GithubClient, GithubSource, RegistrySource, StaticToken};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let source = GithubSource::new(
//!     GithubClient::public()?,
//!     "acme/registry".parse()?,
//!     "main",
//!     Box::new(StaticToken::new("ghp_...")),
//! );
//! let documents = source.documents().await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod github;
pub mod credentials;
pub mod source;

// Re-exports for convenience
pub use error::{RepoError, Result};
pub use github::{ContentItem, ContentType, GithubClient, RepoName, DEFAULT_API_URL};
pub use credentials::{AppClaims, CredentialProvider, GithubApp, StaticToken};
pub use source::{GithubSource, LocalSource, RegistrySource, is_registry_file};
