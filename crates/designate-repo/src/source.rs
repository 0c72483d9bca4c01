//! Registry sources
//!
//! A source hands over every `.yaml`/`.yml` file of the registry, in a stable
//! order, as raw text. Parsing is left to the registry index.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use designate_core::RawDocument;
use walkdir::WalkDir;

use crate::credentials::CredentialProvider;
use crate::error::{RepoError, Result};
use crate::github::{ContentType, GithubClient, RepoName};

/// Where registry documents come from
#[async_trait]
pub trait RegistrySource: Send + Sync {
    /// Human readable location, for progress output
    fn describe(&self) -> String;

    /// Every registry document, in discovery order
    async fn documents(&self) -> Result<Vec<RawDocument>>;
}

/// Whether a file name is a registry document
pub fn is_registry_file(name: &str) -> bool {
    name.ends_with(".yaml") || name.ends_with(".yml")
}

/// A branch of a GitHub repository
pub struct GithubSource {
    client: GithubClient,
    repo: RepoName,
    branch: String,
    credentials: Box<dyn CredentialProvider>,
}

impl GithubSource {
    pub fn new(
        client: GithubClient,
        repo: RepoName,
        branch: impl Into<String>,
        credentials: Box<dyn CredentialProvider>,
    ) -> Self {
        Self {
            client,
            repo,
            branch: branch.into(),
            credentials,
        }
    }
}

#[async_trait]
impl RegistrySource for GithubSource {
    fn describe(&self) -> String {
        format!("{}@{}", self.repo, self.branch)
    }

    /// Breadth first: the root listing is consumed in order and each
    /// directory's listing is queued behind everything already pending.
    async fn documents(&self) -> Result<Vec<RawDocument>> {
        let token = self.credentials.token().await?;

        let mut pending: VecDeque<_> = self
            .client
            .list_directory(&self.repo, "", &self.branch, &token)
            .await?
            .into();
        let mut documents = Vec::new();

        while let Some(item) = pending.pop_front() {
            match item.content_type {
                ContentType::Dir => {
                    let listing = self
                        .client
                        .list_directory(&self.repo, &item.path, &self.branch, &token)
                        .await?;
                    pending.extend(listing);
                }
                ContentType::File if is_registry_file(&item.name) => {
                    let content = self
                        .client
                        .file_content(&self.repo, &item.path, &self.branch, &token)
                        .await?;
                    tracing::debug!(path = %item.path, "fetched registry document");
                    documents.push(RawDocument::new(item.path, content));
                }
                _ => {
                    tracing::trace!(path = %item.path, "skipping non-registry item");
                }
            }
        }

        Ok(documents)
    }
}

/// A local checkout of a registry repository
#[derive(Debug, Clone)]
pub struct LocalSource {
    root: PathBuf,
}

impl LocalSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl RegistrySource for LocalSource {
    fn describe(&self) -> String {
        self.root.display().to_string()
    }

    /// Same order as the GitHub walk: files sorted by name, shallower
    /// directories first.
    async fn documents(&self) -> Result<Vec<RawDocument>> {
        if !self.root.is_dir() {
            return Err(RepoError::Walk {
                path: self.root.display().to_string(),
                message: "not a directory".to_string(),
            });
        }

        let mut files = Vec::new();
        let walker = WalkDir::new(&self.root)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.file_name() != ".git");

        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_file() || !is_registry_file(&entry.file_name().to_string_lossy()) {
                continue;
            }
            files.push((entry.depth(), entry.into_path()));
        }
        files.sort_by_key(|(depth, _)| *depth);

        let mut documents = Vec::with_capacity(files.len());
        for (_, path) in files {
            let content = tokio::fs::read_to_string(&path).await?;
            let relative = path.strip_prefix(&self.root).unwrap_or(&path);
            let name = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            tracing::debug!(path = %name, "read registry document");
            documents.push(RawDocument::new(name, content));
        }

        Ok(documents)
    }
}
