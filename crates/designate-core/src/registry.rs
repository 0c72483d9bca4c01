//! Registry index: classified entries partitioned by kind

use crate::entry::{Application, Entry, Environment, Template};
use crate::error::{CoreError, Result};

/// A raw registry file as delivered by a registry source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    /// Path of the file inside the registry, used in error details
    pub path: String,

    /// YAML source text
    pub content: String,
}

impl RawDocument {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// Immutable view over every entry of a registry.
///
/// Each partition keeps the discovery order of its documents; resolution
/// scans them front to back, so that order is a priority.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    apps: Vec<Application>,
    templates: Vec<Template>,
    environments: Vec<Environment>,
}

impl Registry {
    /// Classify every document. The first failure aborts the load.
    pub fn load<I>(documents: I) -> Result<Self>
    where
        I: IntoIterator<Item = RawDocument>,
    {
        let mut entries = Vec::new();
        for document in documents {
            let entry = Entry::parse(&document.path, &document.content)?;
            tracing::debug!(path = %document.path, kind = %entry.kind(), name = entry.name(), "classified registry entry");
            entries.push(entry);
        }
        Ok(Self::from_entries(entries))
    }

    /// Partition already classified entries
    pub fn from_entries(entries: impl IntoIterator<Item = Entry>) -> Self {
        let mut registry = Self::default();
        for entry in entries {
            match entry {
                Entry::App(app) => registry.apps.push(app),
                Entry::Template(template) => registry.templates.push(template),
                Entry::Environment(environment) => registry.environments.push(environment),
            }
        }
        registry
    }

    pub fn apps(&self) -> &[Application] {
        &self.apps
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    pub fn environments(&self) -> &[Environment] {
        &self.environments
    }

    /// Total number of entries
    pub fn len(&self) -> usize {
        self.apps.len() + self.templates.len() + self.environments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// First app with the given name
    pub fn find_app(&self, name: &str) -> Result<&Application> {
        self.apps
            .iter()
            .find(|app| app.name == name)
            .ok_or_else(|| CoreError::AppNotFound {
                name: name.to_string(),
            })
    }
}
