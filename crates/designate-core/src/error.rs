//! Core error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A registry document could not be classified into an entry
    #[error("Entry parsing error: {path}: {message}")]
    EntryParsing { path: String, message: String },

    #[error("App entry not found: {name}")]
    AppNotFound { name: String },

    #[error("Template not found: {name}")]
    TemplateNotFound { name: String },

    /// `details` is the requested environment followed by the app's tag set
    #[error("Matching environment not found: {details}")]
    EnvironmentNotFound { details: String },
}

impl CoreError {
    pub fn entry_parsing(path: impl Into<String>, message: impl ToString) -> Self {
        Self::EntryParsing {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// The operator-facing detail string, without the kind prefix
    pub fn details(&self) -> String {
        match self {
            Self::EntryParsing { path, message } => format!("{}: {}", path, message),
            Self::AppNotFound { name } | Self::TemplateNotFound { name } => name.clone(),
            Self::EnvironmentNotFound { details } => details.clone(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
