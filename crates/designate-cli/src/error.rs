//! CLI error types with exit code handling
//!
//! Every library error is folded into one of the operator-facing kinds below.
//! The display text is `[CODE]: <kind>: <details>`.

use designate_core::CoreError;
use designate_engine::{EngineError, TemplateError};
use designate_repo::RepoError;
use designate_spinnaker::SpinnakerError;
use miette::Diagnostic;
use thiserror::Error;

use crate::exit_codes;

#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    #[error("[ERR_GITHUB]: GitHub Error: {details}")]
    #[diagnostic(code(designate::github))]
    Github { details: String },

    #[error("[ERR_SYNTAX_ENTRY]: Entry parsing error: {details}")]
    #[diagnostic(code(designate::entry))]
    EntryParsing { details: String },

    #[error("[ERR_SYNTAX_TEMPLATE]: Template rendering error: {details}")]
    #[diagnostic(code(designate::template))]
    TemplateRendering {
        details: String,
        #[diagnostic_source]
        diagnostic: TemplateError,
    },

    #[error("[ERR_SPINNAKER]: Spinnaker Error: {details}")]
    #[diagnostic(code(designate::spinnaker))]
    Spinnaker { details: String },

    #[error("[ERR_APP_NOT_FOUND]: App entry not found: {details}")]
    #[diagnostic(code(designate::app_not_found))]
    AppNotFound { details: String },

    #[error("[ERR_TPL_NOT_FOUND]: Template not found: {details}")]
    #[diagnostic(code(designate::template_not_found))]
    TemplateNotFound { details: String },

    #[error("[ERR_ENV_NOT_FOUND]: Matching environment not found: {details}")]
    #[diagnostic(code(designate::environment_not_found))]
    EnvironmentNotFound { details: String },

    /// Internal error (runtime, unexpected failure)
    #[error("[ERR_UNKNOWN]: Unknown error: {message}")]
    #[diagnostic(code(designate::internal))]
    Internal { message: String },
}

impl CliError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            CliError::Github { .. } => "ERR_GITHUB",
            CliError::EntryParsing { .. } => "ERR_SYNTAX_ENTRY",
            CliError::TemplateRendering { .. } => "ERR_SYNTAX_TEMPLATE",
            CliError::Spinnaker { .. } => "ERR_SPINNAKER",
            CliError::AppNotFound { .. } => "ERR_APP_NOT_FOUND",
            CliError::TemplateNotFound { .. } => "ERR_TPL_NOT_FOUND",
            CliError::EnvironmentNotFound { .. } => "ERR_ENV_NOT_FOUND",
            CliError::Internal { .. } => "ERR_UNKNOWN",
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Github { .. } => exit_codes::GITHUB_ERROR,
            CliError::EntryParsing { .. } => exit_codes::ENTRY_ERROR,
            CliError::TemplateRendering { .. } => exit_codes::TEMPLATE_ERROR,
            CliError::Spinnaker { .. } => exit_codes::SPINNAKER_ERROR,
            CliError::AppNotFound { .. } => exit_codes::APP_NOT_FOUND,
            CliError::TemplateNotFound { .. } => exit_codes::TEMPLATE_NOT_FOUND,
            CliError::EnvironmentNotFound { .. } => exit_codes::ENVIRONMENT_NOT_FOUND,
            CliError::Internal { .. } => exit_codes::ERROR,
        }
    }

    pub fn github(details: impl Into<String>) -> Self {
        Self::Github {
            details: details.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        let details = err.details();
        match err {
            CoreError::EntryParsing { .. } => CliError::EntryParsing { details },
            CoreError::AppNotFound { .. } => CliError::AppNotFound { details },
            CoreError::TemplateNotFound { .. } => CliError::TemplateNotFound { details },
            CoreError::EnvironmentNotFound { .. } => CliError::EnvironmentNotFound { details },
        }
    }
}

impl From<EngineError> for CliError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Core(core) => core.into(),
            EngineError::Template(template) => CliError::TemplateRendering {
                details: template.message.clone(),
                diagnostic: template,
            },
        }
    }
}

impl From<RepoError> for CliError {
    fn from(err: RepoError) -> Self {
        CliError::github(err.to_string())
    }
}

impl From<SpinnakerError> for CliError {
    fn from(err: SpinnakerError) -> Self {
        CliError::Spinnaker {
            details: err.to_string(),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::internal(err.to_string())
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
