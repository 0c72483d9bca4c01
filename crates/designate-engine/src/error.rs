//! Engine error types

use designate_core::CoreError;
use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Main engine error type
#[derive(Error, Debug)]
pub enum EngineError {
    /// Values template could not be expanded
    #[error("Template rendering error: {0}")]
    Template(#[from] TemplateError),

    /// Resolution failed before rendering
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Error kind for categorizing template errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum TemplateErrorKind {
    UndefinedVariable,
    UnknownFilter,
    UnknownFunction,
    SyntaxError,
    TypeError,
    InvalidOperation,
    Other,
}

impl TemplateErrorKind {
    fn from_minijinja(kind: minijinja::ErrorKind) -> Self {
        match kind {
            minijinja::ErrorKind::UndefinedError => Self::UndefinedVariable,
            minijinja::ErrorKind::UnknownFilter => Self::UnknownFilter,
            minijinja::ErrorKind::UnknownFunction => Self::UnknownFunction,
            minijinja::ErrorKind::SyntaxError => Self::SyntaxError,
            minijinja::ErrorKind::InvalidOperation => Self::InvalidOperation,
            minijinja::ErrorKind::NonPrimitive | minijinja::ErrorKind::NonKey => Self::TypeError,
            _ => Self::Other,
        }
    }
}

/// Template error with source information
#[derive(Error, Debug, Diagnostic, Clone)]
#[error("{message}")]
#[diagnostic(code(designate::template::render))]
pub struct TemplateError {
    /// Engine message
    pub message: String,

    pub kind: TemplateErrorKind,

    /// Template source code
    #[source_code]
    pub src: NamedSource<String>,

    #[label("error occurred here")]
    pub span: Option<SourceSpan>,

    #[help]
    pub suggestion: Option<String>,
}

impl TemplateError {
    /// Create a template error from a MiniJinja error
    pub fn from_minijinja(err: minijinja::Error, template_name: &str, template_source: &str) -> Self {
        let kind = TemplateErrorKind::from_minijinja(err.kind());
        let span = err
            .line()
            .and_then(|line| calculate_span(template_source, line));

        Self {
            message: err.to_string(),
            kind,
            src: NamedSource::new(template_name, template_source.to_string()),
            span,
            suggestion: suggestion_for(kind),
        }
    }

    pub fn kind(&self) -> TemplateErrorKind {
        self.kind
    }
}

fn suggestion_for(kind: TemplateErrorKind) -> Option<String> {
    match kind {
        TemplateErrorKind::UndefinedVariable => Some(
            "Templates can use `app` (name, tags), `deployment` (version, environment, pipeline, chart) \
             and `environment` (name, environment, tags, domain)"
                .to_string(),
        ),
        TemplateErrorKind::UnknownFilter => Some(format!(
            "Available custom filters: {}",
            crate::filters::AVAILABLE_FILTERS.join(", ")
        )),
        TemplateErrorKind::SyntaxError => {
            Some("Check that every `{% for %}` and `{% if %}` block is closed".to_string())
        }
        _ => None,
    }
}

/// Span covering the whole of 1-based line `line_num`
fn calculate_span(source: &str, line_num: usize) -> Option<SourceSpan> {
    let mut offset = 0;

    for (index, line) in source.lines().enumerate() {
        if index + 1 == line_num {
            return Some(SourceSpan::new(offset.into(), line.len()));
        }
        offset += line.len() + 1;
    }

    None
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
