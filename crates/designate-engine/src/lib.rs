//! Designate Engine - values rendering and deployment resolution
//!
//! This crate provides a MiniJinja-based template engine with:
//! - Three read-only contexts: `app`, `deployment` and `environment`
//! - A handful of Helm-style filters (toyaml, b64encode, nindent, ...)
//! - Diagnostics pointing at the failing template line
//! - `designate`, which turns an app and its arguments into a `Deployment`

pub mod engine;
pub mod filters;
pub mod error;
pub mod designate;

pub use engine::Engine;
pub use error::{EngineError, Result, TemplateError, TemplateErrorKind};
pub use designate::designate;
pub use filters::AVAILABLE_FILTERS;
