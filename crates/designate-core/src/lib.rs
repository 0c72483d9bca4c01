//! Designate Core - registry entries and deployment resolution
//!
//! This crate provides the foundational types used throughout Designate:
//! - `Entry`: A classified registry document (app, template or environment)
//! - `Registry`: Entries partitioned by kind, in discovery order
//! - `Deployment`: A resolved app/environment pair with its rendered values
//! - `RenderContext`: What a values template can see

pub mod entry;
pub mod registry;
pub mod deployment;
pub mod context;
pub mod error;

pub use entry::{Application, Entry, EntryKind, Environment, Tags, Template, DISCRIMINATOR};
pub use registry::{RawDocument, Registry};
pub use deployment::{Deployment, DeploymentArgs, resolve_environment, resolve_template};
pub use context::{AppInfo, EnvironmentInfo, RenderContext};
pub use error::{CoreError, Result};
