//! Designate Spinnaker - deployment triggers
//!
//! Sends a rendered values document to Spinnaker as an `embedded/base64`
//! artifact, together with the deployment parameters, either through the
//! pipeline invocation endpoint or through a webhook trigger.

pub mod dispatcher;
pub mod payload;
pub mod error;

pub use dispatcher::{DispatchMode, Dispatcher, TRIGGER_TIMEOUT};
pub use payload::{Artifact, TriggerPayload};
pub use error::{Result, SpinnakerError};
