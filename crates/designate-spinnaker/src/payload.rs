//! Trigger request body

use base64::Engine as _;
use designate_core::DeploymentArgs;
use serde::Serialize;

/// Artifact type understood by Spinnaker for inline content
pub const EMBEDDED_BASE64: &str = "embedded/base64";

/// Artifact name the deployment pipelines look up
pub const VALUES_ARTIFACT_NAME: &str = "registry-values";

/// An artifact passed along with the trigger
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
    #[serde(rename = "type")]
    pub artifact_type: String,

    pub reference: String,

    pub name: String,
}

impl Artifact {
    /// The rendered values document, base64 encoded
    pub fn values(values: &str) -> Self {
        Self {
            artifact_type: EMBEDDED_BASE64.to_string(),
            reference: base64::engine::general_purpose::STANDARD.encode(values.as_bytes()),
            name: VALUES_ARTIFACT_NAME.to_string(),
        }
    }
}

/// Body of a pipeline or webhook trigger
#[derive(Debug, Clone, Serialize)]
pub struct TriggerPayload<'a> {
    pub artifacts: Vec<Artifact>,
    pub parameters: &'a DeploymentArgs,
}

impl<'a> TriggerPayload<'a> {
    pub fn new(values: &str, parameters: &'a DeploymentArgs) -> Self {
        Self {
            artifacts: vec![Artifact::values(values)],
            parameters,
        }
    }
}
