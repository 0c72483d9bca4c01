//! Template rendering context

use serde::{Deserialize, Serialize};

use crate::deployment::DeploymentArgs;
use crate::entry::{Application, Environment, Tags};

/// Contexts available to a values template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderContext {
    /// The app being deployed
    pub app: AppInfo,

    /// Deployment arguments
    pub deployment: DeploymentArgs,

    /// The resolved environment
    pub environment: EnvironmentInfo,
}

/// App information for templates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppInfo {
    pub name: String,
    pub tags: Tags,
}

impl From<&Application> for AppInfo {
    fn from(app: &Application) -> Self {
        Self {
            name: app.name.clone(),
            tags: app.tags.clone(),
        }
    }
}

/// Environment information for templates.
///
/// Has no endpoint field: the Spinnaker URL never reaches rendered values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentInfo {
    pub name: String,
    pub environment: String,
    pub tags: Tags,
    pub domain: String,
}

impl From<&Environment> for EnvironmentInfo {
    fn from(environment: &Environment) -> Self {
        Self {
            name: environment.name.clone(),
            environment: environment.environment_name.clone(),
            tags: environment.tags.clone(),
            domain: environment.domain.clone(),
        }
    }
}

impl RenderContext {
    pub fn new(app: &Application, args: &DeploymentArgs, environment: &Environment) -> Self {
        Self {
            app: AppInfo::from(app),
            deployment: args.clone(),
            environment: EnvironmentInfo::from(environment),
        }
    }
}
