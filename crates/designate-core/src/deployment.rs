//! Deployment requests and entry resolution

use serde::{Deserialize, Serialize};

use crate::entry::{format_tags, Application, Environment, Template};
use crate::error::{CoreError, Result};

/// Arguments of one deployment, as given by the operator.
///
/// Serializes to the flat `{version, environment, pipeline, chart}` mapping
/// used both as the `deployment` template context and as trigger parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentArgs {
    pub version: String,

    /// Requested logical environment
    pub environment: String,

    /// Pipeline (or webhook) to trigger
    pub pipeline: String,

    pub chart: String,
}

impl DeploymentArgs {
    pub fn new(
        version: impl Into<String>,
        environment: impl Into<String>,
        pipeline: impl Into<String>,
        chart: impl Into<String>,
    ) -> Self {
        Self {
            version: version.into(),
            environment: environment.into(),
            pipeline: pipeline.into(),
            chart: chart.into(),
        }
    }
}

/// A resolved deployment, ready to be triggered
#[derive(Debug, Clone)]
pub struct Deployment<'a> {
    pub app: &'a Application,
    pub args: &'a DeploymentArgs,
    pub environment: &'a Environment,

    /// Rendered values document
    pub values: String,
}

impl<'a> Deployment<'a> {
    pub fn new(
        app: &'a Application,
        args: &'a DeploymentArgs,
        environment: &'a Environment,
        values: String,
    ) -> Self {
        Self {
            app,
            args,
            environment,
            values,
        }
    }
}

/// First environment, in the given order, whose tags match the app and whose
/// logical name is `requested`.
pub fn resolve_environment<'e>(
    app: &Application,
    requested: &str,
    environments: &'e [Environment],
) -> Result<&'e Environment> {
    environments
        .iter()
        .filter(|environment| environment.matches(app))
        .find(|environment| environment.environment_name == requested)
        .ok_or_else(|| CoreError::EnvironmentNotFound {
            details: format!("{}, {}", requested, format_tags(&app.tags)),
        })
}

/// First template, in the given order, named by the app's template reference
pub fn resolve_template<'t>(app: &Application, templates: &'t [Template]) -> Result<&'t Template> {
    templates
        .iter()
        .find(|template| template.name == app.template_ref)
        .ok_or_else(|| CoreError::TemplateNotFound {
            name: app.template_ref.clone(),
        })
}
