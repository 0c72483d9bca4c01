//! Template engine based on MiniJinja

use designate_core::{Application, DeploymentArgs, Environment, RenderContext, Template};
use minijinja::Environment as JinjaEnvironment;

use crate::error::{Result, TemplateError};
use crate::filters;

/// Renders values templates against an app, its deployment arguments and
/// the resolved environment.
///
/// Undefined values are semi-strict: printing or iterating one is an error,
/// while `if` tests and `is defined` treat it as false.
#[derive(Debug, Clone, Copy, Default)]
pub struct Engine;

impl Engine {
    pub fn new() -> Self {
        Self
    }

    fn create_environment(&self) -> JinjaEnvironment<'static> {
        let mut env = JinjaEnvironment::new();
        env.set_undefined_behavior(minijinja::UndefinedBehavior::SemiStrict);

        env.add_filter("toyaml", filters::toyaml);
        env.add_filter("tojson", filters::tojson);
        env.add_filter("b64encode", filters::b64encode);
        env.add_filter("quote", filters::quote);
        env.add_filter("nindent", filters::nindent);
        env.add_filter("required", filters::required);

        env
    }

    /// Render a template entry into a values document
    pub fn render(
        &self,
        template: &Template,
        app: &Application,
        args: &DeploymentArgs,
        environment: &Environment,
    ) -> Result<String> {
        let context = RenderContext::new(app, args, environment);
        self.render_string(&template.body, &context, &template.name)
    }

    /// Render a template string against a prepared context
    pub fn render_string(
        &self,
        source: &str,
        context: &RenderContext,
        template_name: &str,
    ) -> Result<String> {
        let mut env = self.create_environment();

        env.add_template_owned(template_name.to_string(), source.to_string())
            .map_err(|e| TemplateError::from_minijinja(e, template_name, source))?;

        let tmpl = env
            .get_template(template_name)
            .map_err(|e| TemplateError::from_minijinja(e, template_name, source))?;

        let ctx = minijinja::context! {
            app => &context.app,
            deployment => &context.deployment,
            environment => &context.environment,
        };

        let rendered = tmpl
            .render(ctx)
            .map_err(|e| TemplateError::from_minijinja(e, template_name, source))?;

        tracing::debug!(template = template_name, bytes = rendered.len(), "rendered values");
        Ok(rendered)
    }
}
