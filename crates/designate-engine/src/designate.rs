//! Resolve an app into a deployment

use designate_core::{
    resolve_environment, resolve_template, Application, Deployment, DeploymentArgs, Registry,
};

use crate::engine::Engine;
use crate::error::Result;

/// Match the app to an environment, then to its template, then render the
/// values. The first failing step aborts.
pub fn designate<'a>(
    engine: &Engine,
    app: &'a Application,
    args: &'a DeploymentArgs,
    registry: &'a Registry,
) -> Result<Deployment<'a>> {
    let environment = resolve_environment(app, &args.environment, registry.environments())?;
    tracing::debug!(app = %app.name, environment = %environment.name, "matched environment");

    let template = resolve_template(app, registry.templates())?;
    tracing::debug!(app = %app.name, template = %template.name, "matched template");

    let values = engine.render(template, app, args, environment)?;
    Ok(Deployment::new(app, args, environment, values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use designate_core::{CoreError, RawDocument};

    const APP: &str = "kind: app\nname: svc\ntemplate: t1\ntags:\n  team: x\n";
    const ENV: &str = "kind: environment\nname: e1\nenvironment: prod\ntags:\n  team: x\ndomain: example.com\nspinnaker_url: https://sk\n";
    const TEMPLATE: &str = "kind: template\nname: t1\ntemplate: '{{ deployment.version }}-{{ app.name }}'\n";

    fn registry(documents: &[(&str, &str)]) -> Registry {
        Registry::load(
            documents
                .iter()
                .map(|(path, content)| RawDocument::new(*path, *content)),
        )
        .unwrap()
    }

    #[test]
    fn test_designate_resolves_and_renders() {
        let registry = registry(&[("a.yaml", APP), ("e.yaml", ENV), ("t.yaml", TEMPLATE)]);
        let app = registry.find_app("svc").unwrap();
        let args = DeploymentArgs::new("1.2.3", "prod", "deploy", "web");

        let deployment = designate(&Engine::default(), app, &args, &registry).unwrap();

        assert_eq!(deployment.environment.name, "e1");
        assert_eq!(deployment.app.name, "svc");
        assert_eq!(deployment.values, "1.2.3-svc");
    }

    #[test]
    fn test_unknown_environment() {
        let registry = registry(&[("a.yaml", APP), ("e.yaml", ENV), ("t.yaml", TEMPLATE)]);
        let app = registry.find_app("svc").unwrap();
        let args = DeploymentArgs::new("1.2.3", "staging", "deploy", "web");

        let err = designate(&Engine::default(), app, &args, &registry).unwrap_err();
        assert!(matches!(err, EngineError::Core(CoreError::EnvironmentNotFound { .. })));
    }

    #[test]
    fn test_missing_template() {
        let app = "kind: app\nname: svc\ntemplate: missing\ntags:\n  team: x\n";
        let registry = registry(&[("a.yaml", app), ("e.yaml", ENV), ("t.yaml", TEMPLATE)]);
        let app = registry.find_app("svc").unwrap();
        let args = DeploymentArgs::new("1.2.3", "prod", "deploy", "web");

        let err = designate(&Engine::default(), app, &args, &registry).unwrap_err();
        match err {
            EngineError::Core(CoreError::TemplateNotFound { name }) => assert_eq!(name, "missing"),
            other => panic!("Expected template not found, got {:?}", other),
        }
    }

    #[test]
    fn test_environment_checked_before_template() {
        let app = "kind: app\nname: svc\ntemplate: missing\ntags: {}\n";
        let registry = registry(&[("a.yaml", app), ("e.yaml", ENV)]);
        let app = registry.find_app("svc").unwrap();
        let args = DeploymentArgs::new("1.2.3", "prod", "deploy", "web");

        let err = designate(&Engine::default(), app, &args, &registry).unwrap_err();
        assert!(matches!(err, EngineError::Core(CoreError::EnvironmentNotFound { .. })));
    }

    #[test]
    fn test_render_failure() {
        let template = "kind: template\nname: t1\ntemplate: '{{ nope.version }}'\n";
        let registry = registry(&[("a.yaml", APP), ("e.yaml", ENV), ("t.yaml", template)]);
        let app = registry.find_app("svc").unwrap();
        let args = DeploymentArgs::new("1.2.3", "prod", "deploy", "web");

        let err = designate(&Engine::default(), app, &args, &registry).unwrap_err();
        assert!(matches!(err, EngineError::Template(_)));
    }
}
