//! Deploy command - resolve, render and trigger

use console::style;
use designate_core::DeploymentArgs;
use designate_engine::{Engine, designate};
use designate_spinnaker::{DispatchMode, Dispatcher};

use crate::RegistryArgs;
use crate::error::Result;

pub async fn run(
    registry_args: &RegistryArgs,
    name: &str,
    args: DeploymentArgs,
    mode: DispatchMode,
) -> Result<()> {
    println!(
        "{} Designating deployment of {} ({}) on {} environment",
        style("→").blue(),
        style(name).cyan(),
        args.version,
        args.environment
    );
    println!(
        "  Using {} chart, deployment method is {}",
        args.chart, args.pipeline
    );

    let registry = super::load_registry(registry_args).await?;
    let app = registry.find_app(name)?;

    let engine = Engine::default();
    let deployment = designate(&engine, app, &args, &registry)?;
    println!(
        "  {} Matched environment {} ({})",
        style("✓").green(),
        deployment.environment.name,
        deployment.environment.domain
    );
    println!("  {} Matched template {}", style("✓").green(), app.template_ref);
    println!("  {} Rendered values", style("✓").green());

    let dispatcher = Dispatcher::new(mode)?;
    println!(
        "{} Going to deploy on {} now",
        style("→").blue(),
        deployment.environment.name
    );
    let status = dispatcher.start(&deployment).await?;
    println!(
        "  {} Triggered Spinnaker {} {}/{}: {}",
        style("✓").green(),
        dispatcher.mode(),
        app.name,
        args.pipeline,
        status
    );

    println!();
    println!("{} Done!", style("✓").green().bold());
    Ok(())
}
