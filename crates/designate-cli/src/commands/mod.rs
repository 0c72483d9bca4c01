//! CLI command implementations

pub mod deploy;
pub mod lint;

use console::style;
use designate_core::Registry;
use designate_repo::{
    CredentialProvider, GithubApp, GithubClient, GithubSource, LocalSource, RegistrySource,
    RepoName, StaticToken,
};

use crate::RegistryArgs;
use crate::error::{CliError, Result};

/// Build the registry source selected on the command line
fn registry_source(args: &RegistryArgs) -> Result<Box<dyn RegistrySource>> {
    if let Some(path) = &args.registry_path {
        return Ok(Box::new(LocalSource::new(path)));
    }

    let (Some(repo), Some(branch)) = (&args.registry_repo, &args.registry_branch) else {
        return Err(CliError::github("registry repository and branch are required"));
    };

    let repo: RepoName = repo.parse()?;
    let client = GithubClient::new(&args.github_api_url)?;

    let credentials: Box<dyn CredentialProvider> = match (
        &args.github_token,
        args.github_app_id,
        &args.github_app_private_key,
    ) {
        (Some(token), _, _) => Box::new(StaticToken::new(token)),
        (None, Some(app_id), Some(private_key)) => {
            println!(
                "{} Detected GitHub app credentials, generating temporary token...",
                style("→").blue()
            );
            Box::new(GithubApp::new(client.clone(), app_id, private_key, repo.clone())?)
        }
        _ => return Err(CliError::github("no GitHub credentials provided")),
    };

    Ok(Box::new(GithubSource::new(client, repo, branch, credentials)))
}

/// Fetch and classify every registry document
pub async fn load_registry(args: &RegistryArgs) -> Result<Registry> {
    let source = registry_source(args)?;
    println!("{} Loading registry from {}", style("→").blue(), source.describe());

    let documents = source.documents().await?;
    tracing::debug!(count = documents.len(), "fetched registry documents");

    let registry = Registry::load(documents)?;
    println!(
        "  {} {} entries ({} apps, {} templates, {} environments)",
        style("✓").green(),
        registry.len(),
        registry.apps().len(),
        registry.templates().len(),
        registry.environments().len()
    );

    Ok(registry)
}
