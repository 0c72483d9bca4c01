//! Lint command - check that the registry classifies

use console::style;
use designate_core::{EntryKind, Registry};
use std::collections::HashSet;

use crate::RegistryArgs;
use crate::error::Result;

pub async fn run(args: &RegistryArgs) -> Result<()> {
    println!("{} Linting registry entries...", style("→").blue());
    let registry = super::load_registry(args).await?;

    let duplicates = duplicate_names(&registry);
    for (kind, name) in &duplicates {
        println!(
            "  {} duplicate {} entry '{}', only the first one is ever used",
            style("⚠").yellow(),
            kind,
            name
        );
    }

    println!();
    if duplicates.is_empty() {
        println!("{} Registry is valid", style("✓").green().bold());
    } else {
        println!(
            "{} Registry is valid ({} warning(s))",
            style("✓").green().bold(),
            duplicates.len()
        );
    }

    Ok(())
}

/// Names seen more than once within a kind, in discovery order
fn duplicate_names(registry: &Registry) -> Vec<(EntryKind, String)> {
    let names = [
        (EntryKind::App, registry.apps().iter().map(|a| a.name.as_str()).collect::<Vec<_>>()),
        (
            EntryKind::Template,
            registry.templates().iter().map(|t| t.name.as_str()).collect(),
        ),
        (
            EntryKind::Environment,
            registry.environments().iter().map(|e| e.name.as_str()).collect(),
        ),
    ];

    let mut duplicates = Vec::new();
    for (kind, names) in names {
        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        for name in names {
            if !seen.insert(name) && reported.insert(name) {
                duplicates.push((kind, name.to_string()));
            }
        }
    }
    duplicates
}
