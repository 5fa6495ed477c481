use std::path::PathBuf;

use bandplan_core::catalog::Tier;
use bandplan_core::Config;
use clap::Subcommand;

use super::CliResult;

#[derive(Subcommand)]
pub enum CatalogAction {
    /// Show the active catalog's categories
    Show {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write the active catalog as TOML, a starting point for `catalog_path`
    Export {
        /// Output file (stdout when omitted)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

pub fn run(action: CatalogAction) -> CliResult {
    let config = Config::load_or_default();
    let catalog = config.catalog()?;

    match action {
        CatalogAction::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&catalog)?);
                return Ok(());
            }
            let source = config.catalog_path.as_deref().unwrap_or("builtin");
            println!("Catalog v{} ({source})", catalog.version);
            for (name, content) in &catalog.categories {
                let guides: Vec<String> = [Tier::Beginner, Tier::Intermediate, Tier::Advanced]
                    .into_iter()
                    .map(|tier| format!("{} {}", content.guides.pool(tier).len(), tier.label()))
                    .collect();
                println!(
                    "  {name:<18} {} entries, guides: {}",
                    content.entries.len(),
                    guides.join(", ")
                );
            }
        }
        CatalogAction::Export { output } => {
            let toml = catalog.to_toml_string()?;
            match output {
                Some(path) => {
                    std::fs::write(&path, toml)?;
                    println!("catalog written to {}", path.display());
                }
                None => print!("{toml}"),
            }
        }
    }
    Ok(())
}
