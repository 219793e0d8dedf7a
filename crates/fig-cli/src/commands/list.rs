//! List published packages (fig list)

use anyhow::Result;
use fig_core::{FileRepository, Repository};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct ListArgs {
    pub repository: PathBuf,
    pub json: bool,
}

pub fn run(args: ListArgs) -> Result<()> {
    let repository = FileRepository::new(&args.repository);
    let packages = repository.list_packages()?;

    if args.json {
        let names: Vec<String> = packages.iter().map(ToString::to_string).collect();
        println!("{}", serde_json::to_string_pretty(&names)?);
    } else {
        for package in packages {
            println!("{}", package);
        }
    }
    Ok(())
}
