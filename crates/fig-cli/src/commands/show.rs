//! Show a package definition (fig show)

use anyhow::{bail, Result};
use fig_core::{unparser, FileRepository, Repository};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct ShowArgs {
    /// `package/version`
    pub package: String,
    pub repository: PathBuf,
    pub json: bool,
}

pub fn run(args: ShowArgs) -> Result<()> {
    let descriptor = super::parse_descriptor(&args.package)?;
    if descriptor.version().is_empty() {
        bail!("'{}' has no version; expected package/version", args.package);
    }

    let repository = FileRepository::new(&args.repository);
    let package = repository.resolve_package(descriptor.package(), descriptor.version())?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&package)?);
    } else {
        print!("{}", unparser::unparse_package(&package));
    }
    Ok(())
}
