//! Publish a package definition (fig publish)

use anyhow::{bail, Context, Result};
use fig_core::{parser, FileRepository};
use std::fs;
use std::path::PathBuf;
use tracing::info;

/// Arguments for the publish command
#[derive(Debug, Clone)]
pub struct PublishArgs {
    /// Definition file to publish
    pub file: PathBuf,
    /// `package/version` to publish it as
    pub package: String,
    pub repository: PathBuf,
}

/// Run the publish command
pub fn run(args: PublishArgs) -> Result<()> {
    let descriptor = super::parse_descriptor(&args.package)?;
    if descriptor.version().is_empty() {
        bail!("'{}' has no version; expected package/version", args.package);
    }
    if !descriptor.config().is_empty() {
        bail!("'{}' names a config; publish takes package/version", args.package);
    }

    let text = fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let package = parser::parse_package(
        &args.file.display().to_string(),
        descriptor.package(),
        descriptor.version(),
        &text,
    )?;

    let repository = FileRepository::new(&args.repository);
    let path = repository.publish(&package)?;
    info!(path = %path.display(), "published");

    println!("Published {} to {}", descriptor, path.display());
    Ok(())
}
