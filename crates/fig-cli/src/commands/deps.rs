//! Direct dependencies command (fig deps)

use anyhow::Result;
use fig_core::{direct_dependencies, FileRepository};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct DepsArgs {
    pub descriptor: String,
    pub repository: PathBuf,
}

pub fn run(args: DepsArgs) -> Result<()> {
    let descriptor = super::parse_descriptor(&args.descriptor)?;
    let repository = FileRepository::new(&args.repository);

    for dependency in direct_dependencies(&repository, &descriptor)? {
        println!("{}", dependency);
    }
    Ok(())
}
