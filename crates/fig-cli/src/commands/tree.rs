//! Include tree command (fig tree)

use anyhow::Result;
use fig_core::{DependencyTree, FileRepository};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct TreeArgs {
    pub descriptor: String,
    pub repository: PathBuf,
}

pub fn run(args: TreeArgs) -> Result<()> {
    let root = super::parse_descriptor(&args.descriptor)?;
    let repository = FileRepository::new(&args.repository);

    let tree = DependencyTree::build(&repository, &root)?;
    print!("{}", tree.render());
    Ok(())
}
