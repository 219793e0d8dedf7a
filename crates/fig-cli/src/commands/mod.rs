pub mod deps;
pub mod list;
pub mod plan;
pub mod publish;
pub mod show;
pub mod tree;

use anyhow::{Context, Result};
use fig_core::Descriptor;

/// Parse a descriptor given on the command line
pub fn parse_descriptor(text: &str) -> Result<Descriptor> {
    text.parse()
        .with_context(|| format!("Invalid descriptor '{}'", text))
}
