//! Plan command (fig plan)

use anyhow::Result;
use fig_core::{Environment, FileRepository, Planner, Resolution};
use serde_json::json;
use std::collections::BTreeMap;
use std::env;
use std::path::PathBuf;

/// Arguments for the plan command
#[derive(Debug, Clone)]
pub struct PlanArgs {
    /// Root descriptor, e.g. `app/1.0:debug`
    pub descriptor: String,
    pub repository: PathBuf,
    /// Output as JSON
    pub json: bool,
    /// Print the environment the plan produces instead of the plan itself
    pub env: bool,
}

/// Run the plan command
pub fn run(args: PlanArgs) -> Result<()> {
    let root = super::parse_descriptor(&args.descriptor)?;
    let repository = FileRepository::new(&args.repository);
    let resolution = Planner::new(&repository).resolve(&root)?;

    let changes = if args.env {
        Some(environment_changes(&resolution, process_vars()))
    } else {
        None
    };

    if args.json {
        let plan: Vec<String> = resolution
            .descriptors()
            .iter()
            .map(ToString::to_string)
            .collect();
        let mut output = json!({
            "root": root.to_string(),
            "plan": plan,
        });
        if let Some(changes) = &changes {
            output["environment"] = json!(changes);
        }
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    match changes {
        Some(changes) => {
            for (name, value) in changes {
                println!("{}={}", name, value);
            }
        }
        None => {
            for descriptor in resolution.descriptors() {
                println!("{}", descriptor);
            }
        }
    }
    Ok(())
}

/// The process environment, skipping entries that are not valid UTF-8
fn process_vars() -> impl Iterator<Item = (String, String)> {
    env::vars_os()
        .filter_map(|(name, value)| Some((name.into_string().ok()?, value.into_string().ok()?)))
}

/// Variables whose value differs after applying the resolution to `initial`
pub fn environment_changes(
    resolution: &Resolution,
    initial: impl IntoIterator<Item = (String, String)>,
) -> BTreeMap<String, String> {
    let before = Environment::from_vars(initial);
    let mut after = before.clone();
    after.apply(resolution);

    after
        .into_vars()
        .into_iter()
        .filter(|(name, value)| before.get(name) != Some(value.as_str()))
        .collect()
}
