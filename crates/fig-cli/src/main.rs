use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use fig_core::PlanError;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;
mod config;

/// Fig package configuration resolver.
///
/// Resolves a package configuration and everything it includes into the
/// ordered list of configurations to apply, and manages a local repository
/// of package definitions.
///
/// EXAMPLES:
///     fig plan app/1.0                 Print the resolved plan
///     fig plan app/1.0:debug --env     Print the resulting environment
///     fig tree app/1.0                 Show who includes whom
///     fig publish package.fig app/1.0  Add a definition to the repository
///
/// ENVIRONMENT VARIABLES:
///     FIG_REPOSITORY    Repository directory (overrides fig.toml)
///     FIG_LOG           Log filter, e.g. 'debug' or 'fig_core=trace'
///     RUST_LOG          Log filter, takes precedence over FIG_LOG
#[derive(Parser)]
#[command(name = "fig")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Package repository directory
    #[arg(long, short = 'r', global = true)]
    repository: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a descriptor into the configurations to apply
    ///
    /// Prints one fully qualified descriptor per line, dependencies first.
    /// Fails if two paths require different versions of one package or if
    /// configurations include each other.
    ///
    /// EXAMPLES:
    ///     fig plan app/1.0               Plan the default config
    ///     fig plan app/1.0:debug --json  Output as JSON
    ///     fig plan app/1.0 --env         Print NAME=VALUE lines
    #[command(visible_alias = "p")]
    Plan {
        /// Descriptor to resolve (package/version[:config])
        descriptor: String,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
        /// Print the environment variables the plan sets
        #[arg(long)]
        env: bool,
    },

    /// List the includes of one configuration
    ///
    /// EXAMPLES:
    ///     fig deps app/1.0
    ///     fig deps app/1.0:debug
    Deps {
        /// Descriptor to inspect
        descriptor: String,
    },

    /// Show the include tree below a descriptor
    ///
    /// Includes without a version are marked with '...'; an include that
    /// leads back to its own ancestor is marked '(cycle)'.
    ///
    /// EXAMPLES:
    ///     fig tree app/1.0
    Tree {
        /// Root descriptor
        descriptor: String,
    },

    /// List published package versions
    #[command(visible_alias = "ls")]
    List {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Print a published package definition
    ///
    /// EXAMPLES:
    ///     fig show app/1.0
    ///     fig show app/1.0 --json
    Show {
        /// Package and version (package/version)
        package: String,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Publish a package definition to the repository
    ///
    /// The definition is checked before it is written. A published version
    /// is never overwritten.
    ///
    /// EXAMPLES:
    ///     fig publish package.fig app/1.0
    Publish {
        /// Definition file
        file: PathBuf,
        /// Package and version to publish as (package/version)
        package: String,
    },

    /// Generate shell completions
    ///
    /// EXAMPLES:
    ///     fig completions bash > ~/.bash_completions/fig.bash
    ///     fig completions zsh > ~/.zfunc/_fig
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // Planner failures carry backtraces worth showing in full
            match err.downcast_ref::<PlanError>() {
                Some(plan_error) => eprint!("error: {}", plan_error.report()),
                None => eprintln!("error: {}", format!("{:#}", err).trim_end()),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    if let Commands::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let config = config::Config::load(cli.repository, cli.verbose)?;
    config.init_logging();
    let repository = config.repository.clone();

    match cli.command {
        Commands::Plan {
            descriptor,
            json,
            env,
        } => commands::plan::run(commands::plan::PlanArgs {
            descriptor,
            repository,
            json: json || config.default_json,
            env,
        }),
        Commands::Deps { descriptor } => {
            commands::deps::run(commands::deps::DepsArgs {
                descriptor,
                repository,
            })
        }
        Commands::Tree { descriptor } => {
            commands::tree::run(commands::tree::TreeArgs {
                descriptor,
                repository,
            })
        }
        Commands::List { json } => {
            commands::list::run(commands::list::ListArgs { repository, json })
        }
        Commands::Show { package, json } => commands::show::run(commands::show::ShowArgs {
            package,
            repository,
            json,
        }),
        Commands::Publish { file, package } => {
            commands::publish::run(commands::publish::PublishArgs {
                file,
                package,
                repository,
            })
        }
        Commands::Completions { .. } => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_plan_flags() {
        let cli = Cli::parse_from(["fig", "plan", "app/1.0", "--json", "--env"]);
        match cli.command {
            Commands::Plan {
                descriptor,
                json,
                env,
            } => {
                assert_eq!(descriptor, "app/1.0");
                assert!(json);
                assert!(env);
            }
            _ => panic!("Expected Plan command"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["fig", "tree", "app/1.0", "-r", "/srv/fig", "-v"]);
        assert_eq!(cli.repository, Some(PathBuf::from("/srv/fig")));
        assert!(cli.verbose);
    }

    #[test]
    fn test_alias_p_for_plan() {
        let cli = Cli::parse_from(["fig", "p", "app/1.0"]);
        assert!(matches!(cli.command, Commands::Plan { .. }));
    }

    #[test]
    fn test_alias_ls_for_list() {
        let cli = Cli::parse_from(["fig", "ls"]);
        assert!(matches!(cli.command, Commands::List { json: false }));
    }

    #[test]
    fn test_publish_requires_both_arguments() {
        assert!(Cli::try_parse_from(["fig", "publish", "package.fig"]).is_err());
    }

    #[test]
    fn test_completions_bash() {
        let cli = Cli::parse_from(["fig", "completions", "bash"]);
        match cli.command {
            Commands::Completions { shell } => assert_eq!(shell, Shell::Bash),
            _ => panic!("Expected Completions command"),
        }
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }
}
