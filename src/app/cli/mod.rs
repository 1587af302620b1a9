//! CLI Adapter.

mod output;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::adapters::{FilesystemStore, OwnershipPolicy};
use crate::app::config::ParameterOverrides;
use crate::domain::{AppError, ParameterSet, Plugin};

/// Environment variable holding a `tracing` filter directive.
const LOG_ENV: &str = "PULPCONF_LOG";

#[derive(Parser)]
#[command(name = "pulpconf")]
#[command(version)]
#[command(about = "Render and reconcile Pulp server configuration files", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the artifacts that would be managed
    #[clap(visible_alias = "p")]
    Plan {
        #[command(flatten)]
        params: ParameterArgs,
    },
    /// Print rendered artifacts without writing them
    #[clap(visible_alias = "r")]
    Render {
        #[command(flatten)]
        params: ParameterArgs,
        /// Print content of artifacts whose diffs are suppressed
        #[arg(long)]
        reveal: bool,
    },
    /// Write artifacts that differ from the rendered state
    #[clap(visible_alias = "a")]
    Apply {
        #[command(flatten)]
        params: ParameterArgs,
        /// Prefix every target path with this directory
        #[arg(long, default_value = "/")]
        root: PathBuf,
        /// Neither compare nor set owner and group
        #[arg(long)]
        skip_ownership: bool,
    },
}

#[derive(Args)]
struct ParameterArgs {
    /// Parameter file (.toml, .yml or .yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Host processor count fact
    #[arg(long)]
    processor_count: Option<i64>,
    /// Installed MongoDB version fact
    #[arg(long)]
    mongodb_version: Option<String>,
    /// Enable an importer plugin (rpm, puppet, docker, ostree); repeatable
    #[arg(long = "enable", value_parser = parse_plugin)]
    enable: Vec<Plugin>,
    /// Show diffs for server.conf and importer files
    #[arg(long)]
    show_conf_diff: bool,
}

impl ParameterArgs {
    fn load(&self) -> Result<ParameterSet, AppError> {
        let overrides = ParameterOverrides {
            processor_count: self.processor_count,
            mongodb_version: self.mongodb_version.clone(),
            enable: self.enable.clone(),
            show_conf_diff: self.show_conf_diff,
        };
        crate::load(self.config.as_deref(), &overrides)
    }
}

fn parse_plugin(value: &str) -> Result<Plugin, String> {
    value.parse::<Plugin>().map_err(|err| err.to_string())
}

/// Entry point for the CLI.
pub fn run() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result: Result<i32, AppError> = match cli.command {
        Commands::Plan { params } => run_plan(&params).map(|_| 0),
        Commands::Render { params, reveal } => run_render(&params, reveal).map(|_| 0),
        Commands::Apply { params, root, skip_ownership } => {
            run_apply(&params, root, skip_ownership)
        }
    };

    match result {
        Ok(exit_code) => {
            if exit_code != 0 {
                std::process::exit(exit_code);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(e.exit_code());
        }
    }
}

fn init_logging(verbose: u8) {
    let default_directive = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive));
    // A subscriber may already be installed when embedded; keep the existing one.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run_plan(args: &ParameterArgs) -> Result<(), AppError> {
    let params = args.load()?;
    for kind in crate::app::commands::plan::execute(&params) {
        println!("{}", kind.path().display());
    }
    Ok(())
}

fn run_render(args: &ParameterArgs, reveal: bool) -> Result<(), AppError> {
    let params = args.load()?;
    let artifacts = crate::app::commands::render::execute(&params)?;
    for artifact in &artifacts {
        output::print_artifact(artifact, reveal);
    }
    Ok(())
}

fn run_apply(args: &ParameterArgs, root: PathBuf, skip_ownership: bool) -> Result<i32, AppError> {
    let params = args.load()?;
    let ownership =
        if skip_ownership { OwnershipPolicy::Ignore } else { OwnershipPolicy::Enforce };
    let store = FilesystemStore::new(root, ownership);

    let report = crate::app::commands::apply::execute(&params, &store)?;
    output::print_report(&report);

    match report.into_result() {
        Ok(_) => Ok(0),
        Err(err) => {
            eprintln!("Error: {}", err);
            Ok(err.exit_code())
        }
    }
}
