//! tfstage CLI - staging wrapper for shared Terraform configuration libraries
//!
//! Usage: tfstage <ACTION> [-c NAME] [-r REF] [-l URL] [-e NAME] [-- ARGS...]
//!
//! Actions:
//!   bootstrap  Scaffold a new configuration directory
//!   init       Fetch the library at the pinned revision and initialize
//!   plan       Re-prepare and compute a change set
//!   apply      Re-prepare and apply the change set
//!   show       Inspect state without re-preparing
//!   destroy    Destroy resources without re-preparing
//!   clean      Remove the working directory

use std::path::Path;
use std::process;

use clap::{CommandFactory, Parser};

use tfstage::cli::{Cli, Commands};
use tfstage::commands::{
    cmd_apply, cmd_bootstrap, cmd_clean, cmd_destroy, cmd_init, cmd_plan, cmd_show,
};
use tfstage::config::{Params, Settings, SETTINGS_FILE};
use tfstage::error::TfstageError;
use tfstage::git::GitClient;
use tfstage::process::SystemRunner;

fn main() {
    let cli = parse_cli();
    if let Err(e) = run(cli) {
        report(&e);
    }
}

/// Parse arguments, mapping every usage error onto exit code 1 with help
/// text (clap's own default is exit code 2).
fn parse_cli() -> Cli {
    match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            use clap::error::ErrorKind;
            match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    let _ = e.print();
                    process::exit(0);
                }
                _ => {
                    let _ = e.print();
                    eprintln!();
                    let _ = Cli::command().print_help();
                    process::exit(1);
                }
            }
        }
    }
}

fn run(cli: Cli) -> Result<(), TfstageError> {
    let base = Path::new(".");

    let (settings, warnings) = Settings::load_or_default(&base.join(SETTINGS_FILE))?;
    for warning in &warnings {
        eprintln!("warning: {}", warning);
    }

    let mut params = Params::resolve(&cli, &settings);
    let runner = SystemRunner::new(params.debug);

    let action = cli.command.action();
    if action.requires_environment() && params.environment.is_none() {
        // Fall back to the name of this directory's origin remote.
        params.environment = GitClient::new(&runner).remote_basename(base);
    }
    params.validate_for(action)?;

    match &cli.command {
        Commands::Bootstrap => cmd_bootstrap(base, &params, &runner),
        Commands::Init => cmd_init(base, &params, &runner),
        Commands::Plan { .. } => cmd_plan(base, &params, &runner),
        Commands::Apply { .. } => cmd_apply(base, &params, &runner),
        Commands::Show { .. } => cmd_show(base, &params, &runner),
        Commands::Destroy { .. } => cmd_destroy(base, &params, &runner),
        Commands::Clean => cmd_clean(base, &params),
    }
}

fn report(e: &TfstageError) -> ! {
    eprintln!("error: {}", e);
    if e.is_usage() {
        eprintln!();
        let _ = Cli::command().print_help();
    }
    process::exit(e.exit_code());
}
