use clap::{Parser, Subcommand};

use crate::config::Action;

/// tfstage - staging wrapper for shared Terraform configuration libraries
#[derive(Parser, Debug)]
#[command(name = "tfstage")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "Arguments after `--` are forwarded verbatim to terraform.")]
pub struct Cli {
    /// Configuration name within the library
    #[arg(short, long, global = true, value_name = "NAME")]
    pub configuration: Option<String>,

    /// Git revision the library is pinned to
    #[arg(short, long, global = true, value_name = "REF")]
    pub revision: Option<String>,

    /// URL of the shared configuration library repository
    #[arg(short, long, global = true, value_name = "URL")]
    pub lib_url: Option<String>,

    /// Target environment substituted into the configuration
    #[arg(short, long, global = true, value_name = "NAME")]
    pub environment: Option<String>,

    /// Echo external commands before running them
    #[arg(short, long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scaffold a new configuration directory and prepare the workspace
    Bootstrap,

    /// Fetch the library at the pinned revision and run `terraform init`
    Init,

    /// Re-prepare the workspace, then compute and save a change set
    Plan {
        /// Arguments forwarded verbatim to `terraform plan`
        #[arg(last = true)]
        args: Vec<String>,
    },

    /// Re-prepare the workspace, then apply the saved change set
    Apply {
        /// Arguments forwarded verbatim to `terraform apply`
        #[arg(last = true)]
        args: Vec<String>,
    },

    /// Inspect the current state without re-preparing the workspace
    Show {
        /// Arguments forwarded verbatim to `terraform show`
        #[arg(last = true)]
        args: Vec<String>,
    },

    /// Destroy managed resources without re-preparing the workspace
    Destroy {
        /// Arguments forwarded verbatim to `terraform destroy`
        #[arg(last = true)]
        args: Vec<String>,
    },

    /// Remove the working directory
    Clean,
}

impl Commands {
    pub fn action(&self) -> Action {
        match self {
            Self::Bootstrap => Action::Bootstrap,
            Self::Init => Action::Init,
            Self::Plan { .. } => Action::Plan,
            Self::Apply { .. } => Action::Apply,
            Self::Show { .. } => Action::Show,
            Self::Destroy { .. } => Action::Destroy,
            Self::Clean => Action::Clean,
        }
    }

    /// Tokens after `--`, forwarded unmodified to the delegated tool.
    pub fn passthrough(&self) -> &[String] {
        match self {
            Self::Plan { args }
            | Self::Apply { args }
            | Self::Show { args }
            | Self::Destroy { args } => args.as_slice(),
            Self::Bootstrap | Self::Init | Self::Clean => &[],
        }
    }
}
