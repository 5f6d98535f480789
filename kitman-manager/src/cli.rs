//! CLI argument parsing for kitman

use clap::{Parser, Subcommand, ValueEnum};
use kitman_core::Operation;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OperationArg {
    /// Install or update the selected components
    Update,
    /// Remove the installed toolkit
    Uninstall,
}

impl From<OperationArg> for Operation {
    fn from(arg: OperationArg) -> Self {
        match arg {
            OperationArg::Update => Operation::Update,
            OperationArg::Uninstall => Operation::Uninstall,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "kitman")]
#[command(about = "Manage installed toolkits and their components")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Settings file (TOML). Falls back to KITMAN_CONFIG, then built-in defaults
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory the file-backed backend reads its records from
    #[arg(long, global = true)]
    pub backend_dir: Option<PathBuf>,

    /// Append log output to this file instead of stderr
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Skip the self-update check after loading
    #[arg(long, global = true)]
    pub no_self_update: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the installed kit and the kits available for installation
    Kits {
        /// Print the kits as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the component groups of the installed kit, or of an available kit
    Groups {
        /// Version of an available kit to compare against the installed one
        #[arg(long)]
        kit: Option<String>,
    },

    /// Show the pending operation and its components
    Target {
        /// Print the target as JSON
        #[arg(long)]
        json: bool,
    },

    /// Apply an operation to the installed toolkit
    Apply {
        #[arg(long, value_enum, default_value = "update")]
        operation: OperationArg,

        /// Version of an available kit to update to
        #[arg(long)]
        kit: Option<String>,

        /// Keep only these components checked (required ones always stay)
        #[arg(long, value_delimiter = ',')]
        only: Vec<String>,

        /// Also remove the manager when uninstalling
        #[arg(long)]
        remove_self: bool,
    },

    /// Install the bundled toolkit
    Install {
        /// Install directory (defaults to the cached or backend default path)
        #[arg(long)]
        path: Option<String>,

        /// Components to leave out
        #[arg(long, value_delimiter = ',')]
        skip: Vec<String>,
    },

    /// Upgrade the manager if a newer version is available
    Upgrade,
}
