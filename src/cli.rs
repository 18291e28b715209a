//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::model::{DEFAULT_SSH_PORT, DEFAULT_USERNAME};

/// Top-level CLI parser for `deployer`.
#[derive(Debug, Parser)]
#[command(name = "deployer", version, about = "Manage deployment servers and sites")]
pub struct Cli {
    /// Inventory file (overrides `DEPLOYER_INVENTORY`).
    #[arg(long, global = true, value_name = "PATH")]
    pub inventory: Option<PathBuf>,

    /// Log container resolution and inventory I/O to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage deployment servers.
    #[command(subcommand)]
    Server(ServerCommand),
    /// Manage deployed sites.
    #[command(subcommand)]
    Site(SiteCommand),
    /// Read and write raw inventory values by dotted path.
    #[command(subcommand)]
    Inventory(InventoryCommand),
}

/// `deployer server ...`
#[derive(Debug, Subcommand)]
pub enum ServerCommand {
    /// Register a server after checking that it accepts SSH logins.
    Add(ServerAddArgs),
    /// List registered servers.
    List,
    /// Remove a server that no site uses.
    Remove {
        /// Server name.
        name: String,
    },
}

/// Arguments of `server add`.
#[derive(Debug, Clone, Args)]
pub struct ServerAddArgs {
    /// Unique server name.
    pub name: String,
    /// Hostname or IP address.
    #[arg(long)]
    pub host: String,
    /// SSH port.
    #[arg(long, default_value_t = DEFAULT_SSH_PORT)]
    pub port: u16,
    /// SSH login.
    #[arg(long = "user", default_value = DEFAULT_USERNAME)]
    pub username: String,
    /// Private key for the login.
    #[arg(long = "key", value_name = "PATH")]
    pub private_key_path: Option<String>,
    /// Register without trying to log in.
    #[arg(long)]
    pub skip_ssh_check: bool,
}

/// `deployer site ...`
#[derive(Debug, Subcommand)]
pub enum SiteCommand {
    /// Register a site on one or more servers.
    Add(SiteAddArgs),
    /// List registered sites.
    List,
    /// Remove a site.
    Remove {
        /// Site domain.
        domain: String,
    },
}

/// Arguments of `site add`.
#[derive(Debug, Clone, Args)]
pub struct SiteAddArgs {
    /// Site domain.
    pub domain: String,
    /// Server to deploy to; repeat for several.
    #[arg(long = "server", value_name = "NAME", required = true)]
    pub servers: Vec<String>,
    /// Git repository URL (defaults to the `origin` remote).
    #[arg(long)]
    pub repo: Option<String>,
    /// Branch to deploy (defaults to the checked-out branch).
    #[arg(long)]
    pub branch: Option<String>,
}

/// `deployer inventory ...`
#[derive(Debug, Subcommand)]
pub enum InventoryCommand {
    /// Print the value at a path (empty path prints the whole inventory).
    Get {
        /// Dotted path, e.g. `servers.web1.host`.
        path: String,
        /// Print JSON instead of YAML.
        #[arg(long)]
        json: bool,
    },
    /// Store a value at a path; the value is parsed as YAML.
    Set {
        /// Dotted path.
        path: String,
        /// YAML value, e.g. `2222` or `[web1, web2]`.
        value: String,
    },
    /// Remove the value at a path.
    Unset {
        /// Dotted path.
        path: String,
    },
}
