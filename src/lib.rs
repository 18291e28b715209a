//! Core library entry for the `deployer` CLI.
//!
//! `deployer` keeps an inventory of deployment servers and the sites
//! deployed to them in a single YAML file. Command handlers, repositories
//! and the inventory store are wired by the auto-wiring [`container`].

pub mod adapters;
pub mod cli;
pub mod commands;
pub mod config;
pub mod container;
pub mod context;
pub mod inventory;
pub mod model;
pub mod ports;
pub mod repository;

#[cfg(test)]
mod testing;

use clap::Parser;
use tracing::debug;

use crate::cli::Cli;
use crate::config::Settings;
use crate::context::Ports;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = Cli::try_parse_from(args).map_err(|err| err.to_string())?;
    execute(&cli)
}

/// Run an already parsed command against the live adapters.
///
/// # Errors
///
/// Returns an error string when command execution fails.
pub fn execute(cli: &Cli) -> Result<(), String> {
    let settings = Settings::resolve(cli.inventory.as_deref());
    debug!(inventory = %settings.inventory_path.display(), "settings resolved");
    let mut container = context::container(Ports::live(), settings);
    commands::dispatch(&cli.command, &mut container)
}
