//! Command dispatch and handlers.
//!
//! Each handler is built by the container for the command being run, so it
//! receives freshly wired repositories and ports.

pub mod inventory;
pub mod server;
pub mod site;
mod table;

use std::any::Any;

use tracing::debug;

use crate::cli::{Command, InventoryCommand, ServerCommand, SiteCommand};
use crate::container::{Container, ContainerError};

use self::inventory::{InventoryGetCommand, InventorySetCommand, InventoryUnsetCommand};
use self::server::{ServerAddCommand, ServerListCommand, ServerRemoveCommand};
use self::site::{SiteAddCommand, SiteListCommand, SiteRemoveCommand};

/// Dispatch a parsed command to its handler.
///
/// # Errors
///
/// Returns an error string if the handler cannot be built or fails.
pub fn dispatch(command: &Command, container: &mut Container) -> Result<(), String> {
    match command {
        Command::Server(ServerCommand::Add(args)) => {
            handler::<ServerAddCommand>(container)?.run(args)
        }
        Command::Server(ServerCommand::List) => handler::<ServerListCommand>(container)?.run(),
        Command::Server(ServerCommand::Remove { name }) => {
            handler::<ServerRemoveCommand>(container)?.run(name)
        }
        Command::Site(SiteCommand::Add(args)) => handler::<SiteAddCommand>(container)?.run(args),
        Command::Site(SiteCommand::List) => handler::<SiteListCommand>(container)?.run(),
        Command::Site(SiteCommand::Remove { domain }) => {
            handler::<SiteRemoveCommand>(container)?.run(domain)
        }
        Command::Inventory(InventoryCommand::Get { path, json }) => {
            handler::<InventoryGetCommand>(container)?.run(path, *json)
        }
        Command::Inventory(InventoryCommand::Set { path, value }) => {
            handler::<InventorySetCommand>(container)?.run(path, value)
        }
        Command::Inventory(InventoryCommand::Unset { path }) => {
            handler::<InventoryUnsetCommand>(container)?.run(path)
        }
    }
}

fn handler<T: Any>(container: &mut Container) -> Result<T, String> {
    debug!(handler = std::any::type_name::<T>(), "building command handler");
    container.build::<T>().map_err(|err| wiring_error(&err))
}

fn wiring_error(err: &ContainerError) -> String {
    let path = err.parameter_path();
    if path.is_empty() {
        format!("cannot build command handler: {err}")
    } else {
        format!("cannot build command handler ({}): {}", path.join(" -> "), err.root_cause())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use crate::context;
    use crate::testing::{fake_ports, settings, INVENTORY};
    use clap::Parser;

    fn dispatch_args(container: &mut Container, args: &[&str]) -> Result<(), String> {
        let cli = Cli::try_parse_from(args).map_err(|err| err.to_string())?;
        dispatch(&cli.command, container)
    }

    #[test]
    fn dispatches_to_handlers() {
        let (fs, ports) = fake_ports();
        let mut container = context::container(ports, settings());

        dispatch_args(
            &mut container,
            &["deployer", "server", "add", "web1", "--host", "10.0.0.1", "--skip-ssh-check"],
        )
        .unwrap();
        dispatch_args(
            &mut container,
            &["deployer", "inventory", "set", "servers.web1.port", "2200"],
        )
        .unwrap();
        dispatch_args(&mut container, &["deployer", "server", "list"]).unwrap();

        let document: serde_yaml::Value =
            serde_yaml::from_str(&fs.read(INVENTORY).unwrap()).unwrap();
        assert_eq!(document["servers"]["web1"]["port"], serde_yaml::Value::from(2200));
    }

    #[test]
    fn missing_binding_names_the_parameter_path() {
        let mut container = Container::new();
        container
            .register::<crate::inventory::InventoryStore>()
            .register::<crate::repository::ServerRepository>()
            .register::<ServerListCommand>();

        let err = dispatch_args(&mut container, &["deployer", "server", "list"]).unwrap_err();
        assert!(err
            .contains("ServerListCommand.servers -> ServerRepository.store -> InventoryStore.fs"));
        assert!(err.contains("no binding is registered"));
    }
}
