//! Container wiring for the CLI.
//!
//! Port handles and settings are bound as factories; everything above them
//! is registered as an [`Autowire`](crate::container::Autowire) type and
//! built on demand by the command dispatcher.

use std::sync::Arc;

use crate::adapters::live::{LiveFileSystem, LiveGitRepo, LiveShellExecutor, SshCommandProbe};
use crate::commands::inventory::{InventoryGetCommand, InventorySetCommand, InventoryUnsetCommand};
use crate::commands::server::{ServerAddCommand, ServerListCommand, ServerRemoveCommand};
use crate::commands::site::{SiteAddCommand, SiteListCommand, SiteRemoveCommand};
use crate::config::Settings;
use crate::container::{Arguments, Container, ContainerError, Parameter, Signature};
use crate::inventory::InventoryStore;
use crate::ports::{SharedFileSystem, SharedGitRepo, SharedShell, SharedSshProbe};
use crate::repository::{ServerRepository, SiteRepository};

/// The external boundaries the container hands out.
pub struct Ports {
    /// Filesystem for the inventory file.
    pub fs: SharedFileSystem,
    /// Git repository in the working directory.
    pub git: SharedGitRepo,
    /// Process runner, used by the SSH probe.
    pub shell: SharedShell,
}

impl Ports {
    /// Real adapters for every port.
    #[must_use]
    pub fn live() -> Self {
        Self {
            fs: Arc::new(LiveFileSystem),
            git: Arc::new(LiveGitRepo),
            shell: Arc::new(LiveShellExecutor),
        }
    }
}

/// Builds a container with every service and command registered.
///
/// `Arc<dyn SshProbe>` is produced from [`SshCommandProbe`], which in turn
/// gets the bound shell, so swapping the shell swaps what the probe runs.
#[must_use]
pub fn container(ports: Ports, settings: Settings) -> Container {
    let Ports { fs, git, shell } = ports;
    let mut container = Container::new();
    container
        .bind(move || Arc::clone(&fs))
        .bind(move || Arc::clone(&git))
        .bind(move || Arc::clone(&shell))
        .bind(move || settings.clone())
        .register::<SshCommandProbe>()
        .register_factory(
            || Signature::empty().param(Parameter::service::<SshCommandProbe>("probe")),
            |args: &mut Arguments| -> Result<SharedSshProbe, ContainerError> {
                Ok(Arc::new(args.take::<SshCommandProbe>()?) as SharedSshProbe)
            },
        )
        .register::<InventoryStore>()
        .register::<ServerRepository>()
        .register::<SiteRepository>()
        .register::<ServerAddCommand>()
        .register::<ServerListCommand>()
        .register::<ServerRemoveCommand>()
        .register::<SiteAddCommand>()
        .register::<SiteListCommand>()
        .register::<SiteRemoveCommand>()
        .register::<InventoryGetCommand>()
        .register::<InventorySetCommand>()
        .register::<InventoryUnsetCommand>();
    container
}
