//! `deployer server` commands.

use tracing::info;

use super::table;
use crate::cli::ServerAddArgs;
use crate::container::{Arguments, Autowire, ContainerError, Parameter, Signature};
use crate::model::ServerDto;
use crate::ports::SharedSshProbe;
use crate::repository::{RepositoryError, ServerRepository, SiteRepository};

/// Registers a server after an SSH login check.
pub struct ServerAddCommand {
    servers: ServerRepository,
    probe: SharedSshProbe,
}

impl ServerAddCommand {
    /// Execute the `server add` command.
    ///
    /// The SSH check runs before anything is written, so a server that
    /// refuses the login is never registered.
    ///
    /// # Errors
    ///
    /// Returns an error string if the name is taken or invalid, the login
    /// fails, or the inventory cannot be written.
    pub fn run(&self, args: &ServerAddArgs) -> Result<(), String> {
        let server = ServerDto {
            name: args.name.clone(),
            host: args.host.clone(),
            port: args.port,
            username: args.username.clone(),
            private_key_path: args.private_key_path.clone(),
        };

        if self.servers.exists(&server.name).map_err(|err| err.to_string())? {
            let err = RepositoryError::Duplicate { kind: "server", name: server.name };
            return Err(err.to_string());
        }

        if args.skip_ssh_check {
            info!(server = %server.name, "ssh check skipped");
        } else {
            println!("Checking SSH login to {}:{}...", server.login_target(), server.port);
            self.probe
                .check(&server)
                .map_err(|err| format!("SSH check failed, server not added: {err}"))?;
        }

        self.servers.create(&server).map_err(|err| err.to_string())?;
        println!("Server {} added ({}:{}).", server.name, server.login_target(), server.port);
        Ok(())
    }
}

impl Autowire for ServerAddCommand {
    fn signature() -> Signature {
        Signature::empty()
            .param(Parameter::service::<ServerRepository>("servers"))
            .param(Parameter::service::<SharedSshProbe>("probe"))
    }

    fn construct(args: &mut Arguments) -> Result<Self, ContainerError> {
        let servers = args.take()?;
        let probe = args.take()?;
        Ok(Self { servers, probe })
    }
}

/// Lists registered servers.
pub struct ServerListCommand {
    servers: ServerRepository,
}

impl ServerListCommand {
    /// Execute the `server list` command.
    ///
    /// # Errors
    ///
    /// Returns an error string if the inventory cannot be read.
    pub fn run(&self) -> Result<(), String> {
        print!("{}", self.render()?);
        Ok(())
    }

    fn render(&self) -> Result<String, String> {
        let servers = self.servers.all().map_err(|err| err.to_string())?;
        if servers.is_empty() {
            return Ok("No servers registered.\n".to_string());
        }
        let rows: Vec<Vec<String>> = servers
            .iter()
            .map(|server| {
                vec![
                    server.name.clone(),
                    server.host.clone(),
                    server.port.to_string(),
                    server.username.clone(),
                    server.private_key_path.clone().unwrap_or_else(|| "-".to_string()),
                ]
            })
            .collect();
        let table = table::render(&["NAME", "HOST", "PORT", "USER", "KEY"], &rows);
        Ok(format!("{table}\n{} server(s) total.\n", rows.len()))
    }
}

impl Autowire for ServerListCommand {
    fn signature() -> Signature {
        Signature::empty().param(Parameter::service::<ServerRepository>("servers"))
    }

    fn construct(args: &mut Arguments) -> Result<Self, ContainerError> {
        Ok(Self { servers: args.take()? })
    }
}

/// Removes a server no site is deployed to.
pub struct ServerRemoveCommand {
    servers: ServerRepository,
    sites: SiteRepository,
}

impl ServerRemoveCommand {
    /// Execute the `server remove` command.
    ///
    /// # Errors
    ///
    /// Returns an error string if the server does not exist, sites still use
    /// it, or the inventory cannot be written.
    pub fn run(&self, name: &str) -> Result<(), String> {
        if !self.servers.exists(name).map_err(|err| err.to_string())? {
            let err = RepositoryError::NotFound { kind: "server", name: name.to_string() };
            return Err(err.to_string());
        }
        let domains = self.sites.domains_on(name).map_err(|err| err.to_string())?;
        if !domains.is_empty() {
            let err = RepositoryError::InUse { server: name.to_string(), sites: domains };
            return Err(err.to_string());
        }
        self.servers.delete(name).map_err(|err| err.to_string())?;
        println!("Server {name} removed.");
        Ok(())
    }
}

impl Autowire for ServerRemoveCommand {
    fn signature() -> Signature {
        Signature::empty()
            .param(Parameter::service::<ServerRepository>("servers"))
            .param(Parameter::service::<SiteRepository>("sites"))
    }

    fn construct(args: &mut Arguments) -> Result<Self, ContainerError> {
        let servers = args.take()?;
        let sites = args.take()?;
        Ok(Self { servers, sites })
    }
}
