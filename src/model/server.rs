//! Deployment server record.

/// Port used when a server does not specify one.
pub const DEFAULT_SSH_PORT: u16 = 22;

/// Login used when a server does not specify one.
pub const DEFAULT_USERNAME: &str = "root";

/// A server that sites can be deployed to.
///
/// Servers are keyed by `name`, which is unique across the inventory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerDto {
    /// Unique server name.
    pub name: String,
    /// Hostname or IP address.
    pub host: String,
    /// SSH port.
    pub port: u16,
    /// SSH login.
    pub username: String,
    /// Private key used for the login, if not the agent's default.
    pub private_key_path: Option<String>,
}

impl ServerDto {
    /// Creates a server with the default port and username.
    pub fn new(name: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            host: host.into(),
            port: DEFAULT_SSH_PORT,
            username: DEFAULT_USERNAME.to_string(),
            private_key_path: None,
        }
    }

    /// The `user@host` login target.
    #[must_use]
    pub fn login_target(&self) -> String {
        format!("{}@{}", self.username, self.host)
    }
}
