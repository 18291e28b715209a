//! SSH probe port for checking that a server accepts logins.

use crate::model::ServerDto;

/// Verifies SSH connectivity to a server before it is registered.
pub trait SshProbe: Send + Sync {
    /// Attempts a non-interactive login to `server`.
    ///
    /// # Errors
    ///
    /// Returns an error describing why the login failed.
    fn check(&self, server: &ServerDto) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}
