//! SSH probe backed by the system `ssh` client.

use std::path::PathBuf;

use thiserror::Error;
use tracing::debug;

use crate::container::{Arguments, Autowire, ContainerError, Parameter, Signature};
use crate::model::ServerDto;
use crate::ports::{SharedShell, SshProbe};

/// Seconds `ssh` waits for the TCP connection before giving up.
pub const CONNECT_TIMEOUT_SECS: u32 = 10;

/// Why an SSH probe failed.
#[derive(Debug, Error)]
pub enum SshError {
    /// The `ssh` client could not be started.
    #[error("could not run ssh: {0}")]
    Spawn(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The client ran but the login did not succeed.
    #[error("cannot log in to {target} (ssh exited with {exit_code}): {stderr}")]
    LoginFailed {
        /// `user@host:port` that was tried.
        target: String,
        /// Exit code of the client.
        exit_code: i32,
        /// Trimmed standard error of the client.
        stderr: String,
    },
}

/// Logs in with `ssh` in batch mode and runs `exit`.
///
/// Batch mode disables password prompts, so only key-based logins pass.
pub struct SshCommandProbe {
    shell: SharedShell,
}

impl SshCommandProbe {
    /// Creates a probe that runs `ssh` through `shell`.
    pub fn new(shell: SharedShell) -> Self {
        Self { shell }
    }

    /// Builds the `ssh` argument list for `server`.
    #[must_use]
    pub fn arguments(server: &ServerDto) -> Vec<String> {
        let mut args = vec![
            "-o".to_string(),
            "BatchMode=yes".to_string(),
            "-o".to_string(),
            format!("ConnectTimeout={CONNECT_TIMEOUT_SECS}"),
            "-o".to_string(),
            "StrictHostKeyChecking=accept-new".to_string(),
            "-p".to_string(),
            server.port.to_string(),
        ];
        if let Some(key) = &server.private_key_path {
            args.push("-i".to_string());
            args.push(expand_home(key));
        }
        args.push(server.login_target());
        args.push("exit".to_string());
        args
    }
}

impl SshProbe for SshCommandProbe {
    fn check(&self, server: &ServerDto) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let args = Self::arguments(server);
        debug!(server = %server.name, ?args, "probing ssh login");
        let output = self.shell.run("ssh", &args).map_err(SshError::Spawn)?;
        if output.success() {
            return Ok(());
        }
        Err(Box::new(SshError::LoginFailed {
            target: format!("{}:{}", server.login_target(), server.port),
            exit_code: output.exit_code,
            stderr: output.stderr.trim().to_string(),
        }))
    }
}

impl Autowire for SshCommandProbe {
    fn signature() -> Signature {
        Signature::empty().param(Parameter::service::<SharedShell>("shell"))
    }

    fn construct(args: &mut Arguments) -> Result<Self, ContainerError> {
        Ok(Self::new(args.take()?))
    }
}

fn expand_home(path: &str) -> String {
    match (path.strip_prefix("~/"), std::env::var_os("HOME")) {
        (Some(rest), Some(home)) => PathBuf::from(home).join(rest).to_string_lossy().into_owned(),
        _ => path.to_string(),
    }
}
