//! Live git adapter using `git` CLI commands.

use std::process::Command;

use crate::ports::git::GitRepo;

/// Live git adapter that shells out to the `git` CLI in the working directory.
pub struct LiveGitRepo;

impl LiveGitRepo {
    fn git(args: &[&str]) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let output = Command::new("git").args(args).output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(format!("git {} failed: {}", args.join(" "), stderr.trim()).into());
        }
        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if stdout.is_empty() {
            return Err(format!("git {} returned nothing", args.join(" ")).into());
        }
        Ok(stdout)
    }
}

impl GitRepo for LiveGitRepo {
    fn remote_url(&self) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        Self::git(&["config", "--get", "remote.origin.url"])
    }

    fn current_branch(&self) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        Self::git(&["rev-parse", "--abbrev-ref", "HEAD"])
    }
}
