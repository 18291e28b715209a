//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the inventory core and an
//! external system (filesystem, git, processes, SSH). Implementations
//! live in `src/adapters/`.

pub mod filesystem;
pub mod git;
pub mod shell;
pub mod ssh;

use std::sync::Arc;

pub use filesystem::FileSystem;
pub use git::GitRepo;
pub use shell::{ShellExecutor, ShellOutput};
pub use ssh::SshProbe;

/// Shared filesystem handle, as bound in the container.
pub type SharedFileSystem = Arc<dyn FileSystem>;
/// Shared git handle, as bound in the container.
pub type SharedGitRepo = Arc<dyn GitRepo>;
/// Shared process runner, as bound in the container.
pub type SharedShell = Arc<dyn ShellExecutor>;
/// Shared SSH probe, as bound in the container.
pub type SharedSshProbe = Arc<dyn SshProbe>;
