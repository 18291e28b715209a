//! Live adapters for real external interactions.

pub mod filesystem;
pub mod git;
pub mod shell;
pub mod ssh;

pub use filesystem::LiveFileSystem;
pub use git::LiveGitRepo;
pub use shell::LiveShellExecutor;
pub use ssh::SshCommandProbe;
