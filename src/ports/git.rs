//! Git repository port for version-control queries.

/// Provides read access to the git repository in the working directory.
///
/// Used to suggest the repository URL and branch of a new site.
pub trait GitRepo: Send + Sync {
    /// Returns the URL of the `origin` remote.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no repository or no `origin` remote.
    fn remote_url(&self) -> Result<String, Box<dyn std::error::Error + Send + Sync>>;

    /// Returns the name of the checked-out branch.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no repository or HEAD cannot be resolved.
    fn current_branch(&self) -> Result<String, Box<dyn std::error::Error + Send + Sync>>;
}
