//! Deployed site record.

use serde::{Deserialize, Serialize};

/// A site deployed from a git repository to one or more servers.
///
/// Sites are identified by `domain`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteDto {
    /// Unique domain name.
    pub domain: String,
    /// Git repository URL.
    pub repo: String,
    /// Branch to deploy.
    pub branch: String,
    /// Names of the servers the site is deployed to.
    #[serde(default)]
    pub servers: Vec<String>,
}
