//! Repositories mapping domain records onto inventory paths.
//!
//! Servers live in a mapping keyed by name (`servers.<name>`). Sites live in
//! a list under `sites` and are matched by domain, since domains contain the
//! path separator and cannot be used as keys.

mod servers;
mod sites;

use thiserror::Error;

use crate::inventory::{path::SEPARATOR, InventoryError};

pub use servers::ServerRepository;
pub use sites::SiteRepository;

/// Error returned by repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The underlying store failed.
    #[error(transparent)]
    Inventory(#[from] InventoryError),

    /// A name cannot be used as an identifier.
    #[error("invalid {kind} name `{name}`: {reason}")]
    InvalidName {
        /// Record kind (`server` or `site`).
        kind: &'static str,
        /// Rejected name.
        name: String,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// A record with the same identifier already exists.
    #[error("{kind} `{name}` already exists")]
    Duplicate {
        /// Record kind.
        kind: &'static str,
        /// Conflicting identifier.
        name: String,
    },

    /// No record has this identifier.
    #[error("{kind} `{name}` not found")]
    NotFound {
        /// Record kind.
        kind: &'static str,
        /// Missing identifier.
        name: String,
    },

    /// A site must be deployed to at least one server.
    #[error("site `{0}` needs at least one server")]
    NoServers(String),

    /// A site references servers that are not in the inventory.
    #[error("unknown server(s): {}", .0.join(", "))]
    UnknownServers(Vec<String>),

    /// A server is still used by sites.
    #[error("server `{server}` is used by: {}", .sites.join(", "))]
    InUse {
        /// Server being removed.
        server: String,
        /// Domains deployed to it.
        sites: Vec<String>,
    },
}

fn validate_server_name(name: &str) -> Result<(), RepositoryError> {
    let reason = if name.trim().is_empty() {
        "name is empty"
    } else if name.contains(SEPARATOR) {
        "name must not contain `.`"
    } else {
        return Ok(());
    };
    Err(RepositoryError::InvalidName { kind: "server", name: name.to_string(), reason })
}

fn validate_domain(domain: &str) -> Result<(), RepositoryError> {
    if domain.trim().is_empty() {
        return Err(RepositoryError::InvalidName {
            kind: "site",
            name: domain.to_string(),
            reason: "domain is empty",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_names_reject_separator_and_blanks() {
        assert!(validate_server_name("web1").is_ok());
        assert!(validate_server_name("web-1_eu").is_ok());
        assert!(matches!(
            validate_server_name("web.1"),
            Err(RepositoryError::InvalidName { kind: "server", .. })
        ));
        assert!(validate_server_name("  ").is_err());
    }

    #[test]
    fn domains_may_contain_dots() {
        assert!(validate_domain("www.example.com").is_ok());
        assert!(validate_domain("").is_err());
    }

    #[test]
    fn messages_list_offending_names() {
        let err = RepositoryError::UnknownServers(vec!["db1".into(), "db2".into()]);
        assert_eq!(err.to_string(), "unknown server(s): db1, db2");
    }
}
