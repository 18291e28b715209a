//! Failures raised by the inventory store.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// The I/O step that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageAction {
    /// Reading the inventory file.
    Read,
    /// Creating the directory that holds the inventory file.
    CreateDirectory,
    /// Writing the inventory file.
    Write,
}

impl fmt::Display for StorageAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Read => "read",
            Self::CreateDirectory => "create directory",
            Self::Write => "write",
        })
    }
}

/// Error returned by [`InventoryStore`](super::InventoryStore) operations.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// The inventory file exists but is not valid YAML.
    #[error("failed to parse inventory {}: {source}", .path.display())]
    Parse {
        /// Inventory file path.
        path: PathBuf,
        /// Parser failure.
        #[source]
        source: serde_yaml::Error,
    },

    /// Reading, creating the directory for, or writing the inventory failed.
    #[error("failed to {action} {}: {source}", .path.display())]
    Storage {
        /// Which step failed.
        action: StorageAction,
        /// File or directory path involved.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A value could not be converted to or from its YAML form.
    #[error("failed to convert value at `{path}`: {source}")]
    Conversion {
        /// Dotted path of the value.
        path: String,
        /// Serde failure.
        #[source]
        source: serde_yaml::Error,
    },

    /// Mutations need at least one path segment.
    #[error("an empty path cannot be set or deleted")]
    EmptyPath,
}
