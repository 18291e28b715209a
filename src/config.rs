//! Runtime settings.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

/// Environment variable overriding the inventory location.
pub const INVENTORY_ENV: &str = "DEPLOYER_INVENTORY";

/// Environment variable holding the log filter (`tracing_subscriber::EnvFilter` syntax).
pub const LOG_ENV: &str = "DEPLOYER_LOG";

/// Log filter used when `DEPLOYER_LOG` is unset or invalid.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Inventory location used when nothing else is configured.
pub const DEFAULT_INVENTORY_PATH: &str = ".deployer/inventory.yml";

/// Settings shared by every command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Path of the inventory file.
    pub inventory_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self { inventory_path: PathBuf::from(DEFAULT_INVENTORY_PATH) }
    }
}

impl Settings {
    /// Resolves settings from the command line and environment.
    ///
    /// The `--inventory` flag wins over `DEPLOYER_INVENTORY`, which wins over
    /// the default. A `.env` file in the working directory is loaded first
    /// if present; a malformed one is reported and loaded only up to the
    /// first bad line.
    #[must_use]
    pub fn resolve(inventory_flag: Option<&Path>) -> Self {
        match dotenvy::dotenv() {
            Ok(path) => debug!(path = %path.display(), ".env loaded"),
            Err(err) => {
                if let Some(err) = env_file_error(err) {
                    warn!(error = %err, "malformed .env file, later variables are not loaded");
                }
            }
        }
        Self::from_sources(inventory_flag, std::env::var_os(INVENTORY_ENV).map(PathBuf::from))
    }

    fn from_sources(inventory_flag: Option<&Path>, inventory_env: Option<PathBuf>) -> Self {
        let inventory_path = inventory_flag
            .map(Path::to_path_buf)
            .or(inventory_env.filter(|path| !path.as_os_str().is_empty()))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_INVENTORY_PATH));
        Self { inventory_path }
    }
}

/// Returns the error unless it only says that there is no `.env` file.
fn env_file_error(err: dotenvy::Error) -> Option<dotenvy::Error> {
    if err.not_found() {
        None
    } else {
        Some(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_beats_environment() {
        let settings = Settings::from_sources(
            Some(Path::new("/flag/inventory.yml")),
            Some(PathBuf::from("/env/inventory.yml")),
        );
        assert_eq!(settings.inventory_path, PathBuf::from("/flag/inventory.yml"));
    }

    #[test]
    fn environment_beats_default() {
        let settings = Settings::from_sources(None, Some(PathBuf::from("/env/inventory.yml")));
        assert_eq!(settings.inventory_path, PathBuf::from("/env/inventory.yml"));
    }

    #[test]
    fn empty_environment_value_is_ignored() {
        let settings = Settings::from_sources(None, Some(PathBuf::new()));
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.inventory_path, PathBuf::from(".deployer/inventory.yml"));
    }

    #[test]
    fn missing_env_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = dotenvy::from_path(dir.path().join(".env")).unwrap_err();
        assert!(env_file_error(err).is_none());
    }

    #[test]
    fn malformed_env_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join(".env");
        std::fs::write(&file, "BAD LINE WITH SPACES\nDEPLOYER_TEST_AFTER_BAD_LINE=1\n").unwrap();

        let err = dotenvy::from_path(&file).unwrap_err();
        assert!(env_file_error(err).is_some());
        assert!(std::env::var_os("DEPLOYER_TEST_AFTER_BAD_LINE").is_none());
    }
}
