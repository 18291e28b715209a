//! Inventory store: a YAML document addressed by dotted paths.
//!
//! The whole inventory lives in one file (`.deployer/inventory.yml` by
//! default):
//!
//! ```text
//! servers:
//!   web1: { host: 1.2.3.4, port: 22, username: root }
//! sites:
//!   - { domain: example.com, repo: ..., branch: main, servers: [web1] }
//! ```
//!
//! Every operation re-reads the file, and every mutation rewrites it in
//! full. There is no locking: two processes writing at once can lose an
//! update, and a crash during a write can leave a truncated file.

pub mod error;
pub mod path;

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_yaml::{Mapping, Value};
use tracing::{debug, info};

use crate::config::Settings;
use crate::container::{Arguments, Autowire, ContainerError, Parameter, Signature};
use crate::ports::SharedFileSystem;

pub use error::{InventoryError, StorageAction};

/// Durable key/value storage over a single YAML document.
///
/// All I/O goes through the `FileSystem` port.
pub struct InventoryStore {
    fs: SharedFileSystem,
    path: PathBuf,
}

impl InventoryStore {
    /// Creates a store backed by the file at `path`.
    pub fn new(fs: SharedFileSystem, path: impl Into<PathBuf>) -> Self {
        Self { fs, path: path.into() }
    }

    /// The backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the document from disk.
    ///
    /// A missing or empty file, or one holding something other than a
    /// mapping, loads as an empty mapping.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::Storage`] if the file cannot be read and
    /// [`InventoryError::Parse`] if it is not valid YAML.
    pub fn load(&self) -> Result<Value, InventoryError> {
        if !self.fs.exists(&self.path) {
            debug!(path = %self.path.display(), "inventory file missing, starting empty");
            return Ok(Value::Mapping(Mapping::new()));
        }
        let contents = self.fs.read_to_string(&self.path).map_err(|source| {
            InventoryError::Storage { action: StorageAction::Read, path: self.path.clone(), source }
        })?;
        if contents.trim().is_empty() {
            return Ok(Value::Mapping(Mapping::new()));
        }
        let document: Value = serde_yaml::from_str(&contents)
            .map_err(|source| InventoryError::Parse { path: self.path.clone(), source })?;
        if document.is_mapping() {
            Ok(document)
        } else {
            debug!(path = %self.path.display(), "inventory root is not a mapping, ignoring it");
            Ok(Value::Mapping(Mapping::new()))
        }
    }

    /// Returns the whole document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be loaded.
    pub fn all(&self) -> Result<Mapping, InventoryError> {
        match self.load()? {
            Value::Mapping(mapping) => Ok(mapping),
            _ => Ok(Mapping::new()),
        }
    }

    /// Returns the value at `path`, or `None` if any segment is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be loaded.
    pub fn get(&self, path: &str) -> Result<Option<Value>, InventoryError> {
        let document = self.load()?;
        Ok(path::lookup(&document, &path::segments(path)).cloned())
    }

    /// Returns the value at `path`, or `default` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be loaded.
    pub fn get_or(&self, path: &str, default: Value) -> Result<Value, InventoryError> {
        Ok(self.get(path)?.unwrap_or(default))
    }

    /// Returns the value at `path` decoded as `T`.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be loaded or the value does
    /// not have the shape of `T`.
    pub fn get_as<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, InventoryError> {
        self.get(path)?
            .map(|value| {
                serde_yaml::from_value(value)
                    .map_err(|source| InventoryError::Conversion { path: path.to_string(), source })
            })
            .transpose()
    }

    /// Returns the mapping stored under a top-level collection key, or an
    /// empty mapping.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be loaded.
    pub fn list(&self, collection: &str) -> Result<Mapping, InventoryError> {
        match self.get(collection)? {
            Some(Value::Mapping(mapping)) => Ok(mapping),
            _ => Ok(Mapping::new()),
        }
    }

    /// Returns `true` if `path` exists, including when it holds `null`.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be loaded.
    pub fn has(&self, path: &str) -> Result<bool, InventoryError> {
        let document = self.load()?;
        Ok(path::contains(&document, &path::segments(path)))
    }

    /// Stores `value` at `path` and writes the document.
    ///
    /// Missing intermediate mappings are created; intermediate values that
    /// are not mappings are replaced.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::EmptyPath`] for the empty path, or an error
    /// if the document cannot be loaded or written.
    pub fn set(&self, path: &str, value: Value) -> Result<(), InventoryError> {
        let segments = path::segments(path);
        if segments.is_empty() {
            return Err(InventoryError::EmptyPath);
        }
        let mut document = self.load()?;
        path::assign(&mut document, &segments, value);
        self.persist(&document)?;
        info!(path, "inventory value set");
        Ok(())
    }

    /// Serializes `value` and stores it at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` cannot be serialized or [`Self::set`] fails.
    pub fn set_as<T: Serialize>(&self, path: &str, value: &T) -> Result<(), InventoryError> {
        let value = serde_yaml::to_value(value)
            .map_err(|source| InventoryError::Conversion { path: path.to_string(), source })?;
        self.set(path, value)
    }

    /// Removes `path` and writes the document. Deleting a missing path is a
    /// no-op and leaves the file untouched.
    ///
    /// Returns `true` if a value was removed. Parent mappings left empty are
    /// kept.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::EmptyPath`] for the empty path, or an error
    /// if the document cannot be loaded or written.
    pub fn delete(&self, path: &str) -> Result<bool, InventoryError> {
        let segments = path::segments(path);
        if segments.is_empty() {
            return Err(InventoryError::EmptyPath);
        }
        let mut document = self.load()?;
        if path::remove(&mut document, &segments).is_none() {
            debug!(path, "nothing to delete");
            return Ok(false);
        }
        self.persist(&document)?;
        info!(path, "inventory value deleted");
        Ok(true)
    }

    fn persist(&self, document: &Value) -> Result<(), InventoryError> {
        if let Some(dir) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            if !self.fs.exists(dir) {
                self.fs.create_dir_all(dir).map_err(|source| InventoryError::Storage {
                    action: StorageAction::CreateDirectory,
                    path: dir.to_path_buf(),
                    source,
                })?;
            }
        }
        let yaml = serde_yaml::to_string(document)
            .map_err(|source| InventoryError::Conversion { path: String::new(), source })?;
        self.fs.write(&self.path, &yaml).map_err(|source| InventoryError::Storage {
            action: StorageAction::Write,
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), bytes = yaml.len(), "inventory written");
        Ok(())
    }
}

impl Autowire for InventoryStore {
    fn signature() -> Signature {
        Signature::empty()
            .param(Parameter::service::<SharedFileSystem>("fs"))
            .param(Parameter::service::<Settings>("settings").with_default_fn(Settings::default))
    }

    fn construct(args: &mut Arguments) -> Result<Self, ContainerError> {
        let fs: SharedFileSystem = args.take()?;
        let settings: Settings = args.take()?;
        Ok(Self::new(fs, settings.inventory_path))
    }
}
