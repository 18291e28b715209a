//! `deployer inventory` commands: raw dotted-path access.

use serde_yaml::Value;

use crate::container::{Arguments, Autowire, ContainerError, Parameter, Signature};
use crate::inventory::InventoryStore;

/// Prints the value stored at a path.
pub struct InventoryGetCommand {
    store: InventoryStore,
}

impl InventoryGetCommand {
    /// Execute the `inventory get` command.
    ///
    /// # Errors
    ///
    /// Returns an error string if nothing is stored at `path`, the inventory
    /// cannot be read, or the value cannot be printed as JSON.
    pub fn run(&self, path: &str, json: bool) -> Result<(), String> {
        print!("{}", self.render(path, json)?);
        Ok(())
    }

    fn render(&self, path: &str, json: bool) -> Result<String, String> {
        let value = self
            .store
            .get(path)
            .map_err(|err| err.to_string())?
            .ok_or_else(|| format!("no value at `{path}`"))?;
        if json {
            let mut out = serde_json::to_string_pretty(&value)
                .map_err(|err| format!("cannot print `{path}` as JSON: {err}"))?;
            out.push('\n');
            Ok(out)
        } else {
            serde_yaml::to_string(&value).map_err(|err| err.to_string())
        }
    }
}

impl Autowire for InventoryGetCommand {
    fn signature() -> Signature {
        Signature::empty().param(Parameter::service::<InventoryStore>("store"))
    }

    fn construct(args: &mut Arguments) -> Result<Self, ContainerError> {
        Ok(Self { store: args.take()? })
    }
}

/// Stores a YAML value at a path.
pub struct InventorySetCommand {
    store: InventoryStore,
}

impl InventorySetCommand {
    /// Execute the `inventory set` command.
    ///
    /// # Errors
    ///
    /// Returns an error string if `raw` is not valid YAML, the path is empty,
    /// or the inventory cannot be written.
    pub fn run(&self, path: &str, raw: &str) -> Result<(), String> {
        let value = parse_value(raw)?;
        self.store.set(path, value).map_err(|err| err.to_string())?;
        println!("Set {path}.");
        Ok(())
    }
}

impl Autowire for InventorySetCommand {
    fn signature() -> Signature {
        Signature::empty().param(Parameter::service::<InventoryStore>("store"))
    }

    fn construct(args: &mut Arguments) -> Result<Self, ContainerError> {
        Ok(Self { store: args.take()? })
    }
}

/// Removes the value at a path.
pub struct InventoryUnsetCommand {
    store: InventoryStore,
}

impl InventoryUnsetCommand {
    /// Execute the `inventory unset` command. A missing path is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error string if the path is empty or the inventory cannot
    /// be written.
    pub fn run(&self, path: &str) -> Result<(), String> {
        if self.store.delete(path).map_err(|err| err.to_string())? {
            println!("Unset {path}.");
        } else {
            println!("Nothing stored at {path}.");
        }
        Ok(())
    }
}

impl Autowire for InventoryUnsetCommand {
    fn signature() -> Signature {
        Signature::empty().param(Parameter::service::<InventoryStore>("store"))
    }

    fn construct(args: &mut Arguments) -> Result<Self, ContainerError> {
        Ok(Self { store: args.take()? })
    }
}

/// Parses a command-line value as YAML; blank input stores an empty string.
fn parse_value(raw: &str) -> Result<Value, String> {
    if raw.trim().is_empty() {
        return Ok(Value::String(raw.to_string()));
    }
    serde_yaml::from_str(raw).map_err(|err| format!("invalid YAML value `{raw}`: {err}"))
}
