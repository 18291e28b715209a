//! Server records stored at `servers.<name>`.

use serde::{Deserialize, Serialize};

use super::{validate_server_name, RepositoryError};
use crate::container::{Arguments, Autowire, ContainerError, Parameter, Signature};
use crate::inventory::{path, InventoryError, InventoryStore};
use crate::model::{ServerDto, DEFAULT_SSH_PORT, DEFAULT_USERNAME};

const COLLECTION: &str = "servers";

/// On-disk shape of a server; the name is the mapping key.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredServer {
    host: String,
    #[serde(default = "default_port")]
    port: u16,
    #[serde(default = "default_username")]
    username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    private_key_path: Option<String>,
}

fn default_port() -> u16 {
    DEFAULT_SSH_PORT
}

fn default_username() -> String {
    DEFAULT_USERNAME.to_string()
}

impl StoredServer {
    fn into_dto(self, name: String) -> ServerDto {
        ServerDto {
            name,
            host: self.host,
            port: self.port,
            username: self.username,
            private_key_path: self.private_key_path,
        }
    }
}

impl From<&ServerDto> for StoredServer {
    fn from(server: &ServerDto) -> Self {
        Self {
            host: server.host.clone(),
            port: server.port,
            username: server.username.clone(),
            private_key_path: server.private_key_path.clone(),
        }
    }
}

/// Reads and writes servers in the inventory.
pub struct ServerRepository {
    store: InventoryStore,
}

impl ServerRepository {
    /// Creates a repository over `store`.
    #[must_use]
    pub fn new(store: InventoryStore) -> Self {
        Self { store }
    }

    /// All servers, in inventory order.
    ///
    /// # Errors
    ///
    /// Returns an error if the inventory cannot be read or a record is malformed.
    pub fn all(&self) -> Result<Vec<ServerDto>, RepositoryError> {
        self.store
            .list(COLLECTION)?
            .into_iter()
            .filter_map(|(key, value)| path::key_text(&key).map(|name| (name, value)))
            .map(|(name, value)| {
                let path = record_path(&name);
                serde_yaml::from_value::<StoredServer>(value)
                    .map(|stored| stored.into_dto(name))
                    .map_err(|source| InventoryError::Conversion { path, source }.into())
            })
            .collect()
    }

    /// Looks a server up by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is invalid, the inventory cannot be read,
    /// or the record is malformed.
    pub fn find(&self, name: &str) -> Result<Option<ServerDto>, RepositoryError> {
        validate_server_name(name)?;
        let stored = self.store.get_as::<StoredServer>(&record_path(name))?;
        Ok(stored.map(|stored| stored.into_dto(name.to_string())))
    }

    /// Returns `true` if a server with this name exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is invalid or the inventory cannot be read.
    pub fn exists(&self, name: &str) -> Result<bool, RepositoryError> {
        validate_server_name(name)?;
        Ok(self.store.has(&record_path(name))?)
    }

    /// Adds a new server.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Duplicate`] if the name is taken, or an
    /// error if the name is invalid or the inventory cannot be written.
    pub fn create(&self, server: &ServerDto) -> Result<(), RepositoryError> {
        if self.exists(&server.name)? {
            return Err(RepositoryError::Duplicate { kind: "server", name: server.name.clone() });
        }
        self.store.set_as(&record_path(&server.name), &StoredServer::from(server))?;
        Ok(())
    }

    /// Removes a server.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] if there is no such server, or an
    /// error if the name is invalid or the inventory cannot be written.
    pub fn delete(&self, name: &str) -> Result<(), RepositoryError> {
        validate_server_name(name)?;
        if self.store.delete(&record_path(name))? {
            Ok(())
        } else {
            Err(RepositoryError::NotFound { kind: "server", name: name.to_string() })
        }
    }
}

impl Autowire for ServerRepository {
    fn signature() -> Signature {
        Signature::empty().param(Parameter::service::<InventoryStore>("store"))
    }

    fn construct(args: &mut Arguments) -> Result<Self, ContainerError> {
        Ok(Self::new(args.take()?))
    }
}

fn record_path(name: &str) -> String {
    format!("{COLLECTION}.{name}")
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_yaml::Value;

    use super::*;
    use crate::ports::SharedFileSystem;
    use crate::testing::MemoryFileSystem;

    const INVENTORY: &str = "/srv/inventory.yml";

    fn repository() -> (Arc<MemoryFileSystem>, ServerRepository) {
        let fs = Arc::new(MemoryFileSystem::new());
        let store = InventoryStore::new(Arc::clone(&fs) as SharedFileSystem, INVENTORY);
        (fs, ServerRepository::new(store))
    }

    fn web(name: &str) -> ServerDto {
        ServerDto {
            name: name.to_string(),
            host: "198.51.100.10".to_string(),
            port: 22,
            username: "deploy".to_string(),
            private_key_path: Some("~/.ssh/id_ed25519".to_string()),
        }
    }

    #[test]
    fn create_and_find() {
        let (_fs, servers) = repository();
        servers.create(&web("web1")).unwrap();

        assert_eq!(servers.find("web1").unwrap(), Some(web("web1")));
        assert_eq!(servers.find("web2").unwrap(), None);
        assert!(servers.exists("web1").unwrap());
    }

    #[test]
    fn stored_layout_uses_camel_case_without_name() {
        let (fs, servers) = repository();
        servers.create(&web("web1")).unwrap();

        let document: Value = serde_yaml::from_str(&fs.read(INVENTORY).unwrap()).unwrap();
        let expected: Value = serde_yaml::from_str(
            "servers:\n  web1:\n    host: 198.51.100.10\n    port: 22\n    username: deploy\n    \
             privateKeyPath: ~/.ssh/id_ed25519\n",
        )
        .unwrap();
        assert_eq!(document, expected);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let (_fs, servers) = repository();
        servers.create(&web("web1")).unwrap();
        assert!(matches!(
            servers.create(&web("web1")),
            Err(RepositoryError::Duplicate { kind: "server", .. })
        ));
    }

    #[test]
    fn all_keeps_inventory_order_and_fills_defaults() {
        let (fs, servers) = repository();
        fs.insert_file(
            INVENTORY,
            "servers:\n  zeta:\n    host: z.example\n  alpha:\n    host: a.example\n    \
             port: 2200\n",
        );

        let all = servers.all().unwrap();
        let names: Vec<_> = all.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
        assert_eq!(all[0].port, 22);
        assert_eq!(all[0].username, "root");
        assert_eq!(all[1].port, 2200);
    }

    #[test]
    fn number_keyed_servers_are_listed_and_updated() {
        let (fs, servers) = repository();
        fs.insert_file(INVENTORY, "servers:\n  101:\n    host: 10.0.0.1\n");

        assert_eq!(servers.all().unwrap()[0].name, "101");
        assert!(servers.exists("101").unwrap());
        assert_eq!(servers.find("101").unwrap().map(|s| s.host), Some("10.0.0.1".to_string()));

        servers.delete("101").unwrap();
        assert!(servers.all().unwrap().is_empty());
    }

    #[test]
    fn malformed_record_is_reported() {
        let (fs, servers) = repository();
        fs.insert_file(INVENTORY, "servers:\n  broken:\n    port: 22\n");
        let err = servers.all().unwrap_err();
        assert!(err.to_string().contains("servers.broken"));
    }

    #[test]
    fn delete_removes_record() {
        let (_fs, servers) = repository();
        servers.create(&web("web1")).unwrap();
        servers.create(&web("web2")).unwrap();

        servers.delete("web1").unwrap();
        assert!(!servers.exists("web1").unwrap());
        assert!(servers.exists("web2").unwrap());
        assert!(matches!(servers.delete("web1"), Err(RepositoryError::NotFound { .. })));
    }

    #[test]
    fn dotted_names_never_reach_the_store() {
        let (fs, servers) = repository();
        assert!(servers.create(&web("web.1")).is_err());
        assert!(fs.read(INVENTORY).is_none());
    }
}
