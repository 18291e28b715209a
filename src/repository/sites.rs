//! Site records stored as a list under `sites`.

use tracing::debug;

use super::{validate_domain, RepositoryError, ServerRepository};
use crate::container::{Arguments, Autowire, ContainerError, Parameter, Signature};
use crate::inventory::InventoryStore;
use crate::model::SiteDto;

const COLLECTION: &str = "sites";

/// Reads and writes sites in the inventory.
///
/// Every server a site names must exist, so the repository consults the
/// server records before accepting a new site.
pub struct SiteRepository {
    store: InventoryStore,
    servers: ServerRepository,
}

impl SiteRepository {
    /// Creates a repository over `store`, checking references against `servers`.
    #[must_use]
    pub fn new(store: InventoryStore, servers: ServerRepository) -> Self {
        Self { store, servers }
    }

    /// All sites, in inventory order.
    ///
    /// # Errors
    ///
    /// Returns an error if the inventory cannot be read or `sites` is not a
    /// list of site records.
    pub fn all(&self) -> Result<Vec<SiteDto>, RepositoryError> {
        Ok(self.store.get_as::<Vec<SiteDto>>(COLLECTION)?.unwrap_or_default())
    }

    /// Looks a site up by domain.
    ///
    /// # Errors
    ///
    /// Returns an error if the inventory cannot be read.
    pub fn find(&self, domain: &str) -> Result<Option<SiteDto>, RepositoryError> {
        Ok(self.all()?.into_iter().find(|site| site.domain == domain))
    }

    /// Domains of the sites deployed to `server`.
    ///
    /// # Errors
    ///
    /// Returns an error if the inventory cannot be read.
    pub fn domains_on(&self, server: &str) -> Result<Vec<String>, RepositoryError> {
        Ok(self
            .all()?
            .into_iter()
            .filter(|site| site.servers.iter().any(|name| name == server))
            .map(|site| site.domain)
            .collect())
    }

    /// Appends a new site.
    ///
    /// # Errors
    ///
    /// Returns an error if the domain is empty or taken, the site names no
    /// servers or unknown ones, or the inventory cannot be written.
    pub fn create(&self, site: &SiteDto) -> Result<(), RepositoryError> {
        validate_domain(&site.domain)?;
        let mut sites = self.all()?;
        if sites.iter().any(|existing| existing.domain == site.domain) {
            return Err(RepositoryError::Duplicate { kind: "site", name: site.domain.clone() });
        }
        if site.servers.is_empty() {
            return Err(RepositoryError::NoServers(site.domain.clone()));
        }
        let mut unknown = Vec::new();
        for name in &site.servers {
            if !self.servers.exists(name)? {
                unknown.push(name.clone());
            }
        }
        if !unknown.is_empty() {
            return Err(RepositoryError::UnknownServers(unknown));
        }

        sites.push(site.clone());
        self.store.set_as(COLLECTION, &sites)?;
        debug!(domain = %site.domain, count = sites.len(), "site appended");
        Ok(())
    }

    /// Removes a site.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] if there is no such site, or an
    /// error if the inventory cannot be written.
    pub fn delete(&self, domain: &str) -> Result<(), RepositoryError> {
        let mut sites = self.all()?;
        let before = sites.len();
        sites.retain(|site| site.domain != domain);
        if sites.len() == before {
            return Err(RepositoryError::NotFound { kind: "site", name: domain.to_string() });
        }
        self.store.set_as(COLLECTION, &sites)?;
        Ok(())
    }
}

impl Autowire for SiteRepository {
    fn signature() -> Signature {
        Signature::empty()
            .param(Parameter::service::<InventoryStore>("store"))
            .param(Parameter::service::<ServerRepository>("servers"))
    }

    fn construct(args: &mut Arguments) -> Result<Self, ContainerError> {
        let store = args.take()?;
        let servers = args.take()?;
        Ok(Self::new(store, servers))
    }
}
