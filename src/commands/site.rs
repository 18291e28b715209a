//! `deployer site` commands.

use tracing::debug;

use super::table;
use crate::cli::SiteAddArgs;
use crate::container::{Arguments, Autowire, ContainerError, Parameter, Signature};
use crate::model::SiteDto;
use crate::ports::SharedGitRepo;
use crate::repository::SiteRepository;

/// Branch used when none is given and git cannot tell.
pub const DEFAULT_BRANCH: &str = "main";

/// Registers a site, filling repository and branch from git when omitted.
pub struct SiteAddCommand {
    sites: SiteRepository,
    git: SharedGitRepo,
}

impl SiteAddCommand {
    /// Execute the `site add` command.
    ///
    /// # Errors
    ///
    /// Returns an error string if no repository URL is given or found, the
    /// site is rejected by the repository, or the inventory cannot be written.
    pub fn run(&self, args: &SiteAddArgs) -> Result<(), String> {
        let site = self.site_from(args)?;
        self.sites.create(&site).map_err(|err| err.to_string())?;
        println!(
            "Site {} added ({} @ {}) on {}.",
            site.domain,
            site.repo,
            site.branch,
            site.servers.join(", ")
        );
        Ok(())
    }

    fn site_from(&self, args: &SiteAddArgs) -> Result<SiteDto, String> {
        let repo = match &args.repo {
            Some(repo) => repo.clone(),
            None => self
                .git
                .remote_url()
                .map_err(|err| format!("no --repo given and no origin remote found: {err}"))?,
        };
        let branch = match &args.branch {
            Some(branch) => branch.clone(),
            None => self.git.current_branch().unwrap_or_else(|err| {
                debug!(error = %err, "falling back to default branch");
                DEFAULT_BRANCH.to_string()
            }),
        };
        let mut servers: Vec<String> = Vec::with_capacity(args.servers.len());
        for name in &args.servers {
            if !servers.contains(name) {
                servers.push(name.clone());
            }
        }
        Ok(SiteDto { domain: args.domain.clone(), repo, branch, servers })
    }
}

impl Autowire for SiteAddCommand {
    fn signature() -> Signature {
        Signature::empty()
            .param(Parameter::service::<SiteRepository>("sites"))
            .param(Parameter::service::<SharedGitRepo>("git"))
    }

    fn construct(args: &mut Arguments) -> Result<Self, ContainerError> {
        let sites = args.take()?;
        let git = args.take()?;
        Ok(Self { sites, git })
    }
}

/// Lists registered sites.
pub struct SiteListCommand {
    sites: SiteRepository,
}

impl SiteListCommand {
    /// Execute the `site list` command.
    ///
    /// # Errors
    ///
    /// Returns an error string if the inventory cannot be read.
    pub fn run(&self) -> Result<(), String> {
        print!("{}", self.render()?);
        Ok(())
    }

    fn render(&self) -> Result<String, String> {
        let sites = self.sites.all().map_err(|err| err.to_string())?;
        if sites.is_empty() {
            return Ok("No sites registered.\n".to_string());
        }
        let rows: Vec<Vec<String>> = sites
            .iter()
            .map(|site| {
                vec![
                    site.domain.clone(),
                    site.branch.clone(),
                    site.servers.join(","),
                    site.repo.clone(),
                ]
            })
            .collect();
        let table = table::render(&["DOMAIN", "BRANCH", "SERVERS", "REPO"], &rows);
        Ok(format!("{table}\n{} site(s) total.\n", rows.len()))
    }
}

impl Autowire for SiteListCommand {
    fn signature() -> Signature {
        Signature::empty().param(Parameter::service::<SiteRepository>("sites"))
    }

    fn construct(args: &mut Arguments) -> Result<Self, ContainerError> {
        Ok(Self { sites: args.take()? })
    }
}

/// Removes a site.
pub struct SiteRemoveCommand {
    sites: SiteRepository,
}

impl SiteRemoveCommand {
    /// Execute the `site remove` command.
    ///
    /// # Errors
    ///
    /// Returns an error string if the site does not exist or the inventory
    /// cannot be written.
    pub fn run(&self, domain: &str) -> Result<(), String> {
        self.sites.delete(domain).map_err(|err| err.to_string())?;
        println!("Site {domain} removed.");
        Ok(())
    }
}

impl Autowire for SiteRemoveCommand {
    fn signature() -> Signature {
        Signature::empty().param(Parameter::service::<SiteRepository>("sites"))
    }

    fn construct(args: &mut Arguments) -> Result<Self, ContainerError> {
        Ok(Self { sites: args.take()? })
    }
}
