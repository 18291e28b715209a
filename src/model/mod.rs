//! Domain records kept in the inventory.

mod server;
mod site;

pub use server::{ServerDto, DEFAULT_SSH_PORT, DEFAULT_USERNAME};
pub use site::SiteDto;
