//! Profile and site identity registry.

mod store;
mod types;

pub use store::{RegistryError, RegistryFile};
pub use types::{ProfileRecord, Registry, SiteConfig, SiteRecord};
