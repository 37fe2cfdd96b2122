//! Store interfaces the reconciliation engine is written against.
//!
//! The engine decides what to do; stores do it. Each trait has a filesystem
//! implementation over one part of a [`Layout`]:
//!
//! ```text
//! $XDG_DATA_HOME/
//! ├── applications/           # EntryStore    (DesktopDir)
//! │   └── <slug>-fpwa.desktop
//! └── firefoxpwa/
//!     ├── config.json         # RegistryStore (RegistryFile)
//!     ├── sites/<site_id>/    # SiteStore     (SiteDir)
//!     └── profiles/<id>/      # ProfileStore  (ProfileDir)
//! ```

#[cfg(test)]
pub mod memory;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::desktop::{DeployedApp, DesktopDir, DesktopEntry, EntryError};
use crate::platform::paths::Layout;
use crate::profile::{Materialized, ProfileDir, ProfileError, ProfileSettings};
use crate::registry::{Registry, RegistryError, RegistryFile};
use crate::site::{SiteDir, SiteError, SiteLocation, WebManifest};

#[derive(Debug, Error)]
pub enum StoreError {
  #[error(transparent)]
  Registry(#[from] RegistryError),

  #[error(transparent)]
  Profile(#[from] ProfileError),

  #[error(transparent)]
  Site(#[from] SiteError),

  #[error(transparent)]
  Entry(#[from] EntryError),
}

pub trait RegistryStore {
  /// Current registry. Unusable state loads as empty.
  fn load(&self) -> Registry;

  fn save(&mut self, registry: &Registry) -> Result<(), StoreError>;

  /// Remove a site (and its profile unless shared) and persist.
  fn prune(&mut self, site_id: &str, profile_id: Option<&str>) -> Result<Option<String>, StoreError>;
}

pub trait ProfileStore {
  fn exists(&self, profile_id: &str) -> bool;

  fn materialize(&mut self, profile_id: &str, template: Option<&Path>) -> Result<Materialized, StoreError>;

  fn configure(&mut self, profile_id: &str, settings: &ProfileSettings<'_>) -> Result<(), StoreError>;

  fn remove(&mut self, profile_id: &str) -> Result<(), StoreError>;
}

pub trait SiteStore {
  fn materialize(
    &mut self,
    site_id: &str,
    manifest: &WebManifest,
    icon: Option<&str>,
  ) -> Result<SiteLocation, StoreError>;

  fn remove(&mut self, site_id: &str) -> Result<(), StoreError>;
}

pub trait EntryStore {
  /// Deployed applications keyed by name.
  fn scan(&self) -> Result<BTreeMap<String, DeployedApp>, StoreError>;

  fn write(&mut self, entry: &DesktopEntry) -> Result<PathBuf, StoreError>;

  fn remove(&mut self, path: &Path) -> Result<(), StoreError>;
}

/// Borrowed handles to one of each store.
pub struct Stores<'a> {
  pub registry: &'a mut dyn RegistryStore,
  pub profiles: &'a mut dyn ProfileStore,
  pub sites: &'a mut dyn SiteStore,
  pub entries: &'a mut dyn EntryStore,
}

/// The filesystem stores for one [`Layout`].
#[derive(Debug, Clone)]
pub struct FsStores {
  pub registry: RegistryFile,
  pub profiles: ProfileDir,
  pub sites: SiteDir,
  pub entries: DesktopDir,
}

impl FsStores {
  pub fn new(layout: &Layout) -> Self {
    Self {
      registry: RegistryFile::new(layout.registry_path.clone()),
      profiles: ProfileDir::new(layout.profiles_dir.clone()),
      sites: SiteDir::new(layout.sites_dir.clone()),
      entries: DesktopDir::new(layout.applications_dir.clone()),
    }
  }

  pub fn stores(&mut self) -> Stores<'_> {
    Stores {
      registry: &mut self.registry,
      profiles: &mut self.profiles,
      sites: &mut self.sites,
      entries: &mut self.entries,
    }
  }
}

impl RegistryStore for RegistryFile {
  fn load(&self) -> Registry {
    RegistryFile::load(self)
  }

  fn save(&mut self, registry: &Registry) -> Result<(), StoreError> {
    Ok(RegistryFile::save(self, registry)?)
  }

  fn prune(&mut self, site_id: &str, profile_id: Option<&str>) -> Result<Option<String>, StoreError> {
    Ok(RegistryFile::prune(self, site_id, profile_id)?)
  }
}

impl ProfileStore for ProfileDir {
  fn exists(&self, profile_id: &str) -> bool {
    ProfileDir::exists(self, profile_id)
  }

  fn materialize(&mut self, profile_id: &str, template: Option<&Path>) -> Result<Materialized, StoreError> {
    Ok(ProfileDir::materialize(self, profile_id, template)?)
  }

  fn configure(&mut self, profile_id: &str, settings: &ProfileSettings<'_>) -> Result<(), StoreError> {
    Ok(ProfileDir::configure(self, profile_id, settings)?)
  }

  fn remove(&mut self, profile_id: &str) -> Result<(), StoreError> {
    Ok(ProfileDir::remove(self, profile_id)?)
  }
}

impl SiteStore for SiteDir {
  fn materialize(
    &mut self,
    site_id: &str,
    manifest: &WebManifest,
    icon: Option<&str>,
  ) -> Result<SiteLocation, StoreError> {
    Ok(SiteDir::materialize(self, site_id, manifest, icon)?)
  }

  fn remove(&mut self, site_id: &str) -> Result<(), StoreError> {
    Ok(SiteDir::remove(self, site_id)?)
  }
}

impl EntryStore for DesktopDir {
  fn scan(&self) -> Result<BTreeMap<String, DeployedApp>, StoreError> {
    Ok(DesktopDir::scan(self)?)
  }

  fn write(&mut self, entry: &DesktopEntry) -> Result<PathBuf, StoreError> {
    Ok(DesktopDir::write(self, entry)?)
  }

  fn remove(&mut self, path: &Path) -> Result<(), StoreError> {
    Ok(DesktopDir::remove(self, path)?)
  }
}
