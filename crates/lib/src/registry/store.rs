//! Registry file storage.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use crate::util::fs::write_atomic;

use super::types::Registry;

#[derive(Debug, Error)]
pub enum RegistryError {
  #[error("failed to read registry: {0}")]
  Read(#[source] io::Error),

  #[error("failed to parse registry: {0}")]
  Parse(#[source] serde_json::Error),

  #[error("failed to serialize registry: {0}")]
  Serialize(#[source] serde_json::Error),

  #[error("failed to create registry directory: {0}")]
  CreateDir(#[source] io::Error),

  #[error("failed to write registry: {0}")]
  Write(#[source] io::Error),
}

/// The registry JSON file on disk.
#[derive(Debug, Clone)]
pub struct RegistryFile {
  path: PathBuf,
}

impl RegistryFile {
  pub fn new(path: PathBuf) -> Self {
    Self { path }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Load the registry, distinguishing failure kinds.
  ///
  /// A missing file is an empty registry, not an error.
  pub fn try_load(&self) -> Result<Registry, RegistryError> {
    let content = match fs::read_to_string(&self.path) {
      Ok(content) => content,
      Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Registry::new()),
      Err(e) => return Err(RegistryError::Read(e)),
    };

    serde_json::from_str(&content).map_err(RegistryError::Parse)
  }

  /// Load the registry, treating an unreadable or corrupt file as empty.
  ///
  /// Only a document that is not a registry at all is dropped, and the next
  /// [`save`](Self::save) replaces it. Individual records the runtime wrote in
  /// an unexpected shape are kept as they are.
  pub fn load(&self) -> Registry {
    match self.try_load() {
      Ok(registry) => registry,
      Err(e) => {
        warn!(path = ?self.path, error = %e, "registry unusable, starting from empty state");
        Registry::new()
      }
    }
  }

  /// Persist the registry as compact JSON.
  pub fn save(&self, registry: &Registry) -> Result<(), RegistryError> {
    if let Some(parent) = self.path.parent() {
      fs::create_dir_all(parent).map_err(RegistryError::CreateDir)?;
    }

    let content = serde_json::to_vec(registry).map_err(RegistryError::Serialize)?;
    if fs::read(&self.path).is_ok_and(|existing| existing == content) {
      debug!(path = ?self.path, "registry unchanged");
      return Ok(());
    }

    write_atomic(&self.path, &content).map_err(RegistryError::Write)?;
    debug!(path = ?self.path, "registry saved");
    Ok(())
  }

  /// Remove a site and its profile, then persist.
  ///
  /// Either id may already be absent. A profile still referenced by another
  /// site is kept. Returns the profile id whose record was removed.
  pub fn prune(&self, site_id: &str, profile_id: Option<&str>) -> Result<Option<String>, RegistryError> {
    let mut registry = self.load();
    let removed = registry.detach_site(site_id, profile_id);
    self.save(&registry)?;
    Ok(removed)
  }
}
