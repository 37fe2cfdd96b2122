//! Loading and validation of the desired-state document.

mod types;

pub use types::*;

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::desktop::slug;

#[derive(Debug, Error)]
pub enum ManifestError {
  #[error("failed to read manifest {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to parse manifest {path}: {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("application name must not be empty")]
  EmptyName,

  #[error("application '{0}' has an empty url")]
  EmptyUrl(String),

  #[error("applications '{first}' and '{second}' share the launcher name '{slug}'")]
  SlugCollision { first: String, second: String, slug: String },
}

impl Manifest {
  /// Load and validate a desired-state document from a JSON file.
  pub fn from_file(path: &Path) -> Result<Self, ManifestError> {
    let content = fs::read_to_string(path).map_err(|source| ManifestError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    let manifest: Manifest = serde_json::from_str(&content).map_err(|source| ManifestError::Parse {
      path: path.to_path_buf(),
      source,
    })?;
    manifest.validate()?;
    Ok(manifest)
  }

  /// Reject documents that could never converge.
  ///
  /// Two names with the same launcher slug would overwrite each other's
  /// desktop entry, so one of them would be re-created on every run.
  pub fn validate(&self) -> Result<(), ManifestError> {
    let mut slugs: HashMap<String, &str> = HashMap::new();

    for (name, config) in &self.apps {
      if name.trim().is_empty() {
        return Err(ManifestError::EmptyName);
      }
      if config.url.trim().is_empty() {
        return Err(ManifestError::EmptyUrl(name.clone()));
      }

      let slug = slug(name);
      if slug.is_empty() {
        continue;
      }
      if let Some(first) = slugs.insert(slug.clone(), name) {
        return Err(ManifestError::SlugCollision {
          first: first.to_string(),
          second: name.clone(),
          slug,
        });
      }
    }

    Ok(())
  }
}
