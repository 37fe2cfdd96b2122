//! Filesystem layout of the browser runtime's per-user data.
//!
//! ```text
//! {data_home}/
//! ├── applications/            # launcher entries (*-fpwa.desktop)
//! └── firefoxpwa/
//!     ├── config.json          # registry of profiles and sites
//!     ├── profiles/<id>/       # isolated browser profiles
//!     └── sites/<id>/          # generated web manifests and icons
//! ```

use std::path::PathBuf;

use thiserror::Error;

use crate::consts::{APPLICATIONS_DIR, PROFILES_DIR, REGISTRY_FILENAME, RUNTIME_DIR, SITES_DIR};

#[derive(Debug, Error)]
pub enum PathsError {
  #[error("neither XDG_DATA_HOME nor HOME is set")]
  NoHome,
}

/// Returns the user's home directory
pub fn home_dir() -> Result<PathBuf, PathsError> {
  non_empty_var("HOME").ok_or(PathsError::NoHome)
}

/// Returns the XDG data home (`$XDG_DATA_HOME`, or `~/.local/share`).
pub fn data_home() -> Result<PathBuf, PathsError> {
  match non_empty_var("XDG_DATA_HOME") {
    Some(path) => Ok(path),
    None => Ok(home_dir()?.join(".local").join("share")),
  }
}

// An empty XDG variable counts as unset.
fn non_empty_var(name: &str) -> Option<PathBuf> {
  std::env::var_os(name).filter(|v| !v.is_empty()).map(PathBuf::from)
}

/// Resolved locations of every store the engine touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
  pub data_home: PathBuf,
  pub runtime_root: PathBuf,
  pub sites_dir: PathBuf,
  pub profiles_dir: PathBuf,
  pub registry_path: PathBuf,
  pub applications_dir: PathBuf,
}

impl Layout {
  pub fn new(data_home: impl Into<PathBuf>) -> Self {
    let data_home = data_home.into();
    let runtime_root = data_home.join(RUNTIME_DIR);
    Self {
      sites_dir: runtime_root.join(SITES_DIR),
      profiles_dir: runtime_root.join(PROFILES_DIR),
      registry_path: runtime_root.join(REGISTRY_FILENAME),
      applications_dir: data_home.join(APPLICATIONS_DIR),
      runtime_root,
      data_home,
    }
  }

  /// Layout rooted at the data home taken from the environment.
  pub fn from_env() -> Result<Self, PathsError> {
    Ok(Self::new(data_home()?))
  }

  pub fn site_dir(&self, site_id: &str) -> PathBuf {
    self.sites_dir.join(site_id)
  }

  pub fn profile_dir(&self, profile_id: &str) -> PathBuf {
    self.profiles_dir.join(profile_id)
  }
}
