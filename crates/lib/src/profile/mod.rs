//! Isolated browser profiles.
//!
//! A profile is cloned from a template once, the first time its application
//! is deployed. Later syncs only rewrite the injected preferences and
//! policies, so cookies and logins accumulated in the profile survive.

mod clone;
pub mod layout;
mod policies;
mod prefs;

pub use clone::{STATEFUL_ARTIFACTS, clone_from_template, sanitize};
pub use policies::{build_policies, inject_policies, parse_addon};
pub use prefs::{inject_prefs, render_prefs};

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::util::fs::remove_path;

#[derive(Debug, Error)]
pub enum ProfileError {
  #[error("template profile not found: {0}")]
  TemplateMissing(PathBuf),

  #[error("profile I/O failed for {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to walk template: {0}")]
  Walk(#[from] walkdir::Error),

  #[error("failed to serialize policies: {0}")]
  Serialize(#[source] serde_json::Error),
}

/// How a profile came to exist on this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Materialized {
  /// Freshly cloned from a template.
  Cloned,
  /// Already present; left untouched.
  Existing,
  /// Created empty because no template was configured.
  Empty,
}

/// Per-application settings injected into a profile on every sync.
#[derive(Debug, Clone, Copy)]
pub struct ProfileSettings<'a> {
  pub layout: Option<&'a str>,
  pub extensions: &'a [String],
  pub extra_policies: &'a Map<String, Value>,
}

/// The `profiles/` directory on disk.
#[derive(Debug, Clone)]
pub struct ProfileDir {
  base: PathBuf,
}

impl ProfileDir {
  pub fn new(base: PathBuf) -> Self {
    Self { base }
  }

  pub fn path(&self, profile_id: &str) -> PathBuf {
    self.base.join(profile_id)
  }

  pub fn exists(&self, profile_id: &str) -> bool {
    self.path(profile_id).is_dir()
  }

  /// Make sure the profile directory exists, cloning it only if it does not.
  pub fn materialize(&self, profile_id: &str, template: Option<&Path>) -> Result<Materialized, ProfileError> {
    let dest = self.path(profile_id);
    if dest.is_dir() {
      debug!(profile = %profile_id, "profile exists, keeping session state");
      return Ok(Materialized::Existing);
    }

    match template {
      Some(template) => {
        clone_from_template(template, &dest)?;
        Ok(Materialized::Cloned)
      }
      None => {
        fs::create_dir_all(&dest).map_err(|source| ProfileError::Io { path: dest, source })?;
        Ok(Materialized::Empty)
      }
    }
  }

  /// Rewrite `user.js` and `policies.json` for the profile.
  pub fn configure(&self, profile_id: &str, settings: &ProfileSettings<'_>) -> Result<(), ProfileError> {
    let dir = self.path(profile_id);
    inject_prefs(&dir, settings.layout)?;
    inject_policies(&dir, settings.extensions, settings.extra_policies)?;
    Ok(())
  }

  pub fn remove(&self, profile_id: &str) -> Result<(), ProfileError> {
    let dir = self.path(profile_id);
    remove_path(&dir).map_err(|source| ProfileError::Io { path: dir, source })
  }
}
