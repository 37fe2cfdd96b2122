//! Per-site directories: generated web manifest and icon.
//!
//! ```text
//! {sites_dir}/<site_id>/
//! ├── manifest.json
//! └── icon.png        # only when a local icon was configured
//! ```

mod manifest;

pub use manifest::{ManifestIcon, WebManifest, scope_of};

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::consts::{SITE_ICON_FILENAME, WEB_MANIFEST_FILENAME};
use crate::util::fs::{remove_path, write_if_changed};

#[derive(Debug, Error)]
pub enum SiteError {
  #[error("site I/O failed for {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to serialize web manifest: {0}")]
  Serialize(#[source] serde_json::Error),
}

fn io_err(path: &Path) -> impl FnOnce(io::Error) -> SiteError + '_ {
  move |source| SiteError::Io {
    path: path.to_path_buf(),
    source,
  }
}

/// Where a site was materialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteLocation {
  pub dir: PathBuf,
  /// Whether the configured icon was a local file and got copied in.
  pub icon_copied: bool,
}

/// The `sites/` directory on disk.
#[derive(Debug, Clone)]
pub struct SiteDir {
  base: PathBuf,
}

impl SiteDir {
  pub fn new(base: PathBuf) -> Self {
    Self { base }
  }

  pub fn path(&self, site_id: &str) -> PathBuf {
    self.base.join(site_id)
  }

  /// Create the site directory, write its manifest and copy a local icon.
  ///
  /// An icon value that is not an existing local file is left for the
  /// launcher to reference verbatim.
  pub fn materialize(
    &self,
    site_id: &str,
    manifest: &WebManifest,
    icon: Option<&str>,
  ) -> Result<SiteLocation, SiteError> {
    let dir = self.path(site_id);
    fs::create_dir_all(&dir).map_err(io_err(&dir))?;

    let manifest_path = dir.join(WEB_MANIFEST_FILENAME);
    let json = serde_json::to_vec(manifest).map_err(SiteError::Serialize)?;
    write_if_changed(&manifest_path, &json).map_err(io_err(&manifest_path))?;

    let icon_copied = match icon.map(Path::new).filter(|p| p.is_file()) {
      Some(source) => {
        let dest = dir.join(SITE_ICON_FILENAME);
        let bytes = fs::read(source).map_err(io_err(source))?;
        write_if_changed(&dest, &bytes).map_err(io_err(&dest))?;
        debug!(site = %site_id, icon = ?source, "copied icon");
        true
      }
      None => false,
    };

    Ok(SiteLocation { dir, icon_copied })
  }

  pub fn remove(&self, site_id: &str) -> Result<(), SiteError> {
    let dir = self.path(site_id);
    remove_path(&dir).map_err(io_err(&dir))
  }
}
