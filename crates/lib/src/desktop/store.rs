//! Launcher directory on disk.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use crate::consts::DESKTOP_SUFFIX;
use crate::util::fs::{remove_path, write_if_changed};

use super::entry::DesktopEntry;
use super::scan::{DeployedApp, parse_entry};

#[derive(Debug, Error)]
pub enum EntryError {
  #[error("failed to read launcher directory {path}: {source}")]
  ReadDir {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to write launcher {path}: {source}")]
  Write {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to remove launcher {path}: {source}")]
  Remove {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

/// The directory holding our `*-fpwa.desktop` launchers.
#[derive(Debug, Clone)]
pub struct DesktopDir {
  dir: PathBuf,
}

impl DesktopDir {
  pub fn new(dir: PathBuf) -> Self {
    Self { dir }
  }

  pub fn dir(&self) -> &Path {
    &self.dir
  }

  /// Map of application name to its launcher and site id.
  ///
  /// A missing directory scans as empty. Unreadable or foreign files are
  /// skipped. Files are visited in name order; if two launchers carry the
  /// same name the first one wins.
  pub fn scan(&self) -> Result<BTreeMap<String, DeployedApp>, EntryError> {
    let mut found = BTreeMap::new();

    let entries = match fs::read_dir(&self.dir) {
      Ok(entries) => entries,
      Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(found),
      Err(source) => {
        return Err(EntryError::ReadDir {
          path: self.dir.clone(),
          source,
        });
      }
    };

    let mut paths: Vec<PathBuf> = entries
      .flatten()
      .map(|e| e.path())
      .filter(|p| p.file_name().and_then(|n| n.to_str()).is_some_and(|n| n.ends_with(DESKTOP_SUFFIX)))
      .collect();
    paths.sort();

    for path in paths {
      let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) => {
          debug!(path = ?path, error = %e, "skipping unreadable launcher");
          continue;
        }
      };

      let Some((name, site_id)) = parse_entry(&text) else {
        debug!(path = ?path, "skipping launcher without site id");
        continue;
      };

      if let Some(kept) = found.get(&name) {
        warn!(name = %name, kept = ?kept.entry_path, ignored = ?path, "duplicate launcher name");
        continue;
      }

      found.insert(
        name,
        DeployedApp {
          entry_path: path,
          site_id,
        },
      );
    }

    Ok(found)
  }

  /// Write a launcher, replacing any previous one for the same slug.
  pub fn write(&self, entry: &DesktopEntry) -> Result<PathBuf, EntryError> {
    let path = entry.path_in(&self.dir);
    match write_if_changed(&path, entry.render().as_bytes()) {
      Ok(true) => debug!(path = ?path, "wrote launcher"),
      Ok(false) => debug!(path = ?path, "launcher unchanged"),
      Err(source) => return Err(EntryError::Write { path, source }),
    }
    Ok(path)
  }

  pub fn remove(&self, path: &Path) -> Result<(), EntryError> {
    remove_path(path).map_err(|source| EntryError::Remove {
      path: path.to_path_buf(),
      source,
    })
  }
}
