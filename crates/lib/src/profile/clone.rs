//! Cloning a profile from a template directory.

use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::Path;

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::util::fs::{normalize_permissions, remove_path};

use super::ProfileError;

/// Name prefix of in-progress clones inside the profiles directory.
const STAGING_PREFIX: &str = ".clone-";

/// Runtime lock files that must never be copied.
const LOCK_FILES: &[&str] = &["lock", ".parentlock"];

/// Stateful artifacts that would make the new profile inherit the template's
/// addon and search state.
pub const STATEFUL_ARTIFACTS: &[&str] = &[
  "compatibility.ini",
  "search.json.mozlz4",
  "startupCache",
  "extensions.json",
  "extensions",
  "addonStartup.json.lz4",
  "extension-preferences.json",
  "extension-settings.json",
];

/// Replace `dest` with a sanitized, writable copy of `template`.
///
/// The copy is assembled in a staging directory next to `dest` and renamed
/// into place once complete. A failed clone leaves `dest` absent.
pub fn clone_from_template(template: &Path, dest: &Path) -> Result<(), ProfileError> {
  if !template.is_dir() {
    return Err(ProfileError::TemplateMissing(template.to_path_buf()));
  }

  let parent = dest.parent().unwrap_or(Path::new("."));
  fs::create_dir_all(parent).map_err(io_err(parent))?;
  let staging = tempfile::Builder::new()
    .prefix(STAGING_PREFIX)
    .tempdir_in(parent)
    .map_err(io_err(parent))?;

  info!(template = ?template, dest = ?dest, "cloning profile from template");
  copy_tree(template, staging.path())?;

  // Templates usually come from a read-only store.
  normalize_permissions(staging.path());
  sanitize(staging.path())?;

  remove_path(dest).map_err(io_err(dest))?;
  fs::rename(staging.path(), dest).map_err(io_err(dest))?;
  Ok(())
}

fn copy_tree(template: &Path, dest: &Path) -> Result<(), ProfileError> {
  let walker = WalkDir::new(template)
    .into_iter()
    .filter_entry(|e| e.depth() == 0 || !is_lock_file(e.file_name()));

  for entry in walker {
    let entry = entry?;
    let relative = entry.path().strip_prefix(template).unwrap_or(Path::new(""));
    let target = dest.join(relative);
    let file_type = entry.file_type();

    if file_type.is_dir() {
      fs::create_dir_all(&target).map_err(io_err(&target))?;
    } else if file_type.is_symlink() {
      copy_symlink(entry.path(), &target)?;
    } else {
      fs::copy(entry.path(), &target).map_err(io_err(&target))?;
    }
  }
  Ok(())
}

/// Remove every stateful artifact from the profile root.
pub fn sanitize(profile_dir: &Path) -> Result<(), ProfileError> {
  for name in STATEFUL_ARTIFACTS {
    let path = profile_dir.join(name);
    remove_path(&path).map_err(io_err(&path))?;
  }
  Ok(())
}

fn is_lock_file(name: &OsStr) -> bool {
  LOCK_FILES.iter().any(|lock| name == *lock)
}

/// Copy what a symlink points at: file contents for files, the link itself
/// for directories. Dangling links are skipped.
fn copy_symlink(source: &Path, target: &Path) -> Result<(), ProfileError> {
  match fs::metadata(source) {
    Ok(meta) if meta.is_file() => {
      fs::copy(source, target).map_err(io_err(target))?;
    }
    Ok(_) => {
      let link = fs::read_link(source).map_err(io_err(source))?;
      make_symlink(&link, target).map_err(io_err(target))?;
    }
    Err(e) if e.kind() == io::ErrorKind::NotFound => {
      debug!(path = ?source, "skipping dangling symlink");
    }
    Err(e) => return Err(io_err(source)(e)),
  }
  Ok(())
}

#[cfg(unix)]
fn make_symlink(link: &Path, target: &Path) -> io::Result<()> {
  std::os::unix::fs::symlink(link, target)
}

#[cfg(windows)]
fn make_symlink(link: &Path, target: &Path) -> io::Result<()> {
  std::os::windows::fs::symlink_dir(link, target)
}

fn io_err(path: &Path) -> impl FnOnce(io::Error) -> ProfileError + '_ {
  move |source| ProfileError::Io {
    path: path.to_path_buf(),
    source,
  }
}
