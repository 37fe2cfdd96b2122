//! Small filesystem helpers shared by the stores.

use std::fs;
use std::io;
use std::path::Path;

use tracing::{debug, warn};
use walkdir::WalkDir;

/// Write `contents` to `path` unless the file already holds exactly those bytes.
///
/// Returns whether the file was written. Parent directories are created.
pub fn write_if_changed(path: &Path, contents: &[u8]) -> io::Result<bool> {
  match fs::read(path) {
    Ok(existing) if existing == contents => return Ok(false),
    Ok(_) => {}
    Err(e) if e.kind() == io::ErrorKind::NotFound => {}
    Err(e) => return Err(e),
  }

  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent)?;
  }
  fs::write(path, contents)?;
  Ok(true)
}

/// Write via a sibling temp file and rename, so readers never see a torn file.
pub fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
  let file_name = path
    .file_name()
    .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?;
  let mut temp_name = file_name.to_os_string();
  temp_name.push(".tmp");
  let temp_path = path.with_file_name(temp_name);

  fs::write(&temp_path, contents)?;
  fs::rename(&temp_path, path)
}

/// Remove a file or directory tree. A missing path is not an error.
pub fn remove_path(path: &Path) -> io::Result<()> {
  let metadata = match fs::symlink_metadata(path) {
    Ok(m) => m,
    Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
    Err(e) => return Err(e),
  };

  if !metadata.is_dir() {
    return ignore_not_found(fs::remove_file(path));
  }

  match fs::remove_dir_all(path) {
    Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
      // Trees cloned from a read-only source may still carry read-only
      // directories; make them writable and retry once.
      debug!(path = ?path, "permission denied, making tree writable and retrying");
      normalize_permissions(path);
      ignore_not_found(fs::remove_dir_all(path))
    }
    other => ignore_not_found(other),
  }
}

fn ignore_not_found(result: io::Result<()>) -> io::Result<()> {
  match result {
    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
    other => other,
  }
}

/// Normalise permissions under `path`: directories `0o755`, files `0o644`.
///
/// Symlinks are left alone. Best-effort: entries that cannot be changed are
/// logged and skipped.
pub fn normalize_permissions(path: &Path) {
  // Pre-order so a directory is enterable before its children are visited.
  for entry in WalkDir::new(path) {
    match entry {
      Ok(entry) if entry.path_is_symlink() => {}
      Ok(entry) => {
        if let Err(e) = set_normal_mode(entry.path(), entry.file_type().is_dir()) {
          warn!(path = ?entry.path(), error = %e, "failed to normalise permissions, continuing");
        }
      }
      Err(e) => warn!(path = ?path, error = %e, "failed to traverse, continuing"),
    }
  }
}

#[cfg(unix)]
fn set_normal_mode(path: &Path, is_dir: bool) -> io::Result<()> {
  use std::os::unix::fs::PermissionsExt;

  let mode = if is_dir { 0o755 } else { 0o644 };
  fs::set_permissions(path, fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_normal_mode(path: &Path, _is_dir: bool) -> io::Result<()> {
  let mut perms = fs::metadata(path)?.permissions();
  #[allow(clippy::permissions_set_readonly_false)]
  perms.set_readonly(false);
  fs::set_permissions(path, perms)
}
