//! Launcher entry rendering.

use std::path::{Path, PathBuf};

use crate::consts::{
  DEFAULT_CATEGORIES, DESKTOP_SUFFIX, LAUNCH_COMMAND, SITE_FIELD, SITE_ICON_FILENAME, WM_CLASS_PREFIX,
};

/// Filesystem-safe form of an application name: alphanumerics only, lower-cased.
pub fn slug(name: &str) -> String {
  name.chars().filter(|c| c.is_alphanumeric()).flat_map(char::to_lowercase).collect()
}

/// Launcher file name for an application.
///
/// A name with no alphanumerics falls back to the site id so the file still
/// matches the scanner's suffix and never collides with another launcher.
pub fn entry_file_name(name: &str, site_id: &str) -> String {
  let slug = match slug(name) {
    s if s.is_empty() => site_id.to_lowercase(),
    s => s,
  };
  format!("{}{}", slug, DESKTOP_SUFFIX)
}

/// Pick the `Icon=` value for a launcher.
///
/// A configured icon that was copied into the site directory is referenced
/// there; any other configured value (theme name, URI) is used verbatim; with
/// nothing configured the site-local icon path is used.
pub fn resolve_icon(configured: Option<&str>, site_dir: &Path, copied: bool) -> String {
  let local = site_dir.join(SITE_ICON_FILENAME).display().to_string();
  match configured {
    Some(_) if copied => local,
    Some(value) if !value.is_empty() => value.to_string(),
    _ => local,
  }
}

/// A launcher for one deployed application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesktopEntry {
  pub name: String,
  pub site_id: String,
  pub icon: String,
  pub mime_types: Vec<String>,
  pub categories: Vec<String>,
  pub keywords: Vec<String>,
}

impl DesktopEntry {
  pub fn file_name(&self) -> String {
    entry_file_name(&self.name, &self.site_id)
  }

  pub fn path_in(&self, dir: &Path) -> PathBuf {
    dir.join(self.file_name())
  }

  pub fn render(&self) -> String {
    let mut out = String::new();
    out.push_str("[Desktop Entry]\n");
    push_field(&mut out, "Name", &self.name);
    push_field(&mut out, "Exec", &format!("{} {}", LAUNCH_COMMAND, self.site_id));
    push_field(&mut out, "Type", "Application");
    push_field(&mut out, "Terminal", "false");
    push_field(&mut out, "Icon", &self.icon);
    push_field(&mut out, "StartupWMClass", &format!("{}{}", WM_CLASS_PREFIX, self.site_id));

    if let Some(mime) = join_list(&self.mime_types) {
      push_field(&mut out, "MimeType", &mime);
    }

    let categories = join_list(&self.categories).unwrap_or_else(|| format!("{};", DEFAULT_CATEGORIES.join(";")));
    push_field(&mut out, "Categories", &categories);

    if let Some(keywords) = join_list(&self.keywords) {
      push_field(&mut out, "Keywords", &keywords);
    }

    push_field(&mut out, SITE_FIELD, &self.site_id);
    out
  }
}

fn push_field(out: &mut String, key: &str, value: &str) {
  out.push_str(key);
  out.push('=');
  out.push_str(value);
  out.push('\n');
}

// `a;b;` for a non-empty list. Items that already end in `;` are not doubled.
fn join_list(items: &[String]) -> Option<String> {
  if items.is_empty() {
    return None;
  }
  let mut joined = items.join(";");
  if !joined.ends_with(';') {
    joined.push(';');
  }
  Some(joined)
}
