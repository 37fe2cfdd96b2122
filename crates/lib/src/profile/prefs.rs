//! `user.js` preferences injected into every managed profile.

use std::path::Path;

use crate::consts::{PREFS_FILENAME, PROFILE_USER_AGENT};
use crate::util::fs::write_if_changed;

use super::ProfileError;
use super::layout::encode_layout;

/// Render the full `user.js` for a profile.
///
/// The file is always generated whole so re-running with a different (or no)
/// layout leaves no stale lines behind.
pub fn render_prefs(layout: Option<&str>) -> String {
  let mut out = String::new();
  out.push_str(&format!("user_pref(\"general.useragent.override\", \"{}\");\n", PROFILE_USER_AGENT));
  out.push_str("user_pref(\"toolkit.legacyUserProfileCustomizations.stylesheets\", true);\n");
  out.push_str("user_pref(\"extensions.autoDisableScopes\", 0);\n");

  if let Some(state) = layout.and_then(encode_layout) {
    out.push_str(&format!("user_pref(\"browser.uiCustomization.state\", \"{}\");\n", state));
  }
  out
}

/// Write `user.js` into `profile_dir`, replacing any previous content.
pub fn inject_prefs(profile_dir: &Path, layout: Option<&str>) -> Result<bool, ProfileError> {
  let path = profile_dir.join(PREFS_FILENAME);
  write_if_changed(&path, render_prefs(layout).as_bytes()).map_err(|source| ProfileError::Io { path, source })
}
