//! Enterprise policy document (`distribution/policies.json`).
//!
//! Every managed profile blocks extension installs by default and
//! force-installs exactly the extensions its application declares.

use std::path::Path;

use serde_json::{Map, Value, json};
use tracing::warn;

use crate::consts::{POLICIES_DIR, POLICIES_FILENAME};
use crate::util::fs::write_if_changed;

use super::ProfileError;

const EXTENSION_SETTINGS: &str = "ExtensionSettings";

/// Split an `id:install_url` directive on its first colon.
///
/// Returns `None` for directives without a colon or with an empty half.
pub fn parse_addon(directive: &str) -> Option<(&str, &str)> {
  let (id, url) = directive.split_once(':')?;
  let (id, url) = (id.trim(), url.trim());
  if id.is_empty() || url.is_empty() {
    return None;
  }
  Some((id, url))
}

/// Build the policy document.
///
/// `extra` is merged into `policies`; an `ExtensionSettings` object in it is
/// merged entry by entry so it can add to (or override) the wildcard block.
/// Addon directives are applied last.
pub fn build_policies(addons: &[String], extra: &Map<String, Value>) -> Value {
  let mut settings = Map::new();
  settings.insert("*".to_string(), json!({ "installation_mode": "blocked" }));

  let mut policies = Map::new();
  for (key, value) in extra {
    if key == EXTENSION_SETTINGS {
      match value {
        Value::Object(entries) => settings.extend(entries.clone()),
        other => warn!(value = %other, "ignoring non-object ExtensionSettings override"),
      }
      continue;
    }
    policies.insert(key.clone(), value.clone());
  }

  for directive in addons {
    let Some((id, url)) = parse_addon(directive) else {
      warn!(directive = %directive, "skipping malformed extension directive");
      continue;
    };
    settings.insert(
      id.to_string(),
      json!({
        "install_url": url,
        "installation_mode": "force_installed",
        "default_area": "menupanel"
      }),
    );
  }

  policies.insert(EXTENSION_SETTINGS.to_string(), Value::Object(settings));
  json!({ "policies": policies })
}

/// Write the policy document into `profile_dir`, replacing any previous one.
pub fn inject_policies(
  profile_dir: &Path,
  addons: &[String],
  extra: &Map<String, Value>,
) -> Result<bool, ProfileError> {
  let path = profile_dir.join(POLICIES_DIR).join(POLICIES_FILENAME);
  let mut content = serde_json::to_string_pretty(&build_policies(addons, extra)).map_err(ProfileError::Serialize)?;
  content.push('\n');
  write_if_changed(&path, content.as_bytes()).map_err(|source| ProfileError::Io { path, source })
}
