//! Desired-state document types.
//!
//! The document maps each application's display name to its configuration:
//!
//! ```json
//! {
//!   "Element": {
//!     "url": "https://app.element.io",
//!     "icon": "/nix/store/...-element.png",
//!     "layout": "arrows,refresh,spring,extensions",
//!     "extensions": ["uBlock0@raymondhill.net:https://addons.mozilla.org/.../ublock.xpi"],
//!     "categories": ["Network", "InstantMessaging"]
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Configuration of one desired application.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AppConfig {
  pub url: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub icon: Option<String>,
  /// Comma-separated toolbar layout descriptor, e.g. `"arrows,spring,refresh"`.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub layout: Option<String>,
  /// Force-installed extensions as `id:install_url`.
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub extensions: Vec<String>,
  #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
  pub extra_policies: serde_json::Map<String, serde_json::Value>,
  /// Overrides the run's default template profile for this application.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub template_profile: Option<PathBuf>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub mime_types: Vec<String>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub categories: Vec<String>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub keywords: Vec<String>,
}

impl AppConfig {
  pub fn new(url: impl Into<String>) -> Self {
    Self {
      url: url.into(),
      ..Self::default()
    }
  }
}

/// The desired set of applications, keyed by display name.
///
/// Uses [`BTreeMap`] so applications are deployed in a stable order.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
  pub apps: BTreeMap<String, AppConfig>,
}

impl Manifest {
  pub fn is_empty(&self) -> bool {
    self.apps.is_empty()
  }

  pub fn len(&self) -> usize {
    self.apps.len()
  }

  pub fn contains(&self, name: &str) -> bool {
    self.apps.contains_key(name)
  }

  pub fn insert(&mut self, name: impl Into<String>, config: AppConfig) {
    self.apps.insert(name.into(), config);
  }
}

impl FromIterator<(String, AppConfig)> for Manifest {
  fn from_iter<I: IntoIterator<Item = (String, AppConfig)>>(iter: I) -> Self {
    Self {
      apps: iter.into_iter().collect(),
    }
  }
}
