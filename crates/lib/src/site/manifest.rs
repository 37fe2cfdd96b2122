//! Generated web application manifest for a site.

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::consts::SITE_ICON_FILENAME;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestIcon {
  pub src: String,
  pub sizes: String,
  #[serde(rename = "type")]
  pub mime_type: String,
  pub purpose: String,
}

/// The web manifest written to the site directory and mirrored in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebManifest {
  pub name: String,
  pub short_name: String,
  pub start_url: String,
  pub scope: String,
  pub display: String,
  pub background_color: String,
  pub theme_color: String,
  pub icons: Vec<ManifestIcon>,
}

impl WebManifest {
  pub fn for_app(name: &str, url: &str) -> Self {
    Self {
      name: name.to_string(),
      short_name: name.to_string(),
      start_url: url.to_string(),
      scope: scope_of(url),
      display: "standalone".to_string(),
      background_color: "#000000".to_string(),
      theme_color: "#000000".to_string(),
      icons: vec![ManifestIcon {
        src: SITE_ICON_FILENAME.to_string(),
        sizes: "512x512".to_string(),
        mime_type: "image/png".to_string(),
        purpose: "any".to_string(),
      }],
    }
  }
}

/// `scheme://host[:port]/` of a URL, or the URL itself if it has no host.
pub fn scope_of(url: &str) -> String {
  let Ok(parsed) = Url::parse(url) else {
    return url.to_string();
  };
  match parsed.host_str() {
    Some(host) => match parsed.port() {
      Some(port) => format!("{}://{}:{}/", parsed.scheme(), host, port),
      None => format!("{}://{}/", parsed.scheme(), host),
    },
    None => url.to_string(),
  }
}
