//! Recovering deployed applications from launcher files.
//!
//! Launchers are the ground truth for which applications exist. Only two
//! fields are read back, each from the first line that starts with its key.

use std::path::PathBuf;

use serde::Serialize;

use crate::consts::SITE_FIELD;

/// An application found on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeployedApp {
  pub entry_path: PathBuf,
  pub site_id: String,
}

/// Extract `(name, site_id)` from launcher text.
///
/// Returns `None` when either field is missing or empty, which marks the file
/// as foreign.
pub fn parse_entry(text: &str) -> Option<(String, String)> {
  let name = first_field(text, "Name")?;
  let site_id = first_field(text, SITE_FIELD)?;
  Some((name.to_string(), site_id.to_string()))
}

fn first_field<'a>(text: &'a str, key: &str) -> Option<&'a str> {
  text
    .lines()
    .filter_map(|line| line.strip_prefix(key)?.strip_prefix('='))
    .map(|value| value.trim_end_matches('\r'))
    .find(|value| !value.is_empty())
}
