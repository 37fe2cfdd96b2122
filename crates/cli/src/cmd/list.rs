//! List command implementation.
//!
//! Shows deployed applications as found on disk, joined with the profile
//! each one is registered under.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;

use pwasync_lib::desktop::DesktopDir;
use pwasync_lib::platform::paths::Layout;
use pwasync_lib::registry::RegistryFile;

use crate::output::{print_info, print_json, print_stat, print_success, symbols, truncate_id};

#[derive(Debug, Serialize)]
struct ListedApp {
  name: String,
  site_id: String,
  profile_id: Option<String>,
  entry_path: PathBuf,
}

pub fn cmd_list(layout: &Layout, json: bool) -> Result<()> {
  let deployed = DesktopDir::new(layout.applications_dir.clone())
    .scan()
    .context("Failed to scan deployed applications")?;
  let registry = RegistryFile::new(layout.registry_path.clone()).load();

  let apps: Vec<ListedApp> = deployed
    .into_iter()
    .map(|(name, app)| ListedApp {
      profile_id: registry.profile_of(&app.site_id).map(str::to_string),
      name,
      site_id: app.site_id,
      entry_path: app.entry_path,
    })
    .collect();

  if json {
    return print_json(&apps);
  }

  if apps.is_empty() {
    print_info("No applications deployed.");
    return Ok(());
  }

  print_success(&format!("{} application(s) deployed", apps.len()));
  for app in &apps {
    println!();
    println!("  {} {}", symbols::INFO, app.name);
    print_stat("Site", &app.site_id);
    match &app.profile_id {
      Some(id) => print_stat("Profile", truncate_id(id)),
      None => print_stat("Profile", "(not registered)"),
    }
    print_stat("Launcher", &app.entry_path.display().to_string());
  }

  Ok(())
}
