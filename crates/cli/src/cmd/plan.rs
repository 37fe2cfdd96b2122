//! Implementation of the `pwasync plan` command.
//!
//! Diffs deployed launchers against a manifest and prints what a sync would
//! do. Nothing is written.

use std::path::Path;

use anyhow::{Context, Result};

use pwasync_lib::desktop::DesktopDir;
use pwasync_lib::manifest::Manifest;
use pwasync_lib::platform::paths::Layout;
use pwasync_lib::sync;

use crate::output::{describe_app, print_change, print_info, print_json, print_stat, symbols};

pub fn cmd_plan(layout: &Layout, manifest_path: &Path, json: bool) -> Result<()> {
  let manifest = Manifest::from_file(manifest_path)
    .with_context(|| format!("Failed to load manifest: {}", manifest_path.display()))?;

  let entries = DesktopDir::new(layout.applications_dir.clone());
  let plan = sync::plan(&entries, &manifest).context("Failed to scan deployed applications")?;

  if json {
    return print_json(&plan);
  }

  if plan.is_noop() {
    print_info("Nothing deployed and nothing desired");
    return Ok(());
  }

  for (name, app) in &plan.prune {
    print_change(symbols::REMOVE, &describe_app(name, Some(&app.site_id)));
  }
  for name in &plan.create {
    print_change(symbols::ADD, &describe_app(name, None));
  }
  for (name, app) in &plan.update {
    print_change(symbols::MODIFY, &describe_app(name, Some(&app.site_id)));
  }

  println!();
  print_stat("To create", &plan.create.len().to_string());
  print_stat("To update", &plan.update.len().to_string());
  print_stat("To prune", &plan.prune.len().to_string());

  Ok(())
}
