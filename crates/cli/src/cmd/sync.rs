//! Implementation of the `pwasync sync` command.
//!
//! Reconciles deployed applications with a manifest: prunes applications the
//! manifest no longer names, then creates or refreshes every one it does.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::info;

use pwasync_lib::manifest::Manifest;
use pwasync_lib::platform::paths::Layout;
use pwasync_lib::resolve::{HttpResolver, Passthrough, UrlResolver};
use pwasync_lib::store::FsStores;
use pwasync_lib::sync::{Reconciler, SyncOptions, SyncReport};

use crate::output::{
  describe_app, print_change, print_error, print_info, print_json, print_stat, print_success, print_warning, symbols,
};

/// Execute the sync command.
///
/// Fails with a non-zero exit status when any application could not be
/// reconciled; the summary is printed either way.
pub fn cmd_sync(
  layout: &Layout,
  manifest_path: &Path,
  template: Option<PathBuf>,
  offline: bool,
  json: bool,
) -> Result<()> {
  let manifest = Manifest::from_file(manifest_path)
    .with_context(|| format!("Failed to load manifest: {}", manifest_path.display()))?;

  info!(manifest = %manifest_path.display(), apps = manifest.len(), "loaded manifest");

  if let Some(missing) = template.as_deref().filter(|t| !t.is_dir()) {
    bail!("Template profile not found: {}", missing.display());
  }

  let options = SyncOptions {
    default_template: template,
  };
  let mut stores = FsStores::new(layout);
  info!(data_home = %layout.data_home.display(), offline, "syncing");

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let result = if offline {
    rt.block_on(run(&mut stores, Passthrough, options, &manifest))
  } else {
    let resolver = HttpResolver::new().context("Failed to create HTTP client")?;
    rt.block_on(run(&mut stores, resolver, options, &manifest))
  };
  let report = result.context("Sync failed")?;

  if json {
    print_json(&report)?;
  } else {
    print_report(&report);
  }

  if !report.is_success() {
    bail!("{} application(s) failed to sync", report.failures.len());
  }
  Ok(())
}

async fn run<R: UrlResolver>(
  stores: &mut FsStores,
  resolver: R,
  options: SyncOptions,
  manifest: &Manifest,
) -> Result<SyncReport> {
  let mut reconciler = Reconciler::new(stores.stores(), resolver, options);
  Ok(reconciler.sync(manifest).await?)
}

fn print_report(report: &SyncReport) {
  if report.changed() == 0 && report.failures.is_empty() {
    print_info("Nothing to sync");
    return;
  }

  for outcome in &report.pruned {
    print_change(symbols::REMOVE, &describe_app(&outcome.name, Some(&outcome.site_id)));
  }
  for outcome in &report.created {
    print_change(symbols::ADD, &describe_app(&outcome.name, Some(&outcome.site_id)));
  }
  for outcome in &report.updated {
    print_change(symbols::MODIFY, &describe_app(&outcome.name, Some(&outcome.site_id)));
  }
  for warning in &report.warnings {
    print_warning(&format!("{}: {}", warning.name, warning.message));
  }
  for failure in &report.failures {
    print_error(&format!("{}: {}", failure.name, failure.message));
  }

  println!();
  if report.is_success() {
    print_success("Sync complete!");
  }
  print_stat("Created", &report.created.len().to_string());
  print_stat("Updated", &report.updated.len().to_string());
  print_stat("Pruned", &report.pruned.len().to_string());
  if !report.failures.is_empty() {
    print_stat("Failed", &report.failures.len().to_string());
  }
}
