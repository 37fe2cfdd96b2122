//! Reconciliation of deployed applications with the desired manifest.
//!
//! One run proceeds as:
//!
//! 1. Scan launchers for the observed set
//! 2. Diff against the manifest ([`compute_plan`])
//! 3. Prune every application that is no longer desired
//! 4. Deploy every desired application, in name order
//!
//! Applications are reconciled one at a time. A failure is recorded against
//! its application and the run moves on; re-running converges whatever was
//! left half done.

mod plan;
mod report;

pub use plan::{SyncPlan, compute_plan};
pub use report::{AppOutcome, SyncIssue, SyncReport};

use std::path::PathBuf;

use tracing::{debug, error, info, warn};

use crate::desktop::{DeployedApp, DesktopEntry, resolve_icon};
use crate::ident::new_id;
use crate::manifest::{AppConfig, Manifest};
use crate::profile::{Materialized, ProfileSettings};
use crate::registry::{ProfileRecord, Registry, SiteRecord};
use crate::resolve::{UrlResolver, resolve_or_fallback};
use crate::site::WebManifest;
use crate::store::{EntryStore, StoreError, Stores};

/// Run-wide options.
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
  /// Template cloned into new profiles when an application names none.
  pub default_template: Option<PathBuf>,
}

/// Plan a run without touching anything.
pub fn plan(entries: &dyn EntryStore, manifest: &Manifest) -> Result<SyncPlan, StoreError> {
  let observed = entries.scan()?;
  Ok(compute_plan(&observed, manifest))
}

pub struct Reconciler<'a, R: UrlResolver> {
  stores: Stores<'a>,
  resolver: R,
  options: SyncOptions,
}

impl<'a, R: UrlResolver> Reconciler<'a, R> {
  pub fn new(stores: Stores<'a>, resolver: R, options: SyncOptions) -> Self {
    Self {
      stores,
      resolver,
      options,
    }
  }

  pub fn plan(&self, manifest: &Manifest) -> Result<SyncPlan, StoreError> {
    plan(&*self.stores.entries, manifest)
  }

  /// Bring the stores in line with `manifest`.
  ///
  /// Only a failed launcher scan aborts the run, before anything is changed.
  /// Every other problem lands in the report.
  pub async fn sync(&mut self, manifest: &Manifest) -> Result<SyncReport, StoreError> {
    let plan = self.plan(manifest)?;
    info!(
      prune = plan.prune.len(),
      create = plan.create.len(),
      update = plan.update.len(),
      "starting sync"
    );

    let mut report = SyncReport::default();

    for (name, app) in &plan.prune {
      match self.prune(name, app) {
        Ok(outcome) => report.pruned.push(outcome),
        Err(e) => {
          error!(app = %name, site = %app.site_id, error = %e, "prune failed");
          report.failures.push(SyncIssue::from_error(name, &e));
        }
      }
    }

    for (name, config) in &manifest.apps {
      let existing = plan.update.get(name);
      match self.deploy(name, config, existing, &mut report).await {
        Ok(outcome) if existing.is_some() => report.updated.push(outcome),
        Ok(outcome) => report.created.push(outcome),
        Err(e) => {
          error!(app = %name, error = %e, "deploy failed");
          report.failures.push(SyncIssue::from_error(name, &e));
        }
      }
    }

    info!(
      created = report.created.len(),
      updated = report.updated.len(),
      pruned = report.pruned.len(),
      failed = report.failures.len(),
      "sync complete"
    );
    Ok(report)
  }

  /// Remove every artifact of an application that is no longer desired.
  ///
  /// The launcher goes last, so an application whose prune fails part way is
  /// still observed, and pruned again, on the next run.
  fn prune(&mut self, name: &str, app: &DeployedApp) -> Result<AppOutcome, StoreError> {
    let registry = self.stores.registry.load();
    let profile_id = registry.profile_of(&app.site_id).map(str::to_string);

    self.stores.sites.remove(&app.site_id)?;

    if let Some(profile_id) = profile_id.as_deref() {
      if registry.profile_in_use(profile_id, &app.site_id) {
        debug!(app = %name, profile = %profile_id, "profile shared with another site, keeping");
      } else {
        self.stores.profiles.remove(profile_id)?;
      }
    }

    self.stores.registry.prune(&app.site_id, profile_id.as_deref())?;
    self.stores.entries.remove(&app.entry_path)?;

    info!(app = %name, site = %app.site_id, "pruned");
    Ok(AppOutcome {
      name: name.to_string(),
      site_id: app.site_id.clone(),
      profile_id,
    })
  }

  /// Create or refresh one application.
  ///
  /// Site, registry and launcher errors fail the application. Profile errors
  /// are recorded as warnings and the remaining steps still run.
  async fn deploy(
    &mut self,
    name: &str,
    config: &AppConfig,
    existing: Option<&DeployedApp>,
    report: &mut SyncReport,
  ) -> Result<AppOutcome, StoreError> {
    let url = resolve_or_fallback(&self.resolver, &config.url).await;
    let mut registry = self.stores.registry.load();

    let (site_id, profile_id) = match existing {
      Some(app) => {
        let profile_id = match registry.profile_of(&app.site_id) {
          Some(id) => id.to_string(),
          None => {
            let id = mint_id(&registry);
            warn!(app = %name, site = %app.site_id, profile = %id, "site missing from registry, assigning new profile");
            id
          }
        };
        (app.site_id.clone(), profile_id)
      }
      None => (mint_id(&registry), mint_id(&registry)),
    };

    let web_manifest = WebManifest::for_app(name, &url);
    let site = self.stores.sites.materialize(&site_id, &web_manifest, config.icon.as_deref())?;

    self.deploy_profile(name, &profile_id, config, report);

    registry.upsert(
      ProfileRecord::new(&profile_id, name, &site_id),
      SiteRecord::new(&site_id, &profile_id, &url, &web_manifest),
    );
    self.stores.registry.save(&registry)?;

    let entry = DesktopEntry {
      name: name.to_string(),
      site_id: site_id.clone(),
      icon: resolve_icon(config.icon.as_deref(), &site.dir, site.icon_copied),
      mime_types: config.mime_types.clone(),
      categories: config.categories.clone(),
      keywords: config.keywords.clone(),
    };
    let entry_path = self.stores.entries.write(&entry)?;

    if let Some(stale) = existing.map(|app| &app.entry_path).filter(|p| **p != entry_path) {
      // Same name under a different file name; drop the old one so the
      // next scan sees a single launcher.
      if let Err(e) = self.stores.entries.remove(stale) {
        warn!(app = %name, path = ?stale, error = %e, "failed to remove stale launcher");
        report.warnings.push(SyncIssue::from_error(name, &e));
      }
    }

    info!(app = %name, site = %site_id, profile = %profile_id, url = %url, "deployed");
    Ok(AppOutcome {
      name: name.to_string(),
      site_id,
      profile_id: Some(profile_id),
    })
  }

  fn deploy_profile(&mut self, name: &str, profile_id: &str, config: &AppConfig, report: &mut SyncReport) {
    let template = config
      .template_profile
      .as_deref()
      .or(self.options.default_template.as_deref());

    match self.stores.profiles.materialize(profile_id, template) {
      Ok(Materialized::Cloned) => info!(app = %name, profile = %profile_id, "cloned profile from template"),
      Ok(Materialized::Empty) => debug!(app = %name, profile = %profile_id, "created empty profile"),
      Ok(Materialized::Existing) => {}
      Err(e) => {
        warn!(app = %name, profile = %profile_id, error = %e, "skipping profile step");
        report.warnings.push(SyncIssue::from_error(name, &e));
        return;
      }
    }

    let settings = ProfileSettings {
      layout: config.layout.as_deref(),
      extensions: &config.extensions,
      extra_policies: &config.extra_policies,
    };
    if let Err(e) = self.stores.profiles.configure(profile_id, &settings) {
      warn!(app = %name, profile = %profile_id, error = %e, "failed to configure profile");
      report.warnings.push(SyncIssue::from_error(name, &e));
    }
  }
}

/// A fresh identifier. Collisions are astronomically unlikely; debug builds
/// check anyway.
fn mint_id(registry: &Registry) -> String {
  let id = new_id();
  debug_assert!(!registry.contains_id(&id), "identifier collision: {}", id);
  id
}
