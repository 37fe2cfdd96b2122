//! Diffing observed launchers against the desired manifest.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::desktop::DeployedApp;
use crate::manifest::Manifest;

/// What one run will do, by application name.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct SyncPlan {
  /// Deployed but no longer desired.
  pub prune: BTreeMap<String, DeployedApp>,
  /// Desired and not yet deployed.
  pub create: Vec<String>,
  /// Desired and already deployed; identities are reused.
  pub update: BTreeMap<String, DeployedApp>,
}

impl SyncPlan {
  /// True only when nothing is deployed and nothing is desired.
  ///
  /// Updates always rewrite their artifacts, so a plan with desired
  /// applications is never a no-op.
  pub fn is_noop(&self) -> bool {
    self.prune.is_empty() && self.create.is_empty() && self.update.is_empty()
  }
}

/// Classify every observed and desired application.
pub fn compute_plan(observed: &BTreeMap<String, DeployedApp>, desired: &Manifest) -> SyncPlan {
  let mut plan = SyncPlan::default();

  for (name, app) in observed {
    if !desired.contains(name) {
      plan.prune.insert(name.clone(), app.clone());
    }
  }

  for name in desired.apps.keys() {
    match observed.get(name) {
      Some(app) => {
        plan.update.insert(name.clone(), app.clone());
      }
      None => plan.create.push(name.clone()),
    }
  }

  plan
}
