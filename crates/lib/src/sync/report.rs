//! Outcome of one reconciliation run.

use serde::Serialize;

use crate::store::StoreError;

/// An application that was created, updated or pruned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppOutcome {
  pub name: String,
  pub site_id: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub profile_id: Option<String>,
}

/// A problem attributed to one application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncIssue {
  pub name: String,
  pub message: String,
}

impl SyncIssue {
  pub fn new(name: &str, message: impl Into<String>) -> Self {
    Self {
      name: name.to_string(),
      message: message.into(),
    }
  }

  pub fn from_error(name: &str, error: &StoreError) -> Self {
    Self::new(name, error.to_string())
  }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct SyncReport {
  pub created: Vec<AppOutcome>,
  pub updated: Vec<AppOutcome>,
  pub pruned: Vec<AppOutcome>,
  /// Absorbed problems; the application was still deployed.
  pub warnings: Vec<SyncIssue>,
  /// Applications that could not be reconciled this run.
  pub failures: Vec<SyncIssue>,
}

impl SyncReport {
  pub fn is_success(&self) -> bool {
    self.failures.is_empty()
  }

  pub fn changed(&self) -> usize {
    self.created.len() + self.updated.len() + self.pruned.len()
  }

  pub fn failed(&self, name: &str) -> bool {
    self.failures.iter().any(|f| f.name == name)
  }
}
