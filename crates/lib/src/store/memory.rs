//! In-memory stores for engine tests.

use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::consts::SITE_FIELD;
use crate::desktop::{DeployedApp, DesktopEntry, EntryError, entry_file_name, parse_entry};
use crate::profile::{Materialized, ProfileError, ProfileSettings, build_policies, render_prefs};
use crate::registry::{Registry, RegistryError};
use crate::site::{SiteError, SiteLocation, WebManifest};

use super::{EntryStore, ProfileStore, RegistryStore, SiteStore, StoreError, Stores};

const ENTRY_DIR: &str = "/mem/applications";
const SITE_DIR: &str = "/mem/sites";

fn injected() -> io::Error {
  io::Error::other("injected failure")
}

#[derive(Debug, Default)]
pub struct MemoryRegistry {
  pub registry: Registry,
  pub saves: usize,
  pub fail_save: bool,
}

impl RegistryStore for MemoryRegistry {
  fn load(&self) -> Registry {
    self.registry.clone()
  }

  fn save(&mut self, registry: &Registry) -> Result<(), StoreError> {
    if self.fail_save {
      return Err(RegistryError::Write(injected()).into());
    }
    self.registry = registry.clone();
    self.saves += 1;
    Ok(())
  }

  fn prune(&mut self, site_id: &str, profile_id: Option<&str>) -> Result<Option<String>, StoreError> {
    let mut registry = self.load();
    let removed = registry.detach_site(site_id, profile_id);
    self.save(&registry)?;
    Ok(removed)
  }
}

/// A profile as the fake sees it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryProfile {
  pub origin: Option<PathBuf>,
  pub prefs: String,
  pub policies: Value,
  pub clones: usize,
}

#[derive(Debug, Default)]
pub struct MemoryProfiles {
  pub profiles: BTreeMap<String, MemoryProfile>,
  /// Template paths that exist.
  pub templates: BTreeSet<PathBuf>,
  pub fail_configure: bool,
}

impl ProfileStore for MemoryProfiles {
  fn exists(&self, profile_id: &str) -> bool {
    self.profiles.contains_key(profile_id)
  }

  fn materialize(&mut self, profile_id: &str, template: Option<&Path>) -> Result<Materialized, StoreError> {
    if self.profiles.contains_key(profile_id) {
      return Ok(Materialized::Existing);
    }
    match template {
      Some(template) if !self.templates.contains(template) => {
        Err(ProfileError::TemplateMissing(template.to_path_buf()).into())
      }
      Some(template) => {
        let profile = MemoryProfile {
          origin: Some(template.to_path_buf()),
          clones: 1,
          ..MemoryProfile::default()
        };
        self.profiles.insert(profile_id.to_string(), profile);
        Ok(Materialized::Cloned)
      }
      None => {
        self.profiles.insert(profile_id.to_string(), MemoryProfile::default());
        Ok(Materialized::Empty)
      }
    }
  }

  fn configure(&mut self, profile_id: &str, settings: &ProfileSettings<'_>) -> Result<(), StoreError> {
    if self.fail_configure {
      return Err(
        ProfileError::Io {
          path: PathBuf::from(profile_id),
          source: injected(),
        }
        .into(),
      );
    }
    let profile = self.profiles.entry(profile_id.to_string()).or_default();
    profile.prefs = render_prefs(settings.layout);
    profile.policies = build_policies(settings.extensions, settings.extra_policies);
    Ok(())
  }

  fn remove(&mut self, profile_id: &str) -> Result<(), StoreError> {
    self.profiles.remove(profile_id);
    Ok(())
  }
}

#[derive(Debug, Default)]
pub struct MemorySites {
  pub sites: BTreeMap<String, WebManifest>,
  /// Icon paths that exist locally.
  pub local_icons: BTreeSet<String>,
  /// Site ids whose materialization fails.
  pub fail: BTreeSet<String>,
}

impl SiteStore for MemorySites {
  fn materialize(
    &mut self,
    site_id: &str,
    manifest: &WebManifest,
    icon: Option<&str>,
  ) -> Result<SiteLocation, StoreError> {
    let dir = Path::new(SITE_DIR).join(site_id);
    if self.fail.contains(site_id) {
      return Err(SiteError::Io { path: dir, source: injected() }.into());
    }
    self.sites.insert(site_id.to_string(), manifest.clone());
    Ok(SiteLocation {
      dir,
      icon_copied: icon.is_some_and(|i| self.local_icons.contains(i)),
    })
  }

  fn remove(&mut self, site_id: &str) -> Result<(), StoreError> {
    self.sites.remove(site_id);
    Ok(())
  }
}

/// Launcher files held as rendered text, keyed by path.
#[derive(Debug, Default)]
pub struct MemoryEntries {
  pub files: BTreeMap<PathBuf, String>,
  pub writes: usize,
  pub fail_scan: bool,
}

impl MemoryEntries {
  /// Seed a launcher as if a previous run had written it.
  pub fn seed(&mut self, name: &str, site_id: &str) -> PathBuf {
    let path = Path::new(ENTRY_DIR).join(entry_file_name(name, site_id));
    let text = format!("[Desktop Entry]\nName={}\n{}={}\n", name, SITE_FIELD, site_id);
    self.files.insert(path.clone(), text);
    path
  }

  pub fn text_of(&self, name: &str) -> Option<&str> {
    self
      .files
      .values()
      .find(|text| parse_entry(text).is_some_and(|(n, _)| n == name))
      .map(String::as_str)
  }
}

impl EntryStore for MemoryEntries {
  fn scan(&self) -> Result<BTreeMap<String, DeployedApp>, StoreError> {
    if self.fail_scan {
      return Err(
        EntryError::ReadDir {
          path: PathBuf::from(ENTRY_DIR),
          source: injected(),
        }
        .into(),
      );
    }
    let mut found = BTreeMap::new();
    for (path, text) in &self.files {
      if let Some((name, site_id)) = parse_entry(text) {
        found.entry(name).or_insert(DeployedApp {
          entry_path: path.clone(),
          site_id,
        });
      }
    }
    Ok(found)
  }

  fn write(&mut self, entry: &DesktopEntry) -> Result<PathBuf, StoreError> {
    let path = entry.path_in(Path::new(ENTRY_DIR));
    self.files.insert(path.clone(), entry.render());
    self.writes += 1;
    Ok(path)
  }

  fn remove(&mut self, path: &Path) -> Result<(), StoreError> {
    self.files.remove(path);
    Ok(())
  }
}

/// One of each fake.
#[derive(Debug, Default)]
pub struct MemoryStores {
  pub registry: MemoryRegistry,
  pub profiles: MemoryProfiles,
  pub sites: MemorySites,
  pub entries: MemoryEntries,
}

impl MemoryStores {
  pub fn stores(&mut self) -> Stores<'_> {
    Stores {
      registry: &mut self.registry,
      profiles: &mut self.profiles,
      sites: &mut self.sites,
      entries: &mut self.entries,
    }
  }

  /// Policies of the profile owning the launcher named `name`.
  pub fn policies_of(&self, name: &str) -> Option<&Map<String, Value>> {
    let text = self.entries.text_of(name)?;
    let (_, site_id) = parse_entry(text)?;
    let profile_id = self.registry.registry.profile_of(&site_id)?;
    self.profiles.profiles.get(profile_id)?.policies.get("policies")?.as_object()
  }
}
