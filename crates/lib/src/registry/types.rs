//! Registry document shared with the browser runtime.
//!
//! ```json
//! {
//!   "profiles": { "<profile_id>": { "ulid": "...", "name": "App", "sites": ["<site_id>"] } },
//!   "sites": {
//!     "<site_id>": {
//!       "ulid": "...",
//!       "profile": "<profile_id>",
//!       "config": { "document_url": "...", "manifest_url": "..." },
//!       "manifest": { ... }
//!     }
//!   }
//! }
//! ```

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::warn;

use crate::site::WebManifest;

const PROFILE_KEYS: &[&str] = &["ulid", "name", "sites"];
const SITE_KEYS: &[&str] = &["ulid", "profile", "config", "manifest"];
const CONFIG_KEYS: &[&str] = &["document_url", "manifest_url"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
  #[serde(rename = "ulid")]
  pub id: String,
  #[serde(default)]
  pub name: Option<String>,
  #[serde(default, deserialize_with = "null_as_default")]
  pub sites: Vec<String>,
  /// Runtime-owned keys, written back as read.
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

impl ProfileRecord {
  pub fn new(id: &str, name: &str, site_id: &str) -> Self {
    Self {
      id: id.to_string(),
      name: Some(name.to_string()),
      sites: vec![site_id.to_string()],
      extra: Map::new(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteConfig {
  #[serde(default, deserialize_with = "null_as_default")]
  pub document_url: String,
  #[serde(default, deserialize_with = "null_as_default")]
  pub manifest_url: String,
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteRecord {
  #[serde(rename = "ulid")]
  pub id: String,
  #[serde(rename = "profile", default, deserialize_with = "null_as_default")]
  pub profile_id: String,
  pub config: SiteConfig,
  #[serde(default)]
  pub manifest: Value,
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

impl SiteRecord {
  pub fn new(site_id: &str, profile_id: &str, url: &str, manifest: &WebManifest) -> Self {
    Self {
      id: site_id.to_string(),
      profile_id: profile_id.to_string(),
      config: SiteConfig {
        document_url: url.to_string(),
        manifest_url: url.to_string(),
        extra: Map::new(),
      },
      // WebManifest only holds strings, so this cannot fail.
      manifest: serde_json::to_value(manifest).unwrap_or_default(),
      extra: Map::new(),
    }
  }
}

/// Profiles and sites known to the browser runtime.
///
/// Everything the runtime wrote is carried through a load/save cycle: unknown
/// top-level keys in `extra`, unknown record keys in each record's `extra`,
/// and records that do not parse at all in `foreign_profiles` /
/// `foreign_sites`, byte for byte.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(from = "RegistryDoc")]
pub struct Registry {
  pub profiles: BTreeMap<String, ProfileRecord>,
  pub sites: BTreeMap<String, SiteRecord>,
  pub extra: Map<String, Value>,
  pub foreign_profiles: Map<String, Value>,
  pub foreign_sites: Map<String, Value>,
}

/// On-disk shape, before records are typed.
#[derive(Deserialize)]
struct RegistryDoc {
  #[serde(default, deserialize_with = "null_as_default")]
  profiles: Map<String, Value>,
  #[serde(default, deserialize_with = "null_as_default")]
  sites: Map<String, Value>,
  #[serde(flatten)]
  extra: Map<String, Value>,
}

impl From<RegistryDoc> for Registry {
  fn from(doc: RegistryDoc) -> Self {
    let (profiles, foreign_profiles) = split_records("profile", doc.profiles);
    let (sites, foreign_sites) = split_records("site", doc.sites);
    Self {
      profiles,
      sites,
      extra: doc.extra,
      foreign_profiles,
      foreign_sites,
    }
  }
}

impl Serialize for Registry {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(None)?;
    map.serialize_entry("profiles", &Records::merge(&self.profiles, &self.foreign_profiles))?;
    map.serialize_entry("sites", &Records::merge(&self.sites, &self.foreign_sites))?;
    for (key, value) in &self.extra {
      map.serialize_entry(key, value)?;
    }
    map.end()
  }
}

enum Record<'a, T> {
  Known(&'a T),
  Foreign(&'a Value),
}

impl<T: Serialize> Serialize for Record<'_, T> {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    match self {
      Record::Known(record) => record.serialize(serializer),
      Record::Foreign(value) => value.serialize(serializer),
    }
  }
}

struct Records<'a, T>(BTreeMap<&'a str, Record<'a, T>>);

impl<'a, T> Records<'a, T> {
  fn merge(known: &'a BTreeMap<String, T>, foreign: &'a Map<String, Value>) -> Self {
    let mut all: BTreeMap<&str, Record<'a, T>> =
      foreign.iter().map(|(k, v)| (k.as_str(), Record::Foreign(v))).collect();
    all.extend(known.iter().map(|(k, v)| (k.as_str(), Record::Known(v))));
    Self(all)
  }
}

impl<T: Serialize> Serialize for Records<'_, T> {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_map(self.0.iter())
  }
}

fn split_records<T: DeserializeOwned>(
  kind: &str,
  records: Map<String, Value>,
) -> (BTreeMap<String, T>, Map<String, Value>) {
  let mut typed = BTreeMap::new();
  let mut foreign = Map::new();
  for (id, value) in records {
    match T::deserialize(&value) {
      Ok(record) => {
        typed.insert(id, record);
      }
      Err(e) => {
        warn!(kind, id = %id, error = %e, "unrecognised registry record, keeping it verbatim");
        foreign.insert(id, value);
      }
    }
  }
  (typed, foreign)
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
  D: Deserializer<'de>,
  T: Default + Deserialize<'de>,
{
  Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Keys of a raw record object other than the ones this crate writes itself.
fn unowned_keys(value: &Value, owned: &[&str]) -> Map<String, Value> {
  value
    .as_object()
    .map(|object| {
      object
        .iter()
        .filter(|(key, _)| !owned.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
    })
    .unwrap_or_default()
}

/// Copy into `target` every entry of `previous` that `target` does not set.
fn keep_unset(target: &mut Map<String, Value>, previous: Map<String, Value>) {
  for (key, value) in previous {
    target.entry(key).or_insert(value);
  }
}

impl Registry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Profile id owning `site_id`, if the site is registered.
  pub fn profile_of(&self, site_id: &str) -> Option<&str> {
    let profile = match self.sites.get(site_id) {
      Some(site) => Some(site.profile_id.as_str()),
      None => self.foreign_sites.get(site_id).and_then(|site| site.get("profile")).and_then(Value::as_str),
    };
    profile.filter(|id| !id.is_empty())
  }

  /// Write the records of one profile/site pair.
  ///
  /// Keys the runtime added to an existing record are kept, as are the other
  /// sites of an existing profile.
  pub fn upsert(&mut self, mut profile: ProfileRecord, mut site: SiteRecord) {
    if let Some(old) = self.profiles.remove(&profile.id) {
      let mut sites = old.sites;
      for id in profile.sites.drain(..) {
        if !sites.contains(&id) {
          sites.push(id);
        }
      }
      profile.sites = sites;
      keep_unset(&mut profile.extra, old.extra);
    } else if let Some(raw) = self.foreign_profiles.remove(&profile.id) {
      keep_unset(&mut profile.extra, unowned_keys(&raw, PROFILE_KEYS));
    }

    if let Some(old) = self.sites.remove(&site.id) {
      keep_unset(&mut site.extra, old.extra);
      keep_unset(&mut site.config.extra, old.config.extra);
    } else if let Some(raw) = self.foreign_sites.remove(&site.id) {
      keep_unset(&mut site.extra, unowned_keys(&raw, SITE_KEYS));
      if let Some(config) = raw.get("config") {
        keep_unset(&mut site.config.extra, unowned_keys(config, CONFIG_KEYS));
      }
    }

    self.profiles.insert(profile.id.clone(), profile);
    self.sites.insert(site.id.clone(), site);
  }

  /// Whether any site other than `except_site` belongs to `profile_id`.
  pub fn profile_in_use(&self, profile_id: &str, except_site: &str) -> bool {
    let typed = self
      .sites
      .values()
      .any(|site| site.profile_id == profile_id && site.id != except_site);
    let foreign = self
      .foreign_sites
      .iter()
      .any(|(id, site)| id != except_site && site.get("profile").and_then(Value::as_str) == Some(profile_id));
    typed || foreign
  }

  /// Remove a site and, unless another site still uses it, its profile.
  ///
  /// Returns the profile id whose record was removed. A shared profile keeps
  /// its record with the site dropped from its `sites` list.
  pub fn detach_site(&mut self, site_id: &str, profile_id: Option<&str>) -> Option<String> {
    self.sites.remove(site_id);
    self.foreign_sites.remove(site_id);

    let profile_id = profile_id?;
    if self.profile_in_use(profile_id, site_id) {
      if let Some(profile) = self.profiles.get_mut(profile_id) {
        profile.sites.retain(|s| s != site_id);
      } else if let Some(profile) = self.foreign_profiles.get_mut(profile_id) {
        if let Some(Value::Array(sites)) = profile.get_mut("sites") {
          sites.retain(|s| s.as_str() != Some(site_id));
        }
      }
      return None;
    }

    let typed = self.profiles.remove(profile_id).map(|p| p.id);
    let foreign = self.foreign_profiles.remove(profile_id).map(|_| profile_id.to_string());
    typed.or(foreign)
  }

  pub fn contains_id(&self, id: &str) -> bool {
    self.profiles.contains_key(id)
      || self.sites.contains_key(id)
      || self.foreign_profiles.contains_key(id)
      || self.foreign_sites.contains_key(id)
  }
}
