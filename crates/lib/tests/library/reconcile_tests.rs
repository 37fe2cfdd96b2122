//! End-to-end reconciliation against real directories.

use std::fs;
use std::path::PathBuf;

use pwasync_lib::desktop::DesktopDir;
use pwasync_lib::manifest::AppConfig;
use pwasync_lib::profile::STATEFUL_ARTIFACTS;
use pwasync_lib::registry::RegistryFile;
use pwasync_lib::sync::SyncOptions;

use super::common::{Fixture, manifest, snapshot_tree};

mod idempotence {
  use super::*;

  #[tokio::test]
  async fn second_run_changes_no_bytes() {
    let mut fx = Fixture::new();
    let template = fx.template(&[("prefs.js", "// prefs"), ("chrome/userChrome.css", "")]);
    let mut desired = manifest(&[("Mail", "https://mail.example.com")]);
    let mut chat = AppConfig::new("https://chat.example.com");
    chat.layout = Some("back,forward,spring,refresh,extensions".to_string());
    chat.extensions = vec!["ublock:https://example.com/ublock.xpi".to_string()];
    chat.keywords = vec!["im".to_string()];
    desired.insert("Chat", chat);
    let options = SyncOptions {
      default_template: Some(template),
    };

    fx.sync_with(&desired, options.clone()).await;
    let before = snapshot_tree(&fx.layout.data_home);
    let profile_dir = fx.layout.profiles_dir.clone();
    let mtimes: Vec<_> = snapshot_tree(&profile_dir)
      .into_iter()
      .map(|(path, _)| fs::metadata(&path).unwrap().modified().unwrap())
      .collect();

    let report = fx.sync_with(&desired, options).await;

    assert_eq!(report.updated.len(), 2);
    assert!(report.created.is_empty());
    assert_eq!(snapshot_tree(&fx.layout.data_home), before);
    let mtimes_after: Vec<_> = snapshot_tree(&profile_dir)
      .into_iter()
      .map(|(path, _)| fs::metadata(&path).unwrap().modified().unwrap())
      .collect();
    assert_eq!(mtimes_after, mtimes);
  }
}

mod pruning {
  use super::*;

  #[tokio::test]
  async fn removed_app_leaves_nothing_behind() {
    let mut fx = Fixture::new();
    let first = fx
      .sync(&manifest(&[("Mail", "https://mail.example.com"), ("Chat", "https://chat.example.com")]))
      .await;
    let chat = first.created.iter().find(|o| o.name == "Chat").unwrap().clone();
    let chat_profile = chat.profile_id.clone().unwrap();

    let report = fx.sync(&manifest(&[("Mail", "https://mail.example.com")])).await;

    assert_eq!(report.pruned.len(), 1);
    assert!(!fx.layout.applications_dir.join("chat-fpwa.desktop").exists());
    assert!(!fx.layout.site_dir(&chat.site_id).exists());
    assert!(!fx.layout.profile_dir(&chat_profile).exists());
    let registry = RegistryFile::new(fx.layout.registry_path.clone()).try_load().unwrap();
    assert!(!registry.sites.contains_key(&chat.site_id));
    assert!(!registry.profiles.contains_key(&chat_profile));
    assert_eq!(registry.sites.len(), 1);
  }

  #[tokio::test]
  async fn empty_manifest_prunes_everything() {
    let mut fx = Fixture::new();
    fx.sync(&manifest(&[("Mail", "https://mail.example.com"), ("Chat", "https://chat.example.com")]))
      .await;

    let report = fx.sync(&manifest(&[])).await;

    assert_eq!(report.pruned.len(), 2);
    assert!(DesktopDir::new(fx.layout.applications_dir.clone()).scan().unwrap().is_empty());
    assert_eq!(fs::read_dir(&fx.layout.sites_dir).unwrap().count(), 0);
    assert_eq!(fs::read_dir(&fx.layout.profiles_dir).unwrap().count(), 0);
  }

  #[tokio::test]
  async fn shared_profile_survives() {
    let mut fx = Fixture::new();
    let first = fx
      .sync(&manifest(&[("Mail", "https://mail.example.com"), ("Chat", "https://chat.example.com")]))
      .await;
    let mail = first.created.iter().find(|o| o.name == "Mail").unwrap();
    let chat = first.created.iter().find(|o| o.name == "Chat").unwrap();
    let shared = mail.profile_id.clone().unwrap();

    // Reassign Chat's site to Mail's profile, as the runtime allows.
    let file = RegistryFile::new(fx.layout.registry_path.clone());
    let mut registry = file.try_load().unwrap();
    registry.sites.get_mut(&chat.site_id).unwrap().profile_id = shared.clone();
    file.save(&registry).unwrap();

    fx.sync(&manifest(&[("Chat", "https://chat.example.com")])).await;

    assert!(fx.layout.profile_dir(&shared).is_dir());
    let registry = file.try_load().unwrap();
    assert!(registry.profiles.contains_key(&shared));
    assert_eq!(registry.profile_of(&chat.site_id), Some(shared.as_str()));
  }
}

mod identity {
  use super::*;

  #[tokio::test]
  async fn url_change_keeps_ids_and_profile_state() {
    let mut fx = Fixture::new();
    let first = fx.sync(&manifest(&[("Mail", "https://old.example.com")])).await;
    let created = &first.created[0];
    let profile_dir = fx.layout.profile_dir(created.profile_id.as_deref().unwrap());
    fs::write(profile_dir.join("cookies.sqlite"), "session").unwrap();

    let second = fx.sync(&manifest(&[("Mail", "https://new.example.com")])).await;

    let updated = &second.updated[0];
    assert_eq!(updated.site_id, created.site_id);
    assert_eq!(updated.profile_id, created.profile_id);
    assert!(profile_dir.join("cookies.sqlite").exists());

    let site_manifest = fs::read_to_string(fx.layout.site_dir(&created.site_id).join("manifest.json")).unwrap();
    assert!(site_manifest.contains("https://new.example.com"));
  }

  #[tokio::test]
  async fn ids_are_distinct_across_apps() {
    let mut fx = Fixture::new();
    let report = fx
      .sync(&manifest(&[
        ("A", "https://a.example.com"),
        ("B", "https://b.example.com"),
        ("C", "https://c.example.com"),
      ]))
      .await;

    let mut ids: Vec<String> = report
      .created
      .iter()
      .flat_map(|o| [o.site_id.clone(), o.profile_id.clone().unwrap()])
      .collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 6);
  }
}

mod templates {
  use super::*;

  #[tokio::test]
  async fn cloned_profile_is_sanitized() {
    let mut fx = Fixture::new();
    let mut files = vec![("prefs.js", "// prefs"), ("lock", ""), (".parentlock", "")];
    files.extend(STATEFUL_ARTIFACTS.iter().map(|name| (*name, "state")));
    let template = fx.template(&files);

    let report = fx
      .sync_with(
        &manifest(&[("Mail", "https://mail.example.com")]),
        SyncOptions {
          default_template: Some(template),
        },
      )
      .await;

    let profile = fx.layout.profile_dir(report.created[0].profile_id.as_deref().unwrap());
    assert!(profile.join("prefs.js").is_file());
    for name in STATEFUL_ARTIFACTS.iter().chain(&["lock", ".parentlock"]) {
      assert!(!profile.join(name).exists(), "{} survived cloning", name);
    }
  }

  #[cfg(unix)]
  #[tokio::test]
  async fn failed_clone_is_completed_on_next_run() {
    use std::os::unix::net::UnixListener;

    let mut fx = Fixture::new();
    let template = fx.template(&[("prefs.js", "// prefs"), ("extensions.json", "{}")]);
    let socket = template.join("zz.sock");
    let listener = UnixListener::bind(&socket).unwrap();
    let desired = manifest(&[("Mail", "https://mail.example.com")]);
    let options = SyncOptions {
      default_template: Some(template.clone()),
    };

    let first = fx.sync_with(&desired, options.clone()).await;
    assert_eq!(first.warnings.len(), 1);
    let profile = fx.layout.profile_dir(first.created[0].profile_id.as_deref().unwrap());
    assert!(!profile.exists());
    assert_eq!(fs::read_dir(&fx.layout.profiles_dir).unwrap().count(), 0);

    drop(listener);
    fs::remove_file(&socket).unwrap();
    let second = fx.sync_with(&desired, options).await;

    assert!(second.warnings.is_empty());
    assert_eq!(second.updated[0].profile_id, first.created[0].profile_id);
    assert_eq!(fs::read_to_string(profile.join("prefs.js")).unwrap(), "// prefs");
    assert!(!profile.join("extensions.json").exists());
    assert!(profile.join("user.js").is_file());
  }

  #[tokio::test]
  async fn missing_app_template_skips_profile_only() {
    let mut fx = Fixture::new();
    let mut config = AppConfig::new("https://mail.example.com");
    config.template_profile = Some(PathBuf::from("/definitely/not/here"));
    let mut desired = manifest(&[]);
    desired.insert("Mail", config);

    let report = fx.sync(&desired).await;

    assert_eq!(report.warnings.len(), 1);
    let created = &report.created[0];
    assert!(!fx.layout.profile_dir(created.profile_id.as_deref().unwrap()).exists());
    assert!(fx.layout.site_dir(&created.site_id).is_dir());
    assert!(fx.layout.applications_dir.join("mail-fpwa.desktop").is_file());
  }
}

mod icons {
  use super::*;

  #[tokio::test]
  async fn local_icon_is_copied_and_referenced() {
    let mut fx = Fixture::new();
    let icon = fx.temp.path().join("mail.png");
    fs::write(&icon, [0x89, b'P', b'N', b'G']).unwrap();
    let mut config = AppConfig::new("https://mail.example.com");
    config.icon = Some(icon.display().to_string());
    let mut desired = manifest(&[]);
    desired.insert("Mail", config);

    let report = fx.sync(&desired).await;

    let copied = fx.layout.site_dir(&report.created[0].site_id).join("icon.png");
    assert_eq!(fs::read(&copied).unwrap(), [0x89, b'P', b'N', b'G']);
    let launcher = fs::read_to_string(fx.layout.applications_dir.join("mail-fpwa.desktop")).unwrap();
    assert!(launcher.contains(&format!("Icon={}\n", copied.display())));
  }

  #[tokio::test]
  async fn theme_icon_is_used_verbatim() {
    let mut fx = Fixture::new();
    let mut config = AppConfig::new("https://mail.example.com");
    config.icon = Some("mail-client".to_string());
    let mut desired = manifest(&[]);
    desired.insert("Mail", config);

    fx.sync(&desired).await;

    let launcher = fs::read_to_string(fx.layout.applications_dir.join("mail-fpwa.desktop")).unwrap();
    assert!(launcher.contains("Icon=mail-client\n"));
  }
}
