//! List command integration tests.

use predicates::prelude::*;
use serde_json::Value;

use super::common::TestEnv;

#[test]
fn list_with_nothing_deployed() {
  let env = TestEnv::new();

  env
    .pwasync_cmd()
    .arg("list")
    .assert()
    .success()
    .stdout(predicate::str::contains("No applications deployed"));
}

#[test]
fn list_shows_synced_apps() {
  let env = TestEnv::with_manifest(r#"{ "Mail": { "url": "https://mail.example.com" } }"#);
  env.sync_cmd().assert().success();
  let site_id = env.launcher_field("mail", "X-FirefoxPWA-Site").unwrap();

  env
    .pwasync_cmd()
    .arg("list")
    .assert()
    .success()
    .stdout(predicate::str::contains("Mail"))
    .stdout(predicate::str::contains(site_id));
}

#[test]
fn list_prints_json_joined_with_registry() {
  let env = TestEnv::with_manifest(r#"{ "Mail": { "url": "https://mail.example.com" } }"#);
  env.sync_cmd().assert().success();

  let output = env.pwasync_cmd().arg("list").arg("--json").output().unwrap();
  assert!(output.status.success());

  let apps: Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(apps.as_array().unwrap().len(), 1);
  assert_eq!(apps[0]["name"], "Mail");
  assert_eq!(apps[0]["profile_id"], env.profile_of("mail").as_str());
}

#[test]
fn list_marks_unregistered_apps() {
  let env = TestEnv::new();
  env.write_file(
    "data/applications/orphan-fpwa.desktop",
    "[Desktop Entry]\nName=Orphan\nX-FirefoxPWA-Site=01ORPHAN\n",
  );

  env
    .pwasync_cmd()
    .arg("list")
    .assert()
    .success()
    .stdout(predicate::str::contains("Orphan"))
    .stdout(predicate::str::contains("(not registered)"));
}
