//! Plan command integration tests.

use predicates::prelude::*;
use serde_json::Value;

use super::common::{TestEnv, read};

#[test]
fn plan_shows_creates_without_changing_anything() {
  let env = TestEnv::with_manifest(r#"{ "My App": { "url": "https://app.example.com" } }"#);

  env
    .pwasync_cmd()
    .arg("plan")
    .arg("--manifest")
    .arg(&env.manifest_path)
    .assert()
    .success()
    .stdout(predicate::str::contains("+ My App"))
    .stdout(predicate::str::contains("To create: 1"));

  assert!(!env.applications_dir().exists());
  assert!(!env.runtime_dir().exists());
}

#[test]
fn plan_after_sync_shows_updates_and_prunes() {
  let env = TestEnv::with_manifest(r#"{ "Mail": { "url": "https://mail.example.com" } }"#);
  env.sync_cmd().assert().success();
  let registry = read(&env.registry_path());

  env.write_manifest(r#"{ "Chat": { "url": "https://chat.example.com" } }"#);
  env
    .pwasync_cmd()
    .arg("plan")
    .arg("--manifest")
    .arg(&env.manifest_path)
    .assert()
    .success()
    .stdout(predicate::str::contains("- Mail"))
    .stdout(predicate::str::contains("+ Chat"))
    .stdout(predicate::str::contains("To prune: 1"));

  assert!(env.launcher("mail").exists());
  assert_eq!(read(&env.registry_path()), registry);
}

#[test]
fn plan_prints_json() {
  let env = TestEnv::with_manifest(r#"{ "Mail": { "url": "https://mail.example.com" } }"#);
  env.sync_cmd().assert().success();
  env.write_manifest(
    r#"{ "Mail": { "url": "https://mail.example.com" }, "Chat": { "url": "https://chat.example.com" } }"#,
  );

  let output = env
    .pwasync_cmd()
    .arg("plan")
    .arg("--json")
    .arg("--manifest")
    .arg(&env.manifest_path)
    .output()
    .unwrap();
  assert!(output.status.success());

  let plan: Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(plan["create"], serde_json::json!(["Chat"]));
  assert!(plan["update"]["Mail"]["site_id"].is_string());
  assert!(plan["prune"].as_object().unwrap().is_empty());
}

#[test]
fn plan_rejects_invalid_manifest() {
  let env = TestEnv::with_manifest(r#"{ "My App": { "url": "https://app.example.com", "colour": "red" } }"#);

  env
    .pwasync_cmd()
    .arg("plan")
    .arg("--manifest")
    .arg(&env.manifest_path)
    .assert()
    .failure()
    .stderr(predicate::str::contains("Failed to load manifest"));
}
