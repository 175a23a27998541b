//! `embedmod import` integration tests.

use predicates::prelude::*;

use super::common::TestEnv;

fn import_json(env: &TestEnv, args: &[&str]) -> serde_json::Value {
  let output = env
    .cmd()
    .arg("import")
    .arg(&env.doc_path)
    .args(args)
    .output()
    .unwrap();
  assert!(
    output.status.success(),
    "stderr: {}",
    String::from_utf8_lossy(&output.stderr)
  );
  serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn import_all() {
  let env = TestEnv::from_fixture("selection.html");
  let value = import_json(&env, &["settings"]);
  assert_eq!(
    value,
    serde_json::json!({ "theme": "dark", "size": 12, "debug": false })
  );
}

#[test]
fn import_single_keeps_missing_name() {
  let env = TestEnv::from_fixture("selection.html");
  assert_eq!(
    import_json(&env, &["settings", "--select", "theme"]),
    serde_json::json!({ "theme": "dark" })
  );
  assert_eq!(
    import_json(&env, &["settings", "--select", "color"]),
    serde_json::json!({ "color": null })
  );
}

#[test]
fn import_subset_drops_missing_names() {
  let env = TestEnv::from_fixture("selection.html");
  assert_eq!(
    import_json(&env, &["settings", "--subset", "size,color"]),
    serde_json::json!({ "size": 12 })
  );
}

#[test]
fn select_and_subset_conflict() {
  let env = TestEnv::from_fixture("selection.html");
  env
    .cmd()
    .arg("import")
    .arg(&env.doc_path)
    .args(["settings", "--select", "a", "--subset", "b"])
    .assert()
    .failure();
}

#[test]
fn unknown_module_names_the_id() {
  let env = TestEnv::from_fixture("selection.html");
  env
    .cmd()
    .arg("import")
    .arg(&env.doc_path)
    .arg("nope")
    .assert()
    .failure()
    .stderr(predicate::str::contains("embedded module 'nope' not found"));
}
