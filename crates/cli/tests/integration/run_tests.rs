//! `embedmod run` integration tests.

use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn fragments_keep_their_own_bindings() {
  let env = TestEnv::from_fixture("greeters.html");

  env
    .cmd()
    .arg("run")
    .arg(&env.doc_path)
    .assert()
    .success()
    .stdout(predicate::str::contains("Hello from A"))
    .stdout(predicate::str::contains("Greetings, B"))
    .stdout(predicate::str::contains("Ran 1 script(s)"))
    .stdout(predicate::str::contains("greeter-a, greeter-b"));
}

#[test]
fn load_failure_is_reported_and_fails_the_run() {
  let env = TestEnv::from_fixture("broken_module.html");

  env
    .cmd()
    .arg("run")
    .arg(&env.doc_path)
    .assert()
    .failure()
    .stdout(predicate::str::contains("load failed"))
    .stderr(predicate::str::contains("failed to load embedded module 'broken'"));
}

#[test]
fn json_report() {
  let env = TestEnv::from_fixture("greeters.html");

  let output = env
    .cmd()
    .args(["run", "--output", "json"])
    .arg(&env.doc_path)
    .output()
    .unwrap();
  assert!(output.status.success());

  // Script prints come first; the report is the trailing JSON object.
  let stdout = String::from_utf8(output.stdout).unwrap();
  let start = stdout.find('{').unwrap();
  let report: serde_json::Value = serde_json::from_str(&stdout[start..]).unwrap();
  assert_eq!(report["scripts_run"], 1);
  assert_eq!(report["activated"], serde_json::json!(["greeter-a", "greeter-b"]));
}

#[test]
fn env_var_changes_module_marker() {
  let env = TestEnv::from_source(
    r#"<script type="x-fragment" id="m">return { v = "custom" }</script>
<script>print(embedded.import("m", "v").v)</script>"#,
  );

  env
    .cmd()
    .env("EMBEDMOD_MODULE_TYPE", "x-fragment")
    .arg("run")
    .arg(&env.doc_path)
    .assert()
    .success()
    .stdout(predicate::str::contains("custom"));
}

#[test]
fn flag_overrides_env_var() {
  let env = TestEnv::from_source(
    r#"<script type="flag-mod" id="m">return { v = "from flag" }</script>
<script>print(embedded.import("m", "v").v)</script>"#,
  );

  env
    .cmd()
    .env("EMBEDMOD_MODULE_TYPE", "env-mod")
    .args(["--module-type", "flag-mod", "run"])
    .arg(&env.doc_path)
    .assert()
    .success()
    .stdout(predicate::str::contains("from flag"));
}

#[test]
fn scripts_can_require_files_next_to_document() {
  let env = TestEnv::from_source(r#"<script>print(require("util").shout("hi"))</script>"#);
  env.write_file("lua/util.lua", "return { shout = function(s) return s:upper() end }");

  env
    .cmd()
    .arg("run")
    .arg(&env.doc_path)
    .assert()
    .success()
    .stdout(predicate::str::contains("HI"));
}
