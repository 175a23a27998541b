//! Concurrent imports of one fragment share a single load.

use embedmod_lib::Selection;
use mlua::prelude::*;

use super::common::{create_test_runtime, load_count, register_pause};

const SLOW: &str = r#"
<script type="embedded-module" id="slow">
  _G.loads = (_G.loads or 0) + 1
  pause()
  return { ready = true, size = 3 }
</script>
<script type="embedded-module" id="failing">
  _G.loads = (_G.loads or 0) + 1
  pause()
  error("cannot start")
</script>
"#;

#[tokio::test]
async fn suspended_load_is_shared() -> LuaResult<()> {
  let (lua, modules) = create_test_runtime(SLOW)?;
  register_pause(&lua)?;

  let all = Selection::All;
  let one = Selection::single(Some("size"));
  let (a, b) = tokio::join!(
    modules.parse_embedded_module(&lua, "slow", &all),
    modules.parse_embedded_module(&lua, "slow", &one),
  );
  let (a, b) = (a.unwrap(), b.unwrap());

  assert_eq!(load_count(&lua)?, 1);
  assert!(a.get::<bool>("ready")?);
  assert_eq!(b.get::<i64>("size")?, 3);
  assert!(b.get::<LuaValue>("ready")?.is_nil());
  Ok(())
}

#[tokio::test]
async fn concurrent_imports_from_lua_share_one_load() -> LuaResult<()> {
  let (lua, _) = create_test_runtime(SLOW)?;
  register_pause(&lua)?;

  lua.load("results = {}").exec()?;

  let ((), ()) = tokio::try_join!(
    lua.load(r#"results[1] = embedded.import("slow")"#).exec_async(),
    lua.load(r#"results[2] = embedded.import("slow")"#).exec_async(),
  )?;

  let same: bool = lua.load("return results[1] == results[2]").eval()?;
  assert!(same);
  assert_eq!(load_count(&lua)?, 1);
  Ok(())
}

#[tokio::test]
async fn failed_load_is_retried_by_later_imports() -> LuaResult<()> {
  let (lua, modules) = create_test_runtime(SLOW)?;
  register_pause(&lua)?;

  for _ in 0..2 {
    let err = modules
      .parse_embedded_module(&lua, "failing", &Selection::All)
      .await
      .unwrap_err();
    assert!(err.to_string().contains("failed to load embedded module 'failing'"));
  }

  assert_eq!(load_count(&lua)?, 2);
  assert!(!modules.cache().contains("failing"));
  Ok(())
}

#[tokio::test]
async fn concurrent_imports_share_one_failure() -> LuaResult<()> {
  let (lua, modules) = create_test_runtime(SLOW)?;
  register_pause(&lua)?;

  let all = Selection::All;
  let (a, b) = tokio::join!(
    modules.parse_embedded_module(&lua, "failing", &all),
    modules.parse_embedded_module(&lua, "failing", &all),
  );

  assert_eq!(load_count(&lua)?, 1, "top-level side effects run once");
  for result in [a, b] {
    assert!(result.unwrap_err().to_string().contains("cannot start"));
  }
  assert!(!modules.cache().is_loading("failing"));
  Ok(())
}
