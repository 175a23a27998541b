//! Fragments run in private environments and keep their own state.

use embedmod_lib::{EmbedError, Selection};
use mlua::prelude::*;

use super::common::{create_test_runtime, load_count};

const GREETERS: &str = r#"
<script type="embedded-module" id="greeter-a">
  _G.loads = (_G.loads or 0) + 1
  name = "A"
  function greet(who) return "Hello from " .. who end
</script>
<script type="embedded-module" id="greeter-b">
  _G.loads = (_G.loads or 0) + 1
  name = "B"
  function greet(who) return "Greetings, " .. who end
</script>
"#;

#[tokio::test]
async fn same_names_do_not_collide() -> LuaResult<()> {
  let (lua, modules) = create_test_runtime(GREETERS)?;

  let a = modules
    .parse_embedded_module(&lua, "greeter-a", &Selection::All)
    .await
    .unwrap();
  let b = modules
    .parse_embedded_module(&lua, "greeter-b", &Selection::All)
    .await
    .unwrap();

  let greet_a: LuaFunction = a.get("greet")?;
  let greet_b: LuaFunction = b.get("greet")?;
  assert_eq!(greet_a.call::<String>(a.get::<String>("name")?)?, "Hello from A");
  assert_eq!(greet_b.call::<String>(b.get::<String>("name")?)?, "Greetings, B");

  assert!(lua.globals().get::<LuaValue>("name")?.is_nil());
  assert!(lua.globals().get::<LuaValue>("greet")?.is_nil());
  Ok(())
}

#[tokio::test]
async fn top_level_effects_run_once() -> LuaResult<()> {
  let (lua, modules) = create_test_runtime(GREETERS)?;

  for selection in [
    Selection::All,
    Selection::single(Some("greet")),
    Selection::subset(["name", "ghost"]),
  ] {
    modules
      .parse_embedded_module(&lua, "greeter-a", &selection)
      .await
      .unwrap();
  }

  assert_eq!(load_count(&lua)?, 1);
  assert_eq!(modules.cache().ids(), vec!["greeter-a".to_string()]);
  Ok(())
}

#[tokio::test]
async fn registries_do_not_share_caches() -> LuaResult<()> {
  let (lua, first) = create_test_runtime(GREETERS)?;
  let (_, second) = create_test_runtime(GREETERS)?;

  let a = first
    .parse_embedded_module(&lua, "greeter-a", &Selection::All)
    .await
    .unwrap();
  let b = second
    .parse_embedded_module(&lua, "greeter-a", &Selection::All)
    .await
    .unwrap();

  assert_ne!(a.to_pointer(), b.to_pointer());
  assert_eq!(load_count(&lua)?, 2);
  Ok(())
}

#[tokio::test]
async fn cached_namespace_is_readable_synchronously() -> LuaResult<()> {
  let (lua, modules) = create_test_runtime(GREETERS)?;
  assert!(modules.cache().get("greeter-b").is_none());

  let all = modules
    .parse_embedded_module(&lua, "greeter-b", &Selection::All)
    .await
    .unwrap();

  let cached = modules.cache().get("greeter-b").unwrap();
  assert_eq!(cached.table().to_pointer(), all.to_pointer());
  assert_eq!(cached.names()?, vec!["greet".to_string(), "name".to_string()]);
  Ok(())
}

#[tokio::test]
async fn missing_declaration_never_touches_the_cache() -> LuaResult<()> {
  let (lua, modules) = create_test_runtime(GREETERS)?;
  let err = modules
    .parse_embedded_module(&lua, "greeter-c", &Selection::All)
    .await
    .unwrap_err();

  assert!(matches!(err, EmbedError::NotFound { ref id } if id == "greeter-c"));
  assert!(modules.cache().is_empty());
  Ok(())
}
