use std::rc::Rc;

use embedmod_lib::lua::loaders::LuaModuleLoader;
use embedmod_lib::lua::runtime::create_runtime;
use embedmod_lib::{Document, DocumentConfig, EmbeddedModules};
use mlua::prelude::*;

pub type Modules = Rc<EmbeddedModules<LuaModuleLoader>>;

/// Build a runtime with the `embedded` global bound to `doc`.
pub fn create_test_runtime(doc: &str) -> LuaResult<(Lua, Modules)> {
  let modules = Rc::new(EmbeddedModules::new(
    Rc::new(Document::parse(doc)),
    DocumentConfig::default(),
    LuaModuleLoader,
  ));
  let lua = create_runtime(modules.clone())?;
  Ok((lua, modules))
}

/// Register `pause()`, an async global that suspends the calling coroutine once.
pub fn register_pause(lua: &Lua) -> LuaResult<()> {
  let pause = lua.create_async_function(|_, ()| async {
    tokio::task::yield_now().await;
    Ok(())
  })?;
  lua.globals().set("pause", pause)
}

/// Value of the `loads` counter fragments bump on `_G`.
pub fn load_count(lua: &Lua) -> LuaResult<i64> {
  Ok(lua.globals().get::<Option<i64>>("loads")?.unwrap_or(0))
}
