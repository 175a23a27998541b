use std::rc::Rc;

use mlua::prelude::*;

use crate::activate::ModuleLoader;
use crate::document::ScriptElement;
use crate::lua::globals;
use crate::lua::loaders::align_to_document;
use crate::modules::EmbeddedModules;

/// Create a new Lua runtime with the `embedded` global bound to `modules`.
pub fn create_runtime<L>(modules: Rc<EmbeddedModules<L>>) -> LuaResult<Lua>
where
  L: ModuleLoader + 'static,
{
  let lua = Lua::new();
  globals::register_globals(&lua, modules)?;
  Ok(lua)
}

/// Run an ordinary script in the global environment.
///
/// Scripts run as coroutines so they can await `embedded.import`. Error
/// locations use document line numbers.
pub async fn run_script(lua: &Lua, script: &ScriptElement, name: &str) -> LuaResult<()> {
  let source = align_to_document(&script.source, script.line);
  lua.load(&source).set_name(format!("={}", name)).exec_async().await
}
