//! Lua implementation of the module loading capability.
//!
//! Each fragment runs as an async chunk inside its own environment table:
//! - `__id` is set to the fragment identifier
//! - a metatable with `__index` pointing to `_G` gives read access to globals
//!
//! There is no `__newindex`, so top-level assignments stay in the fragment's
//! environment and never leak into `_G` or into other fragments.
//!
//! A fragment exports the table it returns. If it returns nothing, its
//! top-level globals are exported instead.

use mlua::prelude::*;

use crate::activate::ModuleLoader;
use crate::document::FragmentDeclaration;
use crate::error::LoadError;

/// Environment key holding the fragment identifier.
pub const ID_KEY: &str = "__id";

#[derive(Debug, Default, Clone, Copy)]
pub struct LuaModuleLoader;

impl ModuleLoader for LuaModuleLoader {
  async fn load(&self, lua: &Lua, decl: FragmentDeclaration<'_>) -> Result<LuaTable, LoadError> {
    let env = create_fragment_env(lua, decl.id)?;
    let source = align_to_document(decl.source, decl.line);

    let result: LuaValue = lua
      .load(&source)
      .set_name(format!("={}", decl.id))
      .set_environment(env.clone())
      .call_async(())
      .await?;

    match result {
      LuaValue::Table(exports) => Ok(exports),
      LuaValue::Nil => Ok(collect_env_exports(lua, &env)?),
      other => Err(LoadError::InvalidExports {
        type_name: other.type_name(),
      }),
    }
  }
}

/// Create the private environment a fragment runs in.
pub fn create_fragment_env(lua: &Lua, id: &str) -> LuaResult<LuaTable> {
  let env = lua.create_table()?;
  env.set(ID_KEY, id)?;

  // Inherit reads from _G
  let mt = lua.create_table()?;
  mt.set("__index", lua.globals())?;
  env.set_metatable(Some(mt))?;

  Ok(env)
}

/// Copy the string-keyed globals a fragment defined into a fresh table.
fn collect_env_exports(lua: &Lua, env: &LuaTable) -> LuaResult<LuaTable> {
  let exports = lua.create_table()?;
  for pair in env.pairs::<LuaValue, LuaValue>() {
    let (key, value) = pair?;
    if let LuaValue::String(ref name) = key
      && *name != ID_KEY
    {
      exports.raw_set(key, value)?;
    }
  }
  Ok(exports)
}

/// Prefix the source with blank lines so Lua reports document line numbers.
pub(crate) fn align_to_document(source: &str, line: usize) -> String {
  let mut aligned = "\n".repeat(line.saturating_sub(1));
  aligned.push_str(source);
  aligned
}
