//! The `embedded` global table.
//!
//! - `embedded.import(id [, selection])` - activate a fragment and select its
//!   exports; `selection` is nil, a name, or a list of names
//! - `embedded.modules` - read-only view of activated namespaces, by id
//! - `embedded.null` - value stored for a missing export in a single-name
//!   selection
//! - `embedded.declared()` - ids of all declared fragments, in document order

use std::rc::Rc;

use mlua::prelude::*;

use crate::activate::ModuleLoader;
use crate::consts::GLOBAL_TABLE;
use crate::error::EmbedError;
use crate::modules::EmbeddedModules;
use crate::select::{MISSING, Selection};

/// Register the `embedded` global table in the Lua runtime.
pub fn register_globals<L>(lua: &Lua, modules: Rc<EmbeddedModules<L>>) -> LuaResult<()>
where
  L: ModuleLoader + 'static,
{
  let embedded = lua.create_table()?;

  let import_modules = modules.clone();
  let import = lua.create_async_function(move |lua, (id, selection): (String, Selection)| {
    let modules = import_modules.clone();
    async move {
      modules
        .parse_embedded_module(&lua, &id, &selection)
        .await
        .map_err(EmbedError::into_lua_err)
    }
  })?;
  embedded.set("import", import)?;

  embedded.set("modules", create_modules_view(lua, modules.clone())?)?;
  embedded.set("null", MISSING)?;

  let declared = lua.create_function(move |_, ()| {
    let ids: Vec<String> = modules
      .document()
      .module_ids(modules.config())
      .into_iter()
      .map(str::to_string)
      .collect();
    Ok(ids)
  })?;
  embedded.set("declared", declared)?;

  lua.globals().set(GLOBAL_TABLE, embedded)?;

  Ok(())
}

/// Proxy table reading through to the export cache.
///
/// Indexing returns the cached namespace or nil, `pairs` walks a snapshot of
/// the activated fragments, and assignment raises an error.
fn create_modules_view<L>(lua: &Lua, modules: Rc<EmbeddedModules<L>>) -> LuaResult<LuaTable>
where
  L: ModuleLoader + 'static,
{
  let view = lua.create_table()?;
  let mt = lua.create_table()?;

  let index_modules = modules.clone();
  mt.set(
    "__index",
    lua.create_function(move |_, (_, id): (LuaValue, String)| {
      Ok(index_modules.cache().get(&id).map(|ns| ns.into_table()))
    })?,
  )?;

  mt.set(
    "__newindex",
    lua.create_function(|_, (_, id): (LuaValue, LuaValue)| -> LuaResult<()> {
      Err(LuaError::runtime(format!(
        "embedded.modules is read-only (tried to assign '{}')",
        id.to_string().unwrap_or_else(|_| "?".to_string())
      )))
    })?,
  )?;

  mt.set(
    "__pairs",
    lua.create_function(move |lua, _: LuaValue| {
      let snapshot = lua.create_table()?;
      let cache = modules.cache();
      for id in cache.ids() {
        if let Some(ns) = cache.get(&id) {
          snapshot.raw_set(id, ns.into_table())?;
        }
      }
      let next: LuaFunction = lua.globals().get("next")?;
      Ok((next, snapshot, LuaValue::Nil))
    })?,
  )?;

  mt.set("__metatable", false)?;
  view.set_metatable(Some(mt))?;
  Ok(view)
}
