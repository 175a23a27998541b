//! Export selection.
//!
//! Builds what a caller gets back from an activated namespace:
//!
//! - [`Selection::All`] hands out the namespace table itself, not a copy.
//! - [`Selection::Single`] always yields a one-entry table. A missing export
//!   is stored as [`MISSING`] because a Lua table cannot hold `nil`.
//! - [`Selection::Subset`] yields only the requested exports that exist.

use mlua::prelude::*;

use crate::cache::ExportNamespace;

/// Value stored for a missing export in a [`Selection::Single`] result.
/// Exposed to Lua as `embedded.null`.
pub const MISSING: LuaValue = LuaValue::NULL;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
  #[default]
  All,
  Single(String),
  Subset(Vec<String>),
}

impl Selection {
  /// `None` or an empty name selects everything.
  pub fn single(name: Option<&str>) -> Self {
    match name {
      Some(name) if !name.is_empty() => Selection::Single(name.to_string()),
      _ => Selection::All,
    }
  }

  /// An empty list selects everything.
  pub fn subset<I, S>(names: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    let names: Vec<String> = names.into_iter().map(Into::into).collect();
    if names.is_empty() {
      Selection::All
    } else {
      Selection::Subset(names)
    }
  }
}

impl FromLua for Selection {
  fn from_lua(value: LuaValue, _lua: &Lua) -> LuaResult<Self> {
    match value {
      LuaValue::Nil => Ok(Selection::All),
      LuaValue::String(s) => {
        let name = s.to_str()?.to_string();
        Ok(Selection::single(Some(name.as_str())))
      }
      LuaValue::Table(t) => {
        let names = t.sequence_values::<String>().collect::<LuaResult<Vec<_>>>()?;
        // Keyed entries would otherwise vanish and widen the selection.
        if t.pairs::<LuaValue, LuaValue>().count() != names.len() {
          return Err(LuaError::external(
            "selection must be a list of names, got a table with non-sequence keys",
          ));
        }
        Ok(Selection::subset(names))
      }
      other => Err(LuaError::external(format!(
        "selection must be nil, a string or a list of strings, got {}",
        other.type_name()
      ))),
    }
  }
}

/// Build the selection result for `namespace`.
pub fn select(lua: &Lua, namespace: &ExportNamespace, selection: &Selection) -> LuaResult<LuaTable> {
  match selection {
    Selection::All => Ok(namespace.table().clone()),
    Selection::Single(name) => {
      let value = match namespace.get(name)? {
        LuaValue::Nil => MISSING,
        value => value,
      };
      let result = lua.create_table_with_capacity(0, 1)?;
      result.raw_set(name.as_str(), value)?;
      Ok(result)
    }
    Selection::Subset(names) => {
      let result = lua.create_table_with_capacity(0, names.len())?;
      for name in names {
        let value = namespace.get(name)?;
        if !value.is_nil() {
          result.raw_set(name.as_str(), value)?;
        }
      }
      Ok(result)
    }
  }
}
