//! Error types for locating and activating embedded modules.

use mlua::prelude::*;
use thiserror::Error;

/// Errors surfaced by [`crate::activate::Activator`] and
/// [`crate::modules::EmbeddedModules`].
#[derive(Debug, Error)]
pub enum EmbedError {
  /// No script element carries the id, or the first one that does is not
  /// marked as an embedded module.
  #[error("embedded module '{id}' not found")]
  NotFound { id: String },

  /// The loader rejected the fragment. Nothing was cached, so a later
  /// activation retries.
  #[error("failed to load embedded module '{id}': {source}")]
  LoadFailed {
    id: String,
    #[source]
    source: LoadError,
  },

  /// The Lua runtime failed outside of a load, e.g. while allocating a
  /// selection result.
  #[error("lua error: {0}")]
  Lua(#[from] LuaError),
}

impl EmbedError {
  /// The fragment identifier the error refers to.
  pub fn id(&self) -> Option<&str> {
    match self {
      EmbedError::NotFound { id } | EmbedError::LoadFailed { id, .. } => Some(id),
      EmbedError::Lua(_) => None,
    }
  }

  /// Convert into a Lua error. Locate and load failures become runtime
  /// errors carrying the same message.
  pub fn into_lua_err(self) -> LuaError {
    match self {
      EmbedError::Lua(err) => err,
      other => LuaError::runtime(other.to_string()),
    }
  }
}

/// Errors produced while loading a fragment.
///
/// Cloneable so every caller waiting on the same load gets the same error.
#[derive(Debug, Clone, Error)]
pub enum LoadError {
  /// The fragment failed to compile or raised while running its top level.
  #[error("lua error: {0}")]
  Lua(#[from] LuaError),

  /// The fragment evaluated to something that cannot be an export namespace.
  #[error("module must return a table or nothing, got {type_name}")]
  InvalidExports { type_name: &'static str },

  /// The fragment imports itself, directly or through other fragments,
  /// while it is still loading.
  #[error("import cycle: {}", .chain.join(" -> "))]
  Cycle { chain: Vec<String> },
}
