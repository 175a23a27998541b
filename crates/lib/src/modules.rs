//! Public entry point for importing embedded modules.

use std::rc::Rc;

use mlua::prelude::*;

use crate::activate::{Activator, ModuleLoader};
use crate::cache::ExportCache;
use crate::config::DocumentConfig;
use crate::document::Document;
use crate::error::EmbedError;
use crate::select::{Selection, select};

/// Locate, activate and select in one call.
///
/// Each instance owns its own [`ExportCache`]; nothing is shared between
/// registries built from the same document.
pub struct EmbeddedModules<L> {
  activator: Activator<L>,
  config: DocumentConfig,
}

impl<L: ModuleLoader> EmbeddedModules<L> {
  pub fn new(document: Rc<Document>, config: DocumentConfig, loader: L) -> Self {
    Self::with_cache(document, config, loader, Rc::new(ExportCache::new()))
  }

  pub fn with_cache(document: Rc<Document>, config: DocumentConfig, loader: L, cache: Rc<ExportCache>) -> Self {
    let activator = Activator::new(document, config.module_type.clone(), loader, cache);
    Self { activator, config }
  }

  pub fn activator(&self) -> &Activator<L> {
    &self.activator
  }

  pub fn config(&self) -> &DocumentConfig {
    &self.config
  }

  pub fn document(&self) -> &Document {
    self.activator.document()
  }

  /// The export cache, for synchronous reads after activation.
  pub fn cache(&self) -> &Rc<ExportCache> {
    self.activator.cache()
  }

  /// Activate `id` if needed and return the requested exports.
  pub async fn parse_embedded_module(&self, lua: &Lua, id: &str, selection: &Selection) -> Result<LuaTable, EmbedError> {
    let namespace = self.activator.activate(lua, id).await?;
    Ok(select(lua, &namespace, selection)?)
  }
}
