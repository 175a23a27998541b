//! Fragment activation.
//!
//! The [`Activator`] locates a declaration, hands its source to a
//! [`ModuleLoader`] once, and records the resulting namespace in the
//! [`ExportCache`]. Concurrent activations of one id wait for the load that
//! is already in flight and all receive its outcome, success or failure.
//!
//! Each load runs with its import chain in a task-local, so a fragment that
//! imports itself while loading fails with [`LoadError::Cycle`] instead of
//! waiting on its own load.

use std::future::Future;
use std::rc::Rc;

use mlua::prelude::*;
use tracing::{debug, info, warn};

use crate::cache::{ExportCache, ExportNamespace};
use crate::document::{Document, FragmentDeclaration};
use crate::error::{EmbedError, LoadError};

/// Host capability that turns fragment source into an export table.
pub trait ModuleLoader {
  fn load(&self, lua: &Lua, decl: FragmentDeclaration<'_>) -> impl Future<Output = Result<LuaTable, LoadError>>;
}

pub struct Activator<L> {
  document: Rc<Document>,
  marker: String,
  loader: L,
  cache: Rc<ExportCache>,
}

impl<L: ModuleLoader> Activator<L> {
  pub fn new(document: Rc<Document>, marker: impl Into<String>, loader: L, cache: Rc<ExportCache>) -> Self {
    Self {
      document,
      marker: marker.into(),
      loader,
      cache,
    }
  }

  pub fn document(&self) -> &Document {
    &self.document
  }

  pub fn marker(&self) -> &str {
    &self.marker
  }

  pub fn loader(&self) -> &L {
    &self.loader
  }

  pub fn cache(&self) -> &Rc<ExportCache> {
    &self.cache
  }

  /// Activate the fragment declared under `id` and return its exports.
  ///
  /// The loader runs at most once per id for overlapping callers; a failed
  /// load is reported to all of them and leaves the id unloaded, so the
  /// next call tries again.
  pub async fn activate(&self, lua: &Lua, id: &str) -> Result<ExportNamespace, EmbedError> {
    let decl = self.document.locate(id, &self.marker)?;

    loop {
      if let Some(namespace) = self.cache.get(id) {
        debug!(id, "embedded module served from cache");
        return Ok(namespace);
      }

      let Some(mut pending) = self.cache.in_flight(id) else {
        return self.load(lua, decl).await;
      };

      if let Some(chain) = import_cycle(id) {
        warn!(id, chain = ?chain, "import cycle while loading embedded module");
        return Err(EmbedError::LoadFailed {
          id: id.to_string(),
          source: LoadError::Cycle { chain },
        });
      }

      debug!(id, "waiting for in-flight load");
      let outcome = match pending.wait_for(Option::is_some).await {
        Ok(outcome) => (*outcome).clone(),
        // The loading caller went away before finishing; start over.
        Err(_) => continue,
      };

      match outcome {
        Some(Ok(namespace)) => return Ok(namespace),
        Some(Err(source)) => {
          return Err(EmbedError::LoadFailed {
            id: id.to_string(),
            source,
          });
        }
        None => continue,
      }
    }
  }

  async fn load(&self, lua: &Lua, decl: FragmentDeclaration<'_>) -> Result<ExportNamespace, EmbedError> {
    let id = decl.id;
    let in_flight = self.cache.begin(id);
    debug!(id, line = decl.line, "activating embedded module");

    let mut chain = IMPORT_CHAIN.try_with(Clone::clone).unwrap_or_default();
    chain.push(id.to_string());

    let result = IMPORT_CHAIN
      .scope(chain, self.loader.load(lua, decl))
      .await
      .map(ExportNamespace::new);
    match &result {
      Ok(_) => info!(id, "embedded module activated"),
      Err(err) => warn!(id, error = %err, "embedded module failed to load"),
    }

    in_flight.finish(result).map_err(|source| EmbedError::LoadFailed {
      id: id.to_string(),
      source,
    })
  }
}

tokio::task_local! {
  /// Ids whose loads enclose the current poll, outermost first.
  static IMPORT_CHAIN: Vec<String>;
}

/// The chain closed by importing `id`, if `id` is one of the enclosing loads.
fn import_cycle(id: &str) -> Option<Vec<String>> {
  IMPORT_CHAIN
    .try_with(|chain| {
      chain.iter().position(|loading| loading == id).map(|start| {
        let mut cycle = chain[start..].to_vec();
        cycle.push(id.to_string());
        cycle
      })
    })
    .ok()
    .flatten()
}
