//! Export cache shared by the activator and its readers.
//!
//! A fragment id is activated, loading, or unknown. Activated namespaces are
//! never replaced or evicted. While an id is loading, every other caller
//! subscribes to the outcome of that one load. A failed load leaves the id
//! unknown again, so the next activation retries.

use std::cell::RefCell;
use std::collections::HashMap;

use mlua::prelude::*;
use tokio::sync::watch;

use crate::error::LoadError;

/// The exports of one activated fragment.
///
/// Clones are handles to the same Lua table.
#[derive(Debug, Clone)]
pub struct ExportNamespace {
  table: LuaTable,
}

impl ExportNamespace {
  pub fn new(table: LuaTable) -> Self {
    Self { table }
  }

  pub fn table(&self) -> &LuaTable {
    &self.table
  }

  pub fn into_table(self) -> LuaTable {
    self.table
  }

  /// Raw lookup of one export; `Nil` when absent.
  pub fn get(&self, name: &str) -> LuaResult<LuaValue> {
    self.table.raw_get(name)
  }

  /// Whether both handles refer to the same table.
  pub fn same_as(&self, other: &ExportNamespace) -> bool {
    self.table.to_pointer() == other.table.to_pointer()
  }

  /// String keys of the namespace, sorted.
  pub fn names(&self) -> LuaResult<Vec<String>> {
    let mut names = Vec::new();
    for pair in self.table.pairs::<LuaValue, LuaValue>() {
      let (key, _) = pair?;
      if let LuaValue::String(s) = key {
        names.push(s.to_str()?.to_string());
      }
    }
    names.sort();
    Ok(names)
  }
}

/// Outcome of an in-flight load; `None` until the load settles.
pub(crate) type LoadOutcome = Option<Result<ExportNamespace, LoadError>>;

#[derive(Debug, Default)]
pub struct ExportCache {
  ready: RefCell<HashMap<String, ExportNamespace>>,
  loading: RefCell<HashMap<String, watch::Receiver<LoadOutcome>>>,
}

impl ExportCache {
  pub fn new() -> Self {
    Self::default()
  }

  /// Synchronous lookup of an already activated fragment.
  pub fn get(&self, id: &str) -> Option<ExportNamespace> {
    self.ready.borrow().get(id).cloned()
  }

  pub fn contains(&self, id: &str) -> bool {
    self.ready.borrow().contains_key(id)
  }

  /// Whether a load for `id` is in flight.
  pub fn is_loading(&self, id: &str) -> bool {
    self.loading.borrow().contains_key(id)
  }

  /// Ids of activated fragments, sorted.
  pub fn ids(&self) -> Vec<String> {
    let mut ids: Vec<String> = self.ready.borrow().keys().cloned().collect();
    ids.sort();
    ids
  }

  /// Number of activated fragments.
  pub fn len(&self) -> usize {
    self.ready.borrow().len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Subscribe to the in-flight load of `id`, if there is one.
  pub(crate) fn in_flight(&self, id: &str) -> Option<watch::Receiver<LoadOutcome>> {
    self.loading.borrow().get(id).cloned()
  }

  /// Mark `id` as loading. The caller owns the load until the returned
  /// handle is finished or dropped.
  pub(crate) fn begin(&self, id: &str) -> InFlight<'_> {
    let (tx, rx) = watch::channel(None);
    self.loading.borrow_mut().insert(id.to_string(), rx);
    InFlight {
      cache: self,
      id: id.to_string(),
      tx,
    }
  }
}

/// Ownership of one in-flight load.
///
/// Dropping it unfinished clears the loading mark and closes the channel, so
/// waiters start over instead of waiting forever.
pub(crate) struct InFlight<'c> {
  cache: &'c ExportCache,
  id: String,
  tx: watch::Sender<LoadOutcome>,
}

impl InFlight<'_> {
  /// Record the outcome and hand the same outcome to every waiter.
  ///
  /// On success the namespace already stored under the id, if any, wins.
  pub(crate) fn finish(self, result: Result<ExportNamespace, LoadError>) -> Result<ExportNamespace, LoadError> {
    self.cache.loading.borrow_mut().remove(&self.id);
    let result = result.map(|namespace| {
      self
        .cache
        .ready
        .borrow_mut()
        .entry(self.id.clone())
        .or_insert(namespace)
        .clone()
    });
    self.tx.send_replace(Some(result.clone()));
    result
  }
}

impl Drop for InFlight<'_> {
  fn drop(&mut self) {
    self.cache.loading.borrow_mut().remove(&self.id);
  }
}
