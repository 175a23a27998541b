//! Implementation of the `embedmod import` command.
//!
//! Activates one embedded module and prints the selected exports as JSON.

use std::path::Path;

use anyhow::{Context, Result, anyhow};

use embedmod_lib::config::DocumentConfig;
use embedmod_lib::eval::import_from_document;
use embedmod_lib::select::Selection;

use crate::output::print_json;

pub fn cmd_import(file: &str, id: &str, selection: &Selection, config: &DocumentConfig) -> Result<()> {
  let path = Path::new(file);
  let rt = super::local_runtime()?;

  let exports = rt
    .block_on(import_from_document(path, id, selection, config))
    .map_err(|e| anyhow!("{}", e))
    .with_context(|| format!("Failed to import '{}' from {}", id, path.display()))?;

  print_json(&exports)
}
