//! Implementation of the `embedmod run` command.
//!
//! Runs every ordinary script of a document in order. Embedded modules only
//! run when a script imports them.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result, anyhow};
use tracing::info;

use embedmod_lib::config::DocumentConfig;
use embedmod_lib::eval::evaluate_document;

use crate::output::{OutputFormat, format_duration, print_json, print_stat, print_success};

pub fn cmd_run(file: &str, config: &DocumentConfig, output: OutputFormat) -> Result<()> {
  let path = Path::new(file);
  let rt = super::local_runtime()?;

  let started = Instant::now();
  let report = rt
    .block_on(evaluate_document(path, config))
    .map_err(|e| anyhow!("{}", e))
    .with_context(|| format!("Failed to run {}", path.display()))?;
  let elapsed = started.elapsed();
  info!(elapsed_ms = elapsed.as_millis() as u64, "run finished");

  if output.is_json() {
    return print_json(&report);
  }

  print_success(&format!(
    "Ran {} script(s) in {}",
    report.scripts_run,
    format_duration(elapsed)
  ));
  let activated = if report.activated.is_empty() {
    "none".to_string()
  } else {
    report.activated.join(", ")
  };
  print_stat("Activated", &activated);

  Ok(())
}
