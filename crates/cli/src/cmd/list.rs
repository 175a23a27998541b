//! Implementation of the `embedmod list` command.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use embedmod_lib::config::DocumentConfig;
use embedmod_lib::document::{Document, ElementKind};

use crate::output::{OutputFormat, print_element, print_info, print_json, print_warning};

#[derive(Debug, Serialize)]
struct ElementInfo<'a> {
  kind: ElementKind,
  id: Option<&'a str>,
  #[serde(rename = "type")]
  type_attr: Option<&'a str>,
  line: usize,
}

pub fn cmd_list(file: &str, config: &DocumentConfig, output: OutputFormat) -> Result<()> {
  let path = Path::new(file);
  let text = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
  let document = Document::parse(&text);

  let elements: Vec<ElementInfo<'_>> = document
    .elements()
    .iter()
    .map(|e| ElementInfo {
      kind: e.kind(config),
      id: e.id.as_deref(),
      type_attr: e.type_attr.as_deref(),
      line: e.line,
    })
    .collect();

  if output.is_json() {
    return print_json(&elements);
  }

  if elements.is_empty() {
    print_info(&format!("No script elements in {}", path.display()));
    return Ok(());
  }

  for element in &elements {
    print_element(element.kind, element.id, element.line);
    if element.kind == ElementKind::Module && element.id.is_none() {
      print_warning(&format!(
        "module on line {} has no id and cannot be imported",
        element.line
      ));
    }
  }

  Ok(())
}
