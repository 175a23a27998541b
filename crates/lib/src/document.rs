//! Document parsing and embedded module declaration lookup.
//!
//! A document is HTML-like text. Only `<script>` elements matter here: each one
//! is captured with its `id`, its `type` and its raw text content. Content is
//! never interpreted by this module.
//!
//! ```html
//! <script type="embedded-module" id="greeter">
//!   return { greet = function(name) return "hello " .. name end }
//! </script>
//! <script type="text/lua">
//!   local m = embedded.import("greeter", "greet")
//!   print(m.greet("world"))
//! </script>
//! ```

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::warn;

use crate::config::DocumentConfig;
use crate::error::EmbedError;

/// Matches either a comment (skipped) or a whole script element. Script
/// content runs to the first closing tag, as in HTML.
static ELEMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?is)<!--.*?-->|<script\b([^>]*)>(.*?)</script\s*>").expect("element regex is valid")
});

static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r#"([^\s"'<>/=]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#).expect("attribute regex is valid")
});

/// How the document treats a script element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
  /// Declared embedded module, only run when imported.
  Module,
  /// Ordinary script, run in document order.
  Script,
  /// Any other `type`; never run.
  Inert,
}

/// A `<script>` element as written in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptElement {
  pub id: Option<String>,
  pub type_attr: Option<String>,
  pub source: String,
  /// 1-based line of the opening tag.
  pub line: usize,
}

impl ScriptElement {
  pub fn kind(&self, config: &DocumentConfig) -> ElementKind {
    match self.type_attr.as_deref() {
      Some(t) if config.is_module_type(t) => ElementKind::Module,
      None => ElementKind::Script,
      Some(t) if config.is_script_type(t) => ElementKind::Script,
      Some(_) => ElementKind::Inert,
    }
  }
}

/// A located embedded module declaration, borrowed from its [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FragmentDeclaration<'d> {
  pub id: &'d str,
  pub source: &'d str,
  pub line: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Document {
  elements: Vec<ScriptElement>,
}

impl Document {
  /// Parse document text into its script elements.
  pub fn parse(text: &str) -> Self {
    let mut elements = Vec::new();
    let mut line = 1;
    let mut cursor = 0;

    for caps in ELEMENT_RE.captures_iter(text) {
      let Some(whole) = caps.get(0) else { continue };
      line += text[cursor..whole.start()].matches('\n').count();
      cursor = whole.start();

      // Comments have no capture groups.
      let (Some(attrs), Some(body)) = (caps.get(1), caps.get(2)) else {
        continue;
      };

      let (id, type_attr) = parse_attributes(attrs.as_str());
      elements.push(ScriptElement {
        id,
        type_attr,
        source: body.as_str().to_string(),
        line,
      });
    }

    let mut seen = HashSet::new();
    for element in &elements {
      if let Some(id) = &element.id
        && !seen.insert(id.as_str())
      {
        warn!(id = %id, line = element.line, "duplicate script id, only the first element is reachable");
      }
    }

    Document { elements }
  }

  pub fn elements(&self) -> &[ScriptElement] {
    &self.elements
  }

  /// Find the embedded module declared under `id`.
  ///
  /// Like an id lookup in a browser, only the first element carrying `id` is
  /// considered. It must be marked with `marker`, otherwise the lookup fails
  /// the same way as a missing id.
  pub fn locate(&self, id: &str, marker: &str) -> Result<FragmentDeclaration<'_>, EmbedError> {
    let element = self
      .elements
      .iter()
      .find(|e| e.id.as_deref() == Some(id))
      .ok_or_else(|| EmbedError::NotFound { id: id.to_string() })?;

    match (element.id.as_deref(), element.type_attr.as_deref()) {
      (Some(element_id), Some(t)) if t.eq_ignore_ascii_case(marker) => Ok(FragmentDeclaration {
        id: element_id,
        source: &element.source,
        line: element.line,
      }),
      _ => Err(EmbedError::NotFound { id: id.to_string() }),
    }
  }

  /// Identifiers of all embedded module declarations, in document order.
  pub fn module_ids(&self, config: &DocumentConfig) -> Vec<&str> {
    self
      .elements
      .iter()
      .filter(|e| e.kind(config) == ElementKind::Module)
      .filter_map(|e| e.id.as_deref())
      .collect()
  }

  /// Ordinary scripts, in document order.
  pub fn scripts<'a>(&'a self, config: &'a DocumentConfig) -> impl Iterator<Item = &'a ScriptElement> + 'a {
    self.elements.iter().filter(move |e| e.kind(config) == ElementKind::Script)
  }
}

/// Extract `id` and `type` from the raw attribute text of an opening tag.
fn parse_attributes(raw: &str) -> (Option<String>, Option<String>) {
  let mut id = None;
  let mut type_attr = None;

  for caps in ATTR_RE.captures_iter(raw) {
    let Some(name) = caps.get(1) else { continue };
    let value = caps
      .get(2)
      .or_else(|| caps.get(3))
      .or_else(|| caps.get(4))
      .map(|m| m.as_str().to_string())
      .unwrap_or_default();

    // First occurrence of an attribute wins.
    if name.as_str().eq_ignore_ascii_case("id") {
      id.get_or_insert(value);
    } else if name.as_str().eq_ignore_ascii_case("type") {
      type_attr.get_or_insert(value.trim().to_string());
    }
  }

  (id.filter(|v| !v.is_empty()), type_attr)
}
