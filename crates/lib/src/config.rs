//! Document configuration.
//!
//! Controls which `type` attribute values mark embedded modules and ordinary
//! scripts. Defaults can be overridden through `EMBEDMOD_MODULE_TYPE` and
//! `EMBEDMOD_SCRIPT_TYPE`.

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_MODULE_TYPE, DEFAULT_SCRIPT_TYPE, MODULE_TYPE_ENV, SCRIPT_TYPE_ENV};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentConfig {
  /// Reserved `type` marker of embedded module declarations.
  pub module_type: String,
  /// `type` of scripts the document runner executes.
  pub script_type: String,
}

impl Default for DocumentConfig {
  fn default() -> Self {
    Self {
      module_type: DEFAULT_MODULE_TYPE.to_string(),
      script_type: DEFAULT_SCRIPT_TYPE.to_string(),
    }
  }
}

impl DocumentConfig {
  /// Defaults, with environment overrides applied.
  pub fn from_env() -> Self {
    let mut config = Self::default();
    if let Ok(value) = std::env::var(MODULE_TYPE_ENV)
      && !value.trim().is_empty()
    {
      config.module_type = value.trim().to_string();
    }
    if let Ok(value) = std::env::var(SCRIPT_TYPE_ENV)
      && !value.trim().is_empty()
    {
      config.script_type = value.trim().to_string();
    }
    config
  }

  pub fn is_module_type(&self, kind: &str) -> bool {
    kind.eq_ignore_ascii_case(&self.module_type)
  }

  pub fn is_script_type(&self, kind: &str) -> bool {
    kind.eq_ignore_ascii_case(&self.script_type)
  }
}
