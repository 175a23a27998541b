//! Document evaluation.
//!
//! [`evaluate_document`] runs every ordinary script of a document in order,
//! with the `embedded` global available so scripts can import the document's
//! fragments. [`import_from_document`] activates a single fragment without
//! running any script.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use mlua::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::DocumentConfig;
use crate::document::Document;
use crate::error::EmbedError;
use crate::lua::loaders::LuaModuleLoader;
use crate::lua::runtime;
use crate::modules::EmbeddedModules;
use crate::select::Selection;

/// Errors that can occur while evaluating a document.
#[derive(Debug, thiserror::Error)]
pub enum EvalError {
  #[error("cannot read '{}': {source}", .path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// Lua runtime setup or value conversion error.
  #[error("lua error: {0}")]
  Lua(#[from] LuaError),

  /// An ordinary script raised an error; later scripts were not run.
  #[error("script #{index} (line {line}) failed: {source}")]
  Script {
    index: usize,
    line: usize,
    #[source]
    source: LuaError,
  },

  #[error(transparent)]
  Embed(#[from] EmbedError),
}

/// Outcome of [`evaluate_document`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
  pub scripts_run: usize,
  /// Fragments activated during the run, sorted.
  pub activated: Vec<String>,
}

/// A parsed document bound to a fresh Lua runtime.
struct Session {
  document: Rc<Document>,
  modules: Rc<EmbeddedModules<LuaModuleLoader>>,
  lua: Lua,
  name: String,
}

impl Session {
  fn open(text: &str, name: &str, base_dir: Option<&Path>, config: &DocumentConfig) -> Result<Self, EvalError> {
    let document = Rc::new(Document::parse(text));
    let modules = Rc::new(EmbeddedModules::new(document.clone(), config.clone(), LuaModuleLoader));
    let lua = runtime::create_runtime(modules.clone())?;

    if let Some(dir) = base_dir {
      set_package_path(&lua, &build_package_path(dir))?;
    }

    debug!(
      document = %name,
      elements = document.elements().len(),
      modules = document.module_ids(config).len(),
      "parsed document"
    );

    Ok(Self {
      document,
      modules,
      lua,
      name: name.to_string(),
    })
  }

  async fn run(&self) -> Result<RunReport, EvalError> {
    let config = self.modules.config();
    let mut scripts_run = 0;

    for (index, script) in self.document.scripts(config).enumerate() {
      debug!(index, line = script.line, "running script");
      runtime::run_script(&self.lua, script, &self.name)
        .await
        .map_err(|source| EvalError::Script {
          index,
          line: script.line,
          source,
        })?;
      scripts_run += 1;
    }

    let activated = self.modules.cache().ids();
    info!(document = %self.name, scripts_run, activated = activated.len(), "document evaluated");
    Ok(RunReport { scripts_run, activated })
  }
}

/// Read a document from disk and run its scripts.
///
/// `lua/` next to the document is added to `package.path`, so scripts and
/// fragments can also `require` ordinary Lua files.
pub async fn evaluate_document(path: &Path, config: &DocumentConfig) -> Result<RunReport, EvalError> {
  let (text, name) = read_document(path).await?;
  let session = Session::open(&text, &name, path.parent(), config)?;
  session.run().await
}

/// Run the scripts of an in-memory document.
pub async fn evaluate_source(text: &str, name: &str, config: &DocumentConfig) -> Result<RunReport, EvalError> {
  let session = Session::open(text, name, None, config)?;
  session.run().await
}

/// Activate one fragment of a document and return the selection as JSON.
///
/// Values without a JSON form (functions, userdata) are left out; the
/// missing-export sentinel of a single-name selection becomes `null`.
pub async fn import_from_document(
  path: &Path,
  id: &str,
  selection: &Selection,
  config: &DocumentConfig,
) -> Result<serde_json::Value, EvalError> {
  let (text, name) = read_document(path).await?;
  let session = Session::open(&text, &name, path.parent(), config)?;

  let table = session
    .modules
    .parse_embedded_module(&session.lua, id, selection)
    .await?;

  Ok(exports_to_json(&session.lua, &table)?)
}

/// Convert a selection table to a JSON object.
///
/// The top level is walked by hand: the missing-export sentinel is light
/// userdata, which serde conversion would drop along with functions.
fn exports_to_json(lua: &Lua, table: &LuaTable) -> LuaResult<serde_json::Value> {
  let mut object = serde_json::Map::new();
  for pair in table.pairs::<LuaValue, LuaValue>() {
    let (key, value) = pair?;
    let LuaValue::String(name) = key else { continue };

    let json = match value {
      LuaValue::LightUserData(ud) if ud.0.is_null() => serde_json::Value::Null,
      LuaValue::Function(_) | LuaValue::Thread(_) | LuaValue::UserData(_) | LuaValue::LightUserData(_) => continue,
      value => lua.from_value_with(value, LuaDeserializeOptions::new().deny_unsupported_types(false))?,
    };
    object.insert(name.to_str()?.to_string(), json);
  }
  Ok(serde_json::Value::Object(object))
}

async fn read_document(path: &Path) -> Result<(String, String), EvalError> {
  let text = tokio::fs::read_to_string(path).await.map_err(|source| EvalError::Read {
    path: path.to_path_buf(),
    source,
  })?;
  let name = path
    .file_name()
    .map(|n| n.to_string_lossy().into_owned())
    .unwrap_or_else(|| path.display().to_string());
  Ok((text, name))
}

/// `lua/?.lua` and `lua/?/init.lua` under `base_dir`, if that directory exists.
fn build_package_path(base_dir: &Path) -> String {
  let lua_dir = base_dir.join("lua");
  if !lua_dir.is_dir() {
    return String::new();
  }
  let lua_dir_str = lua_dir.to_string_lossy().replace("\\", "/");
  format!("{0}/?.lua;{0}/?/init.lua", lua_dir_str)
}

/// Prepend `new_paths` to `package.path`.
fn set_package_path(lua: &Lua, new_paths: &str) -> LuaResult<()> {
  if new_paths.is_empty() {
    return Ok(());
  }

  let package: LuaTable = lua.globals().get("package")?;
  let current_path: String = package.get("path")?;
  package.set("path", format!("{};{}", new_paths, current_path))?;

  debug!(package_path = %new_paths, "set package.path");
  Ok(())
}
