//! embedmod-lib: embedded Lua modules inside a single document
//!
//! A document declares fragments as `<script type="embedded-module" id="...">`
//! elements. Other code in the document imports them on demand:
//! - [`document`]: parses script elements and locates declarations
//! - [`activate`]: loads each fragment at most once through a [`activate::ModuleLoader`]
//! - [`cache`]: the owned export cache, readable synchronously after activation
//! - [`select`]: all / single / subset views of an export namespace
//! - [`modules`]: the composed `parse_embedded_module` entry point
//! - [`lua`]: the Lua host (loader, `embedded` global, runtime)
//! - [`eval`]: runs a document's ordinary scripts

pub mod activate;
pub mod cache;
pub mod config;
pub mod consts;
pub mod document;
pub mod error;
pub mod eval;
pub mod lua;
pub mod modules;
pub mod select;

pub use activate::{Activator, ModuleLoader};
pub use cache::{ExportCache, ExportNamespace};
pub use config::DocumentConfig;
pub use document::{Document, ElementKind, FragmentDeclaration, ScriptElement};
pub use error::{EmbedError, LoadError};
pub use modules::EmbeddedModules;
pub use select::{Selection, select};
