//! Lua host for embedded modules.
//!
//! # Submodules
//!
//! - [`globals`] - The `embedded` global table (`import`, `modules`, `null`)
//! - [`loaders`] - Loader that evaluates fragments in private environments
//! - [`runtime`] - Lua VM setup and script execution

pub mod globals;
pub mod loaders;
pub mod runtime;
