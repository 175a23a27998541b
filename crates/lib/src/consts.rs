/// `type` attribute value reserved for embedded modules.
pub const DEFAULT_MODULE_TYPE: &str = "embedded-module";

/// `type` attribute value of ordinary scripts run by the document runner.
pub const DEFAULT_SCRIPT_TYPE: &str = "text/lua";

/// Name of the global table exposed to Lua scripts.
pub const GLOBAL_TABLE: &str = "embedded";

pub const MODULE_TYPE_ENV: &str = "EMBEDMOD_MODULE_TYPE";
pub const SCRIPT_TYPE_ENV: &str = "EMBEDMOD_SCRIPT_TYPE";
