mod import;
mod list;
mod run;

pub use import::cmd_import;
pub use list::cmd_list;
pub use run::cmd_run;

/// Current-thread runtime: Lua values never leave the thread that created them.
fn local_runtime() -> anyhow::Result<tokio::runtime::Runtime> {
  use anyhow::Context;

  tokio::runtime::Builder::new_current_thread()
    .enable_all()
    .build()
    .context("Failed to create async runtime")
}
