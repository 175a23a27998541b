mod cmd;
mod output;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use embedmod_lib::config::DocumentConfig;
use embedmod_lib::select::Selection;

use crate::output::{OutputFormat, print_error};

/// Run documents that carry embedded Lua modules
#[derive(Parser)]
#[command(name = "embedmod")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable debug logging (RUST_LOG overrides)
  #[arg(short, long, global = true)]
  verbose: bool,

  /// `type` marking embedded modules [env: EMBEDMOD_MODULE_TYPE]
  #[arg(long, global = true)]
  module_type: Option<String>,

  /// `type` marking ordinary scripts [env: EMBEDMOD_SCRIPT_TYPE]
  #[arg(long, global = true)]
  script_type: Option<String>,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Run the ordinary scripts of a document
  Run {
    /// Path to the document
    file: String,

    #[arg(short, long, value_enum, default_value_t)]
    output: OutputFormat,
  },

  /// List the script elements of a document
  List {
    /// Path to the document
    file: String,

    #[arg(short, long, value_enum, default_value_t)]
    output: OutputFormat,
  },

  /// Activate one embedded module and print its exports as JSON
  Import {
    /// Path to the document
    file: String,

    /// Id of the embedded module
    id: String,

    /// Return only this export
    #[arg(long, conflicts_with = "subset")]
    select: Option<String>,

    /// Return only these exports (comma-separated)
    #[arg(long, value_delimiter = ',')]
    subset: Vec<String>,
  },
}

impl Cli {
  fn document_config(&self) -> DocumentConfig {
    let mut config = DocumentConfig::from_env();
    if let Some(module_type) = &self.module_type {
      config.module_type = module_type.clone();
    }
    if let Some(script_type) = &self.script_type {
      config.script_type = script_type.clone();
    }
    config
  }
}

fn main() -> ExitCode {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "warn" };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  let config = cli.document_config();

  let result = match &cli.command {
    Commands::Run { file, output } => cmd::cmd_run(file, &config, *output),
    Commands::List { file, output } => cmd::cmd_list(file, &config, *output),
    Commands::Import {
      file,
      id,
      select,
      subset,
    } => {
      let selection = match select {
        Some(name) => Selection::single(Some(name.as_str())),
        None => Selection::subset(subset.iter().cloned()),
      };
      cmd::cmd_import(file, id, &selection, &config)
    }
  };

  match result {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      print_error(&format!("{:#}", err));
      ExitCode::FAILURE
    }
  }
}
