//! Terminal output for embedmod commands.
//!
//! Status lines get a symbol and, when the stream supports it, a color.
//! Machine-readable output goes through [`print_json`].

use std::time::Duration;

use anyhow::Context;
use clap::ValueEnum;
use owo_colors::{OwoColorize, Stream};

use embedmod_lib::document::ElementKind;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
  #[default]
  Text,
  Json,
}

impl OutputFormat {
  pub fn is_json(self) -> bool {
    matches!(self, OutputFormat::Json)
  }
}

pub mod symbols {
  pub const SUCCESS: &str = "✓";
  pub const ERROR: &str = "✗";
  pub const WARNING: &str = "⚠";
  pub const INFO: &str = "•";
  pub const ARROW: &str = "→";
}

/// Scripts usually finish well under a second, so keep sub-second precision.
///
/// Anything that would round to `1000.0ms` is shown in seconds.
pub fn format_duration(duration: Duration) -> String {
  let micros = duration.as_micros();
  match micros {
    0..1_000 => "<1ms".to_string(),
    1_000..999_950 => format!("{:.1}ms", micros as f64 / 1_000.0),
    _ => format!("{:.2}s", duration.as_secs_f64()),
  }
}

pub fn kind_label(kind: ElementKind) -> &'static str {
  match kind {
    ElementKind::Module => "module",
    ElementKind::Script => "script",
    ElementKind::Inert => "inert",
  }
}

pub fn print_success(message: &str) {
  println!(
    "{} {}",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
    message
  );
}

pub fn print_error(message: &str) {
  eprintln!(
    "{} {}",
    symbols::ERROR.if_supports_color(Stream::Stderr, |s| s.red()),
    message.if_supports_color(Stream::Stderr, |s| s.red())
  );
}

pub fn print_warning(message: &str) {
  eprintln!(
    "{} {}",
    symbols::WARNING.if_supports_color(Stream::Stderr, |s| s.yellow()),
    message.if_supports_color(Stream::Stderr, |s| s.yellow())
  );
}

pub fn print_info(message: &str) {
  println!(
    "{} {}",
    symbols::INFO.if_supports_color(Stream::Stdout, |s| s.blue()),
    message
  );
}

/// One row of `embedmod list`. Modules are highlighted since they are the
/// only importable elements.
pub fn print_element(kind: ElementKind, id: Option<&str>, line: usize) {
  let label = format!("{:<6}", kind_label(kind));
  let label = match kind {
    ElementKind::Module => label.if_supports_color(Stream::Stdout, |s| s.cyan()).to_string(),
    ElementKind::Script => label,
    ElementKind::Inert => label.if_supports_color(Stream::Stdout, |s| s.dimmed()).to_string(),
  };
  println!("  {} {} {:<20} line {}", symbols::ARROW, label, id.unwrap_or("-"), line);
}

pub fn print_stat(label: &str, value: &str) {
  println!(
    "  {}: {}",
    label.if_supports_color(Stream::Stdout, |s| s.dimmed()),
    value
  );
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
  println!("{}", json);
  Ok(())
}
