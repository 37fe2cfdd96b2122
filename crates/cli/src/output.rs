//! CLI output formatting utilities.
//!
//! Provides consistent formatting for terminal output: colored status
//! messages, change markers and shortened identifiers.

use anyhow::Context;
use owo_colors::{OwoColorize, Stream};

pub mod symbols {
  pub const SUCCESS: &str = "✓";
  pub const ERROR: &str = "✗";
  pub const WARNING: &str = "⚠";
  pub const INFO: &str = "•";
  pub const ADD: &str = "+";
  pub const MODIFY: &str = "~";
  pub const REMOVE: &str = "-";
}

/// Identifiers are 26 characters; the first 10 are plenty to tell them apart
/// on screen.
pub fn truncate_id(id: &str) -> &str {
  match id.char_indices().nth(10) {
    Some((end, _)) => &id[..end],
    None => id,
  }
}

/// `"<name> (<site id>)"`, or just the name when the id is unknown.
pub fn describe_app(name: &str, site_id: Option<&str>) -> String {
  match site_id {
    Some(id) if !id.is_empty() => format!("{} ({})", name, truncate_id(id)),
    _ => name.to_string(),
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

pub fn print_stat(label: &str, value: &str) {
  println!(
    "  {}: {}",
    label.if_supports_color(Stream::Stdout, |s| s.dimmed()),
    value
  );
}

/// One line of a change list: `+ name`, `~ name` or `- name`.
pub fn print_change(symbol: &str, message: &str) {
  let colored = match symbol {
    symbols::ADD => format!("{}", symbol.if_supports_color(Stream::Stdout, |s| s.green())),
    symbols::REMOVE => format!("{}", symbol.if_supports_color(Stream::Stdout, |s| s.red())),
    _ => format!("{}", symbol.if_supports_color(Stream::Stdout, |s| s.yellow())),
  };
  println!("  {} {}", colored, message);
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
  println!("{}", json);
  Ok(())
}
