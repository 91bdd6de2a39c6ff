//! `teledok`: console client for the Teledok registry API.
//!
//! # Usage
//!
//! ```text
//! teledok --url http://localhost:5000 person list
//! teledok person create --name Ivan --surname Ivanov --birthday 1990-05-17
//! teledok --api-version 3 client show 4
//! teledok --config ~/.config/teledok/config.toml --json founder list
//! ```

mod client;
mod commands;
mod output;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use client::{ApiClient, ApiConfig};
use commands::Command;
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

const DEFAULT_URL: &str = "http://localhost:5000";

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "teledok", version, about = "Console client for the Teledok registry")]
struct Args {
  /// Path to a TOML config file (url, api_version).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the server (default: http://localhost:5000).
  #[arg(long, env = "TELEDOK_URL")]
  url: Option<String>,

  /// Major API version: 1, 2 or 3.
  #[arg(long, env = "TELEDOK_API_VERSION")]
  api_version: Option<u8>,

  /// Print raw JSON instead of text.
  #[arg(long)]
  json: bool,

  #[command(subcommand)]
  command: Command,
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default, Debug)]
struct ConfigFile {
  #[serde(default)]
  url:         String,
  #[serde(default)]
  api_version: Option<u8>,
}

/// CLI flags override the config file, which overrides defaults.
fn api_config(args_url: Option<String>, args_version: Option<u8>, file: ConfigFile) -> ApiConfig {
  ApiConfig {
    base_url:    args_url
      .or_else(|| (!file.url.is_empty()).then_some(file.url))
      .unwrap_or_else(|| DEFAULT_URL.to_string()),
    api_version: args_version.or(file.api_version).unwrap_or(1),
  }
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  let client = ApiClient::new(api_config(args.url, args.api_version, file_cfg))?;
  commands::run(args.command, &client, args.json).await
}

#[cfg(test)]
mod tests {
  use clap::CommandFactory;

  use super::*;

  #[test]
  fn args_are_well_formed() { Args::command().debug_assert(); }

  #[test]
  fn flags_override_file() {
    let file: ConfigFile = toml::from_str("url = \"http://registry:8080\"\napi_version = 2").unwrap();
    let cfg = api_config(None, Some(3), file);
    assert_eq!(cfg.base_url, "http://registry:8080");
    assert_eq!(cfg.api_version, 3);
  }

  #[test]
  fn defaults_without_file() {
    let cfg = api_config(None, None, ConfigFile::default());
    assert_eq!(cfg, ApiConfig { base_url: DEFAULT_URL.into(), api_version: 1 });
  }

  #[test]
  fn parses_repeated_founders() {
    let args = Args::try_parse_from([
      "teledok", "client", "create", "--name", "A", "--type", "le", "--tin", "7701234567",
      "--founder", "1", "--founder", "2",
    ])
    .unwrap();
    match args.command {
      Command::Client(commands::ClientCommand::Create { founders, kind, .. }) => {
        assert_eq!(founders, vec![1, 2]);
        assert_eq!(kind, commands::KindArg::Le);
      }
      other => panic!("unexpected command: {other:?}"),
    }
  }
}
