// app/src/main.rs

mod config;
mod errors;
mod render;
mod shell;

use crate::config::AppConfig;
use crate::shell::{Shell, ShellFlow};
use anyhow::Context;
use std::sync::Arc;
use storefront::{FileBackend, SessionStore, Storefront};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Logs go to stderr so they never interleave with the listing on stdout.
  // RUST_LOG overrides the default level.
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
    .with_writer(std::io::stderr)
    .init();

  let app_config = AppConfig::load().context("Failed to load application configuration")?;

  let session = SessionStore::open(FileBackend::new(&app_config.session_file))
    .with_context(|| format!("Failed to restore session from {}", app_config.session_file.display()))?;
  let storefront =
    Storefront::new(app_config.storefront.clone(), Arc::new(session)).context("Failed to start the storefront")?;

  let stdout = std::io::stdout();
  let mut shell = Shell::new(&storefront, stdout.lock());
  shell.greet()?;

  let mut lines = BufReader::new(tokio::io::stdin()).lines();
  loop {
    shell.prompt()?;
    let Some(line) = lines.next_line().await? else {
      break;
    };
    if shell.execute(&line).await? == ShellFlow::Exit {
      break;
    }
  }

  tracing::info!("Storefront shell closed.");
  Ok(())
}
