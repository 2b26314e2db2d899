// app/src/config.rs

use crate::errors::{AppError, Result};
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;
use storefront::{MergePolicy, StorefrontConfig, DEFAULT_API_BASE_URL, DEFAULT_CUSTOMER_ADDRESS};

pub const DEFAULT_SESSION_FILE: &str = ".storefront/session.json";

#[derive(Debug, Parser)]
#[command(name = "storefront", about = "Terminal storefront: sign in, browse products, fill a cart", long_about = None)]
pub struct Cli {
  /// Base URL of the storefront API
  #[arg(long, env = "STOREFRONT_API_URL", default_value = DEFAULT_API_BASE_URL)]
  pub api_url: String,

  /// Where the session token and user email are persisted
  #[arg(long, env = "STOREFRONT_SESSION_FILE", default_value = DEFAULT_SESSION_FILE)]
  pub session_file: PathBuf,

  /// Shipping address sent with pricing requests
  #[arg(long, env = "STOREFRONT_CUSTOMER_ADDRESS", default_value = DEFAULT_CUSTOMER_ADDRESS)]
  pub customer_address: String,

  /// How repeated additions of one product are priced: latest, keep-first or reprice
  #[arg(long, env = "STOREFRONT_MERGE_POLICY", default_value = "latest")]
  pub merge_policy: MergePolicy,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub session_file: PathBuf,
  pub storefront: StorefrontConfig,
}

impl AppConfig {
  /// Loads `.env` (if present), then reads flags and environment variables.
  pub fn load() -> Result<Self> {
    let _env = dotenvy::dotenv();
    Self::from_args(std::env::args_os())
  }

  pub fn from_args<I, T>(args: I) -> Result<Self>
  where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
  {
    let cli = Cli::try_parse_from(args).map_err(|e| AppError::Config(e.to_string()))?;
    Self::from_cli(cli)
  }

  fn from_cli(cli: Cli) -> Result<Self> {
    if cli.customer_address.trim().is_empty() {
      return Err(AppError::Config("customer address must not be empty".to_string()));
    }
    if cli.session_file.as_os_str().is_empty() {
      return Err(AppError::Config("session file path must not be empty".to_string()));
    }

    tracing::info!(
      api_url = %cli.api_url,
      session_file = %cli.session_file.display(),
      merge_policy = %cli.merge_policy,
      "Application configuration loaded."
    );

    Ok(Self {
      session_file: cli.session_file,
      storefront: StorefrontConfig {
        api_base_url: cli.api_url,
        customer_address: cli.customer_address,
        merge_policy: cli.merge_policy,
      },
    })
  }
}
