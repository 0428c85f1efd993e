use anchain_aml_providers::constants::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use anchain_aml_providers::ApiKey;
use anyhow::{bail, Context, Result};
use clap::Parser;
use std::time::Duration;

pub const API_KEY_ENV: &str = "ANCHAIN_APIKEY";

/// AnChain AML MCP server: crypto, sanctions and IP screening tools over stdio.
#[derive(Parser, Debug, Clone)]
#[command(name = "anchain-aml-mcp", version, about)]
pub struct Cli {
    /// AnChain API key (or set ANCHAIN_APIKEY).
    #[arg(short = 'k', long = "ANCHAIN_APIKEY", env = API_KEY_ENV, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Base URL of the AML API.
    #[arg(long, env = "ANCHAIN_AML_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[arg(long, env = "ANCHAIN_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: ApiKey,
    pub base_url: String,
    pub timeout: Duration,
}

impl Config {
    pub fn from_cli(cli: Cli) -> Result<Self> {
        let api_key = cli
            .api_key
            .and_then(|key| ApiKey::new(key))
            .with_context(|| format!("{} environment variable is required", API_KEY_ENV))?;

        let config = Self {
            api_key,
            base_url: cli.base_url.trim().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(cli.timeout_secs),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.timeout.is_zero() {
            bail!("Timeout must be at least 1 second");
        }
        if !(self.base_url.starts_with("https://") || self.base_url.starts_with("http://")) {
            bail!("Base URL must start with http:// or https://, got '{}'", self.base_url);
        }
        Ok(())
    }
}
