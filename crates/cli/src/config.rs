//! Configuration file loading and precedence.
//!
//! Values are resolved in three layers, later layers winning:
//!
//! 1. the TOML file given with `--config` (optional),
//! 2. `PAGERDUTY_*` environment variables,
//! 3. command-line flags.

use std::path::Path;

use anyhow::Context;
use clap::ValueEnum;
use http_client::ClientConfig;
use serde::Deserialize;

use crate::args::Cli;

/// Log output format on stderr.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// `[logging]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Output format.
    pub format: LogFormat,
    /// Default filter directive when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Pretty,
            level: "warn".to_string(),
        }
    }
}

/// Whole configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// `[pagerduty]` table: client settings.
    pub pagerduty: ClientConfig,
    /// `[logging]` table.
    pub logging: LoggingConfig,
}

impl CliConfig {
    /// Parses a TOML document.
    pub fn from_toml_str(text: &str) -> anyhow::Result<Self> {
        toml::from_str(text).context("invalid configuration file")
    }

    /// Reads and parses the file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Resolves the effective configuration for `cli`.
    pub fn resolve(cli: &Cli) -> anyhow::Result<Self> {
        let file = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        Ok(file.with_env().with_flags(cli))
    }

    fn with_env(mut self) -> Self {
        self.pagerduty = self.pagerduty.with_env_overrides();
        self
    }

    /// Applies command-line flags over the current values.
    pub fn with_flags(mut self, cli: &Cli) -> Self {
        if let Some(token) = &cli.token {
            self.pagerduty.api_token = token.clone();
        }
        if let Some(base_url) = &cli.base_url {
            self.pagerduty.base_url = base_url.clone();
        }
        if let Some(from) = &cli.from {
            self.pagerduty.from = Some(from.clone());
        }
        if let Some(format) = cli.log_format {
            self.logging.format = format;
        }
        self
    }
}
