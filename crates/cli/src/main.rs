//! `pd-extensions` entry point.
//!
//! This binary is the composition root. Responsibilities:
//!
//! 1. **Parse arguments and configuration**: the optional TOML file, then
//!    `PAGERDUTY_*` environment variables, then flags, later layers winning
//!    (see [`config`]).
//! 2. **Wire observability**: install the `tracing-subscriber` stack with an
//!    optional OpenTelemetry OTLP exporter (see [`telemetry`]). Every span and
//!    event emitted by the library crates flows through it.
//! 3. **Construct infrastructure**: build the [`http_client::HttpClient`] and
//!    hand it to [`extensions::ExtensionService`].
//! 4. **Dispatch**: run the subcommand and print its JSON result on stdout.

mod args;
mod commands;
mod config;
mod telemetry;

use anyhow::Context;
use clap::Parser;
use extensions::ExtensionService;
use http_client::HttpClient;
use tracing::{error, info_span, Instrument};
use uuid::Uuid;

use crate::args::Cli;
use crate::config::CliConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = CliConfig::resolve(&cli)?;
    let telemetry = telemetry::init(&config.logging)?;

    let run_id = Uuid::new_v4();
    let span = info_span!("pd_extensions", %run_id, command = cli.command.name());
    let result = execute(cli, config).instrument(span).await;

    if let Err(err) = &result {
        error!(%run_id, error = %err, "Command failed");
    }
    telemetry.shutdown();
    result
}

async fn execute(cli: Cli, config: CliConfig) -> anyhow::Result<()> {
    let client = HttpClient::new(&config.pagerduty).context("invalid PagerDuty configuration")?;
    let service = ExtensionService::new(client)
        .with_request_options(config.pagerduty.request_options());

    let output = commands::run(&service, cli.command).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
