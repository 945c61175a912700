//! Densify provider runner
//!
//! Reads the provider configuration as JSON on stdin, configures the
//! provider and reads the container data source. The record is printed as
//! JSON on stdout; logs and diagnostics go to stderr.

use anyhow::{Context, Result};
use clap::Parser;
use densify_lib::{configure, provider, EnvironmentDefaults, ProviderConfig};
use std::io::Read;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const PROVIDER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Densify right-sizing recommendations for infrastructure-as-code
#[derive(Parser)]
#[command(name = "terraform-provider-densify")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log filter directives (can also be set via DENSIFY_LOG env var)
    #[arg(long, env = "DENSIFY_LOG", default_value = "info")]
    log_filter: String,

    /// Pretty-print the output record
    #[arg(long)]
    pretty: bool,
}

fn read_config() -> Result<ProviderConfig> {
    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("Failed to read provider configuration from stdin")?;

    if input.trim().is_empty() {
        return Ok(ProviderConfig::default());
    }
    serde_json::from_str(&input).context("Failed to parse provider configuration")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with JSON output on stderr; stdout carries the record
    tracing_subscriber::registry()
        .with(EnvFilter::try_new(&cli.log_filter).unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json().with_writer(std::io::stderr))
        .init();

    info!(
        event = "provider_started",
        provider = provider::PROVIDER_TYPE_NAME,
        version = PROVIDER_VERSION,
        "Starting Densify provider"
    );

    let config = read_config()?;
    let env = EnvironmentDefaults::load().context("Failed to read DENSIFY_* environment")?;

    let configured = match configure(&config, &env) {
        Ok(configured) => configured,
        Err(diags) => anyhow::bail!("provider configuration failed\n{}", diags),
    };
    for warning in configured.warnings() {
        warn!(
            event = "configuration_warning",
            summary = %warning.summary,
            detail = %warning.detail,
            "Continuing despite configuration error"
        );
    }

    let record = match configured.container_data_source().read().await {
        Ok(record) => record,
        Err(diags) => anyhow::bail!("{} read failed\n{}", provider::CONTAINER_DATA_SOURCE, diags),
    };

    match record {
        Some(record) => {
            let json = if cli.pretty {
                serde_json::to_string_pretty(&record)?
            } else {
                serde_json::to_string(&record)?
            };
            println!("{}", json);
        }
        None => info!(
            event = "read_skipped",
            data_source = provider::CONTAINER_DATA_SOURCE,
            "No record produced"
        ),
    }

    Ok(())
}
