//! Command-line front-end for the scancrop image service.

mod commands;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, error};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use scancrop_client::{ImageApiClient, ImageApiConfig, StatusPolicy};

use crate::commands::{Cli, Outcome};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if let Err(e) = init_tracing(cli.debug) {
        eprintln!("Failed to initialize logging: {:#}", e);
        std::process::exit(2);
    }

    match run(cli).await {
        Ok(Outcome::Accepted) => {}
        Ok(Outcome::Rejected) => std::process::exit(1),
        Err(e) => {
            error!("{:#}", e);
            std::process::exit(2);
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<Outcome> {
    let mut config = match &cli.base_url {
        Some(base_url) => ImageApiConfig::new(base_url)?,
        None => ImageApiConfig::from_env().context("Failed to load image API config")?,
    };
    if cli.strict {
        config.status_policy = StatusPolicy::Strict;
    }
    debug!("Image API config: {:?}", config);

    let client = ImageApiClient::new(config).context("Failed to create image API client")?;
    cli.command.run(&client).await
}

/// Colored output for interactive use, JSON when `LOG_FORMAT=json`.
fn init_tracing(debug: bool) -> anyhow::Result<()> {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let level = if debug { "debug" } else { "info" };
    let env_filter = EnvFilter::from_default_env()
        .add_directive(format!("scancrop={}", level).parse()?)
        .add_directive(format!("scancrop_client={}", level).parse()?);

    // Logs go to stderr so stdout stays clean for JSON replies.
    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    Ok(())
}
