// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Abdruck — Same-Origin Document Relay and Print Service
//
// Entry point. Initialises logging, loads configuration, and either serves
// the relay or drives one headless print flow end to end.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{error, info, warn};

use abdruck_bridge::{platform_bridge, surface_host};
use abdruck_core::config::AppConfig;
use abdruck_core::error::{AbdruckError, Result};
use abdruck_core::human_errors::{humanize_error, humanize_failure};
use abdruck_core::types::{JobStatus, PrintMode};
use abdruck_print::{CleanupTiming, PrintOrchestrator};
use abdruck_relay::{ProxyState, RelayClient, RelayServer};

#[derive(Parser)]
#[command(
    name = "abdruck",
    version,
    about = "Same-origin document relay and print service"
)]
struct Cli {
    /// Path to a JSON configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the relay HTTP server.
    Serve {
        /// Override the configured port.
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run one print flow headlessly: start an ephemeral relay, fetch the
    /// document through it, and drive the job to a terminal state.
    Print {
        /// Invocation URI of the hosting view (carries the ?url= parameter).
        #[arg(long)]
        invocation: String,
        /// Print mode identifier: "print" or "pdf".
        #[arg(long, default_value = "print")]
        mode: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());

    let outcome = match cli.command {
        Command::Serve { port } => serve(config, port).await,
        Command::Print { invocation, mode } => print(config, &invocation, &mode).await,
    };

    if let Err(e) = outcome {
        let human = humanize_error(&e);
        error!(error = %e, "aborting");
        eprintln!("{} {}", human.message, human.suggestion);
        std::process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> AppConfig {
    match path {
        Some(path) => match AppConfig::load(path) {
            Ok(config) => {
                info!(path = %path.display(), "configuration loaded");
                config
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load configuration — using defaults");
                AppConfig::default()
            }
        },
        None => AppConfig::default(),
    }
}

async fn serve(config: AppConfig, port: Option<u16>) -> Result<()> {
    let state = ProxyState::new(config.upstream_connect_timeout())?;
    let mut server = RelayServer::new(Some(port.unwrap_or(config.relay_port)));
    let addr = server.start(state).await?;
    info!(addr = %addr, "relay ready; press Ctrl-C to stop");

    tokio::signal::ctrl_c().await?;
    info!("shutdown signal received");

    server.stop().await
}

async fn print(config: AppConfig, invocation: &str, mode_id: &str) -> Result<()> {
    let mode = PrintMode::from_mode_id(mode_id)
        .ok_or_else(|| AbdruckError::UnknownMode(mode_id.to_owned()))?;

    // One process plays both roles here: it hosts the relay on an ephemeral
    // local port and drives the client flow against it.
    let state = ProxyState::new(config.upstream_connect_timeout())?;
    let mut relay = RelayServer::with_bind_addr(([127, 0, 0, 1], 0).into());
    let addr = relay.start(state).await?;

    let fetcher = Arc::new(RelayClient::new(
        format!("http://{addr}"),
        config.upstream_connect_timeout(),
    )?);
    let orchestrator = PrintOrchestrator::new(
        fetcher,
        platform_bridge(),
        surface_host(),
        CleanupTiming::from(&config),
    );

    let result = orchestrator.run_from_invocation(invocation, Some(mode)).await;
    relay.stop().await?;

    let job = result?;
    println!("{}", serde_json::to_string_pretty(&job)?);

    if job.status() != JobStatus::Completed {
        if let Some(reason) = &job.failure {
            let human = humanize_failure(reason);
            eprintln!("{} {}", human.message, human.suggestion);
        }
        std::process::exit(2);
    }

    Ok(())
}
