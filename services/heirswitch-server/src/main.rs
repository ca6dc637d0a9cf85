//! Heirswitch Server
//!
//! Serves the switch registry over the REST API, backed by the in-memory
//! token ledger and content store.
//!
//! # Usage
//!
//! ```bash
//! # Start with default settings
//! heirswitch-server
//!
//! # Start with custom config
//! heirswitch-server --config /path/to/config.toml
//!
//! # Start with environment overrides
//! HEIRSWITCH__SERVER__PORT=8080 heirswitch-server
//! ```

mod config;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::signal;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use heirswitch_api::{create_router, ApiConfig, AppState};
use heirswitch_core::{InMemoryContentStore, SwitchRegistry};
use heirswitch_ledger::TokenLedger;

use crate::config::ServerConfig;

// =============================================================================
// CLI Arguments
// =============================================================================

/// Heirswitch Server - check-in gated inheritance escrow
#[derive(Parser, Debug)]
#[command(name = "heirswitch-server")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (TOML, JSON, or YAML)
    #[arg(short, long, env = "HEIRSWITCH_CONFIG")]
    config: Option<String>,

    /// Host to bind to
    #[arg(long, env = "HEIRSWITCH_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "HEIRSWITCH_PORT")]
    port: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "HEIRSWITCH_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format (json, pretty)
    #[arg(long, env = "HEIRSWITCH_LOG_FORMAT")]
    log_format: Option<String>,

    /// Enable development mode (allows genesis balances)
    #[arg(long, env = "HEIRSWITCH_DEV_MODE")]
    dev_mode: bool,
}

// =============================================================================
// Main Entry Point
// =============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut server_config = ServerConfig::load(args.config.as_deref())?;

    // Override with CLI arguments
    if let Some(host) = args.host {
        server_config.server.host = host;
    }
    if let Some(port) = args.port {
        server_config.server.port = port;
    }
    if let Some(level) = args.log_level {
        server_config.logging.level = level;
    }
    if let Some(format) = args.log_format {
        server_config.logging.format = format;
    }

    init_logging(&server_config.logging)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting Heirswitch Server"
    );

    validate_config(&server_config, args.dev_mode)?;

    let state = Arc::new(init_state(&server_config)?);

    let api_config = ApiConfig {
        enable_cors: server_config.api.enable_cors,
        cors_origins: server_config.api.cors_origins.clone(),
        enable_tracing: server_config.api.enable_tracing,
        max_body_size: server_config.api.max_body_size,
    };

    let app = create_router(state, api_config);

    let addr = server_config.server.socket_addr()?;

    tracing::info!(
        host = %server_config.server.host,
        port = %server_config.server.port,
        "Server listening"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;

    let (signalled_tx, signalled_rx) = tokio::sync::watch::channel(false);
    let server = async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                shutdown_signal().await;
                let _ = signalled_tx.send(true);
            })
            .await
    };

    tokio::select! {
        result = server => result?,
        _ = drain_deadline(signalled_rx, server_config.server.shutdown_timeout()) => {
            tracing::warn!("Grace period elapsed, dropping remaining connections");
        }
    }

    tracing::info!("Server shutdown complete");

    Ok(())
}

// =============================================================================
// Initialization Functions
// =============================================================================

/// Initialize tracing/logging
fn init_logging(config: &config::LoggingConfig) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.level))?;

    let subscriber = tracing_subscriber::registry().with(env_filter);

    match config.format.as_str() {
        "json" => {
            subscriber
                .with(fmt::layer().json().with_target(true))
                .try_init()?;
        }
        _ => {
            subscriber
                .with(fmt::layer().pretty().with_target(true))
                .try_init()?;
        }
    }

    Ok(())
}

/// Validate configuration
fn validate_config(config: &ServerConfig, dev_mode: bool) -> anyhow::Result<()> {
    let registry = &config.registry;

    if registry.custody.is_zero() {
        anyhow::bail!("registry.custody must not be the zero address");
    }
    if registry.default_timeout_secs == 0 {
        anyhow::bail!("registry.default_timeout_secs must be greater than zero");
    }

    let genesis = &config.ledger.genesis;
    if !genesis.is_empty() && !dev_mode {
        anyhow::bail!(
            "ledger.genesis mints balances from nothing; pass --dev-mode to allow it"
        );
    }
    if genesis.iter().any(|g| g.account == registry.custody) {
        anyhow::bail!("ledger.genesis must not fund the custody account");
    }

    if registry.default_timeout_secs < 24 * 60 * 60 {
        tracing::warn!(
            timeout_secs = registry.default_timeout_secs,
            "Default timeout is shorter than a day"
        );
    }

    Ok(())
}

/// Build the ledger, content store and registry
fn init_state(config: &ServerConfig) -> anyhow::Result<AppState> {
    let ledger = TokenLedger::new(config.ledger.symbol.as_str());

    for allocation in &config.ledger.genesis {
        ledger.mint(&allocation.account, allocation.amount)?;
        tracing::info!(
            account = %allocation.account,
            amount = %allocation.amount,
            symbol = %config.ledger.symbol,
            "Genesis balance minted"
        );
    }

    let registry_config = config.registry.to_registry_config();
    tracing::info!(
        custody = %registry_config.custody,
        default_timeout = %registry_config.default_timeout,
        "Switch registry configured"
    );

    let ledger = Arc::new(ledger);
    let registry = Arc::new(SwitchRegistry::new(ledger.clone(), registry_config));
    let content = Arc::new(InMemoryContentStore::with_limit(
        config.content.max_blob_bytes,
    ));

    Ok(AppState::from_parts(registry, ledger, content))
}

// =============================================================================
// Graceful Shutdown
// =============================================================================

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }

}

/// Resolves once the grace period after a shutdown signal has run out
async fn drain_deadline(mut signalled: tokio::sync::watch::Receiver<bool>, grace: Duration) {
    if signalled.wait_for(|s| *s).await.is_err() {
        std::future::pending::<()>().await;
    }
    tracing::info!(
        timeout_secs = grace.as_secs(),
        "Waiting for in-flight requests to complete..."
    );
    tokio::time::sleep(grace).await;
}

// =============================================================================
// Tests
// =============================================================================
