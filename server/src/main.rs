//! Keyforge license server
//!
//! Serves three endpoints over HTTP:
//! 1. `POST /create` issues a new license key
//! 2. `GET /check/{key}` validates a key
//! 3. `DELETE /delete/{key}` revokes a key
//!
//! Usage:
//!   keyforge-server --store-url https://example.firebaseio.com --api-key KEY
//!
//! The server is stateless; every request is a round trip to the document store.

use std::sync::Arc;
use anyhow::{bail, Context, Result};
use clap::Parser;
use keyforge_license::LicenseService;
use keyforge_server::build_router;
use keyforge_store::{DocumentStore, MemoryDocumentStore, RestDocumentStore, StoreConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "keyforge-server")]
#[command(about = "Issue, check and revoke license keys")]
struct Args {
    /// Base URL of the document store
    #[arg(long, env = "KEYFORGE_STORE_URL")]
    store_url: Option<String>,

    /// Document store API key
    #[arg(long, env = "KEYFORGE_API_KEY", default_value = "", hide_env_values = true)]
    api_key: String,

    /// Address to bind the HTTP API to
    #[arg(long, env = "KEYFORGE_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port for the HTTP API
    #[arg(short, long, env = "KEYFORGE_PORT", default_value = "5000")]
    port: u16,

    /// Keep licenses in process memory instead of a remote store
    #[arg(long)]
    in_memory: bool,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .compact()
        .init();

    info!("Keyforge server starting...");

    let store = build_store(&args)?;
    let service = Arc::new(LicenseService::new(store));
    info!("Using {}", service.store_name());

    let app = build_router(service);
    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("HTTP API listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Keyforge server stopped");
    Ok(())
}

fn build_store(args: &Args) -> Result<Arc<dyn DocumentStore>> {
    if args.in_memory {
        warn!("Using in-memory store; licenses are lost on exit");
        return Ok(Arc::new(MemoryDocumentStore::new()));
    }

    let Some(base_url) = args.store_url.clone() else {
        bail!("--store-url (or KEYFORGE_STORE_URL) is required unless --in-memory is set");
    };

    let config = StoreConfig {
        base_url,
        api_key: args.api_key.clone(),
    };
    if config.api_key.is_empty() {
        warn!("No store API key configured");
    }

    let store = RestDocumentStore::new(config).context("Failed to create store client")?;
    Ok(Arc::new(store))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
