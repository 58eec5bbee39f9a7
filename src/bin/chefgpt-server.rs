// ABOUTME: Server binary for the ChefGPT recipe API
// ABOUTME: Loads configuration, connects storage and the LLM provider, and serves HTTP until shutdown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ChefGPT Contributors

//! # ChefGPT Server Binary
//!
//! Reads `.env` and the process environment, then serves the recipe API.

use std::sync::Arc;

use anyhow::Result;
use chefgpt_server::{
    config::ServerConfig, database::Database, llm::create_provider, logging,
    resources::ServerResources, routes::create_router,
};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "chefgpt-server")]
#[command(about = "ChefGPT API - recipe generation from the ingredients you have")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override bind host
    #[arg(long)]
    host: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // A missing .env file is normal outside development
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            return Err(e.into());
        }
    }

    logging::init_from_env()?;

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(host) = args.host {
        config.host = host;
    }
    info!(llm = ?config.llm, database_url = %config.database_url, "Configuration loaded");

    let database = Database::new(&config.database_url).await?;
    let provider = create_provider(&config.llm)?;

    let bind_address = config.bind_address();
    let resources = Arc::new(ServerResources::new(database, provider, Arc::new(config)));
    let app = create_router(resources);

    let listener = TcpListener::bind(&bind_address).await?;
    info!(address = %listener.local_addr()?, "ChefGPT API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
