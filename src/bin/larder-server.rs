// ABOUTME: Server binary for the Larder recipe catalog REST API
// ABOUTME: Loads configuration, initializes the database, and serves HTTP
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Larder Server Binary
//!
//! This binary starts the Larder recipe catalog API with SQLite-backed
//! storage and structured logging.

use anyhow::Result;
use axum::Router;
use clap::Parser;
use larder::{
    config::environment::ServerConfig,
    database::Database,
    logging,
    resources::ServerResources,
    routes::{HealthRoutes, RecipesRoutes},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

#[derive(Parser)]
#[command(name = "larder-server")]
#[command(about = "Larder - Recipe catalog REST API")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override database URL
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration from environment
    let mut config = ServerConfig::from_env()?;

    // Apply CLI overrides
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(database_url) = args.database_url {
        config.database.url = database_url;
    }

    // Initialize production logging
    logging::init_from_env()?;

    info!("Starting Larder recipe catalog API");
    info!("{}", config.summary());

    // Initialize database and run migrations
    let database = Database::new(&config.database.url).await?;
    info!("Database initialized successfully");

    let http_port = config.http_port;
    let resources = Arc::new(ServerResources::new(database, config));

    let app = Router::new()
        .merge(HealthRoutes::routes(resources.clone()))
        .merge(RecipesRoutes::routes(resources))
        .layer(TraceLayer::new_for_http());

    let addr = format!("0.0.0.0:{http_port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("HTTP server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

/// Resolve when the process receives a shutdown request
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install shutdown signal handler: {e}");
    }
}
