// ABOUTME: Centralized resource container for dependency injection in the server
// ABOUTME: Manages shared resources like the database pool and configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Server Resources Module
//!
//! Centralized resource container for dependency injection. Routers receive
//! an `Arc<ServerResources>` as state instead of recreating expensive
//! objects per request.

use crate::config::environment::ServerConfig;
use crate::database::Database;
use std::sync::Arc;

/// Centralized resource container for dependency injection
#[derive(Clone)]
pub struct ServerResources {
    /// Shared database connection pool
    pub database: Database,
    /// Server configuration loaded at startup
    pub config: Arc<ServerConfig>,
}

impl ServerResources {
    /// Create new server resources
    #[must_use]
    pub fn new(database: Database, config: ServerConfig) -> Self {
        Self {
            database,
            config: Arc::new(config),
        }
    }
}
