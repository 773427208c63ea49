// ABOUTME: Main library entry point for the Larder recipe catalog API
// ABOUTME: Provides REST endpoints for recipe and ingredient management
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

#![deny(unsafe_code)]

//! # Larder
//!
//! A small REST API for managing a catalog of recipes. Each recipe holds a
//! name, a description, and an ordered collection of named ingredients that
//! it owns exclusively.
//!
//! ## Features
//!
//! - **Recipe CRUD**: create, list, retrieve, partial update, delete
//! - **Substring search**: case-sensitive filtering on recipe name
//! - **Owned ingredients**: cascade delete and replace-on-update semantics
//! - **SQLite persistence**: transactional writes via `sqlx`
//!
//! ## Quick Start
//!
//! 1. Point `DATABASE_URL` at a SQLite database (defaults to `sqlite:larder.db`)
//! 2. Start the server with `larder-server`
//! 3. Talk to it at `POST/GET/PATCH/DELETE /api/recipes`
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use larder::config::environment::ServerConfig;
//! use larder::errors::AppResult;
//!
//! fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("Larder configured with port: HTTP={}", config.http_port);
//!     Ok(())
//! }
//! ```

// ── Public API ──────────────────────────────────────────────────────────
// These modules are used by the binary crate (src/bin/) and integration
// tests (tests/). They must remain `pub` so external consumers can access
// them.

/// Configuration management from environment variables
pub mod config;

/// Database connection management and recipe storage
pub mod database;

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Logging configuration and structured logging setup
pub mod logging;

/// Shared server resource container for dependency injection
pub mod resources;

/// HTTP routes organized by domain
pub mod routes;
