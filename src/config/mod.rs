// ABOUTME: Configuration management module for centralized server settings
// ABOUTME: Handles environment-driven configuration and runtime options
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! Configuration module for the Larder server
//!
//! Centralized configuration management, loaded from environment variables
//! at process start.

/// Environment and server configuration
pub mod environment;
