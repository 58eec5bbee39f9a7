// ABOUTME: Main library entry point for the ChefGPT recipe API
// ABOUTME: Wires LLM-backed recipe generation, normalization, storage, and HTTP routes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ChefGPT Contributors

#![deny(unsafe_code)]

//! # ChefGPT Server
//!
//! Generates recipes from the ingredients a user has on hand. A prompt is
//! sent to a generative-text provider, the free-form answer is normalized
//! into a validated recipe, and recipes can be stored, listed, and rated.
//!
//! ## Architecture
//!
//! - **Recipes**: prompt builder, generator, and response normalizer
//! - **LLM**: provider trait with Gemini and `OpenAI`-compatible clients
//! - **Database**: `SQLite` recipe repository with atomic rating updates
//! - **Routes**: axum handlers over shared [`resources::ServerResources`]
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use chefgpt_server::config::ServerConfig;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("ChefGPT API configured on {}", config.bind_address());
//!     Ok(())
//! }
//! ```

/// Environment-driven configuration
pub mod config;

/// Recipe storage
pub mod database;

/// Error types shared with the core crate
pub mod errors;

/// Generative-text provider clients
pub mod llm;

/// Structured logging setup
pub mod logging;

/// CORS and request tracing layers
pub mod middleware;

/// Prompting, generation, and response normalization
pub mod recipes;

/// Shared state injected into handlers
pub mod resources;

/// HTTP routes
pub mod routes;
