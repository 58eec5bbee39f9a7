// ABOUTME: Configuration module for environment-driven server settings
// ABOUTME: Re-exports server, LLM, and generation configuration types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ChefGPT Contributors

//! Configuration management
//!
//! All settings come from environment variables (optionally seeded from a
//! `.env` file by the binary) with CLI overrides for host and port.

/// Environment-based server configuration
pub mod environment;

/// Shared configuration enums
pub mod types;

pub use environment::{GenerationOptions, LlmConfig, ServerConfig};
pub use types::LlmProviderType;
