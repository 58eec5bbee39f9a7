// ABOUTME: Core types and constants for the ChefGPT recipe server
// ABOUTME: Foundation crate with error handling, recipe models, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ChefGPT Contributors

#![deny(unsafe_code)]

//! # ChefGPT Core
//!
//! Foundation crate providing shared types for the recipe server. It changes
//! rarely, which keeps incremental builds of the server crate fast.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError` and `ErrorCode`
//! - **constants**: Environment variable names and defaults
//! - **models**: Recipe drafts, persisted recipes, and their parts

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Recipe data models
pub mod models;
