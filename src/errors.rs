// ABOUTME: Unified error handling re-exported from the core crate
// ABOUTME: Gives server modules a stable crate::errors path for AppError and friends
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ChefGPT Contributors

//! # Unified Error Handling System
//!
//! Error codes, `AppError`, and the JSON error body live in `chefgpt-core` so
//! they compile once; this module re-exports them for the server crate.

pub use chefgpt_core::errors::{AppError, AppResult, ErrorCode, ErrorContext, ErrorResponse};
