// ABOUTME: HTTP middleware for the recipe API
// ABOUTME: CORS policy plus request-id and tracing layers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ChefGPT Contributors

/// Cross-origin policy
pub mod cors;
/// Request ids and per-request spans
pub mod tracing;

pub use cors::setup_cors;
pub use self::tracing::{with_request_tracing, REQUEST_ID_HEADER};
