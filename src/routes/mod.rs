// ABOUTME: Route module organization for the ChefGPT HTTP API
// ABOUTME: Assembles recipe and health routes behind tracing and CORS layers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ChefGPT Contributors

//! Route module for the ChefGPT API
//!
//! Each domain module holds route definitions and thin handlers that
//! delegate to the generator and repository in [`ServerResources`].

/// Health check and system status routes
pub mod health;
/// Recipe generation, storage, and rating routes
pub mod recipes;

pub use health::HealthRoutes;
pub use recipes::RecipeRoutes;

use std::sync::Arc;

use axum::Router;

use crate::middleware::{setup_cors, with_request_tracing};
use crate::resources::ServerResources;

/// Build the complete application router
#[must_use]
pub fn create_router(resources: Arc<ServerResources>) -> Router {
    let cors = setup_cors(&resources.config);

    let router = Router::new()
        .merge(HealthRoutes::routes(Arc::clone(&resources)))
        .merge(RecipeRoutes::routes(resources));

    with_request_tracing(router).layer(cors)
}
