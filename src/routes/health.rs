// ABOUTME: Health check route handlers for service monitoring and status endpoints
// ABOUTME: Provides welcome, liveness, health, and dependency-backed readiness endpoints
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ChefGPT Contributors

//! Health check routes for service monitoring
//!
//! `/health` and `/test` answer without touching dependencies; `/ready`
//! also checks that the database and the LLM provider respond.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tracing::warn;

use chefgpt_core::constants::service_names::API_DISPLAY_NAME;

use crate::resources::ServerResources;

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create all health check routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/", get(Self::handle_root))
            .route("/test", get(Self::handle_test))
            .route("/health", get(Self::handle_health))
            .route("/ready", get(Self::handle_ready))
            .with_state(resources)
    }

    async fn handle_root() -> Json<serde_json::Value> {
        Json(json!({ "message": format!("Welcome to {API_DISPLAY_NAME}") }))
    }

    async fn handle_test() -> Json<serde_json::Value> {
        Json(json!({ "status": "ok", "message": "API is working" }))
    }

    async fn handle_health() -> Json<serde_json::Value> {
        Json(json!({
            "status": "healthy",
            "version": env!("CARGO_PKG_VERSION"),
            "timestamp": chrono::Utc::now().to_rfc3339()
        }))
    }

    async fn handle_ready(State(resources): State<Arc<ServerResources>>) -> Response {
        let database_ok = match resources.database.health_check().await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Database readiness check failed");
                false
            }
        };
        let llm_ok = resources.generator.provider_reachable().await;

        let (status_code, status) = if database_ok && llm_ok {
            (StatusCode::OK, "ready")
        } else {
            (StatusCode::SERVICE_UNAVAILABLE, "not_ready")
        };

        (
            status_code,
            Json(json!({
                "status": status,
                "database": Self::check_label(database_ok),
                "llm": Self::check_label(llm_ok),
                "llm_provider": resources.generator.provider_name(),
                "timestamp": chrono::Utc::now().to_rfc3339()
            })),
        )
            .into_response()
    }

    const fn check_label(ok: bool) -> &'static str {
        if ok {
            "ok"
        } else {
            "unavailable"
        }
    }
}
