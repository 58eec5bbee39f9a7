// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides a scripted LLM provider, in-memory resources, and JSON request helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ChefGPT Contributors
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `chefgpt_server`

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use chefgpt_server::{
    config::ServerConfig,
    database::Database,
    errors::{AppError, ErrorCode},
    llm::{ChatRequest, ChatResponse, LlmProvider},
    resources::ServerResources,
    routes::create_router,
};
use serde_json::Value;
use tower::ServiceExt;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// LLM provider that answers from a fixed script and records every request
#[derive(Default)]
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<Result<String, ErrorCode>>>,
    requests: Mutex<Vec<ChatRequest>>,
    unreachable: AtomicBool,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful completion
    pub fn reply(self, content: impl Into<String>) -> Self {
        self.replies.lock().unwrap().push_back(Ok(content.into()));
        self
    }

    /// Queue a provider failure
    pub fn fail(self, code: ErrorCode) -> Self {
        self.replies.lock().unwrap().push_back(Err(code));
        self
    }

    /// Fail every health check
    pub fn unreachable(self) -> Self {
        self.unreachable.store(true, Ordering::SeqCst);
        self
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn display_name(&self) -> &'static str {
        "Scripted"
    }

    fn default_model(&self) -> &str {
        "scripted-1"
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        self.requests.lock().unwrap().push(request.clone());
        let next = self.replies.lock().unwrap().pop_front();
        match next {
            Some(Ok(content)) => Ok(ChatResponse {
                content,
                model: "scripted-1".to_owned(),
                usage: None,
                finish_reason: Some("stop".to_owned()),
            }),
            Some(Err(code)) => Err(AppError::new(code, "scripted provider failure")),
            None => Err(AppError::provider_unavailable("Scripted", "script exhausted")),
        }
    }

    async fn health_check(&self) -> Result<bool, AppError> {
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(AppError::provider_unavailable("Scripted", "health check refused"));
        }
        Ok(true)
    }
}

/// Server resources over a fresh in-memory database
pub async fn create_test_resources(provider: Arc<ScriptedProvider>) -> Arc<ServerResources> {
    init_test_logging();
    let database = Database::new("sqlite::memory:").await.unwrap();
    let config = Arc::new(ServerConfig::default());
    Arc::new(ServerResources::new(database, provider, config))
}

/// Router plus the provider behind it
pub async fn create_test_app(provider: ScriptedProvider) -> (Router, Arc<ScriptedProvider>, Arc<ServerResources>) {
    let provider = Arc::new(provider);
    let resources = create_test_resources(Arc::clone(&provider)).await;
    (create_router(Arc::clone(&resources)), provider, resources)
}

/// Send one request and decode the JSON body
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// A complete JSON recipe as a model would produce it
pub fn json_recipe(title: &str) -> Value {
    serde_json::json!({
        "title": title,
        "description": "Weeknight dinner",
        "ingredients": [
            {"name": "chicken", "amount": "500", "unit": "g"},
            {"name": "rice", "amount": "2", "unit": "cups"}
        ],
        "instructions": ["Cook the rice", "Sear the chicken", "Combine"],
        "cooking_time": {"prep_time": 10, "cook_time": 30, "total_time": 40},
        "difficulty": "easy",
        "servings": 4
    })
}
