// ABOUTME: Integration tests for the recipe HTTP API
// ABOUTME: Drives the full router with a scripted LLM provider and an in-memory database
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ChefGPT Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use chefgpt_core::models::{Recipe, RecipeDraft};
use chefgpt_server::{
    database::RecipeRepository,
    errors::{AppError, AppResult, ErrorCode},
    llm::MessageRole,
    routes::create_router,
};
use common::{create_test_app, get, json_recipe, post_json, send, ScriptedProvider};
use serde_json::json;

const STIR_FRY_TEXT: &str = "Title: Stir Fry\nDescription: quick meal\nInstructions:\n1. Chop\n2. Cook\nCooking Time: 20 minutes\nDifficulty: easy";

#[tokio::test]
async fn test_generate_returns_draft_without_user() {
    let reply = format!("```json\n{}\n```", json_recipe("Chicken Rice"));
    let (app, provider, _) = create_test_app(ScriptedProvider::new().reply(reply)).await;

    let (status, body) = send(
        &app,
        post_json(
            "/recipes/generate",
            &json!({
                "ingredients": ["chicken", "rice", "broccoli"],
                "difficulty": "easy",
                "servings": 4
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Chicken Rice");
    assert!(body.get("id").is_none());
    assert_eq!(body["cooking_time"]["total_time"], 40);

    let requests = provider.requests();
    assert_eq!(requests.len(), 1);
    let user_prompt = &requests[0].messages[1];
    assert_eq!(user_prompt.role, MessageRole::User);
    for expected in ["chicken", "rice", "broccoli", "Difficulty level: easy", "Number of servings: 4"] {
        assert!(user_prompt.content.contains(expected), "prompt lacks {expected}");
    }
}

#[tokio::test]
async fn test_generate_accepts_single_line_fenced_reply() {
    let reply = format!("```json {} ```", json_recipe("One Line Rice"));
    let (app, _, _) = create_test_app(ScriptedProvider::new().reply(reply)).await;

    let (status, body) = send(
        &app,
        post_json("/recipes/generate", &json!({"ingredients": ["chicken", "rice"]})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "One Line Rice");
    assert_eq!(body["servings"], 4);
}

#[tokio::test]
async fn test_generate_with_user_persists_recipe() {
    let (app, _, resources) =
        create_test_app(ScriptedProvider::new().reply(json_recipe("Saved Rice").to_string())).await;

    let (status, body) = send(
        &app,
        post_json(
            "/recipes/generate",
            &json!({"ingredients": ["rice"], "user_id": "user-1"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_id"], "user-1");
    assert_eq!(body["rating"], 0.0);
    assert_eq!(body["total_ratings"], 0);

    let stored = resources.recipes.list_by_user("user-1").await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, body["id"].as_str().unwrap());
}

#[tokio::test]
async fn test_generate_structured_text_reply() {
    let (app, _, _) = create_test_app(ScriptedProvider::new().reply(STIR_FRY_TEXT)).await;

    let (status, body) = send(
        &app,
        post_json(
            "/recipes/generate",
            &json!({"ingredients": ["tofu", {"name": "peppers", "amount": "2"}], "format": "text"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Stir Fry");
    assert_eq!(body["instructions"], json!(["Chop", "Cook"]));
    assert_eq!(body["cooking_time"], 20);
    assert_eq!(body["difficulty"], "easy");
    assert_eq!(body["ingredients"][1]["amount"], "2");
}

#[tokio::test]
async fn test_generate_rejects_empty_ingredients() {
    let (app, provider, _) = create_test_app(ScriptedProvider::new()).await;

    let (status, body) = send(&app, post_json("/recipes/generate", &json!({"ingredients": []}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_INPUT");
    assert!(provider.requests().is_empty());
}

#[tokio::test]
async fn test_generate_rejects_unparseable_body() {
    let (app, _, _) = create_test_app(ScriptedProvider::new()).await;

    let (status, body) = send(&app, post_json("/recipes/generate", &json!({"dietary_preferences": ["vegan"]}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_generate_missing_field_is_validation_error() {
    let mut recipe = json_recipe("No Servings");
    recipe.as_object_mut().unwrap().remove("servings");
    let (app, _, resources) = create_test_app(ScriptedProvider::new().reply(recipe.to_string())).await;

    let (status, body) = send(
        &app,
        post_json("/recipes/generate", &json!({"ingredients": ["rice"], "user_id": "user-2"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "MISSING_REQUIRED_FIELD");
    assert_eq!(body["field"], "servings");
    assert!(resources.recipes.list_by_user("user-2").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_generate_malformed_reply_hides_raw_text() {
    let raw = "{\"title\": \"Broken\", }";
    let (app, _, _) = create_test_app(ScriptedProvider::new().reply(raw)).await;

    let (status, body) = send(&app, post_json("/recipes/generate", &json!({"ingredients": ["egg"]}))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "MALFORMED_RESPONSE");
    assert!(!body.to_string().contains("Broken"));
}

#[tokio::test]
async fn test_generate_provider_failure_is_server_error() {
    let (app, _, _) =
        create_test_app(ScriptedProvider::new().fail(ErrorCode::ExternalRateLimited)).await;

    let (status, body) = send(&app, post_json("/recipes/generate", &json!({"ingredients": ["egg"]}))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "EXTERNAL_RATE_LIMITED");
}

#[tokio::test]
async fn test_save_list_and_get() {
    let (app, _, _) = create_test_app(ScriptedProvider::new()).await;

    let (status, first) = send(
        &app,
        post_json("/recipes", &json!({"user_id": "cook", "recipe": json_recipe("First")})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    send(
        &app,
        post_json("/recipes", &json!({"user_id": "cook", "recipe": json_recipe("Second")})),
    )
    .await;

    let (status, list) = send(&app, get("/recipes/cook")).await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|recipe| recipe["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["First", "Second"]);

    let id = first["id"].as_str().unwrap();
    let (status, fetched) = send(&app, get(&format!("/recipe/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["title"], "First");
}

#[tokio::test]
async fn test_save_revalidates_recipe() {
    let (app, _, _) = create_test_app(ScriptedProvider::new()).await;
    let mut recipe = json_recipe("Incomplete");
    recipe["ingredients"] = json!([]);

    let (status, body) = send(&app, post_json("/recipes", &json!({"user_id": "cook", "recipe": recipe}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "ingredients");
}

#[tokio::test]
async fn test_list_unknown_user_is_empty() {
    let (app, _, _) = create_test_app(ScriptedProvider::new()).await;

    let (status, body) = send(&app, get("/recipes/nobody")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_get_unknown_recipe_is_not_found() {
    let (app, _, _) = create_test_app(ScriptedProvider::new()).await;

    let (status, body) = send(&app, get("/recipe/does-not-exist")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "RESOURCE_NOT_FOUND");
}

#[tokio::test]
async fn test_rating_flow() {
    let (app, _, _) = create_test_app(ScriptedProvider::new()).await;
    let (_, saved) = send(
        &app,
        post_json("/recipes", &json!({"user_id": "cook", "recipe": json_recipe("Rated")})),
    )
    .await;
    let id = saved["id"].as_str().unwrap();

    let (status, _) = send(&app, post_json(&format!("/recipes/{id}/rate?rating=4.0"), &json!({}))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, post_json(&format!("/recipes/{id}/rate"), &json!({"rating": 2.0}))).await;
    assert_eq!(status, StatusCode::OK);
    assert!((body["rating"].as_f64().unwrap() - 3.0).abs() < f64::EPSILON);
    assert_eq!(body["total_ratings"], 2);
}

#[tokio::test]
async fn test_query_rating_wins_over_body() {
    let (app, _, _) = create_test_app(ScriptedProvider::new()).await;
    let (_, saved) = send(
        &app,
        post_json("/recipes", &json!({"user_id": "cook", "recipe": json_recipe("Both")})),
    )
    .await;
    let id = saved["id"].as_str().unwrap();

    let (_, body) = send(
        &app,
        post_json(&format!("/recipes/{id}/rate?rating=5"), &json!({"rating": 1.0})),
    )
    .await;

    assert!((body["rating"].as_f64().unwrap() - 5.0).abs() < f64::EPSILON);
}

/// Repository that fails the test if any rating reaches it
struct UnreachableRepository;

#[async_trait]
impl RecipeRepository for UnreachableRepository {
    async fn insert(&self, _user_id: &str, _draft: &RecipeDraft) -> AppResult<Recipe> {
        Err(AppError::database("insert unavailable"))
    }

    async fn list_by_user(&self, _user_id: &str) -> AppResult<Vec<Recipe>> {
        Err(AppError::database("list unavailable"))
    }

    async fn get(&self, _recipe_id: &str) -> AppResult<Option<Recipe>> {
        Ok(None)
    }

    async fn apply_rating(&self, _recipe_id: &str, _rating: f64) -> AppResult<Recipe> {
        panic!("invalid rating reached the repository")
    }
}

#[tokio::test]
async fn test_invalid_ratings_rejected_before_repository() {
    let (_, _, resources) = create_test_app(ScriptedProvider::new()).await;
    let resources = Arc::new((*resources).clone().with_repository(Arc::new(UnreachableRepository)));
    let app = create_router(resources);

    for query in ["rating=6.0", "rating=-0.5", "rating=NaN", "rating=abc", ""] {
        let (status, body) = send(&app, post_json(&format!("/recipes/some-id/rate?{query}"), &json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "query {query}");
        assert!(body["detail"].is_string());
    }
}

#[tokio::test]
async fn test_storage_failure_is_server_error() {
    let (_, _, resources) = create_test_app(ScriptedProvider::new()).await;
    let resources = Arc::new((*resources).clone().with_repository(Arc::new(UnreachableRepository)));
    let app = create_router(resources);

    let (status, body) = send(&app, get("/recipes/cook")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "DATABASE_ERROR");
}

#[tokio::test]
async fn test_rate_unknown_recipe_is_not_found() {
    let (app, _, _) = create_test_app(ScriptedProvider::new()).await;

    let (status, _) = send(&app, post_json("/recipes/missing/rate?rating=3", &json!({}))).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_endpoints() {
    let (app, _, _) = create_test_app(ScriptedProvider::new()).await;

    let (status, body) = send(&app, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().contains("ChefGPT"));

    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert!(body["timestamp"].is_string());

    let (status, body) = send(&app, get("/ready")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
    assert_eq!(body["database"], "ok");
    assert_eq!(body["llm"], "ok");
    assert_eq!(body["llm_provider"], "scripted");

    let (status, _) = send(&app, get("/test")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_ready_reports_unreachable_provider() {
    let (app, _, _) = create_test_app(ScriptedProvider::new().unreachable()).await;

    let (status, body) = send(&app, get("/ready")).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "not_ready");
    assert_eq!(body["database"], "ok");
    assert_eq!(body["llm"], "unavailable");

    let (status, _) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let (app, _, _) = create_test_app(ScriptedProvider::new()).await;

    let response = tower::ServiceExt::oneshot(app, get("/health")).await.unwrap();

    let request_id = response.headers().get("x-request-id").unwrap().to_str().unwrap();
    assert!(uuid::Uuid::parse_str(request_id).is_ok());
}
