// ABOUTME: Integration tests for the recipes REST API routes
// ABOUTME: Tests status codes, payload shapes, and the full recipe lifecycle
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

#![allow(missing_docs, clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod helpers;

use axum::Router;
use helpers::axum_test::AxumTestRequest;
use larder::{
    config::environment::{DatabaseConfig, LogLevel, ServerConfig},
    database::Database,
    resources::ServerResources,
    routes::{HealthRoutes, RecipesRoutes},
};
use serde_json::{json, Value};
use std::sync::Arc;

/// Build the full application router backed by an in-memory database
async fn setup_app() -> Router {
    let database = Database::new("sqlite::memory:").await.unwrap();
    let config = ServerConfig {
        http_port: 8081,
        log_level: LogLevel::Info,
        database: DatabaseConfig {
            url: "sqlite::memory:".into(),
        },
        server_name: "larder-server".into(),
        server_version: env!("CARGO_PKG_VERSION").to_owned(),
    };
    let resources = Arc::new(ServerResources::new(database, config));

    Router::new()
        .merge(HealthRoutes::routes(resources.clone()))
        .merge(RecipesRoutes::routes(resources))
}

fn pizza_payload() -> Value {
    json!({
        "name": "Pizza",
        "description": "Put it in the oven",
        "ingredients": [
            {"name": "dough"},
            {"name": "cheese"},
            {"name": "tomato"}
        ]
    })
}

fn cheeseburger_payload() -> Value {
    json!({
        "name": "Cheeseburger",
        "description": "Buy it from McDonalds",
        "ingredients": [
            {"name": "beef patty"},
            {"name": "cheese"},
            {"name": "burger bun"},
            {"name": "gherkin"}
        ]
    })
}

async fn create_recipe(app: &Router, payload: &Value) -> Value {
    let response = AxumTestRequest::post("/api/recipes")
        .json(payload)
        .send(app.clone())
        .await;
    assert_eq!(response.status(), 201);
    response.json()
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = setup_app().await;

    let response = AxumTestRequest::get("/health").send(app.clone()).await;
    assert_eq!(response.status(), 200);

    let response = AxumTestRequest::get("/ready").send(app).await;
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_create_recipe_with_ingredients() {
    let app = setup_app().await;

    let recipe = create_recipe(&app, &pizza_payload()).await;

    assert_eq!(recipe["name"], "Pizza");
    assert_eq!(recipe["description"], "Put it in the oven");
    assert_eq!(recipe["ingredients"].as_array().unwrap().len(), 3);

    // Nested ingredients expose only the name
    let first = recipe["ingredients"][0].as_object().unwrap();
    assert_eq!(first.len(), 1);
    assert_eq!(first["name"], "dough");

    // The record is retrievable by its returned id
    let id = recipe["id"].as_str().unwrap();
    let response = AxumTestRequest::get(&format!("/api/recipes/{id}"))
        .send(app)
        .await;
    assert_eq!(response.status(), 200);
    let fetched: Value = response.json();
    assert_eq!(fetched["id"], recipe["id"]);
    assert_eq!(fetched["name"], "Pizza");
}

#[tokio::test]
async fn test_create_recipe_with_no_ingredients_fails() {
    let app = setup_app().await;

    let payload = json!({
        "name": "Pizza",
        "description": "Put it in the oven"
    });
    let response = AxumTestRequest::post("/api/recipes")
        .json(&payload)
        .send(app)
        .await;

    assert_eq!(response.status(), 400);
    let body: Value = response.json();
    let fields = body["error"]["details"]["fields"].as_array().unwrap();
    assert!(fields.contains(&json!("ingredients")));
}

#[tokio::test]
async fn test_create_recipe_with_empty_ingredients_fails() {
    let app = setup_app().await;

    let payload = json!({
        "name": "Pizza",
        "description": "Put it in the oven",
        "ingredients": []
    });
    let response = AxumTestRequest::post("/api/recipes")
        .json(&payload)
        .send(app)
        .await;

    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_create_recipe_requires_name() {
    let app = setup_app().await;

    let payload = json!({
        "description": "Nameless",
        "ingredients": [{"name": "salt"}]
    });
    let response = AxumTestRequest::post("/api/recipes")
        .json(&payload)
        .send(app)
        .await;

    assert_eq!(response.status(), 400);
    let body: Value = response.json();
    let fields = body["error"]["details"]["fields"].as_array().unwrap();
    assert!(fields.contains(&json!("name")));
}

#[tokio::test]
async fn test_client_cannot_set_recipe_id() {
    let app = setup_app().await;

    let mut payload = pizza_payload();
    payload["id"] = json!("11111111-1111-1111-1111-111111111111");

    let recipe = create_recipe(&app, &payload).await;
    assert_ne!(recipe["id"], payload["id"]);
}

#[tokio::test]
async fn test_list_all_recipes() {
    let app = setup_app().await;

    let created = create_recipe(&app, &pizza_payload()).await;

    let response = AxumTestRequest::get("/api/recipes").send(app).await;
    assert_eq!(response.status(), 200);

    let recipes: Vec<Value> = response.json();
    assert_eq!(recipes.len(), 1);
    assert_eq!(recipes[0]["id"], created["id"]);
    assert_eq!(recipes[0]["name"], created["name"]);
    assert_eq!(recipes[0]["description"], created["description"]);
    assert_eq!(recipes[0]["ingredients"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_list_with_name_filter() {
    let app = setup_app().await;

    create_recipe(&app, &pizza_payload()).await;
    create_recipe(&app, &cheeseburger_payload()).await;

    let response = AxumTestRequest::get("/api/recipes?name=Pi")
        .send(app.clone())
        .await;
    assert_eq!(response.status(), 200);
    let recipes: Vec<Value> = response.json();
    assert_eq!(recipes.len(), 1);
    assert_eq!(recipes[0]["name"], "Pizza");

    // Filtering never fails; a miss is an empty list
    let response = AxumTestRequest::get("/api/recipes?name=Sushi")
        .send(app.clone())
        .await;
    assert_eq!(response.status(), 200);
    let recipes: Vec<Value> = response.json();
    assert!(recipes.is_empty());

    // The match is case-sensitive
    let response = AxumTestRequest::get("/api/recipes?name=pi").send(app).await;
    let recipes: Vec<Value> = response.json();
    assert!(recipes.is_empty());
}

#[tokio::test]
async fn test_retrieve_unknown_recipe_returns_404() {
    let app = setup_app().await;

    let response = AxumTestRequest::get(
        "/api/recipes/00000000-0000-0000-0000-000000000000",
    )
    .send(app.clone())
    .await;
    assert_eq!(response.status(), 404);

    // A malformed id is an unknown recipe, not a malformed request
    let response = AxumTestRequest::get("/api/recipes/not-a-uuid").send(app).await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_update_replaces_ingredient_set() {
    let app = setup_app().await;

    let pizza = create_recipe(&app, &pizza_payload()).await;
    let cheeseburger = create_recipe(&app, &cheeseburger_payload()).await;
    let pizza_id = pizza["id"].as_str().unwrap();
    let cheeseburger_id = cheeseburger["id"].as_str().unwrap();

    let payload = json!({
        "name": "Pizza",
        "ingredients": [{"name": "casa-tarradellas"}]
    });
    let response = AxumTestRequest::patch(&format!("/api/recipes/{pizza_id}"))
        .json(&payload)
        .send(app.clone())
        .await;
    assert_eq!(response.status(), 200);

    let updated: Value = response.json();
    let ingredients = updated["ingredients"].as_array().unwrap();
    assert_eq!(ingredients.len(), 1);
    assert_eq!(ingredients[0]["name"], "casa-tarradellas");

    // Retrieving shows the replacement took effect
    let response = AxumTestRequest::get(&format!("/api/recipes/{pizza_id}"))
        .send(app.clone())
        .await;
    let fetched: Value = response.json();
    assert_eq!(fetched["ingredients"].as_array().unwrap().len(), 1);

    // The sibling recipe is unaffected
    let response = AxumTestRequest::get(&format!("/api/recipes/{cheeseburger_id}"))
        .send(app)
        .await;
    let sibling: Value = response.json();
    assert_eq!(sibling["ingredients"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_update_without_ingredients_leaves_set_untouched() {
    let app = setup_app().await;

    let pizza = create_recipe(&app, &pizza_payload()).await;
    let pizza_id = pizza["id"].as_str().unwrap();

    let payload = json!({"description": "Wood-fired"});
    let response = AxumTestRequest::patch(&format!("/api/recipes/{pizza_id}"))
        .json(&payload)
        .send(app)
        .await;
    assert_eq!(response.status(), 200);

    let updated: Value = response.json();
    assert_eq!(updated["name"], "Pizza");
    assert_eq!(updated["description"], "Wood-fired");
    assert_eq!(updated["ingredients"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_update_with_empty_list_clears_ingredients() {
    let app = setup_app().await;

    let pizza = create_recipe(&app, &pizza_payload()).await;
    let pizza_id = pizza["id"].as_str().unwrap();

    let payload = json!({"ingredients": []});
    let response = AxumTestRequest::patch(&format!("/api/recipes/{pizza_id}"))
        .json(&payload)
        .send(app)
        .await;
    assert_eq!(response.status(), 200);

    let updated: Value = response.json();
    assert!(updated["ingredients"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_update_rejects_blank_name() {
    let app = setup_app().await;

    let pizza = create_recipe(&app, &pizza_payload()).await;
    let pizza_id = pizza["id"].as_str().unwrap();

    let payload = json!({"name": ""});
    let response = AxumTestRequest::patch(&format!("/api/recipes/{pizza_id}"))
        .json(&payload)
        .send(app)
        .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_update_unknown_recipe_returns_404() {
    let app = setup_app().await;

    let payload = json!({"name": "Ghost"});
    let response = AxumTestRequest::patch(
        "/api/recipes/00000000-0000-0000-0000-000000000000",
    )
    .json(&payload)
    .send(app)
    .await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_delete_recipe_cascade_and_sibling_intact() {
    let app = setup_app().await;

    let pizza = create_recipe(&app, &pizza_payload()).await;
    let cheeseburger = create_recipe(&app, &cheeseburger_payload()).await;
    let pizza_id = pizza["id"].as_str().unwrap();
    let cheeseburger_id = cheeseburger["id"].as_str().unwrap();

    let response = AxumTestRequest::delete(&format!("/api/recipes/{pizza_id}"))
        .send(app.clone())
        .await;
    assert_eq!(response.status(), 204);
    assert!(response.is_empty());

    let response = AxumTestRequest::get(&format!("/api/recipes/{pizza_id}"))
        .send(app.clone())
        .await;
    assert_eq!(response.status(), 404);

    let response = AxumTestRequest::get(&format!("/api/recipes/{cheeseburger_id}"))
        .send(app)
        .await;
    assert_eq!(response.status(), 200);
    let sibling: Value = response.json();
    assert_eq!(sibling["ingredients"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_delete_unknown_recipe_returns_404() {
    let app = setup_app().await;

    let response = AxumTestRequest::delete(
        "/api/recipes/00000000-0000-0000-0000-000000000000",
    )
    .send(app)
    .await;
    assert_eq!(response.status(), 404);
}
