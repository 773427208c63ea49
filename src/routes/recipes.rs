// ABOUTME: Route handlers for the Recipes REST API
// ABOUTME: Provides endpoints for CRUD operations and name search on recipes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! Recipes routes
//!
//! This module handles the recipe endpoints: create, list (with optional
//! name filter), retrieve, partial update, and delete. Handlers validate
//! payloads, delegate to [`RecipesManager`], and map outcomes to HTTP
//! status codes.

use crate::{
    database::recipes::{
        CreateRecipeRequest, ListRecipesFilter, Recipe, RecipesManager, UpdateRecipeRequest,
    },
    errors::AppError,
    resources::ServerResources,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Response for a recipe
#[derive(Debug, Serialize, Deserialize)]
pub struct RecipeResponse {
    /// Unique identifier (server-assigned, read-only)
    pub id: String,
    /// Display name
    pub name: String,
    /// Free-form description
    pub description: String,
    /// Ingredients in display order
    pub ingredients: Vec<IngredientResponse>,
}

/// Nested ingredient representation (name only, no id exposed)
#[derive(Debug, Serialize, Deserialize)]
pub struct IngredientResponse {
    /// Display name
    pub name: String,
}

impl From<Recipe> for RecipeResponse {
    fn from(recipe: Recipe) -> Self {
        Self {
            id: recipe.id.to_string(),
            name: recipe.name,
            description: recipe.description,
            ingredients: recipe
                .ingredients
                .into_iter()
                .map(|i| IngredientResponse { name: i.name })
                .collect(),
        }
    }
}

/// Nested ingredient in request bodies
#[derive(Debug, Clone, Deserialize)]
pub struct IngredientBody {
    /// Display name
    pub name: String,
}

/// Request body for creating a recipe
#[derive(Debug, Deserialize)]
pub struct CreateRecipeBody {
    /// Display name
    pub name: Option<String>,
    /// Optional description
    pub description: Option<String>,
    /// Initial ingredient set (required, at least one entry)
    pub ingredients: Option<Vec<IngredientBody>>,
}

/// Request body for partially updating a recipe
#[derive(Debug, Deserialize)]
pub struct UpdateRecipeBody {
    /// New display name (if provided)
    pub name: Option<String>,
    /// New description (if provided)
    pub description: Option<String>,
    /// Replacement ingredient set (if provided; empty list permitted)
    pub ingredients: Option<Vec<IngredientBody>>,
}

/// Query parameters for listing recipes
#[derive(Debug, Deserialize, Default)]
pub struct ListRecipesQuery {
    /// Case-sensitive substring filter on recipe name
    pub name: Option<String>,
}

/// Recipes routes handler
pub struct RecipesRoutes;

impl RecipesRoutes {
    /// Create all recipes routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/recipes", get(Self::handle_list))
            .route("/api/recipes", post(Self::handle_create))
            .route("/api/recipes/:id", get(Self::handle_get))
            .route("/api/recipes/:id", patch(Self::handle_update))
            .route("/api/recipes/:id", delete(Self::handle_delete))
            .with_state(resources)
    }

    /// Get the recipes manager from the shared pool
    fn manager(resources: &Arc<ServerResources>) -> RecipesManager {
        RecipesManager::new(resources.database.pool().clone())
    }

    /// Parse a recipe id from the request path
    ///
    /// A malformed id is treated as an unknown recipe.
    fn parse_recipe_id(id: &str) -> Result<Uuid, AppError> {
        Uuid::parse_str(id).map_err(|_| AppError::not_found(format!("Recipe {id}")))
    }

    /// Handle POST /api/recipes - Create a new recipe
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        Json(body): Json<CreateRecipeBody>,
    ) -> Result<Response, AppError> {
        let request = validate_create(body)?;

        let manager = Self::manager(&resources);
        let recipe = manager.create(&request).await?;

        tracing::info!(recipe_id = %recipe.id, "Recipe created");

        let response: RecipeResponse = recipe.into();
        Ok((StatusCode::CREATED, Json(response)).into_response())
    }

    /// Handle GET /api/recipes - List recipes with optional name filter
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        Query(query): Query<ListRecipesQuery>,
    ) -> Result<Response, AppError> {
        let manager = Self::manager(&resources);

        let filter = ListRecipesFilter { name: query.name };
        let recipes = manager.list(&filter).await?;

        let response: Vec<RecipeResponse> = recipes.into_iter().map(Into::into).collect();
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle GET /api/recipes/:id - Retrieve a single recipe
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let recipe_id = Self::parse_recipe_id(&id)?;

        let manager = Self::manager(&resources);
        let recipe = manager
            .get(recipe_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Recipe {id}")))?;

        let response: RecipeResponse = recipe.into();
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle PATCH /api/recipes/:id - Partially update a recipe
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
        Json(body): Json<UpdateRecipeBody>,
    ) -> Result<Response, AppError> {
        let recipe_id = Self::parse_recipe_id(&id)?;
        let request = validate_update(body)?;

        let manager = Self::manager(&resources);
        let recipe = manager
            .update(recipe_id, &request)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Recipe {id}")))?;

        let response: RecipeResponse = recipe.into();
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle DELETE /api/recipes/:id - Delete a recipe and its ingredients
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let recipe_id = Self::parse_recipe_id(&id)?;

        let manager = Self::manager(&resources);
        let deleted = manager.delete(recipe_id).await?;

        if !deleted {
            return Err(AppError::not_found(format!("Recipe {id}")));
        }

        tracing::info!(recipe_id = %recipe_id, "Recipe deleted");

        Ok(StatusCode::NO_CONTENT.into_response())
    }
}

/// Validate a create payload and convert it to a database request
///
/// `name` must be present and non-blank; `ingredients` must be present
/// with at least one entry, and every entry must have a non-blank name.
fn validate_create(body: CreateRecipeBody) -> Result<CreateRecipeRequest, AppError> {
    let mut failing_fields = Vec::new();

    let name = body.name.unwrap_or_default();
    if name.trim().is_empty() {
        failing_fields.push("name");
    }

    let ingredients = body.ingredients.unwrap_or_default();
    if ingredients.is_empty() || ingredients.iter().any(|i| i.name.trim().is_empty()) {
        failing_fields.push("ingredients");
    }

    if !failing_fields.is_empty() {
        return Err(validation_error(&failing_fields));
    }

    Ok(CreateRecipeRequest {
        name,
        description: body.description,
        ingredients: ingredients.into_iter().map(|i| i.name).collect(),
    })
}

/// Validate an update payload and convert it to a database request
///
/// Absent fields pass through untouched. A present `name` must be
/// non-blank; a present ingredient list may be empty but no entry may
/// have a blank name.
fn validate_update(body: UpdateRecipeBody) -> Result<UpdateRecipeRequest, AppError> {
    let mut failing_fields = Vec::new();

    if let Some(name) = &body.name {
        if name.trim().is_empty() {
            failing_fields.push("name");
        }
    }

    if let Some(ingredients) = &body.ingredients {
        if ingredients.iter().any(|i| i.name.trim().is_empty()) {
            failing_fields.push("ingredients");
        }
    }

    if !failing_fields.is_empty() {
        return Err(validation_error(&failing_fields));
    }

    Ok(UpdateRecipeRequest {
        name: body.name,
        description: body.description,
        ingredients: body
            .ingredients
            .map(|list| list.into_iter().map(|i| i.name).collect()),
    })
}

/// Build a 400 validation error listing the failing fields
fn validation_error(fields: &[&str]) -> AppError {
    AppError::invalid_input("Validation failed").with_details(serde_json::json!({
        "fields": fields,
    }))
}
