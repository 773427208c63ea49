// ABOUTME: Database operations for recipes and their owned ingredients
// ABOUTME: Handles transactional CRUD with cascade delete and replace-on-update
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, Row, SqliteConnection, SqlitePool};
use std::fmt;
use uuid::Uuid;

/// A recipe with its owned, ordered ingredient collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    /// Unique identifier, immutable after creation
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Free-form description (empty string when not provided)
    pub description: String,
    /// Ingredients in display order, owned exclusively by this recipe
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A named ingredient belonging to exactly one recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ingredient {
    /// Unique identifier
    pub id: Uuid,
    /// Owning recipe
    pub recipe_id: Uuid,
    /// Display name
    pub name: String,
    /// Display order within the recipe
    pub position: u32,
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Request to create a new recipe with its initial ingredient set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRecipeRequest {
    /// Display name
    pub name: String,
    /// Optional description (defaults to empty)
    pub description: Option<String>,
    /// Ingredient names in display order
    pub ingredients: Vec<String>,
}

/// Request to partially update an existing recipe
///
/// Absent fields retain their stored values. A present ingredient list
/// fully replaces the stored set, even when empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateRecipeRequest {
    /// New display name (if provided)
    pub name: Option<String>,
    /// New description (if provided)
    pub description: Option<String>,
    /// Replacement ingredient names (if provided)
    pub ingredients: Option<Vec<String>>,
}

/// Filter options for listing recipes
#[derive(Debug, Clone, Default)]
pub struct ListRecipesFilter {
    /// Case-sensitive substring match on recipe name
    pub name: Option<String>,
}

/// Recipe database operations manager
pub struct RecipesManager {
    pool: SqlitePool,
}

impl RecipesManager {
    /// Create a new recipes manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new recipe and its ingredient rows as a single transaction
    ///
    /// # Errors
    ///
    /// Returns an error if a database operation fails; no partial state is
    /// committed
    pub async fn create(&self, request: &CreateRecipeRequest) -> AppResult<Recipe> {
        let now = Utc::now();
        let id = Uuid::new_v4();
        let description = request.description.clone().unwrap_or_default();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        sqlx::query(
            r"
            INSERT INTO recipes (id, name, description, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            ",
        )
        .bind(id.to_string())
        .bind(&request.name)
        .bind(&description)
        .bind(now.to_rfc3339())
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to create recipe: {e}")))?;

        let ingredients = insert_ingredients(&mut tx, id, &request.ingredients).await?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit recipe: {e}")))?;

        Ok(Recipe {
            id,
            name: request.name.clone(),
            description,
            ingredients,
            created_at: now,
            updated_at: now,
        })
    }

    /// Get a recipe by ID with its ingredients in display order
    ///
    /// # Errors
    ///
    /// Returns an error if a database operation fails
    pub async fn get(&self, recipe_id: Uuid) -> AppResult<Option<Recipe>> {
        let row = sqlx::query(
            r"
            SELECT id, name, description, created_at, updated_at
            FROM recipes
            WHERE id = $1
            ",
        )
        .bind(recipe_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get recipe: {e}")))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut recipe = row_to_recipe(&row)?;
        recipe.ingredients = self.list_ingredients(recipe.id).await?;
        Ok(Some(recipe))
    }

    /// List recipes in insertion order, with an optional name filter
    ///
    /// The filter is a case-sensitive unanchored substring match. SQLite
    /// `LIKE` is case-insensitive for ASCII, so the match uses `instr`.
    ///
    /// # Errors
    ///
    /// Returns an error if a database operation fails
    pub async fn list(&self, filter: &ListRecipesFilter) -> AppResult<Vec<Recipe>> {
        let rows = match &filter.name {
            Some(fragment) => {
                sqlx::query(
                    r"
                    SELECT id, name, description, created_at, updated_at
                    FROM recipes
                    WHERE instr(name, $1) > 0
                    ORDER BY rowid
                    ",
                )
                .bind(fragment)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query(
                    r"
                    SELECT id, name, description, created_at, updated_at
                    FROM recipes
                    ORDER BY rowid
                    ",
                )
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| AppError::database(format!("Failed to list recipes: {e}")))?;

        let mut recipes = rows
            .iter()
            .map(row_to_recipe)
            .collect::<AppResult<Vec<_>>>()?;

        for recipe in &mut recipes {
            recipe.ingredients = self.list_ingredients(recipe.id).await?;
        }

        Ok(recipes)
    }

    /// Partially update a recipe
    ///
    /// Present `name` and `description` replace the stored values. A
    /// present ingredient list replaces the stored set wholesale inside
    /// the same transaction, so a failure partway leaves the prior set
    /// intact. An absent ingredient list leaves the stored set untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if a database operation fails
    pub async fn update(
        &self,
        recipe_id: Uuid,
        request: &UpdateRecipeRequest,
    ) -> AppResult<Option<Recipe>> {
        let existing = self.get(recipe_id).await?;
        let Some(existing) = existing else {
            return Ok(None);
        };

        let now = Utc::now();
        let name = request.name.as_ref().unwrap_or(&existing.name);
        let description = request.description.as_ref().unwrap_or(&existing.description);

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        let result = sqlx::query(
            r"
            UPDATE recipes SET name = $1, description = $2, updated_at = $3
            WHERE id = $4
            ",
        )
        .bind(name)
        .bind(description)
        .bind(now.to_rfc3339())
        .bind(recipe_id.to_string())
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to update recipe: {e}")))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        if let Some(names) = &request.ingredients {
            replace_ingredients(&mut tx, recipe_id, names).await?;
        }

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit recipe update: {e}")))?;

        self.get(recipe_id).await
    }

    /// Delete a recipe
    ///
    /// Ingredient rows go with the recipe via the `ON DELETE CASCADE`
    /// foreign key; deleting an ingredient never deletes its recipe.
    ///
    /// # Errors
    ///
    /// Returns an error if a database operation fails
    pub async fn delete(&self, recipe_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query(
            r"
            DELETE FROM recipes
            WHERE id = $1
            ",
        )
        .bind(recipe_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to delete recipe: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    /// List the ingredients owned by a recipe in display order
    ///
    /// # Errors
    ///
    /// Returns an error if a database operation fails
    pub async fn list_ingredients(&self, recipe_id: Uuid) -> AppResult<Vec<Ingredient>> {
        let rows = sqlx::query(
            r"
            SELECT id, recipe_id, name, position
            FROM ingredients
            WHERE recipe_id = $1
            ORDER BY position
            ",
        )
        .bind(recipe_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list ingredients: {e}")))?;

        rows.iter().map(row_to_ingredient).collect()
    }

    /// Count recipes in storage
    ///
    /// # Errors
    ///
    /// Returns an error if a database operation fails
    pub async fn count(&self) -> AppResult<u32> {
        let row = sqlx::query(
            r"
            SELECT COUNT(*) as count FROM recipes
            ",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to count recipes: {e}")))?;

        let count: i64 = row.get("count");
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Ok(count as u32)
    }
}

/// Replace a recipe's entire ingredient set within an open transaction
///
/// Deletes every ingredient row owned by the recipe, then inserts the new
/// list. Isolated so the delete-then-insert pair always runs against the
/// same transaction and rolls back as a unit.
async fn replace_ingredients(
    conn: &mut SqliteConnection,
    recipe_id: Uuid,
    names: &[String],
) -> AppResult<Vec<Ingredient>> {
    let removed = delete_ingredients_for_recipe(conn, recipe_id).await?;
    tracing::debug!(
        recipe_id = %recipe_id,
        removed,
        inserted = names.len(),
        "Replacing ingredient set"
    );
    insert_ingredients(conn, recipe_id, names).await
}

/// Delete all ingredient rows owned by a recipe, returning the count removed
async fn delete_ingredients_for_recipe(
    conn: &mut SqliteConnection,
    recipe_id: Uuid,
) -> AppResult<u64> {
    let result = sqlx::query(
        r"
        DELETE FROM ingredients
        WHERE recipe_id = $1
        ",
    )
    .bind(recipe_id.to_string())
    .execute(&mut *conn)
    .await
    .map_err(|e| AppError::database(format!("Failed to delete ingredients: {e}")))?;

    Ok(result.rows_affected())
}

/// Insert one ingredient row per name, positioned in input order
async fn insert_ingredients(
    conn: &mut SqliteConnection,
    recipe_id: Uuid,
    names: &[String],
) -> AppResult<Vec<Ingredient>> {
    let mut ingredients = Vec::with_capacity(names.len());

    for (position, name) in names.iter().enumerate() {
        let id = Uuid::new_v4();
        #[allow(clippy::cast_possible_truncation)]
        let position = position as u32;

        sqlx::query(
            r"
            INSERT INTO ingredients (id, recipe_id, name, position)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(id.to_string())
        .bind(recipe_id.to_string())
        .bind(name)
        .bind(i64::from(position))
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::database(format!("Failed to create ingredient: {e}")))?;

        ingredients.push(Ingredient {
            id,
            recipe_id,
            name: name.clone(),
            position,
        });
    }

    Ok(ingredients)
}

/// Convert a database row to a `Recipe` (ingredients attached separately)
fn row_to_recipe(row: &SqliteRow) -> AppResult<Recipe> {
    let id_str: String = row.get("id");
    let id = Uuid::parse_str(&id_str)
        .map_err(|e| AppError::database(format!("Invalid recipe id in database: {e}")))?;

    Ok(Recipe {
        id,
        name: row.get("name"),
        description: row.get("description"),
        ingredients: Vec::new(),
        created_at: parse_timestamp(row, "created_at")?,
        updated_at: parse_timestamp(row, "updated_at")?,
    })
}

/// Convert a database row to an `Ingredient`
fn row_to_ingredient(row: &SqliteRow) -> AppResult<Ingredient> {
    let id_str: String = row.get("id");
    let id = Uuid::parse_str(&id_str)
        .map_err(|e| AppError::database(format!("Invalid ingredient id in database: {e}")))?;

    let recipe_id_str: String = row.get("recipe_id");
    let recipe_id = Uuid::parse_str(&recipe_id_str)
        .map_err(|e| AppError::database(format!("Invalid recipe id in database: {e}")))?;

    let position: i64 = row.get("position");
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let position = position as u32;

    Ok(Ingredient {
        id,
        recipe_id,
        name: row.get("name"),
        position,
    })
}

/// Parse an RFC 3339 timestamp column
fn parse_timestamp(row: &SqliteRow, column: &str) -> AppResult<DateTime<Utc>> {
    let raw: String = row.get(column);
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::database(format!("Invalid {column} timestamp in database: {e}")))
}
