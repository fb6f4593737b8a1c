//! SQL storage for the `recipes` table.
//!
//! `RecipeRepository` is the only code that talks to the database. Each method
//! borrows a pooled connection for a single statement, so nothing is held open
//! across calls and no in-process locking is needed: duplicate-name races are
//! settled by the `recipes_name_idx` unique index.

use axum::{http::StatusCode, response::IntoResponse, Json};
use sqlx::{Connection, SqlitePool};
use thiserror::Error;
use tracing::{debug, error, instrument, warn};

use super::{
    types::{CreateRecipeRequest, ErrorResponse, FieldError, RecipeResponse, ValidationErrorResponse},
    validation::ID_LOCATION,
    NOT_FOUND_DETAIL,
};

const NAME_TAKEN_DETAIL: &str = "A recipe with this name already exists.";
const INTERNAL_DETAIL: &str = "Internal server error";

#[derive(Debug, Error)]
pub enum RecipeError {
    #[error("invalid input")]
    Validation(Vec<FieldError>),
    #[error("recipe not found")]
    NotFound,
    #[error("recipe name is already taken")]
    Conflict,
    #[error("recipe name violated the unique index")]
    Duplicate,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for RecipeError {
    /// Maps storage-layer failures into stable HTTP responses for handlers.
    /// Database errors are logged server-side and surfaced as `500` without leaking details.
    fn into_response(self) -> axum::response::Response {
        match self {
            Self::Validation(detail) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ValidationErrorResponse { detail }),
            )
                .into_response(),
            Self::NotFound => (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::new(NOT_FOUND_DETAIL)),
            )
                .into_response(),
            Self::Conflict | Self::Duplicate => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new(NAME_TAKEN_DETAIL)),
            )
                .into_response(),
            Self::Database(err) => {
                error!("Database error: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new(INTERNAL_DETAIL)),
                )
                    .into_response()
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct RecipeRepository {
    pool: SqlitePool,
}

impl RecipeRepository {
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Round-trips a connection to check the database is reachable.
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        conn.ping().await
    }

    /// Returns every recipe, most viewed first, then quickest to cook.
    #[instrument(skip(self))]
    pub async fn find_all(&self) -> Result<Vec<RecipeResponse>, RecipeError> {
        let recipes = sqlx::query_as::<_, RecipeResponse>(
            r"
            SELECT id, name, cooking_time, ingredients, description, views_count
            FROM recipes
            ORDER BY views_count DESC, cooking_time ASC, id ASC
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = recipes.len(), "listed recipes");

        Ok(recipes)
    }

    /// Increments `views_count` and returns the recipe with the new count.
    /// The read and the increment are one statement, so concurrent fetches never lose a view.
    /// The counter stops at `i64::MAX`; SQLite would otherwise store the overflow as a REAL.
    #[instrument(skip(self))]
    pub async fn find_one(&self, id: i64) -> Result<RecipeResponse, RecipeError> {
        if id <= 0 {
            return Err(RecipeError::Validation(vec![FieldError::greater_than(
                ID_LOCATION,
                0,
            )]));
        }

        sqlx::query_as::<_, RecipeResponse>(
            r"
            UPDATE recipes
            SET views_count = CASE
                WHEN views_count < 9223372036854775807 THEN views_count + 1
                ELSE views_count
            END
            WHERE id = ?
            RETURNING id, name, cooking_time, ingredients, description, views_count
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RecipeError::NotFound)
    }

    /// Exact-match lookup by name.
    #[instrument(skip(self))]
    pub async fn find_by_name(&self, name: &str) -> Result<Option<RecipeResponse>, RecipeError> {
        let recipe = sqlx::query_as::<_, RecipeResponse>(
            r"
            SELECT id, name, cooking_time, ingredients, description, views_count
            FROM recipes
            WHERE name = ?
            ",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(recipe)
    }

    /// Inserts a new recipe after checking its name is free.
    /// The pre-check is advisory; a concurrent insert of the same name is caught
    /// by the unique index and reported as `RecipeError::Duplicate`.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn add_one(&self, input: &CreateRecipeRequest) -> Result<RecipeResponse, RecipeError> {
        if self.find_by_name(&input.name).await?.is_some() {
            warn!("recipe name already exists");
            return Err(RecipeError::Conflict);
        }

        let insert = sqlx::query_as::<_, RecipeResponse>(
            r"
            INSERT INTO recipes (name, cooking_time, ingredients, description, views_count)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, name, cooking_time, ingredients, description, views_count
            ",
        )
        .bind(&input.name)
        .bind(input.cooking_time)
        .bind(&input.ingredients)
        .bind(&input.description)
        .bind(input.views_count)
        .fetch_one(&self.pool)
        .await;

        match insert {
            Ok(recipe) => {
                debug!(id = recipe.id, "recipe created");
                Ok(recipe)
            }
            Err(err) if is_unique_violation(&err) => {
                warn!("recipe name inserted concurrently");
                Err(RecipeError::Duplicate)
            }
            Err(err) => Err(RecipeError::Database(err)),
        }
    }
}

/// Returns `true` when `err` is a unique-constraint violation reported by the database.
fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}
