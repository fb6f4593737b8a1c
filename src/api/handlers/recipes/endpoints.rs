//! Recipe handlers.
//!
//! All three endpoints answer `200` on success, including creation, and share
//! the `RecipeResponse` wire shape.

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use serde_json::Value;

use super::{
    storage::{RecipeError, RecipeRepository},
    types::{CreateRecipeRequest, ErrorResponse, RecipeResponse, ValidationErrorResponse},
    validation::{body_rejection, parse_recipe_id},
};

#[utoipa::path(
    get,
    path = "/recipes/",
    responses(
        (status = 200, description = "All recipes, most viewed first, then quickest to cook.", body = [RecipeResponse]),
        (status = 500, description = "Storage failure.", body = ErrorResponse),
    ),
    tag = "recipes"
)]
/// Lists every recipe ordered by `views_count` descending, then `cooking_time` ascending.
/// An empty catalogue is an empty list, not an error.
pub async fn list_recipes(repository: Extension<RecipeRepository>) -> impl IntoResponse {
    match repository.find_all().await {
        Ok(recipes) => (StatusCode::OK, Json(recipes)).into_response(),
        Err(err) => err.into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/recipes/{id}",
    params(("id" = i64, Path, description = "Recipe id, greater than 0")),
    responses(
        (status = 200, description = "Recipe detail; the view counter already includes this request.", body = RecipeResponse),
        (status = 404, description = "Recipe not found.", body = ErrorResponse),
        (status = 422, description = "Id is not an integer greater than 0.", body = ValidationErrorResponse),
        (status = 500, description = "Storage failure.", body = ErrorResponse),
    ),
    tag = "recipes"
)]
/// Fetches one recipe and counts the view.
/// The id is taken as a raw string so non-integers get the same `422` body as out-of-range values.
pub async fn get_recipe(
    Path(id): Path<String>,
    repository: Extension<RecipeRepository>,
) -> impl IntoResponse {
    let id = match parse_recipe_id(&id) {
        Ok(id) => id,
        Err(errors) => return RecipeError::Validation(errors).into_response(),
    };

    match repository.find_one(id).await {
        Ok(recipe) => (StatusCode::OK, Json(recipe)).into_response(),
        Err(err) => err.into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/recipes/",
    request_body = CreateRecipeRequest,
    responses(
        (status = 200, description = "Recipe created.", body = RecipeResponse),
        (status = 400, description = "A recipe with this name already exists.", body = ErrorResponse),
        (status = 422, description = "Malformed body or out-of-range field.", body = ValidationErrorResponse),
        (status = 500, description = "Storage failure.", body = ErrorResponse),
    ),
    tag = "recipes"
)]
/// Creates a recipe and returns it with its assigned id.
/// The body is decoded as plain JSON first so type errors can name the field.
pub async fn create_recipe(
    repository: Extension<RecipeRepository>,
    payload: Result<Json<Value>, JsonRejection>,
) -> impl IntoResponse {
    let payload = match payload {
        Ok(Json(body)) => CreateRecipeRequest::from_json(&body),
        Err(rejection) => Err(body_rejection(&rejection)),
    };

    let payload = match payload {
        Ok(payload) => payload,
        Err(errors) => return RecipeError::Validation(errors).into_response(),
    };

    match repository.add_one(&payload).await {
        Ok(recipe) => (StatusCode::OK, Json(recipe)).into_response(),
        Err(err) => err.into_response(),
    }
}
