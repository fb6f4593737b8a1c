//! Request/response types for the recipes API.
//!
//! These payloads are shared between handlers, storage and `OpenAPI` generation.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body accepted by `POST /recipes/`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CreateRecipeRequest {
    /// Dish name, unique across the catalogue.
    #[schema(example = "Борщ")]
    pub name: String,
    /// Cooking time in minutes.
    #[schema(minimum = 1, example = 60)]
    pub cooking_time: i64,
    #[schema(example = "Свекла, картофель")]
    pub ingredients: String,
    /// Description and preparation steps.
    #[schema(example = "Традиционный суп")]
    pub description: String,
    #[serde(default)]
    #[schema(minimum = 0, maximum = 1000000000, default = 0)]
    pub views_count: i64,
}

/// A stored recipe as returned by every recipe endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema, sqlx::FromRow)]
pub struct RecipeResponse {
    pub id: i64,
    pub name: String,
    pub cooking_time: i64,
    pub ingredients: String,
    pub description: String,
    pub views_count: i64,
}

/// Error body for everything except validation failures.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub detail: String,
}

impl ErrorResponse {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

/// One invalid input, located by `loc` (e.g. `["path", "id"]`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct FieldError {
    pub loc: Vec<String>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl FieldError {
    pub fn new(loc: &[&str], msg: impl Into<String>, kind: &str) -> Self {
        Self {
            loc: loc.iter().map(ToString::to_string).collect(),
            msg: msg.into(),
            kind: kind.to_string(),
        }
    }

    /// `value` must be strictly greater than `bound`.
    pub fn greater_than(loc: &[&str], bound: i64) -> Self {
        Self::new(
            loc,
            format!("Input should be greater than {bound}"),
            "greater_than",
        )
    }

    /// `value` must be less than or equal to `bound`.
    pub fn less_than_equal(loc: &[&str], bound: i64) -> Self {
        Self::new(
            loc,
            format!("Input should be less than or equal to {bound}"),
            "less_than_equal",
        )
    }

    /// `value` must be greater than or equal to `bound`.
    pub fn greater_than_equal(loc: &[&str], bound: i64) -> Self {
        Self::new(
            loc,
            format!("Input should be greater than or equal to {bound}"),
            "greater_than_equal",
        )
    }
}

/// Error body for `422 Unprocessable Entity`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ValidationErrorResponse {
    pub detail: Vec<FieldError>,
}
