//! API handlers for the recipes service.
//!
//! `recipes` holds the catalogue endpoints and their storage; `health` reports
//! build info and database reachability.

pub mod health;
pub mod recipes;

use axum::{http::StatusCode, response::IntoResponse, Json};

use self::recipes::{types::ErrorResponse, NOT_FOUND_DETAIL};

/// Fallback for unknown routes, matching the recipe `404` body.
pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new(NOT_FOUND_DETAIL)),
    )
}
