//! Recipe catalogue endpoints.
//!
//! Handlers in `endpoints` only parse and validate input, then hand off to
//! `RecipeRepository`, which owns every query against the `recipes` table.
//! Errors from either side are expressed as `RecipeError`, whose
//! `IntoResponse` impl is the single place HTTP statuses are chosen.
//!
//! Flow Overview:
//! 1) Validate the path id or JSON body (`422` with field-level detail).
//! 2) Run exactly one repository operation.
//! 3) Return the stored recipe(s) as `RecipeResponse` with `200`.

pub(crate) mod endpoints;
mod storage;
pub(crate) mod types;
mod validation;

pub use storage::RecipeRepository;

/// Body `detail` for unknown recipes and unknown routes.
pub(crate) const NOT_FOUND_DETAIL: &str = "Not Found";

#[cfg(test)]
mod tests;
