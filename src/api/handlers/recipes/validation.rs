//! Input checks run before any storage access.
//!
//! Failures are collected as `FieldError`s so a single `422` response can point
//! at every offending field at once.

use axum::extract::rejection::JsonRejection;
use serde_json::{Map, Value};

use super::types::{CreateRecipeRequest, FieldError};

pub(super) const ID_LOCATION: &[&str] = &["path", "id"];

/// Largest `views_count` a client may seed a recipe with.
pub(super) const MAX_INITIAL_VIEWS: i64 = 1_000_000_000;

const INT_PARSING_MSG: &str = "Input should be a valid integer, unable to parse string as an integer";

/// Parses the `{id}` path segment, which must be an integer greater than zero.
pub(super) fn parse_recipe_id(raw: &str) -> Result<i64, Vec<FieldError>> {
    let id = raw
        .parse::<i64>()
        .map_err(|_| vec![FieldError::new(ID_LOCATION, INT_PARSING_MSG, "int_parsing")])?;

    if id <= 0 {
        return Err(vec![FieldError::greater_than(ID_LOCATION, 0)]);
    }

    Ok(id)
}

impl CreateRecipeRequest {
    /// Builds a request from a decoded JSON body, reporting every missing or
    /// mistyped field under `["body", <field>]`, then runs the range checks.
    pub(super) fn from_json(body: &Value) -> Result<Self, Vec<FieldError>> {
        let Some(fields) = body.as_object() else {
            return Err(vec![FieldError::new(
                &["body"],
                "Input should be a valid dictionary or object to extract fields from",
                "model_attributes_type",
            )]);
        };

        let mut errors = Vec::new();
        let name = string_field(fields, "name", &mut errors);
        let cooking_time = int_field(fields, "cooking_time", &mut errors);
        let ingredients = string_field(fields, "ingredients", &mut errors);
        let description = string_field(fields, "description", &mut errors);
        let views_count = match fields.get("views_count") {
            Some(value) => int_value("views_count", value, &mut errors),
            None => Some(0),
        };

        let (
            Some(name),
            Some(cooking_time),
            Some(ingredients),
            Some(description),
            Some(views_count),
        ) = (name, cooking_time, ingredients, description, views_count)
        else {
            return Err(errors);
        };

        let request = Self {
            name,
            cooking_time,
            ingredients,
            description,
            views_count,
        };
        request.validate()?;

        Ok(request)
    }

    /// Range checks that `serde` cannot express.
    pub(super) fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();

        if self.cooking_time <= 0 {
            errors.push(FieldError::greater_than(&["body", "cooking_time"], 0));
        }

        if self.views_count < 0 {
            errors.push(FieldError::greater_than_equal(&["body", "views_count"], 0));
        } else if self.views_count > MAX_INITIAL_VIEWS {
            errors.push(FieldError::less_than_equal(
                &["body", "views_count"],
                MAX_INITIAL_VIEWS,
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn missing(field: &str) -> FieldError {
    FieldError::new(&["body", field], "Field required", "missing")
}

fn string_field(
    fields: &Map<String, Value>,
    field: &str,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    match fields.get(field) {
        Some(Value::String(value)) => Some(value.clone()),
        Some(_) => {
            errors.push(FieldError::new(
                &["body", field],
                "Input should be a valid string",
                "string_type",
            ));
            None
        }
        None => {
            errors.push(missing(field));
            None
        }
    }
}

fn int_field(
    fields: &Map<String, Value>,
    field: &str,
    errors: &mut Vec<FieldError>,
) -> Option<i64> {
    if let Some(value) = fields.get(field) {
        int_value(field, value, errors)
    } else {
        errors.push(missing(field));
        None
    }
}

/// Accepts JSON integers and integer strings such as `"60"`.
fn int_value(field: &str, value: &Value, errors: &mut Vec<FieldError>) -> Option<i64> {
    let loc = ["body", field];
    let error = match value {
        Value::Number(number) => match number.as_i64() {
            Some(parsed) => return Some(parsed),
            None if number.as_f64().is_some_and(|float| float.fract() != 0.0) => FieldError::new(
                &loc,
                "Input should be a valid integer, got a number with a fractional part",
                "int_from_float",
            ),
            None => FieldError::new(&loc, "Input should be a valid integer", "int_type"),
        },
        Value::String(raw) => match raw.trim().parse::<i64>() {
            Ok(parsed) => return Some(parsed),
            Err(_) => FieldError::new(&loc, INT_PARSING_MSG, "int_parsing"),
        },
        _ => FieldError::new(&loc, "Input should be a valid integer", "int_type"),
    };

    errors.push(error);
    None
}

/// Converts a body that could not be read as JSON into an error on `body`.
pub(super) fn body_rejection(rejection: &JsonRejection) -> Vec<FieldError> {
    let kind = match rejection {
        JsonRejection::JsonSyntaxError(_) => "json_invalid",
        JsonRejection::MissingJsonContentType(_) => "missing_content_type",
        _ => "body_error",
    };

    vec![FieldError::new(&["body"], rejection.body_text(), kind)]
}
