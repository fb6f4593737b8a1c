//! Handler tests for the recipes API.
//!
//! These tests build the full application router on top of an in-memory
//! SQLite database and drive it end-to-end with `oneshot` requests.

use anyhow::Result;
use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tower::ServiceExt;

use crate::api::{app, schema::memory_pool};

struct TestApp {
    pool: SqlitePool,
    router: Router,
}

impl TestApp {
    async fn new() -> Result<Self> {
        let pool = memory_pool().await?;
        let router = app(pool.clone());
        Ok(Self { pool, router })
    }

    /// Sends one request and returns the status with the JSON body (`Null` when empty).
    async fn send(&self, request: Request<Body>) -> Result<(StatusCode, Value)> {
        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };
        Ok((status, body))
    }

    async fn get(&self, uri: &str) -> Result<(StatusCode, Value)> {
        self.send(Request::builder().uri(uri).body(Body::empty())?)
            .await
    }

    async fn post_json(&self, uri: &str, payload: &Value) -> Result<(StatusCode, Value)> {
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))?,
        )
        .await
    }

    /// Inserts a row directly so tests can control `views_count`.
    async fn insert(&self, name: &str, cooking_time: i64, views_count: i64) -> Result<i64> {
        let id: i64 = sqlx::query_scalar(
            r"
            INSERT INTO recipes (name, cooking_time, ingredients, description, views_count)
            VALUES (?, ?, 'ingredients', 'description', ?)
            RETURNING id
            ",
        )
        .bind(name)
        .bind(cooking_time)
        .bind(views_count)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }
}

fn borscht() -> Value {
    json!({
        "name": "Борщ",
        "cooking_time": 60,
        "ingredients": "Свекла, картофель",
        "description": "Традиционный суп",
    })
}

fn names(body: &Value) -> Vec<String> {
    body.as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item["name"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

#[tokio::test]
/// An empty catalogue lists as `[]` rather than an error.
async fn list_recipes_empty() -> Result<()> {
    let app = TestApp::new().await?;

    let (status, body) = app.get("/recipes/").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
    Ok(())
}

#[tokio::test]
/// Creating a recipe returns `200` with the assigned id and a zero view count,
/// and the first fetch by id reports exactly one view.
async fn create_then_fetch_counts_one_view() -> Result<()> {
    let app = TestApp::new().await?;

    let (status, created) = app.post_json("/recipes/", &borscht()).await?;
    assert_eq!(status, StatusCode::OK);
    let id = created["id"].as_i64().unwrap_or_default();
    assert!(id > 0);
    assert_eq!(created["name"], "Борщ");
    assert_eq!(created["cooking_time"], 60);
    assert_eq!(created["ingredients"], "Свекла, картофель");
    assert_eq!(created["description"], "Традиционный суп");
    assert_eq!(created["views_count"], 0);

    let (status, fetched) = app.get(&format!("/recipes/{id}")).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["id"], id);
    assert_eq!(fetched["name"], created["name"]);
    assert_eq!(fetched["cooking_time"], created["cooking_time"]);
    assert_eq!(fetched["ingredients"], created["ingredients"]);
    assert_eq!(fetched["description"], created["description"]);
    assert_eq!(fetched["views_count"], 1);

    let (_, fetched) = app.get(&format!("/recipes/{id}")).await?;
    assert_eq!(fetched["views_count"], 2);
    Ok(())
}

#[tokio::test]
/// Listing orders by views descending, then cooking time ascending.
async fn list_recipes_orders_by_views_then_cooking_time() -> Result<()> {
    let app = TestApp::new().await?;
    app.insert("A", 30, 5).await?;
    app.insert("B", 10, 5).await?;
    app.insert("C", 90, 7).await?;
    app.insert("D", 5, 0).await?;

    let (status, body) = app.get("/recipes/").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body), vec!["C", "B", "A", "D"]);
    Ok(())
}

#[tokio::test]
/// Listing does not count as a view.
async fn list_recipes_does_not_touch_views() -> Result<()> {
    let app = TestApp::new().await?;
    app.insert("Оладьи", 20, 3).await?;

    app.get("/recipes/").await?;
    let (_, body) = app.get("/recipes/").await?;
    assert_eq!(body[0]["views_count"], 3);
    Ok(())
}

#[tokio::test]
async fn get_recipe_not_found() -> Result<()> {
    let app = TestApp::new().await?;

    let (status, body) = app.get("/recipes/999").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "detail": "Not Found" }));
    Ok(())
}

#[tokio::test]
async fn get_recipe_negative_id() -> Result<()> {
    let app = TestApp::new().await?;

    let (status, body) = app.get("/recipes/-1").await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body,
        json!({
            "detail": [{
                "loc": ["path", "id"],
                "msg": "Input should be greater than 0",
                "type": "greater_than",
            }]
        })
    );
    Ok(())
}

#[tokio::test]
async fn get_recipe_zero_id() -> Result<()> {
    let app = TestApp::new().await?;

    let (status, body) = app.get("/recipes/0").await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"][0]["type"], "greater_than");
    Ok(())
}

#[tokio::test]
/// Non-integer ids are rejected before any storage access, pointing at the `id` field.
async fn get_recipe_invalid_id_format() -> Result<()> {
    let app = TestApp::new().await?;

    let (status, body) = app.get("/recipes/abc").await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let error = body["detail"]
        .as_array()
        .and_then(|errors| {
            errors
                .iter()
                .find(|err| err["loc"].to_string().contains("id"))
        })
        .cloned();
    assert!(error.is_some());
    if let Some(error) = error {
        assert!(error["msg"]
            .as_str()
            .unwrap_or_default()
            .contains("Input should be a valid integer, unable to parse string as an "));
        assert_eq!(error["type"], "int_parsing");
    }
    Ok(())
}

#[tokio::test]
/// A second create with the same name is rejected and the table keeps one row.
async fn create_recipe_duplicate_name() -> Result<()> {
    let app = TestApp::new().await?;

    let (status, _) = app.post_json("/recipes/", &borscht()).await?;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.post_json("/recipes/", &borscht()).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "detail": "A recipe with this name already exists." })
    );

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM recipes WHERE name = 'Борщ'")
        .fetch_one(&app.pool)
        .await?;
    assert_eq!(count, 1);
    Ok(())
}

#[tokio::test]
async fn create_recipe_keeps_supplied_views_count() -> Result<()> {
    let app = TestApp::new().await?;
    let mut payload = borscht();
    payload["views_count"] = json!(4);

    let (status, body) = app.post_json("/recipes/", &payload).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["views_count"], 4);
    Ok(())
}

#[tokio::test]
async fn create_recipe_rejects_non_positive_cooking_time() -> Result<()> {
    let app = TestApp::new().await?;
    let mut payload = borscht();
    payload["cooking_time"] = json!(0);

    let (status, body) = app.post_json("/recipes/", &payload).await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"][0]["loc"], json!(["body", "cooking_time"]));
    assert_eq!(body["detail"][0]["type"], "greater_than");

    let (_, listed) = app.get("/recipes/").await?;
    assert_eq!(listed, json!([]));
    Ok(())
}

#[tokio::test]
async fn create_recipe_rejects_missing_field() -> Result<()> {
    let app = TestApp::new().await?;
    let payload = json!({ "name": "Оладьи", "cooking_time": 20, "ingredients": "Мука" });

    let (status, body) = app.post_json("/recipes/", &payload).await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body,
        json!({
            "detail": [{
                "loc": ["body", "description"],
                "msg": "Field required",
                "type": "missing",
            }]
        })
    );
    Ok(())
}

#[tokio::test]
async fn create_recipe_names_mistyped_fields() -> Result<()> {
    let app = TestApp::new().await?;
    let mut payload = borscht();
    payload["cooking_time"] = json!("soon");
    payload["name"] = json!(["Борщ"]);

    let (status, body) = app.post_json("/recipes/", &payload).await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"][0]["loc"], json!(["body", "name"]));
    assert_eq!(body["detail"][0]["type"], "string_type");
    assert_eq!(body["detail"][1]["loc"], json!(["body", "cooking_time"]));
    assert_eq!(body["detail"][1]["type"], "int_parsing");
    assert_eq!(body["detail"].as_array().map(Vec::len), Some(2));
    Ok(())
}

#[tokio::test]
async fn create_recipe_rejects_oversized_views_count() -> Result<()> {
    let app = TestApp::new().await?;
    let mut payload = borscht();
    payload["views_count"] = json!(i64::MAX);

    let (status, body) = app.post_json("/recipes/", &payload).await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"][0]["loc"], json!(["body", "views_count"]));
    assert_eq!(body["detail"][0]["type"], "less_than_equal");

    let (status, listed) = app.get("/recipes/").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed, json!([]));
    Ok(())
}

#[tokio::test]
async fn maxed_out_views_keep_the_catalogue_readable() -> Result<()> {
    let app = TestApp::new().await?;
    let id = app.insert("Борщ", 60, i64::MAX).await?;

    let (status, body) = app.get(&format!("/recipes/{id}")).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["views_count"], json!(i64::MAX));

    let (status, listed) = app.get("/recipes/").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed[0]["views_count"], json!(i64::MAX));
    Ok(())
}

#[tokio::test]
async fn create_recipe_rejects_malformed_json() -> Result<()> {
    let app = TestApp::new().await?;

    let (status, body) = app
        .send(
            Request::builder()
                .method("POST")
                .uri("/recipes/")
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from("{\"name\": "))?,
        )
        .await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"][0]["type"], "json_invalid");
    Ok(())
}

#[tokio::test]
/// Storage failures surface as a generic `500` without database details.
async fn storage_failure_is_internal_error() -> Result<()> {
    let app = TestApp::new().await?;
    app.pool.close().await;

    for uri in ["/recipes/", "/recipes/1"] {
        let (status, body) = app.get(uri).await?;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
        assert_eq!(body, json!({ "detail": "Internal server error" }));
    }

    let (status, body) = app.post_json("/recipes/", &borscht()).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "detail": "Internal server error" }));
    Ok(())
}

#[tokio::test]
async fn unknown_route_is_not_found() -> Result<()> {
    let app = TestApp::new().await?;

    let (status, body) = app.get("/cookbooks/").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "detail": "Not Found" }));
    Ok(())
}

#[tokio::test]
async fn health_reports_database_status() -> Result<()> {
    let app = TestApp::new().await?;

    let response = app
        .router
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty())?)
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-app"));
    assert!(response.headers().contains_key("x-request-id"));

    let (_, body) = app.get("/health").await?;
    assert_eq!(body["database"], "ok");
    assert_eq!(body["name"], env!("CARGO_PKG_NAME"));

    app.pool.close().await;
    let (status, body) = app.get("/health").await?;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["database"], "error");
    Ok(())
}

#[tokio::test]
async fn openapi_document_is_served() -> Result<()> {
    let app = TestApp::new().await?;

    let (status, body) = app.get("/openapi.json").await?;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/recipes/{id}"].is_object());
    assert!(body["components"]["schemas"]["RecipeResponse"].is_object());
    Ok(())
}
