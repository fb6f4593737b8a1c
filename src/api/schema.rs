//! Table creation for the recipe store.

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use tracing::debug;

const SCHEMA_SQL: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/sql/schema.sql"));

/// Creates the `recipes` table and its indexes when they are missing.
///
/// # Errors
/// Returns an error naming the first statement that failed.
pub async fn create_tables(pool: &SqlitePool) -> Result<()> {
    for (index, statement) in split_sql_statements(SCHEMA_SQL).iter().enumerate() {
        sqlx::query(statement)
            .execute(pool)
            .await
            .with_context(|| format!("failed to execute schema statement {}", index + 1))?;
    }

    debug!("schema applied");

    Ok(())
}

/// Splits a schema file into individual statements, dropping `--` comment lines.
/// Assumes statements end with `;` at the end of a line.
fn split_sql_statements(sql: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();

    for line in sql.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("--") {
            continue;
        }
        current.push_str(line);
        current.push('\n');

        if trimmed.ends_with(';') {
            let statement = current.trim();
            if !statement.is_empty() {
                statements.push(statement.to_string());
            }
            current.clear();
        }
    }

    let leftover = current.trim();
    if !leftover.is_empty() {
        statements.push(leftover.to_string());
    }

    statements
}

/// Single-connection in-memory database with the schema applied.
/// One connection only: every `:memory:` connection is its own database.
#[cfg(test)]
pub(crate) async fn memory_pool() -> Result<SqlitePool> {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .context("failed to open in-memory database")?;

    create_tables(&pool).await?;

    Ok(pool)
}
