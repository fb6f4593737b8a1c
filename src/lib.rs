//! # Recipes (Recipe Catalogue API)
//!
//! `recipes` is a small HTTP service that stores cooking recipes in a single
//! SQLite table and exposes them over three endpoints.
//!
//! ## Endpoints
//!
//! - `GET /recipes/` lists every recipe, most viewed first, then quickest to cook.
//! - `GET /recipes/{id}` returns one recipe and bumps its `views_count` by one.
//! - `POST /recipes/` creates a recipe; names are unique across the catalogue.
//!
//! ## Errors
//!
//! Every error body is JSON with a `detail` field. Validation failures carry a
//! list of `{loc, msg, type}` entries pointing at the offending field; all other
//! failures carry a short message. Storage errors are logged server-side and
//! surface as a generic `500` without leaking database details.
//!
//! ## Storage
//!
//! The table is created on startup when missing (see `sql/schema.sql`). Each
//! repository call borrows a pooled connection for the duration of the call.

pub mod api;
pub mod cli;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }
}
