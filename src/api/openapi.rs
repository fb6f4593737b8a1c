use super::handlers::{health, recipes::endpoints};
use utoipa::openapi::{
    info::{Contact, ContactBuilder, InfoBuilder, LicenseBuilder},
    tag::TagBuilder,
    OpenApi, OpenApiBuilder,
};
use utoipa_axum::{router::OpenApiRouter, routes};

#[must_use]
pub fn openapi() -> OpenApi {
    // Reuse the same router wiring and only return the generated OpenAPI document.
    let (_router, openapi) = api_router().split_for_parts();
    openapi
}

/// Build the router that also drives the `OpenAPI` document.
///
/// Add new endpoints here via `.routes(routes!(...))` so they are both served
/// and included in the generated `OpenAPI` document.
pub(crate) fn api_router() -> OpenApiRouter {
    // `routes!` reads #[utoipa::path] to bind HTTP method + path and add the route to OpenAPI.
    OpenApiRouter::with_openapi(base_document())
        .routes(routes!(health::health))
        .routes(routes!(endpoints::list_recipes, endpoints::create_recipe))
        .routes(routes!(endpoints::get_recipe))
}

/// Info and tags from Cargo metadata; paths are filled in by the router.
fn base_document() -> OpenApi {
    let info = InfoBuilder::new()
        .title(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .description(Some(env!("CARGO_PKG_DESCRIPTION")))
        .contact(author_contact(env!("CARGO_PKG_AUTHORS")))
        .license(Some(
            LicenseBuilder::new()
                .name(env!("CARGO_PKG_LICENSE"))
                .identifier(Some(env!("CARGO_PKG_LICENSE")))
                .build(),
        ))
        .build();

    let tags = vec![
        TagBuilder::new()
            .name("recipes")
            .description(Some("Recipe catalogue"))
            .build(),
        TagBuilder::new()
            .name("health")
            .description(Some("Service and database status"))
            .build(),
    ];

    OpenApiBuilder::new().info(info).tags(Some(tags)).build()
}

/// Contact for the first Cargo author (`Name <email>`); authors are `:` separated.
fn author_contact(authors: &str) -> Option<Contact> {
    let author = authors.split(':').next()?.trim();
    let (name, email) = match author.split_once('<') {
        Some((name, email)) => (name.trim(), email.trim_end_matches('>').trim()),
        None => (author, ""),
    };

    if name.is_empty() && email.is_empty() {
        return None;
    }

    Some(
        ContactBuilder::new()
            .name((!name.is_empty()).then_some(name))
            .email((!email.is_empty()).then_some(email))
            .build(),
    )
}
