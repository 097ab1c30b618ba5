use crate::dto;
use axum::Json;
use axum::Router;
use axum::routing::get;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Users and Todo Lists API",
        description = "CRUD services for users and for todo lists with their items"
    ),
    modifiers(&BasicAuthScheme)
)]
struct TodoRestApi;

/// Registers the "basic_auth" security scheme referenced by the protected paths
struct BasicAuthScheme;

impl Modify for BasicAuthScheme {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "basic_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Basic)),
        );
    }
}

/// Assembles the OpenAPI document from the definitions spread across the app, such as the
/// [dto] package and submodules of [api][crate::api]
pub fn build_documentation() -> utoipa::openapi::OpenApi {
    let mut api_docs = TodoRestApi::openapi();
    api_docs.merge(dto::OpenApiSchemas::openapi());
    api_docs.merge(super::user::UsersApi::openapi());
    api_docs.merge(super::todo::TodoListApi::openapi());

    api_docs
}

/// Serves the OpenAPI document as JSON at "/api-docs/openapi.json"
pub fn docs_routes<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let api_docs = build_documentation();
    Router::new().route(
        "/api-docs/openapi.json",
        get(move || {
            let api_docs = api_docs.clone();
            async move { Json(api_docs) }
        }),
    )
}
