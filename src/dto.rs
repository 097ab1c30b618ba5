use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, OpenApi, ToSchema};

pub mod todo;
pub mod user;

/// Collects schemas and reusable error responses which API paths refer to by name
#[derive(OpenApi)]
#[openapi(components(
    schemas(Empty, crate::routing_utils::BasicErrorResponse),
    responses(
        err_resps::BasicError400,
        err_resps::BasicError401,
        err_resps::BasicError412,
        err_resps::BasicError500
    )
))]
pub struct OpenApiSchemas;

/// Query string carrying the identifier of the entity a request acts on, as in `?id=4`
#[derive(Deserialize, IntoParams)]
#[cfg_attr(test, derive(Serialize, Debug))]
#[into_params(parameter_in = Query)]
pub struct IdQuery {
    /// Identifier of the entity
    #[param(example = 4)]
    pub id: i32,
}

/// An empty JSON object, returned by operations with nothing to report
#[derive(Serialize, ToSchema)]
#[cfg_attr(test, derive(Deserialize, Debug, PartialEq, Eq))]
pub struct Empty {}

/// Documented error responses which API paths can reference
pub mod err_resps {
    use crate::routing_utils::BasicErrorResponse;
    use utoipa::ToResponse;

    /// Malformed request body or query string
    #[derive(ToResponse)]
    #[response(
        description = "The request body or query string could not be parsed",
        content_type = "application/json",
        example = json!({
            "error_code": "invalid_json",
            "error_description": "The passed request body contained malformed or unreadable JSON.",
            "extra_info": "Failed to parse the request body as JSON: EOF while parsing an object at line 4 column 0"
        })
    )]
    pub struct BasicError400(pub BasicErrorResponse);

    /// Missing or incorrect Basic credentials
    #[derive(ToResponse)]
    #[response(
        description = "Valid Basic credentials are required",
        content_type = "application/json",
        example = json!({
            "error_code": "unauthorized",
            "error_description": "Valid credentials are required to access this resource.",
            "extra_info": null
        })
    )]
    pub struct BasicError401(pub BasicErrorResponse);

    /// The list or item a request referenced does not exist
    #[derive(ToResponse)]
    #[response(
        description = "The referenced list or item does not exist",
        content_type = "application/json",
        example = json!({
            "error_code": "list_not_found",
            "error_description": "The requested todo list does not exist.",
            "extra_info": null
        })
    )]
    pub struct BasicError412(pub BasicErrorResponse);

    /// Storage failure
    #[derive(ToResponse)]
    #[response(
        description = "Something unexpected went wrong inside the server",
        content_type = "application/json",
        example = json!({
            "error_code": "internal_error",
            "error_description": "An unexpected error occurred.",
            "extra_info": null
        })
    )]
    pub struct BasicError500(pub BasicErrorResponse);
}
