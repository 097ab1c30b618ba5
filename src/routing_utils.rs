use crate::domain::todo::driving_ports::TodoListError;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum_macros::{FromRequest, FromRequestParts};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use utoipa::ToSchema;

/// Contains diagnostic information about an API failure
#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct BasicErrorResponse {
    #[schema(example = "internal_error")]
    pub error_code: String,
    #[schema(example = "An unexpected error occurred.")]
    pub error_description: String,
    pub extra_info: Option<String>,
}

impl BasicErrorResponse {
    fn new(error_code: &str, error_description: &str, extra_info: Option<String>) -> Self {
        BasicErrorResponse {
            error_code: error_code.to_owned(),
            error_description: error_description.to_owned(),
            extra_info,
        }
    }
}

/// Wrapper for [axum::Json] which customizes the error response to use our
/// data structure for API errors
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(JsonErrorResponse))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

/// Response type representing JSON parse errors
pub struct JsonErrorResponse {
    parse_problem: String,
}

impl From<JsonRejection> for JsonErrorResponse {
    fn from(value: JsonRejection) -> Self {
        JsonErrorResponse {
            parse_problem: value.body_text(),
        }
    }
}

impl IntoResponse for JsonErrorResponse {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            axum::Json(BasicErrorResponse::new(
                "invalid_json",
                "The passed request body contained malformed or unreadable JSON.",
                Some(self.parse_problem),
            )),
        )
            .into_response()
    }
}

/// Wrapper for [axum::extract::Query] which reports a missing or unparseable query string
/// with our data structure for API errors
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(QueryErrorResponse))]
pub struct Query<T>(pub T);

/// Response type representing query string parse errors
pub struct QueryErrorResponse {
    parse_problem: String,
}

impl From<QueryRejection> for QueryErrorResponse {
    fn from(value: QueryRejection) -> Self {
        QueryErrorResponse {
            parse_problem: value.body_text(),
        }
    }
}

impl IntoResponse for QueryErrorResponse {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            axum::Json(BasicErrorResponse::new(
                "invalid_query",
                "The query string was missing a value or could not be parsed.",
                Some(self.parse_problem),
            )),
        )
            .into_response()
    }
}

/// Response type for errors nobody can do anything about but the server operator.
/// The error is logged and the client receives a generic 500.
pub struct GenericErrorResponse(pub anyhow::Error);

impl IntoResponse for GenericErrorResponse {
    fn into_response(self) -> Response {
        error!("Request failed: {:#}", self.0);

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            axum::Json(BasicErrorResponse::new(
                "internal_error",
                "An unexpected error occurred.",
                None,
            )),
        )
            .into_response()
    }
}

/// Translates todo list failures into responses. Missing lists and items are reported as
/// failed preconditions.
pub struct TodoListErrorResponse(pub TodoListError);

impl IntoResponse for TodoListErrorResponse {
    fn into_response(self) -> Response {
        match self.0 {
            TodoListError::ListNotFound => (
                StatusCode::PRECONDITION_FAILED,
                axum::Json(BasicErrorResponse::new(
                    "list_not_found",
                    "The requested todo list does not exist.",
                    None,
                )),
            )
                .into_response(),
            TodoListError::ItemNotFound => (
                StatusCode::PRECONDITION_FAILED,
                axum::Json(BasicErrorResponse::new(
                    "item_not_found",
                    "The requested todo item does not exist.",
                    None,
                )),
            )
                .into_response(),
            TodoListError::PortError(err) => GenericErrorResponse(err).into_response(),
        }
    }
}

impl From<TodoListError> for TodoListErrorResponse {
    fn from(value: TodoListError) -> Self {
        Self(value)
    }
}

/// Response sent when a request lacks valid Basic credentials
pub struct UnauthorizedResponse;

impl IntoResponse for UnauthorizedResponse {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            [(header::WWW_AUTHENTICATE, r#"Basic realm="Restricted""#)],
            axum::Json(BasicErrorResponse::new(
                "unauthorized",
                "Valid credentials are required to access this resource.",
                None,
            )),
        )
            .into_response()
    }
}

/// Fallback for paths no route matches
pub async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        axum::Json(BasicErrorResponse::new(
            "not_found",
            "No resource exists at the requested path.",
            None,
        )),
    )
        .into_response()
}

/// Fallback for known paths requested with a method they don't support
pub async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        axum::Json(BasicErrorResponse::new(
            "method_not_allowed",
            "The requested path does not support this HTTP method.",
            None,
        )),
    )
        .into_response()
}

/// Gives the bodiless 408 produced when a request runs past its deadline our JSON error body.
/// Every other response passes through untouched.
pub async fn describe_timeout(response: Response) -> Response {
    if response.status() != StatusCode::REQUEST_TIMEOUT {
        return response;
    }

    warn!("Request exceeded its deadline and was abandoned");
    (
        StatusCode::REQUEST_TIMEOUT,
        axum::Json(BasicErrorResponse::new(
            "request_timeout",
            "The request took too long to process and was cancelled.",
            None,
        )),
    )
        .into_response()
}
