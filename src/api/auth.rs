use crate::app_env::BasicAuthCredentials;
use crate::routing_utils::UnauthorizedResponse;
use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::sync::Arc;
use subtle::ConstantTimeEq;
use tracing::warn;

/// Middleware which only lets requests through if they carry the configured Basic credentials.
/// Attach it with [axum::middleware::from_fn_with_state].
pub async fn require_basic_auth(
    State(credentials): State<Arc<BasicAuthCredentials>>,
    request: Request,
    next: Next,
) -> Response {
    if credentials_match(request.headers(), &credentials) {
        next.run(request).await
    } else {
        warn!(
            method = request.method().as_str(),
            path = request.uri().path(),
            "Rejected request without valid credentials"
        );
        UnauthorizedResponse.into_response()
    }
}

/// Checks the Authorization header against the expected credentials. Both halves of the
/// credential are always compared so timing doesn't reveal which one was wrong.
fn credentials_match(headers: &HeaderMap, expected: &BasicAuthCredentials) -> bool {
    let Some(header_value) = headers.get(AUTHORIZATION).and_then(|value| value.to_str().ok())
    else {
        return false;
    };
    let Some((scheme, encoded)) = header_value.trim().split_once(' ') else {
        return false;
    };
    if !scheme.eq_ignore_ascii_case("basic") {
        return false;
    }

    let Ok(decoded) = STANDARD.decode(encoded.trim()) else {
        return false;
    };
    let Ok(decoded) = String::from_utf8(decoded) else {
        return false;
    };
    let Some((username, password)) = decoded.split_once(':') else {
        return false;
    };

    let username_matches = username.as_bytes().ct_eq(expected.username.as_bytes());
    let password_matches = password.as_bytes().ct_eq(expected.password.as_bytes());
    (username_matches & password_matches).into()
}
