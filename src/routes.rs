use crate::api::auth::require_basic_auth;
use crate::app_env::AppConfig;
use crate::routing_utils::{describe_timeout, method_not_allowed, not_found};
use crate::{SharedData, api, logging};
use axum::Router;
use axum::http::StatusCode;
use axum::middleware::{from_fn_with_state, map_response};
use std::sync::Arc;
use std::time::Duration;
use tower_http::timeout::TimeoutLayer;

/// Assembles the complete application router. The todo list routes always require Basic
/// credentials; the user routes only do when [AppConfig::protect_user_routes] is set.
pub fn build_router(app_state: Arc<SharedData>, config: &AppConfig) -> Router {
    let auth_layer = from_fn_with_state(Arc::new(config.credentials.clone()), require_basic_auth);

    let mut user_routes = api::user::user_routes();
    if config.protect_user_routes {
        user_routes = user_routes.route_layer(auth_layer.clone());
    }
    let todo_routes = api::todo::todo_routes().route_layer(auth_layer);

    let router = Router::new()
        .merge(user_routes)
        .merge(todo_routes)
        .merge(api::health::health_routes())
        .merge(api::docs::docs_routes());
    let router = apply_request_policies(router, config.request_timeout).with_state(app_state);

    logging::attach_tracing_http(router)
}

/// Answers unmatched paths and unsupported methods with JSON error bodies, and cancels any
/// request still running after `request_timeout`. Must be applied after every route is added.
fn apply_request_policies<S>(router: Router<S>, request_timeout: Duration) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .method_not_allowed_fallback(method_not_allowed)
        .fallback(not_found)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(map_response(describe_timeout))
}
