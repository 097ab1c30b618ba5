use crate::external_connections::ExternalConnectivity;
use crate::routing_utils::{GenericErrorResponse, Json};
use crate::{AppState, SharedData, db};
use axum::Router;
use axum::extract::State;
use axum::response::ErrorResponse;
use axum::routing::get;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Body returned when the service and its database are reachable
#[derive(Serialize)]
pub struct HealthStatus {
    status: String,
}

/// Builds the "/health" route, which reports whether the database is reachable
pub fn health_routes() -> Router<Arc<SharedData>> {
    Router::new().route(
        "/health",
        get(|State(app_state): AppState| async move {
            let mut ext_cxn = app_state.ext_cxn.clone();

            health_check(&mut ext_cxn).await
        }),
    )
}

async fn health_check(
    ext_cxn: &mut impl ExternalConnectivity,
) -> Result<Json<HealthStatus>, ErrorResponse> {
    db::ping(&mut *ext_cxn)
        .await
        .map_err(GenericErrorResponse)?;
    debug!("Database ping succeeded");

    Ok(Json(HealthStatus {
        status: "ok".to_owned(),
    }))
}
