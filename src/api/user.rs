use crate::domain::user::driven_ports::{UserReader, UserWriter};
use crate::domain::user::driving_ports::UserPort;
use crate::external_connections::ExternalConnectivity;
use crate::routing_utils::{GenericErrorResponse, Json, Query};
use crate::{AppState, SharedData, domain, dto};
use axum::Router;
use axum::extract::State;
use axum::response::ErrorResponse;
use axum::routing::{delete, get, post, put};
use std::sync::Arc;
use tracing::info;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(create_user, get_user, get_users, update_user, delete_user),
    components(schemas(dto::user::User, dto::user::UserDetails)),
    tags((name = "Users", description = "Create, read, update and delete users"))
)]
/// Defines the OpenAPI documentation for the user API
pub struct UsersApi;

/// Builds a router for all the user routes
pub fn user_routes() -> Router<Arc<SharedData>> {
    Router::new()
        .route(
            "/create",
            post(
                |State(app_state): AppState, Json(new_user): Json<dto::user::UserDetails>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let user_service = domain::user::UserService {};

                    create_user(new_user, &mut ext_cxn, &user_service, &app_state.user_writer).await
                },
            ),
        )
        .route(
            "/user",
            get(
                |State(app_state): AppState, Query(query): Query<dto::IdQuery>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let user_service = domain::user::UserService {};

                    get_user(query.id, &mut ext_cxn, &user_service, &app_state.user_reader).await
                },
            ),
        )
        .route(
            "/users",
            get(|State(app_state): AppState| async move {
                let mut ext_cxn = app_state.ext_cxn.clone();
                let user_service = domain::user::UserService {};

                get_users(&mut ext_cxn, &user_service, &app_state.user_reader).await
            }),
        )
        .route(
            "/edit",
            put(
                |State(app_state): AppState,
                 Query(query): Query<dto::IdQuery>,
                 Json(update): Json<dto::user::UserDetails>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let user_service = domain::user::UserService {};

                    update_user(
                        query.id,
                        update,
                        &mut ext_cxn,
                        &user_service,
                        &app_state.user_writer,
                    )
                    .await
                },
            ),
        )
        .route(
            "/delete",
            delete(
                |State(app_state): AppState, Query(query): Query<dto::IdQuery>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let user_service = domain::user::UserService {};

                    delete_user(query.id, &mut ext_cxn, &user_service, &app_state.user_writer).await
                },
            ),
        )
}

#[utoipa::path(
    post,
    path = "/create",
    tag = "Users",
    request_body = dto::user::UserDetails,
    responses(
        (status = 200, description = "User was created", body = dto::user::User),
        (status = 400, response = dto::err_resps::BasicError400),
        (status = 500, response = dto::err_resps::BasicError500),
    ),
)]
/// Creates a user, returning it along with its newly assigned ID
async fn create_user(
    new_user: dto::user::UserDetails,
    ext_cxn: &mut impl ExternalConnectivity,
    user_service: &impl UserPort,
    user_writer: &impl UserWriter,
) -> Result<Json<dto::user::User>, ErrorResponse> {
    info!("Creating user");
    let domain_user = domain::user::UserDetails::from(new_user);

    let created = user_service
        .create_user(&domain_user, &mut *ext_cxn, user_writer)
        .await
        .map_err(GenericErrorResponse)?;

    info!(user_id = created.id, "Created user");
    Ok(Json(created.into()))
}

#[utoipa::path(
    get,
    path = "/user",
    tag = "Users",
    params(dto::IdQuery),
    responses(
        (status = 200, description = "The requested user. All fields are zero-valued if no user has the ID.", body = dto::user::User),
        (status = 400, response = dto::err_resps::BasicError400),
        (status = 500, response = dto::err_resps::BasicError500),
    ),
)]
/// Retrieves a single user
async fn get_user(
    user_id: i32,
    ext_cxn: &mut impl ExternalConnectivity,
    user_service: &impl UserPort,
    user_reader: &impl UserReader,
) -> Result<Json<dto::user::User>, ErrorResponse> {
    info!(user_id, "Requested user");

    let user = user_service
        .get_user(user_id, &mut *ext_cxn, user_reader)
        .await
        .map_err(GenericErrorResponse)?
        .unwrap_or_default();

    Ok(Json(user.into()))
}

#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    responses(
        (status = 200, description = "Every user in the system", body = [dto::user::User]),
        (status = 500, response = dto::err_resps::BasicError500),
    ),
)]
/// Retrieves a list of all the users in the system
async fn get_users(
    ext_cxn: &mut impl ExternalConnectivity,
    user_service: &impl UserPort,
    user_reader: &impl UserReader,
) -> Result<Json<Vec<dto::user::User>>, ErrorResponse> {
    info!("Requested users");

    let users = user_service
        .get_users(&mut *ext_cxn, user_reader)
        .await
        .map_err(GenericErrorResponse)?;

    Ok(Json(users.into_iter().map(dto::user::User::from).collect()))
}

#[utoipa::path(
    put,
    path = "/edit",
    tag = "Users",
    params(dto::IdQuery),
    request_body = dto::user::UserDetails,
    responses(
        (status = 200, description = "User was overwritten", body = dto::user::User),
        (status = 400, response = dto::err_resps::BasicError400),
        (status = 500, response = dto::err_resps::BasicError500),
    ),
)]
/// Overwrites every field of a user
async fn update_user(
    user_id: i32,
    update: dto::user::UserDetails,
    ext_cxn: &mut impl ExternalConnectivity,
    user_service: &impl UserPort,
    user_writer: &impl UserWriter,
) -> Result<Json<dto::user::User>, ErrorResponse> {
    info!(user_id, "Updating user");
    let domain_update = domain::user::UserDetails::from(update);

    let updated = user_service
        .update_user(user_id, &domain_update, &mut *ext_cxn, user_writer)
        .await
        .map_err(GenericErrorResponse)?;

    Ok(Json(updated.into()))
}

#[utoipa::path(
    delete,
    path = "/delete",
    tag = "Users",
    params(dto::IdQuery),
    responses(
        (status = 200, description = "User was deleted", body = dto::Empty),
        (status = 400, response = dto::err_resps::BasicError400),
        (status = 500, response = dto::err_resps::BasicError500),
    ),
)]
/// Deletes a user
async fn delete_user(
    user_id: i32,
    ext_cxn: &mut impl ExternalConnectivity,
    user_service: &impl UserPort,
    user_writer: &impl UserWriter,
) -> Result<Json<dto::Empty>, ErrorResponse> {
    info!(user_id, "Deleting user");

    user_service
        .delete_user(user_id, &mut *ext_cxn, user_writer)
        .await
        .map_err(GenericErrorResponse)?;

    Ok(Json(dto::Empty {}))
}
