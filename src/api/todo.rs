use crate::domain::todo::driven_ports::{TodoListReader, TodoListWriter};
use crate::domain::todo::driving_ports::TodoListPort;
use crate::external_connections::{ExternalConnectivity, TransactableExternalConnectivity};
use crate::routing_utils::{Json, Query, TodoListErrorResponse};
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
    paths(
        add_todo_list,
        delete_todo_list,
        rename_todo_list,
        add_todo_item,
        delete_todo_item,
        get_todo_item,
        update_todo_item,
        get_todo_list
    ),
    components(schemas(
        dto::todo::TodoItem,
        dto::todo::TodoList,
        dto::todo::NewTodoItem,
        dto::todo::NewTodoList,
        dto::todo::RenameTodoList,
        dto::todo::AddItemRequest
    )),
    tags((name = "Todo lists", description = "Manage todo lists and their items. Requires Basic credentials."))
)]
/// Defines the OpenAPI documentation for the todo list API
pub struct TodoListApi;

/// Builds a router for the todo list and todo item routes
pub fn todo_routes() -> Router<Arc<SharedData>> {
    Router::new()
        .route(
            "/todolist",
            post(
                |State(app_state): AppState, Json(new_list): Json<dto::todo::NewTodoList>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let todo_service = domain::todo::TodoListService {};

                    add_todo_list(new_list, &mut ext_cxn, &todo_service, &app_state.todo_writer)
                        .await
                },
            )
            .delete(
                |State(app_state): AppState, Query(query): Query<dto::IdQuery>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let todo_service = domain::todo::TodoListService {};

                    delete_todo_list(
                        query.id,
                        &mut ext_cxn,
                        &todo_service,
                        &app_state.todo_reader,
                        &app_state.todo_writer,
                    )
                    .await
                },
            )
            .patch(
                |State(app_state): AppState,
                 Query(query): Query<dto::IdQuery>,
                 Json(rename): Json<dto::todo::RenameTodoList>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let todo_service = domain::todo::TodoListService {};

                    rename_todo_list(
                        query.id,
                        rename,
                        &mut ext_cxn,
                        &todo_service,
                        &app_state.todo_reader,
                        &app_state.todo_writer,
                    )
                    .await
                },
            ),
        )
        .route(
            "/todolist/addItem",
            post(
                |State(app_state): AppState, Json(request): Json<dto::todo::AddItemRequest>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let todo_service = domain::todo::TodoListService {};

                    add_todo_item(
                        request,
                        &mut ext_cxn,
                        &todo_service,
                        &app_state.todo_reader,
                        &app_state.todo_writer,
                    )
                    .await
                },
            ),
        )
        .route(
            "/todolist/deleteItem",
            delete(
                |State(app_state): AppState, Query(query): Query<dto::IdQuery>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let todo_service = domain::todo::TodoListService {};

                    delete_todo_item(query.id, &mut ext_cxn, &todo_service, &app_state.todo_writer)
                        .await
                },
            ),
        )
        .route(
            "/todolist/getItem",
            get(
                |State(app_state): AppState, Query(query): Query<dto::IdQuery>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let todo_service = domain::todo::TodoListService {};

                    get_todo_item(query.id, &mut ext_cxn, &todo_service, &app_state.todo_reader)
                        .await
                },
            ),
        )
        .route(
            "/todolist/updateItem",
            put(
                |State(app_state): AppState, Json(item): Json<dto::todo::TodoItem>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let todo_service = domain::todo::TodoListService {};

                    update_todo_item(item, &mut ext_cxn, &todo_service, &app_state.todo_writer)
                        .await
                },
            ),
        )
        .route(
            "/todolist/getList",
            get(
                |State(app_state): AppState, Query(query): Query<dto::IdQuery>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let todo_service = domain::todo::TodoListService {};

                    get_todo_list(query.id, &mut ext_cxn, &todo_service, &app_state.todo_reader)
                        .await
                },
            ),
        )
}

#[utoipa::path(
    post,
    path = "/todolist",
    tag = "Todo lists",
    request_body = dto::todo::NewTodoList,
    responses(
        (status = 200, description = "List and all of its items were created", body = dto::todo::TodoList),
        (status = 400, response = dto::err_resps::BasicError400),
        (status = 401, response = dto::err_resps::BasicError401),
        (status = 500, response = dto::err_resps::BasicError500),
    ),
    security(("basic_auth" = [])),
)]
/// Creates a list along with its items. Nothing is stored unless every item is.
async fn add_todo_list(
    new_list: dto::todo::NewTodoList,
    ext_cxn: &mut impl TransactableExternalConnectivity,
    todo_service: &impl TodoListPort,
    list_write: &impl TodoListWriter,
) -> Result<Json<dto::todo::TodoList>, ErrorResponse> {
    info!(item_count = new_list.items.len(), "Creating todo list");
    let domain_list = domain::todo::NewTodoList::from(new_list);

    let created = todo_service
        .add_todo_list(&domain_list, &mut *ext_cxn, list_write)
        .await
        .map_err(TodoListErrorResponse)?;

    info!(list_id = created.id, "Created todo list");
    Ok(Json(created.into()))
}

#[utoipa::path(
    delete,
    path = "/todolist",
    tag = "Todo lists",
    params(dto::IdQuery),
    responses(
        (status = 200, description = "List and its items were deleted", body = dto::Empty),
        (status = 400, response = dto::err_resps::BasicError400),
        (status = 401, response = dto::err_resps::BasicError401),
        (status = 412, response = dto::err_resps::BasicError412),
        (status = 500, response = dto::err_resps::BasicError500),
    ),
    security(("basic_auth" = [])),
)]
/// Deletes a list and every item on it
async fn delete_todo_list(
    list_id: i32,
    ext_cxn: &mut impl TransactableExternalConnectivity,
    todo_service: &impl TodoListPort,
    list_read: &impl TodoListReader,
    list_write: &impl TodoListWriter,
) -> Result<Json<dto::Empty>, ErrorResponse> {
    info!(list_id, "Deleting todo list");

    todo_service
        .delete_todo_list(list_id, &mut *ext_cxn, list_read, list_write)
        .await
        .map_err(TodoListErrorResponse)?;

    Ok(Json(dto::Empty {}))
}

#[utoipa::path(
    patch,
    path = "/todolist",
    tag = "Todo lists",
    params(dto::IdQuery),
    request_body = dto::todo::RenameTodoList,
    responses(
        (status = 200, description = "List was renamed", body = dto::Empty),
        (status = 400, response = dto::err_resps::BasicError400),
        (status = 401, response = dto::err_resps::BasicError401),
        (status = 412, response = dto::err_resps::BasicError412),
        (status = 500, response = dto::err_resps::BasicError500),
    ),
    security(("basic_auth" = [])),
)]
/// Changes the name of a list
async fn rename_todo_list(
    list_id: i32,
    rename: dto::todo::RenameTodoList,
    ext_cxn: &mut impl ExternalConnectivity,
    todo_service: &impl TodoListPort,
    list_read: &impl TodoListReader,
    list_write: &impl TodoListWriter,
) -> Result<Json<dto::Empty>, ErrorResponse> {
    info!(list_id, "Renaming todo list");

    todo_service
        .edit_todo_list_name(list_id, &rename.name, &mut *ext_cxn, list_read, list_write)
        .await
        .map_err(TodoListErrorResponse)?;

    Ok(Json(dto::Empty {}))
}

#[utoipa::path(
    post,
    path = "/todolist/addItem",
    tag = "Todo lists",
    request_body = dto::todo::AddItemRequest,
    responses(
        (status = 200, description = "Item was added to the list", body = dto::todo::TodoItem),
        (status = 400, response = dto::err_resps::BasicError400),
        (status = 401, response = dto::err_resps::BasicError401),
        (status = 412, response = dto::err_resps::BasicError412),
        (status = 500, response = dto::err_resps::BasicError500),
    ),
    security(("basic_auth" = [])),
)]
/// Adds an item to an existing list
async fn add_todo_item(
    request: dto::todo::AddItemRequest,
    ext_cxn: &mut impl ExternalConnectivity,
    todo_service: &impl TodoListPort,
    list_read: &impl TodoListReader,
    list_write: &impl TodoListWriter,
) -> Result<Json<dto::todo::TodoItem>, ErrorResponse> {
    info!(list_id = request.list_id, "Adding item to todo list");
    let new_item = domain::todo::NewTodoItem::from(request.item);

    let created = todo_service
        .add_todo_item(request.list_id, &new_item, &mut *ext_cxn, list_read, list_write)
        .await
        .map_err(TodoListErrorResponse)?;

    Ok(Json(created.into()))
}

#[utoipa::path(
    delete,
    path = "/todolist/deleteItem",
    tag = "Todo lists",
    params(dto::IdQuery),
    responses(
        (status = 200, description = "Item was deleted, or never existed", body = dto::Empty),
        (status = 400, response = dto::err_resps::BasicError400),
        (status = 401, response = dto::err_resps::BasicError401),
        (status = 500, response = dto::err_resps::BasicError500),
    ),
    security(("basic_auth" = [])),
)]
/// Removes a single item
async fn delete_todo_item(
    item_id: i32,
    ext_cxn: &mut impl ExternalConnectivity,
    todo_service: &impl TodoListPort,
    list_write: &impl TodoListWriter,
) -> Result<Json<dto::Empty>, ErrorResponse> {
    info!(item_id, "Deleting todo item");

    todo_service
        .delete_todo_item(item_id, &mut *ext_cxn, list_write)
        .await
        .map_err(TodoListErrorResponse)?;

    Ok(Json(dto::Empty {}))
}

#[utoipa::path(
    get,
    path = "/todolist/getItem",
    tag = "Todo lists",
    params(dto::IdQuery),
    responses(
        (status = 200, description = "The requested item", body = dto::todo::TodoItem),
        (status = 400, response = dto::err_resps::BasicError400),
        (status = 401, response = dto::err_resps::BasicError401),
        (status = 412, response = dto::err_resps::BasicError412),
        (status = 500, response = dto::err_resps::BasicError500),
    ),
    security(("basic_auth" = [])),
)]
/// Retrieves a single item
async fn get_todo_item(
    item_id: i32,
    ext_cxn: &mut impl ExternalConnectivity,
    todo_service: &impl TodoListPort,
    list_read: &impl TodoListReader,
) -> Result<Json<dto::todo::TodoItem>, ErrorResponse> {
    info!(item_id, "Requested todo item");

    let item = todo_service
        .get_todo_item(item_id, &mut *ext_cxn, list_read)
        .await
        .map_err(TodoListErrorResponse)?;

    Ok(Json(item.into()))
}

#[utoipa::path(
    put,
    path = "/todolist/updateItem",
    tag = "Todo lists",
    request_body = dto::todo::TodoItem,
    responses(
        (status = 200, description = "Item was overwritten, or never existed", body = dto::Empty),
        (status = 400, response = dto::err_resps::BasicError400),
        (status = 401, response = dto::err_resps::BasicError401),
        (status = 500, response = dto::err_resps::BasicError500),
    ),
    security(("basic_auth" = [])),
)]
/// Overwrites the value and completion state of an item
async fn update_todo_item(
    item: dto::todo::TodoItem,
    ext_cxn: &mut impl ExternalConnectivity,
    todo_service: &impl TodoListPort,
    list_write: &impl TodoListWriter,
) -> Result<Json<dto::Empty>, ErrorResponse> {
    info!(item_id = item.id, "Updating todo item");
    let domain_item = domain::todo::TodoItem::from(item);

    todo_service
        .update_todo_item(&domain_item, &mut *ext_cxn, list_write)
        .await
        .map_err(TodoListErrorResponse)?;

    Ok(Json(dto::Empty {}))
}

#[utoipa::path(
    get,
    path = "/todolist/getList",
    tag = "Todo lists",
    params(dto::IdQuery),
    responses(
        (status = 200, description = "The requested list and every item on it", body = dto::todo::TodoList),
        (status = 400, response = dto::err_resps::BasicError400),
        (status = 401, response = dto::err_resps::BasicError401),
        (status = 412, response = dto::err_resps::BasicError412),
        (status = 500, response = dto::err_resps::BasicError500),
    ),
    security(("basic_auth" = [])),
)]
/// Retrieves a list along with its items
async fn get_todo_list(
    list_id: i32,
    ext_cxn: &mut impl ExternalConnectivity,
    todo_service: &impl TodoListPort,
    list_read: &impl TodoListReader,
) -> Result<Json<dto::todo::TodoList>, ErrorResponse> {
    info!(list_id, "Requested todo list");

    let list = todo_service
        .get_todo_list(list_id, &mut *ext_cxn, list_read)
        .await
        .map_err(TodoListErrorResponse)?;

    Ok(Json(list.into()))
}
