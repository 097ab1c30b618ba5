use crate::persistence::db_todo_driven_ports::{DbTodoListReader, DbTodoListWriter};
use crate::persistence::db_user_driven_ports::{DbUserReader, DbUserWriter};
use axum::extract::State;
use sqlx::PgPool;
use std::sync::Arc;

pub mod api;
pub mod app_env;
pub mod db;
pub mod domain;
pub mod dto;
pub mod external_connections;
pub mod logging;
pub mod persistence;
pub mod routes;
pub mod routing_utils;

/// Everything a request handler needs, shared across every request
pub struct SharedData {
    pub ext_cxn: persistence::ExternalConnectivity,
    pub user_reader: DbUserReader,
    pub user_writer: DbUserWriter,
    pub todo_reader: DbTodoListReader,
    pub todo_writer: DbTodoListWriter,
}

impl SharedData {
    /// Wires the driven adapters to the given pool, reading users from `user_schema` and todo
    /// lists from `todo_schema`
    pub fn new(db: PgPool, user_schema: &str, todo_schema: &str) -> Self {
        SharedData {
            ext_cxn: persistence::ExternalConnectivity::new(db),
            user_reader: DbUserReader::new(user_schema),
            user_writer: DbUserWriter::new(user_schema),
            todo_reader: DbTodoListReader::new(todo_schema),
            todo_writer: DbTodoListWriter::new(todo_schema),
        }
    }
}

pub type AppState = State<Arc<SharedData>>;
