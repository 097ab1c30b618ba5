use std::time::Duration;

use anyhow::Context;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use crate::external_connections::{ConnectionHandle, ExternalConnectivity};

/// Builds the connection pool shared by every request handler. Once all `max_connections` are
/// checked out, callers wait up to `acquire_timeout` for one to be returned.
pub async fn connect_sqlx(
    db_url: &str,
    max_connections: u32,
    acquire_timeout: Duration,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(acquire_timeout)
        .connect(db_url)
        .await
}

/// Creates the user and todo list schemas and tables if they don't exist yet.
/// Schema names must already be validated as plain identifiers.
pub async fn ensure_schema(pool: &PgPool, user_schema: &str, todo_schema: &str) -> anyhow::Result<()> {
    let statements = [
        format!("CREATE SCHEMA IF NOT EXISTS {user_schema}"),
        format!(
            "CREATE TABLE IF NOT EXISTS {user_schema}.users (
                id SERIAL PRIMARY KEY,
                fname TEXT NOT NULL,
                lname TEXT NOT NULL,
                dob TEXT NOT NULL,
                email TEXT NOT NULL,
                phone_no BIGINT NOT NULL
            )"
        ),
        format!("CREATE SCHEMA IF NOT EXISTS {todo_schema}"),
        format!(
            "CREATE TABLE IF NOT EXISTS {todo_schema}.todo_lists (
                id SERIAL PRIMARY KEY,
                name TEXT NOT NULL
            )"
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS {todo_schema}.todo_items (
                id SERIAL PRIMARY KEY,
                value TEXT NOT NULL,
                list_id INTEGER NOT NULL REFERENCES {todo_schema}.todo_lists(id) ON DELETE CASCADE,
                completed BOOLEAN NOT NULL DEFAULT FALSE
            )"
        ),
    ];

    let mut txn = pool.begin().await.context("starting schema setup")?;
    for statement in &statements {
        sqlx::query(statement)
            .execute(&mut *txn)
            .await
            .with_context(|| format!("running schema setup statement: {statement}"))?;
    }
    txn.commit().await.context("committing schema setup")?;

    info!(user_schema, todo_schema, "database schema is ready");
    Ok(())
}

/// Verifies the database answers queries
pub async fn ping(ext_cxn: &mut impl ExternalConnectivity) -> anyhow::Result<()> {
    let mut cxn = ext_cxn.database_cxn().await?;

    sqlx::query("SELECT 1")
        .execute(cxn.borrow_connection())
        .await
        .context("pinging the database")?;

    Ok(())
}
