use crate::domain;
use crate::domain::todo::{NewTodoItem, TodoItem, TodoList};
use crate::external_connections::{ConnectionHandle, ExternalConnectivity};
use anyhow::{Context, Error};
use sqlx::{query, query_as};

/// Reads todo lists and their items from a configurable schema
pub struct DbTodoListReader {
    schema: String,
}

impl DbTodoListReader {
    pub fn new(schema: impl Into<String>) -> Self {
        DbTodoListReader {
            schema: schema.into(),
        }
    }
}

#[derive(sqlx::FromRow)]
struct TodoItemRow {
    id: i32,
    value: String,
    completed: bool,
}

impl From<TodoItemRow> for TodoItem {
    fn from(value: TodoItemRow) -> Self {
        TodoItem {
            id: value.id,
            value: value.value,
            completed: value.completed,
        }
    }
}

/// One row of a list joined against its items. Item columns are null for an empty list.
#[derive(sqlx::FromRow)]
struct ListWithItemRow {
    list_id: i32,
    name: String,
    item_id: Option<i32>,
    value: Option<String>,
    completed: Option<bool>,
}

#[derive(sqlx::FromRow)]
struct Exists {
    exists: bool,
}

impl domain::todo::driven_ports::TodoListReader for DbTodoListReader {
    async fn list_exists(
        &self,
        list_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<bool, Error> {
        let mut cxn = ext_cxn.database_cxn().await?;
        let statement = format!(
            "SELECT EXISTS(SELECT 1 FROM {}.todo_lists WHERE id = $1) AS exists",
            self.schema
        );

        let found = query_as::<_, Exists>(&statement)
            .bind(list_id)
            .fetch_one(cxn.borrow_connection())
            .await
            .context("trying to detect a todo list")?;

        Ok(found.exists)
    }

    async fn list_by_id(
        &self,
        list_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<Option<TodoList>, Error> {
        let mut cxn = ext_cxn.database_cxn().await?;
        let statement = format!(
            "SELECT tl.id AS list_id, tl.name, ti.id AS item_id, ti.value, ti.completed \
             FROM {schema}.todo_lists tl \
             LEFT JOIN {schema}.todo_items ti ON ti.list_id = tl.id \
             WHERE tl.id = $1 \
             ORDER BY ti.id",
            schema = self.schema
        );

        let rows = query_as::<_, ListWithItemRow>(&statement)
            .bind(list_id)
            .fetch_all(cxn.borrow_connection())
            .await
            .context("trying to fetch a todo list with its items")?;

        let Some(first_row) = rows.first() else {
            return Ok(None);
        };
        let mut list = TodoList {
            id: first_row.list_id,
            name: first_row.name.clone(),
            items: Vec::with_capacity(rows.len()),
        };

        for row in rows {
            if let (Some(id), Some(value), Some(completed)) = (row.item_id, row.value, row.completed)
            {
                list.items.push(TodoItem {
                    id,
                    value,
                    completed,
                });
            }
        }

        Ok(Some(list))
    }

    async fn item_by_id(
        &self,
        item_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<Option<TodoItem>, Error> {
        let mut cxn = ext_cxn.database_cxn().await?;
        let statement = format!(
            "SELECT id, value, completed FROM {}.todo_items WHERE id = $1",
            self.schema
        );

        let item = query_as::<_, TodoItemRow>(&statement)
            .bind(item_id)
            .fetch_optional(cxn.borrow_connection())
            .await
            .context("trying to fetch a todo item by ID")?;

        Ok(item.map(TodoItem::from))
    }
}

/// Writes todo lists and their items to a configurable schema
pub struct DbTodoListWriter {
    schema: String,
}

impl DbTodoListWriter {
    pub fn new(schema: impl Into<String>) -> Self {
        DbTodoListWriter {
            schema: schema.into(),
        }
    }
}

impl domain::todo::driven_ports::TodoListWriter for DbTodoListWriter {
    async fn create_list(
        &self,
        name: &str,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<i32, Error> {
        let mut cxn = ext_cxn.database_cxn().await?;
        let statement = format!(
            "INSERT INTO {}.todo_lists(name) VALUES ($1) RETURNING id",
            self.schema
        );

        let new_id = query_as::<_, super::NewId>(&statement)
            .bind(name)
            .fetch_one(cxn.borrow_connection())
            .await
            .context("trying to insert a new todo list")?;

        Ok(new_id.id)
    }

    async fn rename_list(
        &self,
        list_id: i32,
        name: &str,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<(), Error> {
        let mut cxn = ext_cxn.database_cxn().await?;
        let statement = format!(
            "UPDATE {}.todo_lists SET name = $1 WHERE id = $2",
            self.schema
        );

        query(&statement)
            .bind(name)
            .bind(list_id)
            .execute(cxn.borrow_connection())
            .await
            .context("trying to rename a todo list")?;

        Ok(())
    }

    async fn delete_list(
        &self,
        list_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<(), Error> {
        let mut cxn = ext_cxn.database_cxn().await?;
        let statement = format!("DELETE FROM {}.todo_lists WHERE id = $1", self.schema);

        query(&statement)
            .bind(list_id)
            .execute(cxn.borrow_connection())
            .await
            .context("trying to remove a todo list")?;

        Ok(())
    }

    async fn create_item(
        &self,
        list_id: i32,
        item: &NewTodoItem,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<i32, Error> {
        let mut cxn = ext_cxn.database_cxn().await?;
        let statement = format!(
            "INSERT INTO {}.todo_items(value, list_id, completed) VALUES ($1, $2, $3) RETURNING id",
            self.schema
        );

        let new_id = query_as::<_, super::NewId>(&statement)
            .bind(&item.value)
            .bind(list_id)
            .bind(item.completed)
            .fetch_one(cxn.borrow_connection())
            .await
            .context("trying to insert a new todo item")?;

        Ok(new_id.id)
    }

    async fn update_item(
        &self,
        item: &TodoItem,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<(), Error> {
        let mut cxn = ext_cxn.database_cxn().await?;
        let statement = format!(
            "UPDATE {}.todo_items SET value = $1, completed = $2 WHERE id = $3",
            self.schema
        );

        query(&statement)
            .bind(&item.value)
            .bind(item.completed)
            .bind(item.id)
            .execute(cxn.borrow_connection())
            .await
            .context("trying to update a todo item")?;

        Ok(())
    }

    async fn delete_item(
        &self,
        item_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<(), Error> {
        let mut cxn = ext_cxn.database_cxn().await?;
        let statement = format!("DELETE FROM {}.todo_items WHERE id = $1", self.schema);

        query(&statement)
            .bind(item_id)
            .execute(cxn.borrow_connection())
            .await
            .context("trying to remove a todo item")?;

        Ok(())
    }

    async fn delete_items_in_list(
        &self,
        list_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<(), Error> {
        let mut cxn = ext_cxn.database_cxn().await?;
        let statement = format!("DELETE FROM {}.todo_items WHERE list_id = $1", self.schema);

        query(&statement)
            .bind(list_id)
            .execute(cxn.borrow_connection())
            .await
            .context("trying to remove the items of a todo list")?;

        Ok(())
    }
}
