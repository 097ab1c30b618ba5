use crate::domain;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// DTO for a single entry on a todo list. Also used as the request body when overwriting an item.
#[derive(Serialize, Deserialize, ToSchema)]
#[cfg_attr(test, derive(PartialEq, Eq, Debug, Clone))]
pub struct TodoItem {
    #[schema(example = 3)]
    pub id: i32,
    #[schema(example = "Buy milk")]
    pub value: String,
    #[serde(default)]
    #[schema(example = false)]
    pub completed: bool,
}

impl From<domain::todo::TodoItem> for TodoItem {
    fn from(value: domain::todo::TodoItem) -> Self {
        TodoItem {
            id: value.id,
            value: value.value,
            completed: value.completed,
        }
    }
}

impl From<TodoItem> for domain::todo::TodoItem {
    fn from(value: TodoItem) -> Self {
        domain::todo::TodoItem {
            id: value.id,
            value: value.value,
            completed: value.completed,
        }
    }
}

/// DTO for a todo list along with every item on it
#[derive(Serialize, ToSchema)]
#[cfg_attr(test, derive(Deserialize, PartialEq, Eq, Debug))]
pub struct TodoList {
    #[schema(example = 1)]
    pub id: i32,
    pub items: Vec<TodoItem>,
    #[schema(example = "Groceries")]
    pub name: String,
}

impl From<domain::todo::TodoList> for TodoList {
    fn from(value: domain::todo::TodoList) -> Self {
        TodoList {
            id: value.id,
            items: value.items.into_iter().map(TodoItem::from).collect(),
            name: value.name,
        }
    }
}

/// DTO for an item being created. Any `id` in the body is ignored.
#[derive(Deserialize, ToSchema)]
#[cfg_attr(test, derive(Serialize, Debug))]
pub struct NewTodoItem {
    #[schema(example = "Buy milk")]
    pub value: String,
    #[serde(default)]
    #[schema(example = false)]
    pub completed: bool,
}

impl From<NewTodoItem> for domain::todo::NewTodoItem {
    fn from(value: NewTodoItem) -> Self {
        domain::todo::NewTodoItem {
            value: value.value,
            completed: value.completed,
        }
    }
}

/// DTO for a list being created along with its initial items
#[derive(Deserialize, ToSchema)]
#[cfg_attr(test, derive(Serialize, Debug))]
pub struct NewTodoList {
    #[schema(example = "Groceries")]
    pub name: String,
    #[serde(default)]
    pub items: Vec<NewTodoItem>,
}

impl From<NewTodoList> for domain::todo::NewTodoList {
    fn from(value: NewTodoList) -> Self {
        domain::todo::NewTodoList {
            name: value.name,
            items: value
                .items
                .into_iter()
                .map(domain::todo::NewTodoItem::from)
                .collect(),
        }
    }
}

/// DTO for renaming a list
#[derive(Deserialize, ToSchema)]
#[cfg_attr(test, derive(Serialize, Debug))]
pub struct RenameTodoList {
    #[schema(example = "Weekend groceries")]
    pub name: String,
}

/// DTO for adding an item to an existing list
#[derive(Deserialize, ToSchema)]
#[cfg_attr(test, derive(Serialize, Debug))]
pub struct AddItemRequest {
    #[schema(example = 1)]
    pub list_id: i32,
    pub item: NewTodoItem,
}
