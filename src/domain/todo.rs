use crate::domain::todo::driven_ports::{TodoListReader, TodoListWriter};
use crate::domain::todo::driving_ports::TodoListError;
use crate::external_connections::{
    ExternalConnectivity, TransactableExternalConnectivity, TransactionHandle,
};
use anyhow::Context;
use tracing::info;

#[derive(PartialEq, Eq, Debug, Clone)]
pub struct TodoItem {
    pub id: i32,
    pub value: String,
    pub completed: bool,
}

#[derive(PartialEq, Eq, Debug, Clone)]
pub struct TodoList {
    pub id: i32,
    pub name: String,
    pub items: Vec<TodoItem>,
}

#[derive(PartialEq, Eq, Debug, Clone)]
pub struct NewTodoItem {
    pub value: String,
    pub completed: bool,
}

#[derive(PartialEq, Eq, Debug, Clone)]
pub struct NewTodoList {
    pub name: String,
    pub items: Vec<NewTodoItem>,
}

pub mod driven_ports {
    use super::*;

    pub trait TodoListReader: Sync {
        async fn list_exists(
            &self,
            list_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<bool, anyhow::Error>;
        /// Fetches a list along with all of its items
        async fn list_by_id(
            &self,
            list_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Option<TodoList>, anyhow::Error>;
        async fn item_by_id(
            &self,
            item_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Option<TodoItem>, anyhow::Error>;
    }

    pub trait TodoListWriter: Sync {
        async fn create_list(
            &self,
            name: &str,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<i32, anyhow::Error>;
        async fn rename_list(
            &self,
            list_id: i32,
            name: &str,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<(), anyhow::Error>;
        async fn delete_list(
            &self,
            list_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<(), anyhow::Error>;
        async fn create_item(
            &self,
            list_id: i32,
            item: &NewTodoItem,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<i32, anyhow::Error>;
        async fn update_item(
            &self,
            item: &TodoItem,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<(), anyhow::Error>;
        async fn delete_item(
            &self,
            item_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<(), anyhow::Error>;
        async fn delete_items_in_list(
            &self,
            list_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<(), anyhow::Error>;
    }
}

pub mod driving_ports {
    use super::*;
    use thiserror::Error;

    #[derive(Debug, Error)]
    pub enum TodoListError {
        #[error("list not found")]
        ListNotFound,
        #[error("item not found")]
        ItemNotFound,
        #[error(transparent)]
        PortError(#[from] anyhow::Error),
    }

    #[cfg(test)]
    impl Clone for TodoListError {
        fn clone(&self) -> Self {
            match self {
                Self::ListNotFound => Self::ListNotFound,
                Self::ItemNotFound => Self::ItemNotFound,
                Self::PortError(err) => Self::PortError(anyhow::anyhow!(format!("{}", err))),
            }
        }
    }

    pub trait TodoListPort {
        /// Creates a list and all of its items atomically
        async fn add_todo_list(
            &self,
            new_list: &NewTodoList,
            ext_cxn: &mut impl TransactableExternalConnectivity,
            list_write: &impl driven_ports::TodoListWriter,
        ) -> Result<TodoList, TodoListError>;
        /// Deletes a list and every item it owns atomically
        async fn delete_todo_list(
            &self,
            list_id: i32,
            ext_cxn: &mut impl TransactableExternalConnectivity,
            list_read: &impl driven_ports::TodoListReader,
            list_write: &impl driven_ports::TodoListWriter,
        ) -> Result<(), TodoListError>;
        async fn edit_todo_list_name(
            &self,
            list_id: i32,
            name: &str,
            ext_cxn: &mut impl ExternalConnectivity,
            list_read: &impl driven_ports::TodoListReader,
            list_write: &impl driven_ports::TodoListWriter,
        ) -> Result<(), TodoListError>;
        async fn add_todo_item(
            &self,
            list_id: i32,
            item: &NewTodoItem,
            ext_cxn: &mut impl ExternalConnectivity,
            list_read: &impl driven_ports::TodoListReader,
            list_write: &impl driven_ports::TodoListWriter,
        ) -> Result<TodoItem, TodoListError>;
        async fn delete_todo_item(
            &self,
            item_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
            list_write: &impl driven_ports::TodoListWriter,
        ) -> Result<(), TodoListError>;
        async fn update_todo_item(
            &self,
            item: &TodoItem,
            ext_cxn: &mut impl ExternalConnectivity,
            list_write: &impl driven_ports::TodoListWriter,
        ) -> Result<(), TodoListError>;
        async fn get_todo_item(
            &self,
            item_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
            list_read: &impl driven_ports::TodoListReader,
        ) -> Result<TodoItem, TodoListError>;
        async fn get_todo_list(
            &self,
            list_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
            list_read: &impl driven_ports::TodoListReader,
        ) -> Result<TodoList, TodoListError>;
    }
}

/// Returns [TodoListError::ListNotFound] unless the list exists
async fn verify_list_exists(
    list_id: i32,
    ext_cxn: &mut impl ExternalConnectivity,
    list_read: &impl TodoListReader,
) -> Result<(), TodoListError> {
    let exists = list_read
        .list_exists(list_id, ext_cxn)
        .await
        .with_context(|| format!("checking whether list {list_id} exists"))?;

    if exists {
        Ok(())
    } else {
        info!(list_id, "todo list does not exist");
        Err(TodoListError::ListNotFound)
    }
}

pub struct TodoListService {}

impl driving_ports::TodoListPort for TodoListService {
    async fn add_todo_list(
        &self,
        new_list: &NewTodoList,
        ext_cxn: &mut impl TransactableExternalConnectivity,
        list_write: &impl TodoListWriter,
    ) -> Result<TodoList, TodoListError> {
        let mut txn = ext_cxn.start_transaction().await?;

        let list_id = list_write
            .create_list(&new_list.name, &mut txn)
            .await
            .context("inserting a todo list")?;

        let mut items = Vec::with_capacity(new_list.items.len());
        for new_item in &new_list.items {
            let item_id = list_write
                .create_item(list_id, new_item, &mut txn)
                .await
                .with_context(|| format!("inserting an item into new list {list_id}"))?;
            items.push(TodoItem {
                id: item_id,
                value: new_item.value.clone(),
                completed: new_item.completed,
            });
        }

        txn.commit().await?;

        Ok(TodoList {
            id: list_id,
            name: new_list.name.clone(),
            items,
        })
    }

    async fn delete_todo_list(
        &self,
        list_id: i32,
        ext_cxn: &mut impl TransactableExternalConnectivity,
        list_read: &impl TodoListReader,
        list_write: &impl TodoListWriter,
    ) -> Result<(), TodoListError> {
        let mut txn = ext_cxn.start_transaction().await?;
        verify_list_exists(list_id, &mut txn, list_read).await?;

        list_write
            .delete_items_in_list(list_id, &mut txn)
            .await
            .with_context(|| format!("deleting the items of list {list_id}"))?;
        list_write
            .delete_list(list_id, &mut txn)
            .await
            .with_context(|| format!("deleting list {list_id}"))?;

        txn.commit().await?;
        Ok(())
    }

    async fn edit_todo_list_name(
        &self,
        list_id: i32,
        name: &str,
        ext_cxn: &mut impl ExternalConnectivity,
        list_read: &impl TodoListReader,
        list_write: &impl TodoListWriter,
    ) -> Result<(), TodoListError> {
        verify_list_exists(list_id, &mut *ext_cxn, list_read).await?;

        list_write
            .rename_list(list_id, name, &mut *ext_cxn)
            .await
            .with_context(|| format!("renaming list {list_id}"))?;
        Ok(())
    }

    async fn add_todo_item(
        &self,
        list_id: i32,
        item: &NewTodoItem,
        ext_cxn: &mut impl ExternalConnectivity,
        list_read: &impl TodoListReader,
        list_write: &impl TodoListWriter,
    ) -> Result<TodoItem, TodoListError> {
        verify_list_exists(list_id, &mut *ext_cxn, list_read).await?;

        let item_id = list_write
            .create_item(list_id, item, &mut *ext_cxn)
            .await
            .with_context(|| format!("adding an item to list {list_id}"))?;

        Ok(TodoItem {
            id: item_id,
            value: item.value.clone(),
            completed: item.completed,
        })
    }

    async fn delete_todo_item(
        &self,
        item_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
        list_write: &impl TodoListWriter,
    ) -> Result<(), TodoListError> {
        list_write
            .delete_item(item_id, &mut *ext_cxn)
            .await
            .with_context(|| format!("deleting item {item_id}"))?;
        Ok(())
    }

    async fn update_todo_item(
        &self,
        item: &TodoItem,
        ext_cxn: &mut impl ExternalConnectivity,
        list_write: &impl TodoListWriter,
    ) -> Result<(), TodoListError> {
        list_write
            .update_item(item, &mut *ext_cxn)
            .await
            .with_context(|| format!("updating item {}", item.id))?;
        Ok(())
    }

    async fn get_todo_item(
        &self,
        item_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
        list_read: &impl TodoListReader,
    ) -> Result<TodoItem, TodoListError> {
        list_read
            .item_by_id(item_id, &mut *ext_cxn)
            .await
            .with_context(|| format!("fetching item {item_id}"))?
            .ok_or(TodoListError::ItemNotFound)
    }

    async fn get_todo_list(
        &self,
        list_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
        list_read: &impl TodoListReader,
    ) -> Result<TodoList, TodoListError> {
        list_read
            .list_by_id(list_id, &mut *ext_cxn)
            .await
            .with_context(|| format!("fetching list {list_id}"))?
            .ok_or(TodoListError::ListNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::test_util::*;
    use super::*;
    use crate::domain::test_util::Connectivity;
    use crate::domain::todo::driving_ports::TodoListPort;
    use crate::external_connections::test_util::FakeExternalConnectivity;
    use speculoos::prelude::*;
    use std::sync::RwLock;

    mod add_todo_list {
        use super::*;

        #[tokio::test]
        async fn happy_path() {
            let persistence = InMemoryTodoPersistence::new_locked();
            let mut ext_cxn = FakeExternalConnectivity::new();
            let new_list = NewTodoList {
                name: "Groceries".to_owned(),
                items: vec![new_item("Milk", false), new_item("Eggs", true)],
            };

            let add_result = TodoListService {}
                .add_todo_list(&new_list, &mut ext_cxn, &persistence)
                .await;

            assert_that!(add_result).is_ok().matches(|list| {
                matches!(list, TodoList { id: 1, name, items }
                    if name == "Groceries" && matches!(items.as_slice(), [
                        TodoItem { id: 1, value: milk, completed: false },
                        TodoItem { id: 2, value: eggs, completed: true },
                    ] if milk == "Milk" && eggs == "Eggs"))
            });
            assert_eq!(1, ext_cxn.transactions_started());
            assert_eq!(1, ext_cxn.transactions_committed());
        }

        #[tokio::test]
        async fn does_not_commit_when_an_item_fails() {
            let mut raw_persistence = InMemoryTodoPersistence::new();
            raw_persistence.fail_items_with_value = Some("Eggs".to_owned());
            let persistence = RwLock::new(raw_persistence);
            let mut ext_cxn = FakeExternalConnectivity::new();
            let new_list = NewTodoList {
                name: "Groceries".to_owned(),
                items: vec![new_item("Milk", false), new_item("Eggs", false)],
            };

            let add_result = TodoListService {}
                .add_todo_list(&new_list, &mut ext_cxn, &persistence)
                .await;

            let Err(TodoListError::PortError(_)) = add_result else {
                panic!("Expected the insert to fail, got {add_result:#?}");
            };
            assert_eq!(1, ext_cxn.transactions_started());
            assert_eq!(0, ext_cxn.transactions_committed());
        }
    }

    mod delete_todo_list {
        use super::*;

        #[tokio::test]
        async fn removes_list_and_its_items() {
            let persistence = RwLock::new(InMemoryTodoPersistence::new_with_lists(&[
                list_with_items("Chores", &["Dishes", "Laundry"]),
                list_with_items("Errands", &["Bank"]),
            ]));
            let mut ext_cxn = FakeExternalConnectivity::new();
            let service = TodoListService {};

            let delete_result = service
                .delete_todo_list(1, &mut ext_cxn, &persistence, &persistence)
                .await;
            assert_that!(delete_result).is_ok();
            assert_eq!(1, ext_cxn.transactions_committed());

            for former_item in [1, 2] {
                let fetch_result = service
                    .get_todo_item(former_item, &mut ext_cxn, &persistence)
                    .await;
                let Err(TodoListError::ItemNotFound) = fetch_result else {
                    panic!("Item {former_item} outlived its list: {fetch_result:#?}");
                };
            }

            let remaining = service.get_todo_item(3, &mut ext_cxn, &persistence).await;
            assert_that!(remaining).is_ok();
        }

        #[tokio::test]
        async fn signals_missing_list() {
            let persistence = InMemoryTodoPersistence::new_locked();
            let mut ext_cxn = FakeExternalConnectivity::new();

            let delete_result = TodoListService {}
                .delete_todo_list(4, &mut ext_cxn, &persistence, &persistence)
                .await;
            let Err(TodoListError::ListNotFound) = delete_result else {
                panic!("Expected a missing list, got {delete_result:#?}");
            };
            assert_eq!(0, ext_cxn.transactions_committed());
        }
    }

    mod edit_todo_list_name {
        use super::*;

        #[tokio::test]
        async fn renames_list() {
            let persistence = RwLock::new(InMemoryTodoPersistence::new_with_lists(&[
                list_with_items("Chores", &[]),
            ]));
            let mut ext_cxn = FakeExternalConnectivity::new();

            let edit_result = TodoListService {}
                .edit_todo_list_name(1, "Weekend chores", &mut ext_cxn, &persistence, &persistence)
                .await;
            assert_that!(edit_result).is_ok();

            let locked = persistence.read().expect("todo persistence rwlock poisoned");
            assert_eq!("Weekend chores", locked.lists[0].name);
        }

        #[tokio::test]
        async fn missing_list_leaves_storage_unchanged() {
            let persistence = RwLock::new(InMemoryTodoPersistence::new_with_lists(&[
                list_with_items("Chores", &["Dishes"]),
            ]));
            let mut ext_cxn = FakeExternalConnectivity::new();

            let edit_result = TodoListService {}
                .edit_todo_list_name(9, "Renamed", &mut ext_cxn, &persistence, &persistence)
                .await;
            let Err(TodoListError::ListNotFound) = edit_result else {
                panic!("Expected a missing list, got {edit_result:#?}");
            };

            let locked = persistence.read().expect("todo persistence rwlock poisoned");
            assert!(matches!(locked.lists.as_slice(), [
                StoredList { id: 1, name }
            ] if name == "Chores"));
            assert_eq!(1, locked.items.len());
        }
    }

    mod add_todo_item {
        use super::*;

        #[tokio::test]
        async fn adds_item_to_existing_list() {
            let persistence = RwLock::new(InMemoryTodoPersistence::new_with_lists(&[
                list_with_items("Chores", &["Dishes"]),
            ]));
            let mut ext_cxn = FakeExternalConnectivity::new();

            let add_result = TodoListService {}
                .add_todo_item(
                    1,
                    &new_item("Vacuum", false),
                    &mut ext_cxn,
                    &persistence,
                    &persistence,
                )
                .await;
            assert_that!(add_result).is_ok_containing(TodoItem {
                id: 2,
                value: "Vacuum".to_owned(),
                completed: false,
            });
        }

        #[tokio::test]
        async fn rejects_missing_list() {
            let persistence = InMemoryTodoPersistence::new_locked();
            let mut ext_cxn = FakeExternalConnectivity::new();

            let add_result = TodoListService {}
                .add_todo_item(
                    3,
                    &new_item("Vacuum", false),
                    &mut ext_cxn,
                    &persistence,
                    &persistence,
                )
                .await;
            let Err(TodoListError::ListNotFound) = add_result else {
                panic!("Expected a missing list, got {add_result:#?}");
            };
            let locked = persistence.read().expect("todo persistence rwlock poisoned");
            assert!(locked.items.is_empty());
        }

        #[tokio::test]
        async fn propagates_port_error() {
            let mut raw_persistence = InMemoryTodoPersistence::new();
            raw_persistence.connectivity = Connectivity::Disconnected;
            let persistence = RwLock::new(raw_persistence);
            let mut ext_cxn = FakeExternalConnectivity::new();

            let add_result = TodoListService {}
                .add_todo_item(
                    1,
                    &new_item("Vacuum", false),
                    &mut ext_cxn,
                    &persistence,
                    &persistence,
                )
                .await;
            let Err(TodoListError::PortError(_)) = add_result else {
                panic!("Expected a port error, got {add_result:#?}");
            };
        }
    }

    mod items {
        use super::*;

        #[tokio::test]
        async fn update_then_get_item() {
            let persistence = RwLock::new(InMemoryTodoPersistence::new_with_lists(&[
                list_with_items("Chores", &["Dishes"]),
            ]));
            let mut ext_cxn = FakeExternalConnectivity::new();
            let service = TodoListService {};
            let update = TodoItem {
                id: 1,
                value: "Dishes and pans".to_owned(),
                completed: true,
            };

            let update_result = service
                .update_todo_item(&update, &mut ext_cxn, &persistence)
                .await;
            assert_that!(update_result).is_ok();

            let fetched = service.get_todo_item(1, &mut ext_cxn, &persistence).await;
            assert_that!(fetched).is_ok_containing(update);
        }

        #[tokio::test]
        async fn deleted_item_is_not_found() {
            let persistence = RwLock::new(InMemoryTodoPersistence::new_with_lists(&[
                list_with_items("Chores", &["Dishes"]),
            ]));
            let mut ext_cxn = FakeExternalConnectivity::new();
            let service = TodoListService {};

            let delete_result = service
                .delete_todo_item(1, &mut ext_cxn, &persistence)
                .await;
            assert_that!(delete_result).is_ok();

            let fetched = service.get_todo_item(1, &mut ext_cxn, &persistence).await;
            let Err(TodoListError::ItemNotFound) = fetched else {
                panic!("Expected a missing item, got {fetched:#?}");
            };
        }

        #[tokio::test]
        async fn get_item_propagates_port_error() {
            let mut raw_persistence = InMemoryTodoPersistence::new();
            raw_persistence.connectivity = Connectivity::Disconnected;
            let persistence = RwLock::new(raw_persistence);
            let mut ext_cxn = FakeExternalConnectivity::new();

            let fetched = TodoListService {}
                .get_todo_item(1, &mut ext_cxn, &persistence)
                .await;
            let Err(TodoListError::PortError(_)) = fetched else {
                panic!("Expected a port error, got {fetched:#?}");
            };
        }
    }

    mod get_todo_list {
        use super::*;

        #[tokio::test]
        async fn returns_list_with_items() {
            let persistence = RwLock::new(InMemoryTodoPersistence::new_with_lists(&[
                list_with_items("Chores", &["Dishes"]),
                list_with_items("Errands", &["Bank", "Post office"]),
            ]));
            let mut ext_cxn = FakeExternalConnectivity::new();

            let fetched = TodoListService {}
                .get_todo_list(2, &mut ext_cxn, &persistence)
                .await;
            assert_that!(fetched).is_ok().matches(|list| {
                list.name == "Errands"
                    && list.items.iter().map(|item| item.id).collect::<Vec<_>>() == vec![2, 3]
            });
        }

        #[tokio::test]
        async fn empty_list_still_found() {
            let persistence = RwLock::new(InMemoryTodoPersistence::new_with_lists(&[
                list_with_items("Someday", &[]),
            ]));
            let mut ext_cxn = FakeExternalConnectivity::new();

            let fetched = TodoListService {}
                .get_todo_list(1, &mut ext_cxn, &persistence)
                .await;
            assert_that!(fetched).is_ok_containing(TodoList {
                id: 1,
                name: "Someday".to_owned(),
                items: Vec::new(),
            });
        }

        #[tokio::test]
        async fn signals_missing_list() {
            let persistence = InMemoryTodoPersistence::new_locked();
            let mut ext_cxn = FakeExternalConnectivity::new();

            let fetched = TodoListService {}
                .get_todo_list(1, &mut ext_cxn, &persistence)
                .await;
            let Err(TodoListError::ListNotFound) = fetched else {
                panic!("Expected a missing list, got {fetched:#?}");
            };
        }
    }
}
