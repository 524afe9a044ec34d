use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use thiserror::Error;
use uuid::Uuid;

/// Description of the item every new identity starts with
pub const SEED_DESCRIPTION: &str = "Learn SvelteKit";

/// A single entry in a user's todo list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    /// Unique id generated by the store, never reused
    pub id: String,

    /// Free-form text entered by the user
    pub description: String,

    /// Completion flag, only changed by [`TodoStore::toggle_todo`]
    pub done: bool,
}

impl TodoItem {
    fn new(description: &str) -> Self {
        TodoItem {
            id: Uuid::new_v4().to_string(),
            description: description.to_string(),
            done: false,
        }
    }
}

/// Errors returned by [`TodoStore`] operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Identity not found")]
    IdentityNotFound,

    #[error("Description cannot be empty")]
    EmptyDescription,
}

/// In-memory todo lists keyed by identity token
///
/// A single lock guards the whole map, so concurrent requests for the same
/// identity never interleave inside an operation. Sequences are created lazily
/// by [`TodoStore::get_todos`] and live as long as the store does.
///
/// # Examples
/// ```
/// use farmweb::todo::TodoStore;
///
/// let store = TodoStore::new();
/// let todos = store.get_todos("U1");
/// assert_eq!(todos.len(), 1);
///
/// store.create_todo("U1", "Buy milk").unwrap();
/// assert_eq!(store.get_todos("U1").len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct TodoStore {
    lists: RwLock<HashMap<String, Vec<TodoItem>>>,
}

impl TodoStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the todo list for an identity, seeding it on first access
    ///
    /// An identity that has never been seen gets a fresh list holding one
    /// item, [`SEED_DESCRIPTION`], which is stored before returning.
    ///
    /// # Arguments
    /// * `identity` - The identity token read from the client's cookie
    ///
    /// # Returns
    /// * `Vec<TodoItem>` - A snapshot of the list in insertion order
    pub fn get_todos(&self, identity: &str) -> Vec<TodoItem> {
        if let Some(todos) = self.read().get(identity) {
            return todos.clone();
        }

        // Another request may have seeded the list between the two locks
        let mut lists = self.write();
        lists
            .entry(identity.to_string())
            .or_insert_with(|| vec![TodoItem::new(SEED_DESCRIPTION)])
            .clone()
    }

    /// Append a new item to an identity's list
    ///
    /// # Arguments
    /// * `identity` - Identity whose list was already created by `get_todos`
    /// * `description` - Text of the new item, must not be blank
    ///
    /// # Returns
    /// * `Result<TodoItem, StoreError>` - The created item
    ///
    /// # Errors
    /// * `StoreError::EmptyDescription` if the description is blank
    /// * `StoreError::IdentityNotFound` if the identity has no list yet
    pub fn create_todo(&self, identity: &str, description: &str) -> Result<TodoItem, StoreError> {
        if description.trim().is_empty() {
            return Err(StoreError::EmptyDescription);
        }

        let mut lists = self.write();
        let todos = lists
            .get_mut(identity)
            .ok_or(StoreError::IdentityNotFound)?;

        let item = TodoItem::new(description);
        todos.push(item.clone());

        Ok(item)
    }

    /// Remove the first item with the given id
    ///
    /// Deleting an id that is not in the list is a no-op and returns `Ok(None)`.
    /// The remaining items keep their relative order.
    ///
    /// # Errors
    /// * `StoreError::IdentityNotFound` if the identity has no list yet
    pub fn delete_todo(&self, identity: &str, todo_id: &str) -> Result<Option<TodoItem>, StoreError> {
        let mut lists = self.write();
        let todos = lists
            .get_mut(identity)
            .ok_or(StoreError::IdentityNotFound)?;

        Ok(todos
            .iter()
            .position(|todo| todo.id == todo_id)
            .map(|index| todos.remove(index)))
    }

    /// Flip the `done` flag of the first item with the given id
    ///
    /// Returns the updated item, or `Ok(None)` when the id is absent.
    ///
    /// # Errors
    /// * `StoreError::IdentityNotFound` if the identity has no list yet
    pub fn toggle_todo(&self, identity: &str, todo_id: &str) -> Result<Option<TodoItem>, StoreError> {
        let mut lists = self.write();
        let todos = lists
            .get_mut(identity)
            .ok_or(StoreError::IdentityNotFound)?;

        Ok(todos.iter_mut().find(|todo| todo.id == todo_id).map(|todo| {
            todo.done = !todo.done;
            todo.clone()
        }))
    }

    /// Whether a list has been created for this identity
    pub fn contains(&self, identity: &str) -> bool {
        self.read().contains_key(identity)
    }

    /// Number of identities with a list
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Drop every list
    pub fn clear(&self) {
        self.write().clear();
    }

    // Every mutation leaves the map consistent, so a poisoned lock is still usable
    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, Vec<TodoItem>>> {
        self.lists.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, Vec<TodoItem>>> {
        self.lists.write().unwrap_or_else(PoisonError::into_inner)
    }
}
