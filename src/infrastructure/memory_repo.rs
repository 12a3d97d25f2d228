use std::sync::Arc;

use anyhow::{bail, Result};
use async_trait::async_trait;
use indexmap::IndexMap;
use parking_lot::RwLock;

use crate::domain::{
    repository::TodoRepository,
    todo::{OwnerId, Todo, TodoId, UpdateTodo},
};

/// Insertion-ordered todo map shared behind a lock. Clones share the map.
#[derive(Clone, Default)]
pub struct InMemoryTodoRepository {
    items: Arc<RwLock<IndexMap<TodoId, Todo>>>,
}

impl InMemoryTodoRepository {
    pub fn new() -> Self { Self::default() }
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn insert(&self, todo: Todo) -> Result<()> {
        let mut map = self.items.write();
        if map.contains_key(&todo.id) {
            bail!("todo id collision: {}", todo.id);
        }
        map.insert(todo.id, todo);
        Ok(())
    }

    async fn get(&self, id: &TodoId) -> Result<Option<Todo>> {
        Ok(self.items.read().get(id).cloned())
    }

    async fn list(&self, owner: Option<&OwnerId>) -> Result<Vec<Todo>> {
        let map = self.items.read();
        Ok(match owner {
            Some(owner) => map.values().filter(|t| t.is_owned_by(owner)).cloned().collect(),
            None => map.values().cloned().collect(),
        })
    }

    async fn update(&self, id: &TodoId, input: UpdateTodo) -> Result<Option<Todo>> {
        let mut map = self.items.write();
        let Some(todo) = map.get_mut(id) else { return Ok(None) };
        input.apply(todo);
        Ok(Some(todo.clone()))
    }

    async fn delete(&self, id: &TodoId) -> Result<bool> {
        // shift_remove keeps the remaining entries in insertion order
        Ok(self.items.write().shift_remove(id).is_some())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.items.read().len())
    }
}
