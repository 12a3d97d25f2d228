use async_trait::async_trait;
use super::todo::{OwnerId, Todo, TodoId, UpdateTodo};

/// Storage seam for todos. Implementations keep insertion order and apply
/// each call atomically.
#[async_trait]
pub trait TodoRepository: Send + Sync + 'static {
    async fn insert(&self, todo: Todo) -> anyhow::Result<()>;
    async fn get(&self, id: &TodoId) -> anyhow::Result<Option<Todo>>;
    /// All todos, or only those owned by `owner` when one is given.
    async fn list(&self, owner: Option<&OwnerId>) -> anyhow::Result<Vec<Todo>>;
    async fn update(&self, id: &TodoId, input: UpdateTodo) -> anyhow::Result<Option<Todo>>;
    async fn delete(&self, id: &TodoId) -> anyhow::Result<bool>;
    async fn count(&self) -> anyhow::Result<usize>;
}
