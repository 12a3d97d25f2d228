use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::domain::error::{TodoError, TodoResult};
use crate::domain::identity::Caller;
use crate::domain::repository::TodoRepository;
use crate::domain::todo::{CreateTodo, OwnerId, Todo, TodoId, UpdateTodo};

/// Whether todos belong to the caller that created them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreMode {
    /// No owners: every caller sees and may change every todo.
    Anonymous,
    /// Todos are owned by their creator; listing is filtered and mutations
    /// are checked against the owner.
    #[default]
    Owned,
}

impl StoreMode {
    pub fn requires_caller(self) -> bool { matches!(self, Self::Owned) }
}

impl fmt::Display for StoreMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self { Self::Anonymous => "anonymous", Self::Owned => "owned" })
    }
}

impl FromStr for StoreMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "anonymous" => Ok(Self::Anonymous),
            "owned" => Ok(Self::Owned),
            other => Err(anyhow!("unknown store mode `{other}` (expected `anonymous` or `owned`)")),
        }
    }
}

/// The record store: CRUD over todos plus the ownership gate.
///
/// Mutations take the owner the caller acts as. In [`StoreMode::Owned`] a
/// missing owner is [`TodoError::UnknownCaller`] and a record owned by
/// someone else is [`TodoError::OwnershipMismatch`]; in
/// [`StoreMode::Anonymous`] the owner is ignored.
#[async_trait]
pub trait TodoService: Send + Sync + 'static {
    fn mode(&self) -> StoreMode;
    async fn list(&self, caller: Option<&Caller>) -> TodoResult<Vec<Todo>>;
    async fn get(&self, id: &TodoId, owner: Option<&OwnerId>) -> TodoResult<Todo>;
    async fn create(&self, input: CreateTodo, caller: Option<&Caller>) -> TodoResult<TodoId>;
    async fn update(&self, id: &TodoId, title: String, owner: Option<&OwnerId>) -> TodoResult<Todo>;
    async fn delete(&self, id: &TodoId, owner: Option<&OwnerId>) -> TodoResult<()>;
    async fn set_completed(&self, id: &TodoId, completed: bool, owner: Option<&OwnerId>) -> TodoResult<Todo>;
    async fn delete_completed(&self) -> TodoResult<()>;
}

#[derive(Clone)]
pub struct TodoServiceImpl<R: TodoRepository> {
    repo: R,
    mode: StoreMode,
}

impl<R: TodoRepository> TodoServiceImpl<R> {
    pub fn new(repo: R, mode: StoreMode) -> Self { Self { repo, mode } }

    pub fn anonymous(repo: R) -> Self { Self::new(repo, StoreMode::Anonymous) }

    pub fn owned(repo: R) -> Self { Self::new(repo, StoreMode::Owned) }

    pub fn repository(&self) -> &R { &self.repo }

    fn require<'a, T>(&self, who: Option<&'a T>) -> TodoResult<Option<&'a T>> {
        match (self.mode, who) {
            (StoreMode::Owned, None) => Err(TodoError::UnknownCaller),
            (StoreMode::Owned, some) => Ok(some),
            (StoreMode::Anonymous, _) => Ok(None),
        }
    }

    /// Loads `id` and checks that `owner` may act on it.
    async fn authorize(&self, id: &TodoId, owner: Option<&OwnerId>) -> TodoResult<Todo> {
        let owner = self.require(owner)?;
        let todo = self.repo.get(id).await?.ok_or_else(|| TodoError::not_found(id))?;
        if let Some(owner) = owner {
            if !todo.is_owned_by(owner) {
                tracing::warn!(%id, %owner, "ownership mismatch");
                return Err(TodoError::ownership_mismatch(id, owner));
            }
        }
        Ok(todo)
    }

    async fn patch(&self, id: &TodoId, input: UpdateTodo, owner: Option<&OwnerId>) -> TodoResult<Todo> {
        self.authorize(id, owner).await?;
        // owners never change, so a record missing here was deleted in between
        self.repo.update(id, input).await?.ok_or_else(|| TodoError::not_found(id))
    }
}

#[async_trait]
impl<R: TodoRepository> TodoService for TodoServiceImpl<R> {
    fn mode(&self) -> StoreMode { self.mode }

    async fn list(&self, caller: Option<&Caller>) -> TodoResult<Vec<Todo>> {
        let caller = self.require(caller)?;
        let todos = self.repo.list(caller.map(|c| &c.id)).await?;
        tracing::debug!(count = todos.len(), mode = %self.mode, "listed todos");
        Ok(todos)
    }

    async fn get(&self, id: &TodoId, owner: Option<&OwnerId>) -> TodoResult<Todo> {
        self.authorize(id, owner).await
    }

    async fn create(&self, input: CreateTodo, caller: Option<&Caller>) -> TodoResult<TodoId> {
        let caller = self.require(caller)?;
        let todo = Todo {
            id: TodoId::default(),
            title: input.title,
            completed: false,
            created_at: Utc::now(),
            owner_id: caller.map(|c| c.id.clone()),
            owner_name: caller.map(|c| c.display_name.clone()),
        };
        let id = todo.id;
        self.repo.insert(todo).await?;
        tracing::info!(%id, owner = ?caller.map(|c| c.id.as_str()), "created todo");
        Ok(id)
    }

    async fn update(&self, id: &TodoId, title: String, owner: Option<&OwnerId>) -> TodoResult<Todo> {
        self.patch(id, UpdateTodo::title(title), owner).await
    }

    async fn delete(&self, id: &TodoId, owner: Option<&OwnerId>) -> TodoResult<()> {
        self.authorize(id, owner).await?;
        if !self.repo.delete(id).await? {
            return Err(TodoError::not_found(id));
        }
        tracing::info!(%id, "deleted todo");
        Ok(())
    }

    async fn set_completed(&self, id: &TodoId, completed: bool, owner: Option<&OwnerId>) -> TodoResult<Todo> {
        self.patch(id, UpdateTodo::completed(completed), owner).await
    }

    async fn delete_completed(&self) -> TodoResult<()> {
        Err(TodoError::NotImplemented { operation: "deleteCompleted" })
    }
}
