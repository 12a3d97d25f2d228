//! Resolver dispatch in front of the todo store.
//!
//! A [`Dispatcher`] takes one named [`Operation`] and the authenticated
//! [`Caller`] (if any). It checks that a mutation's owner claim matches that
//! caller, runs the store, and turns expected failures into
//! [`Resolved::Error`] payloads. Only hard failures such as
//! `deleteCompleted` come back as `Err`.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::todo_service::TodoService;
use crate::domain::error::{TodoError, TodoResult};
use crate::domain::identity::Caller;
use crate::domain::todo::{CreateTodo, OwnerId, TodoId};

/// One resolver call: `{"operation": "<name>", "args": {...}}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "operation", content = "args", rename_all = "camelCase")]
pub enum Operation {
    Todos,
    Todo { id: String },
    CreateTodo { title: String },
    #[serde(rename_all = "camelCase")]
    UpdateTodo {
        id: String,
        title: String,
        #[serde(default)]
        owner_id: Option<OwnerId>,
    },
    #[serde(rename_all = "camelCase")]
    DeleteTodo {
        id: String,
        #[serde(default)]
        owner_id: Option<OwnerId>,
    },
    #[serde(rename_all = "camelCase")]
    MarkCompleted {
        id: String,
        completed: bool,
        #[serde(default)]
        owner_id: Option<OwnerId>,
    },
    DeleteCompleted,
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Todos => "todos",
            Self::Todo { .. } => "todo",
            Self::CreateTodo { .. } => "createTodo",
            Self::UpdateTodo { .. } => "updateTodo",
            Self::DeleteTodo { .. } => "deleteTodo",
            Self::MarkCompleted { .. } => "markCompleted",
            Self::DeleteCompleted => "deleteCompleted",
        }
    }
}

/// Result of a dispatched operation as the transport sees it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Resolved {
    Data { data: Value },
    Error { error: String },
}

impl Resolved {
    pub fn is_error(&self) -> bool { matches!(self, Self::Error { .. }) }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GatePolicy {
    /// Report records owned by someone else as not found.
    pub conceal_foreign_records: bool,
}

#[derive(Clone)]
pub struct Dispatcher<S: TodoService> {
    service: S,
    policy: GatePolicy,
}

impl<S: TodoService> Dispatcher<S> {
    pub fn new(service: S) -> Self { Self::with_policy(service, GatePolicy::default()) }

    pub fn with_policy(service: S, policy: GatePolicy) -> Self { Self { service, policy } }

    pub async fn dispatch(&self, op: Operation, identity: Option<&Caller>) -> TodoResult<Resolved> {
        let operation = op.name();
        match self.resolve(op, identity).await {
            Ok(data) => Ok(Resolved::Data { data }),
            Err(err) if err.is_expected() => {
                tracing::debug!(operation, error = %err, "operation rejected");
                Ok(Resolved::Error { error: self.present(&err) })
            }
            Err(err) => {
                tracing::error!(operation, error = %err, "operation failed");
                Err(err)
            }
        }
    }

    async fn resolve(&self, op: Operation, identity: Option<&Caller>) -> TodoResult<Value> {
        match op {
            Operation::Todos => encode(self.service.list(identity).await?),
            Operation::Todo { id } => {
                let owner = self.gate(&id, None, identity)?;
                encode(self.service.get(&parse_id(&id)?, owner.as_ref()).await?)
            }
            Operation::CreateTodo { title } => {
                let id = self.service.create(CreateTodo { title }, identity).await?;
                Ok(json!({ "id": id }))
            }
            Operation::UpdateTodo { id, title, owner_id } => {
                let owner = self.gate(&id, owner_id, identity)?;
                encode(self.service.update(&parse_id(&id)?, title, owner.as_ref()).await?)
            }
            Operation::DeleteTodo { id, owner_id } => {
                let owner = self.gate(&id, owner_id, identity)?;
                self.service.delete(&parse_id(&id)?, owner.as_ref()).await?;
                Ok(Value::Bool(true))
            }
            Operation::MarkCompleted { id, completed, owner_id } => {
                let owner = self.gate(&id, owner_id, identity)?;
                encode(self.service.set_completed(&parse_id(&id)?, completed, owner.as_ref()).await?)
            }
            Operation::DeleteCompleted => self.service.delete_completed().await.map(|()| Value::Null),
        }
    }

    /// Decides which owner the store sees for a call on `id`.
    ///
    /// With owners enabled the claim must name the authenticated caller; a
    /// missing claim is taken from the caller.
    fn gate(&self, id: &str, claim: Option<OwnerId>, identity: Option<&Caller>) -> TodoResult<Option<OwnerId>> {
        if !self.service.mode().requires_caller() {
            return Ok(claim);
        }
        let caller = identity.ok_or(TodoError::UnknownCaller)?;
        match claim {
            Some(claimed) if claimed != caller.id => {
                tracing::warn!(id, %claimed, caller = %caller.id, "owner claim does not match caller");
                Err(TodoError::ownership_mismatch(id, claimed))
            }
            _ => Ok(Some(caller.id.clone())),
        }
    }

    fn present(&self, err: &TodoError) -> String {
        match err {
            TodoError::OwnershipMismatch { id, .. } if self.policy.conceal_foreign_records => {
                TodoError::not_found(id).to_string()
            }
            other => other.to_string(),
        }
    }
}

fn parse_id(raw: &str) -> TodoResult<TodoId> {
    raw.parse().map_err(|_| TodoError::not_found(raw))
}

fn encode<T: Serialize>(value: T) -> TodoResult<Value> {
    Ok(serde_json::to_value(value).map_err(anyhow::Error::from)?)
}
