use thiserror::Error;

/// Failures surfaced by the todo store.
///
/// `UnknownCaller`, `NotFound` and `OwnershipMismatch` are expected outcomes
/// that callers receive as values. `NotImplemented` and `Storage` are hard
/// failures.
#[derive(Debug, Error)]
pub enum TodoError {
    #[error("Unknown caller: an authenticated identity is required")]
    UnknownCaller,

    #[error("Todo [{id}] not found")]
    NotFound { id: String },

    #[error("Todo [{id}] is not owned by [{owner}]")]
    OwnershipMismatch { id: String, owner: String },

    #[error("{operation} is not implemented")]
    NotImplemented { operation: &'static str },

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl TodoError {
    pub fn not_found(id: impl ToString) -> Self { Self::NotFound { id: id.to_string() } }

    pub fn ownership_mismatch(id: impl ToString, owner: impl ToString) -> Self {
        Self::OwnershipMismatch { id: id.to_string(), owner: owner.to_string() }
    }

    /// Whether the error is a normal outcome reported back to the caller
    /// rather than a fault of the operation itself.
    pub fn is_expected(&self) -> bool {
        matches!(self, Self::UnknownCaller | Self::NotFound { .. } | Self::OwnershipMismatch { .. })
    }
}

pub type TodoResult<T> = Result<T, TodoError>;
