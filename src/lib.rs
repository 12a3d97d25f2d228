pub mod application;
pub mod config;
pub mod domain;
pub mod http;
pub mod infrastructure;

pub use application::dispatch::{Dispatcher, GatePolicy, Operation, Resolved};
pub use application::todo_service::{StoreMode, TodoService, TodoServiceImpl};
pub use domain::{error::TodoError, identity::Caller, todo::Todo};
pub use infrastructure::memory_repo::InMemoryTodoRepository;
