pub mod dispatch;
pub mod todo_service;
