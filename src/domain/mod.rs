pub mod error;
pub mod identity;
pub mod repository;
pub mod todo;
