//! Walks the todo store through its two modes and logs what happens.

use anyhow::Result;
use todo_store::domain::todo::CreateTodo;
use todo_store::{Caller, Dispatcher, InMemoryTodoRepository, Operation, Resolved, StoreMode, TodoService, TodoServiceImpl};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    anonymous().await?;
    owned().await?;
    Ok(())
}

async fn anonymous() -> Result<()> {
    let store = TodoServiceImpl::new(InMemoryTodoRepository::new(), StoreMode::Anonymous);
    for title in ["bob", "candy"] {
        store.create(CreateTodo { title: title.into() }, None).await?;
    }
    let titles: Vec<String> = store.list(None).await?.into_iter().map(|t| t.title).collect();
    tracing::info!(?titles, "anonymous store");
    Ok(())
}

async fn owned() -> Result<()> {
    let dispatcher = Dispatcher::new(TodoServiceImpl::new(InMemoryTodoRepository::new(), StoreMode::Owned));
    let user1 = Caller::new("user1", "User One");
    let user2 = Caller::new("user2", "User Two");

    let created = dispatcher.dispatch(Operation::CreateTodo { title: "first todo by user1".into() }, Some(&user1)).await?;
    dispatcher.dispatch(Operation::CreateTodo { title: "first todo by user2".into() }, Some(&user2)).await?;

    let mine = dispatcher.dispatch(Operation::Todos, Some(&user1)).await?;
    tracing::info!(user = %user1.id, todos = ?mine, "owned store");

    let id = match created {
        Resolved::Data { data } => data["id"].as_str().unwrap_or_default().to_string(),
        Resolved::Error { error } => anyhow::bail!("create was rejected: {error}"),
    };
    let attempt = Operation::UpdateTodo { id, title: "taken over".into(), owner_id: Some(user2.id.clone()) };
    let outcome = dispatcher.dispatch(attempt, Some(&user2)).await?;
    tracing::info!(user = %user2.id, ?outcome, "foreign update");

    if let Err(err) = dispatcher.dispatch(Operation::DeleteCompleted, Some(&user1)).await {
        tracing::info!(error = %err, "deleteCompleted");
    }
    Ok(())
}
