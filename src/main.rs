use todo_store::{
    application::{dispatch::Dispatcher, todo_service::TodoServiceImpl},
    config::Config,
    http::routing::{self, resolve},
    infrastructure::memory_repo::InMemoryTodoRepository,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;
    let service = TodoServiceImpl::new(InMemoryTodoRepository::new(), config.mode);
    let dispatcher = Dispatcher::with_policy(service, config.policy);
    let router = routing::app(resolve::router(resolve::AppState { dispatcher }));

    tracing::info!(addr = %config.addr, mode = %config.mode, "listening");
    axum::serve(tokio::net::TcpListener::bind(config.addr).await?, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal::ctrl_c;
    let _ = ctrl_c().await;
    tracing::info!("shutdown");
}
