use axum::{routing::get, Router};

pub use super::routes::resolve;

pub fn app(router: Router) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .merge(router)
}
