use axum::{extract::State, routing::post, Json, Router};
use ::http::HeaderMap;

use crate::application::{dispatch::{Dispatcher, Operation, Resolved}, todo_service::TodoService};
use crate::domain::identity::Caller;
use crate::http::types::ApiError;

/// Header carrying the authenticated user id, set by the upstream auth layer.
pub const USER_ID_HEADER: &str = "x-user-id";
/// Optional display name for [`USER_ID_HEADER`]; defaults to the id.
pub const USER_NAME_HEADER: &str = "x-user-name";

#[derive(Clone)]
pub struct AppState<S: TodoService> { pub dispatcher: Dispatcher<S> }

pub fn router<S: TodoService + Clone>(state: AppState<S>) -> Router {
    Router::new()
        .route("/resolve", post(resolve::<S>))
        .with_state(state)
}

async fn resolve<S: TodoService>(State(state): State<AppState<S>>, headers: HeaderMap, Json(op): Json<Operation>) -> Result<Json<Resolved>, ApiError> {
    let caller = caller_from_headers(&headers);
    let resolved = state.dispatcher.dispatch(op, caller.as_ref()).await?;
    Ok(Json(resolved))
}

fn caller_from_headers(headers: &HeaderMap) -> Option<Caller> {
    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok()).map(str::trim).filter(|v| !v.is_empty());
    let id = header(USER_ID_HEADER)?;
    let name = header(USER_NAME_HEADER).unwrap_or(id);
    Some(Caller::new(id, name))
}
