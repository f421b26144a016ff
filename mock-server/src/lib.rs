use std::{sync::Arc, time::Duration};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: Uuid,
    pub description: String,
    pub is_done: bool,
}

#[derive(Deserialize)]
pub struct NewTodo {
    pub description: String,
}

/// Insertion-ordered store.
pub type Db = Arc<RwLock<Vec<Todo>>>;

#[derive(Clone, Debug, Default)]
pub struct ServerConfig {
    /// Delay applied before every handler answers.
    pub latency: Duration,
    /// Start with the two demo items.
    pub seed: bool,
}

#[derive(Clone)]
struct AppState {
    db: Db,
    latency: Duration,
}

impl AppState {
    async fn settle(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

pub fn demo_todos() -> Vec<Todo> {
    ["say hello", "say hello again"]
        .into_iter()
        .map(|description| Todo {
            id: Uuid::new_v4(),
            description: description.to_string(),
            is_done: false,
        })
        .collect()
}

pub fn app() -> Router {
    app_with(ServerConfig::default())
}

pub fn app_with(config: ServerConfig) -> Router {
    let todos = if config.seed { demo_todos() } else { Vec::new() };
    let state = AppState {
        db: Arc::new(RwLock::new(todos)),
        latency: config.latency,
    };
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/{id}", put(update_todo).delete(delete_todo))
        .with_state(state)
}

pub async fn run(listener: TcpListener, config: ServerConfig) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(config)).await
}

async fn list_todos(State(state): State<AppState>) -> Json<Vec<Todo>> {
    state.settle().await;
    let todos = state.db.read().await;
    tracing::debug!(count = todos.len(), "listing todos");
    Json(todos.clone())
}

async fn create_todo(State(state): State<AppState>, Json(input): Json<NewTodo>) -> StatusCode {
    state.settle().await;
    let todo = Todo {
        id: Uuid::new_v4(),
        description: input.description,
        is_done: false,
    };
    tracing::info!(id = %todo.id, description = %todo.description, "created todo");
    state.db.write().await.push(todo);
    StatusCode::CREATED
}

async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<Todo>,
) -> StatusCode {
    state.settle().await;
    if input.id != id {
        return StatusCode::BAD_REQUEST;
    }
    let mut todos = state.db.write().await;
    let Some(stored) = todos.iter_mut().find(|t| t.id == id) else {
        return StatusCode::NOT_FOUND;
    };
    // Done stays done.
    let is_done = stored.is_done || input.is_done;
    *stored = Todo { is_done, ..input };
    tracing::info!(%id, is_done, "updated todo");
    StatusCode::OK
}

async fn delete_todo(State(state): State<AppState>, Path(id): Path<Uuid>) -> StatusCode {
    state.settle().await;
    let mut todos = state.db.write().await;
    let before = todos.len();
    todos.retain(|t| t.id != id);
    tracing::info!(%id, removed = before != todos.len(), "deleted todo");
    StatusCode::NO_CONTENT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn todo_serializes_with_camel_case_fields() {
        let todo = Todo {
            id: Uuid::nil(),
            description: "Test".to_string(),
            is_done: false,
        };
        let json = serde_json::to_value(&todo).unwrap();
        assert_eq!(json["id"], "00000000-0000-0000-0000-000000000000");
        assert_eq!(json["description"], "Test");
        assert_eq!(json["isDone"], false);
    }

    #[test]
    fn new_todo_ignores_extra_fields() {
        let input: NewTodo =
            serde_json::from_str(r#"{"description":"Done","isDone":true}"#).unwrap();
        assert_eq!(input.description, "Done");
    }

    #[test]
    fn new_todo_rejects_missing_description() {
        let result: Result<NewTodo, _> = serde_json::from_str(r#"{"isDone":true}"#);
        assert!(result.is_err());
    }

    #[test]
    fn demo_todos_are_open_and_distinct() {
        let todos = demo_todos();
        assert_eq!(todos.len(), 2);
        assert!(todos.iter().all(|t| !t.is_done));
        assert_ne!(todos[0].id, todos[1].id);
    }
}
