//! The remote store boundary the list controller talks to.
//!
//! # Design
//! Mutations acknowledge without a payload, so a caller only learns the
//! outcome of `create`/`update`/`delete` by listing again. Two
//! implementations ship here:
//! - `InMemoryFacade` keeps the store in process and answers after a fixed
//!   simulated latency.
//! - `HttpFacade` pairs the stateless `TodoClient` with a `Transport` and
//!   speaks the `/todos` JSON contract.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::client::TodoClient;
use crate::error::ApiError;
use crate::transport::{Transport, UreqTransport};
use crate::types::{NewTodo, Todo};

/// Simulated round-trip time of the in-memory store.
pub const DEFAULT_LATENCY: Duration = Duration::from_millis(500);

/// Asynchronous access to the authoritative todo store.
#[async_trait]
pub trait RemoteFacade: Send + Sync {
    /// Full store contents in insertion order.
    async fn list(&self) -> Result<Vec<Todo>, ApiError>;

    /// Store a new, not-done item under a fresh id.
    async fn create(&self, description: &str) -> Result<(), ApiError>;

    /// Replace the stored item that has the same id.
    async fn update(&self, todo: &Todo) -> Result<(), ApiError>;

    /// Remove the item with this id. Absent ids are not an error.
    async fn delete(&self, id: Uuid) -> Result<(), ApiError>;
}

#[async_trait]
impl<F: RemoteFacade + ?Sized> RemoteFacade for Arc<F> {
    async fn list(&self) -> Result<Vec<Todo>, ApiError> {
        (**self).list().await
    }

    async fn create(&self, description: &str) -> Result<(), ApiError> {
        (**self).create(description).await
    }

    async fn update(&self, todo: &Todo) -> Result<(), ApiError> {
        (**self).update(todo).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        (**self).delete(id).await
    }
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

/// Process-local store that answers every call after `latency`.
#[derive(Debug)]
pub struct InMemoryFacade {
    store: Mutex<Vec<Todo>>,
    latency: Duration,
    calls: AtomicUsize,
}

impl InMemoryFacade {
    /// Empty store with `DEFAULT_LATENCY`.
    pub fn new() -> Self {
        Self::with_items(Vec::new())
    }

    /// Store preloaded with the two demo items.
    pub fn seeded() -> Self {
        Self::with_items(vec![
            Todo {
                id: Uuid::new_v4(),
                description: "say hello".to_string(),
                is_done: false,
            },
            Todo {
                id: Uuid::new_v4(),
                description: "say hello again".to_string(),
                is_done: false,
            },
        ])
    }

    pub fn with_items(items: Vec<Todo>) -> Self {
        Self {
            store: Mutex::new(items),
            latency: DEFAULT_LATENCY,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Number of facade operations started so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Current store contents, without simulated latency.
    pub async fn snapshot(&self) -> Vec<Todo> {
        self.store.lock().await.clone()
    }

    async fn settle(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

impl Default for InMemoryFacade {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemoteFacade for InMemoryFacade {
    async fn list(&self) -> Result<Vec<Todo>, ApiError> {
        self.settle().await;
        Ok(self.store.lock().await.clone())
    }

    async fn create(&self, description: &str) -> Result<(), ApiError> {
        tracing::info!(description, "posting new todo");
        self.settle().await;
        self.store.lock().await.push(Todo {
            id: Uuid::new_v4(),
            description: description.to_string(),
            is_done: false,
        });
        Ok(())
    }

    async fn update(&self, todo: &Todo) -> Result<(), ApiError> {
        tracing::info!(id = %todo.id, is_done = todo.is_done, "updating todo");
        self.settle().await;
        let mut store = self.store.lock().await;
        let stored = store
            .iter_mut()
            .find(|t| t.id == todo.id)
            .ok_or(ApiError::NotFound)?;
        let was_done = stored.is_done;
        *stored = todo.clone();
        stored.is_done |= was_done;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        tracing::info!(%id, "deleting todo");
        self.settle().await;
        self.store.lock().await.retain(|t| t.id != id);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// HTTP
// ---------------------------------------------------------------------------

/// Remote store reached over the `/todos` HTTP contract.
#[derive(Debug, Clone)]
pub struct HttpFacade<T = UreqTransport> {
    client: TodoClient,
    transport: T,
}

impl HttpFacade<UreqTransport> {
    /// Talk to `base_url` through a blocking `ureq` agent.
    pub fn connect(base_url: &str) -> Self {
        Self::with_transport(base_url, UreqTransport::new())
    }
}

impl<T: Transport> HttpFacade<T> {
    pub fn with_transport(base_url: &str, transport: T) -> Self {
        Self {
            client: TodoClient::new(base_url),
            transport,
        }
    }

    pub fn client(&self) -> &TodoClient {
        &self.client
    }
}

#[async_trait]
impl<T: Transport> RemoteFacade for HttpFacade<T> {
    async fn list(&self) -> Result<Vec<Todo>, ApiError> {
        let response = self.transport.execute(self.client.build_list_todos()).await?;
        self.client.parse_list_todos(response)
    }

    async fn create(&self, description: &str) -> Result<(), ApiError> {
        let input = NewTodo {
            description: description.to_string(),
        };
        let request = self.client.build_create_todo(&input)?;
        let response = self.transport.execute(request).await?;
        self.client.parse_create_todo(response)
    }

    async fn update(&self, todo: &Todo) -> Result<(), ApiError> {
        let request = self.client.build_update_todo(todo)?;
        let response = self.transport.execute(request).await?;
        self.client.parse_update_todo(response)
    }

    async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        let response = self.transport.execute(self.client.build_delete_todo(id)).await?;
        match self.client.parse_delete_todo(response) {
            Err(ApiError::NotFound) => {
                tracing::debug!(%id, "delete of absent todo treated as done");
                Ok(())
            }
            other => other,
        }
    }
}
