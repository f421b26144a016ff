//! Domain DTOs for the todo API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently.
//! Integration tests catch any schema drift between the two crates. Field
//! names go over the wire in camelCase (`isDone`).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single todo item as held by the store and the list controller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: Uuid,
    pub description: String,
    pub is_done: bool,
}

impl Todo {
    /// A copy of this item with `is_done` forced to true.
    pub fn completed(&self) -> Self {
        Self {
            is_done: true,
            ..self.clone()
        }
    }
}

/// Request payload for creating a new todo. The store assigns the id and
/// starts the item out as not done.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewTodo {
    pub description: String,
}
