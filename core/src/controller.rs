//! Client-side todo list state machine.
//!
//! # Design
//! `ListController` owns the local projection of the store plus the text the
//! user is typing. Every mutation goes to the `RemoteFacade` first and is
//! followed by a full `refresh()`; nothing is patched locally except the
//! confirmed bulk removal of completed items, which deliberately skips the
//! store and may diverge from it until the next refresh.
//!
//! Refreshes can complete out of order when mutations overlap. Each refresh
//! takes a ticket from a monotonic counter before it calls `list`, and its
//! result is only applied when no newer ticket has been applied already. The
//! local bulk removal takes a ticket too, so a refresh issued before it
//! cannot bring the removed items back.
//!
//! No lock is held across a facade call.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::ApiError;
use crate::facade::RemoteFacade;
use crate::types::Todo;

/// Question asked before completed items are removed in bulk.
pub const REMOVE_COMPLETED_PROMPT: &str = "Are you sure you want to remove all completed tasks?";

/// Yes/no prompt the controller asks before destructive bulk actions.
pub trait Confirm: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// User-visible, dismissible report of a failed store call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
}

impl Notice {
    fn from_error(context: &str, err: &ApiError) -> Self {
        Self {
            message: format!("{context}: {err}"),
        }
    }
}

/// What happened to the list returned by a refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    /// The result replaced the local items.
    Applied,
    /// A newer result had already been applied; this one was dropped.
    Discarded,
}

#[derive(Debug, Default)]
struct ListState {
    items: Vec<Todo>,
    pending_text: String,
    notice: Option<Notice>,
    applied_ticket: u64,
}

/// Holds the local todo list and reconciles it with a `RemoteFacade`.
pub struct ListController<F, C> {
    facade: F,
    confirm: C,
    state: RwLock<ListState>,
    tickets: AtomicU64,
}

impl<F: RemoteFacade, C: Confirm> ListController<F, C> {
    /// Starts with an empty list; call `refresh` to load the store.
    pub fn new(facade: F, confirm: C) -> Self {
        Self {
            facade,
            confirm,
            state: RwLock::new(ListState::default()),
            tickets: AtomicU64::new(0),
        }
    }

    pub fn facade(&self) -> &F {
        &self.facade
    }

    pub async fn items(&self) -> Vec<Todo> {
        self.state.read().await.items.clone()
    }

    pub async fn pending_text(&self) -> String {
        self.state.read().await.pending_text.clone()
    }

    pub async fn set_pending_text(&self, text: impl Into<String>) {
        self.state.write().await.pending_text = text.into();
    }

    pub async fn notice(&self) -> Option<Notice> {
        self.state.read().await.notice.clone()
    }

    pub async fn dismiss_notice(&self) {
        self.state.write().await.notice = None;
    }

    /// Replace the local items with the store's full list.
    ///
    /// An applied list clears any notice. On failure the items are left as
    /// they were and a notice is recorded, unless a newer list has already
    /// been applied, in which case the failure is discarded like a stale list.
    pub async fn refresh(&self) -> Result<Reconciliation, ApiError> {
        let ticket = self.next_ticket();
        let result = self.facade.list().await;

        let mut state = self.state.write().await;
        match result {
            Ok(items) if ticket > state.applied_ticket => {
                tracing::debug!(ticket, count = items.len(), "applying refreshed list");
                state.applied_ticket = ticket;
                state.items = items;
                state.notice = None;
                Ok(Reconciliation::Applied)
            }
            Ok(_) => {
                tracing::debug!(ticket, applied = state.applied_ticket, "discarding stale list");
                Ok(Reconciliation::Discarded)
            }
            Err(err) if ticket <= state.applied_ticket => {
                tracing::debug!(ticket, applied = state.applied_ticket, error = %err, "discarding stale refresh failure");
                Ok(Reconciliation::Discarded)
            }
            Err(err) => {
                tracing::warn!(ticket, error = %err, "refresh failed");
                state.notice = Some(Notice::from_error("Could not load todos", &err));
                Err(err)
            }
        }
    }

    /// Send the pending text to the store as a new item.
    ///
    /// Returns `Ok(false)` without touching the store when the text is blank.
    /// The new item only shows up through the refresh that follows.
    pub async fn submit_new(&self) -> Result<bool, ApiError> {
        let text = self.pending_text().await;
        if text.trim().is_empty() {
            return Ok(false);
        }

        if let Err(err) = self.facade.create(&text).await {
            return Err(self.fail("Could not add todo", err).await);
        }
        self.state.write().await.pending_text.clear();
        self.refresh().await?;
        Ok(true)
    }

    /// Mark `todo` done in the store, then reload.
    pub async fn complete(&self, todo: &Todo) -> Result<(), ApiError> {
        if let Err(err) = self.facade.update(&todo.completed()).await {
            return Err(self.fail("Could not complete todo", err).await);
        }
        self.refresh().await?;
        Ok(())
    }

    /// Delete one item from the store, then reload.
    pub async fn remove_one(&self, id: Uuid) -> Result<(), ApiError> {
        if let Err(err) = self.facade.delete(id).await {
            return Err(self.fail("Could not remove todo", err).await);
        }
        self.refresh().await?;
        Ok(())
    }

    /// After confirmation, drop every done item from the local list only.
    ///
    /// The store is not called, so the removed items come back on the next
    /// refresh unless they were also deleted remotely. Returns whether the
    /// prompt was confirmed.
    pub async fn remove_all_completed(&self) -> bool {
        if !self.confirm.confirm(REMOVE_COMPLETED_PROMPT) {
            tracing::debug!("bulk removal declined");
            return false;
        }

        let ticket = self.next_ticket();
        let mut state = self.state.write().await;
        state.applied_ticket = state.applied_ticket.max(ticket);
        let before = state.items.len();
        state.items.retain(|t| !t.is_done);
        tracing::info!(removed = before - state.items.len(), "removed completed todos locally");
        true
    }

    fn next_ticket(&self) -> u64 {
        self.tickets.fetch_add(1, Ordering::SeqCst) + 1
    }

    async fn fail(&self, context: &str, err: ApiError) -> ApiError {
        tracing::warn!(error = %err, "{context}");
        self.state.write().await.notice = Some(Notice::from_error(context, &err));
        err
    }
}
