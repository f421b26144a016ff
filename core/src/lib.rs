//! Client core for the todo service.
//!
//! # Overview
//! `ListController` keeps a local projection of a remote todo store and the
//! text of the item being typed. Every mutation is acknowledged by the store
//! without a payload and followed by a full reload of the list.
//!
//! # Design
//! - `TodoClient` builds `HttpRequest` values and parses `HttpResponse`
//!   values without touching the network (host-does-IO pattern).
//! - `Transport` executes a request; `UreqTransport` is the stock one.
//! - `RemoteFacade` is the store boundary, implemented by `HttpFacade`
//!   (client + transport) and `InMemoryFacade` (simulated latency).
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod controller;
pub mod error;
pub mod facade;
pub mod http;
pub mod transport;
pub mod types;

pub use client::TodoClient;
pub use controller::{Confirm, ListController, Notice, Reconciliation, REMOVE_COMPLETED_PROMPT};
pub use error::ApiError;
pub use facade::{HttpFacade, InMemoryFacade, RemoteFacade, DEFAULT_LATENCY};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{Transport, UreqTransport};
pub use types::{NewTodo, Todo};
