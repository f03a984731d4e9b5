//! Synchronization client core for the todo service.
//!
//! # Overview
//! A client-side state store for a paginated todo REST API: server-driven
//! pagination, optimistic create/update/toggle/delete with snapshot
//! rollback, and a second unfiltered view feeding completion-time metrics.
//!
//! # Design
//! - `TodoClient` is stateless — it holds only `base_url`. Each operation is
//!   split into `build_*` (produces a request) and `parse_*` (consumes a
//!   response); a host-supplied `Transport` executes the round-trip
//!   (host-does-IO pattern), keeping the core deterministic.
//! - `TodoStore` owns page/filter/sort state and the two views, and talks to
//!   the network only through the `TodoApi` trait, so its semantics are unit
//!   tested against a scripted fake.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod metrics;
pub mod store;
pub mod types;

pub use api::{HttpTodoApi, PageQuery, TodoApi};
pub use client::{TodoClient, LIST_ALL_MAX};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use metrics::{format_duration, CompletionMetrics};
pub use store::{TodoStore, PAGE_SIZES};
pub use types::{
    CreateTodo, Priority, SortDir, SortKey, Sorting, StateFilter, Todo, TodoFilters, TodoId,
    TodoPage, UpdateTodo,
};
