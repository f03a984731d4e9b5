//! The API seam between the synchronization store and the network.
//!
//! # Design
//! `TodoApi` is the store's only dependency: unit tests script it with a
//! fake, integration tests use `HttpTodoApi`, which composes the sans-IO
//! `TodoClient` with a host-supplied `Transport` for each round-trip. All
//! operations propagate failures to the caller; no retries, no optimistic
//! bookkeeping at this layer.

use crate::client::TodoClient;
use crate::error::ApiError;
use crate::http::Transport;
use crate::types::{CreateTodo, Priority, Sorting, Todo, TodoId, TodoPage, UpdateTodo};

/// Parameters for one page request, in client vocabulary (1-based page,
/// unset filters as `None`).
#[derive(Debug, Clone, PartialEq)]
pub struct PageQuery {
    pub page: u32,
    pub size: u32,
    pub sorting: Sorting,
    pub text: Option<String>,
    pub priority: Option<Priority>,
    pub done: Option<bool>,
}

impl Default for PageQuery {
    fn default() -> Self {
        PageQuery {
            page: 1,
            size: 10,
            sorting: Sorting::default(),
            text: None,
            priority: None,
            done: None,
        }
    }
}

/// Remote operations on the todo collection.
pub trait TodoApi {
    fn list_page(&self, query: &PageQuery) -> Result<TodoPage, ApiError>;
    fn list_all(&self, max: u32) -> Result<Vec<Todo>, ApiError>;
    fn get_todo(&self, id: &TodoId) -> Result<Todo, ApiError>;
    fn create_todo(&self, input: &CreateTodo) -> Result<Todo, ApiError>;
    fn update_todo(&self, id: &TodoId, input: &UpdateTodo) -> Result<Todo, ApiError>;
    fn toggle_done(&self, id: &TodoId, done: bool) -> Result<Todo, ApiError>;
    fn delete_todo(&self, id: &TodoId) -> Result<(), ApiError>;
}

/// `TodoApi` over real HTTP: builds each request with `TodoClient`, executes
/// it through the transport, and parses the response.
#[derive(Debug, Clone)]
pub struct HttpTodoApi<T> {
    client: TodoClient,
    transport: T,
}

impl<T: Transport> HttpTodoApi<T> {
    pub fn new(client: TodoClient, transport: T) -> Self {
        Self { client, transport }
    }
}

impl<T: Transport> TodoApi for HttpTodoApi<T> {
    fn list_page(&self, query: &PageQuery) -> Result<TodoPage, ApiError> {
        let request = self.client.build_list_page(query);
        self.client.parse_list_page(self.transport.execute(request)?)
    }

    fn list_all(&self, max: u32) -> Result<Vec<Todo>, ApiError> {
        let request = self.client.build_list_all(max);
        self.client.parse_list_all(self.transport.execute(request)?)
    }

    fn get_todo(&self, id: &TodoId) -> Result<Todo, ApiError> {
        let request = self.client.build_get_todo(id);
        self.client.parse_get_todo(self.transport.execute(request)?)
    }

    fn create_todo(&self, input: &CreateTodo) -> Result<Todo, ApiError> {
        let request = self.client.build_create_todo(input)?;
        self.client.parse_create_todo(self.transport.execute(request)?)
    }

    fn update_todo(&self, id: &TodoId, input: &UpdateTodo) -> Result<Todo, ApiError> {
        let request = self.client.build_update_todo(id, input)?;
        self.client.parse_update_todo(self.transport.execute(request)?)
    }

    fn toggle_done(&self, id: &TodoId, done: bool) -> Result<Todo, ApiError> {
        let request = self.client.build_toggle_done(id, done);
        self.client.parse_toggle_done(self.transport.execute(request)?)
    }

    fn delete_todo(&self, id: &TodoId) -> Result<(), ApiError> {
        let request = self.client.build_delete_todo(id);
        self.client.parse_delete_todo(self.transport.execute(request)?)
    }
}
