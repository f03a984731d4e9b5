//! Stateless HTTP request builder and response parser for the todo API.
//!
//! # Design
//! `TodoClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`. The
//! host executes the actual round-trip, keeping the core deterministic and
//! free of I/O dependencies.
//!
//! Request mapping: the store's 1-based page becomes the server's 0-based
//! `pageNumber`; sort keys map through a fixed table to the server's enum
//! vocabulary (`createdAt` → `CREATION_DATE` and so on); unset filter values
//! are omitted from the query entirely rather than sent empty.

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

use crate::api::PageQuery;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{CreateTodo, SortDir, SortKey, Todo, TodoId, TodoPage, UpdateTodo};

/// Upper bound on the unpaginated metrics fetch.
pub const LIST_ALL_MAX: u32 = 2000;

/// Synchronous, stateless client for the todo API.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network. The caller is responsible for executing the HTTP
/// round-trip between `build_*` and `parse_*`.
#[derive(Debug, Clone)]
pub struct TodoClient {
    base_url: String,
}

impl TodoClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn build_list_page(&self, query: &PageQuery) -> HttpRequest {
        let mut params = format!(
            "pageNumber={}&pageSize={}&sortBy={}&sortDir={}",
            query.page.saturating_sub(1),
            query.size,
            sort_field(query.sorting.key),
            sort_dir(query.sorting.dir),
        );
        if let Some(text) = &query.text {
            params.push_str("&text=");
            params.push_str(&utf8_percent_encode(text, NON_ALPHANUMERIC).to_string());
        }
        if let Some(priority) = query.priority {
            params.push_str("&priority=");
            params.push_str(priority.as_str());
        }
        if let Some(done) = query.done {
            params.push_str("&done=");
            params.push_str(if done { "true" } else { "false" });
        }
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/todos?{params}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    /// One unpaginated page holding the whole dataset, capped at `max`,
    /// newest first and unfiltered. Feeds the metrics view.
    pub fn build_list_all(&self, max: u32) -> HttpRequest {
        self.build_list_page(&PageQuery {
            page: 1,
            size: max,
            ..PageQuery::default()
        })
    }

    pub fn build_get_todo(&self, id: &TodoId) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/todos/{id}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_create_todo(&self, input: &CreateTodo) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}/todos", self.base_url),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }

    pub fn build_update_todo(&self, id: &TodoId, input: &UpdateTodo) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Put,
            path: format!("{}/todos/{id}", self.base_url),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }

    pub fn build_toggle_done(&self, id: &TodoId, done: bool) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Patch,
            path: format!("{}/todos/{id}/done?done={done}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_delete_todo(&self, id: &TodoId) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            path: format!("{}/todos/{id}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn parse_list_page(&self, response: HttpResponse) -> Result<TodoPage, ApiError> {
        check_status(&response, 200)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    pub fn parse_list_all(&self, response: HttpResponse) -> Result<Vec<Todo>, ApiError> {
        self.parse_list_page(response).map(|page| page.content)
    }

    pub fn parse_get_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        check_status(&response, 200)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    pub fn parse_create_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        check_status(&response, 201)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    pub fn parse_update_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        check_status(&response, 200)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    pub fn parse_toggle_done(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        check_status(&response, 200)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    pub fn parse_delete_todo(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 204)?;
        Ok(())
    }
}

/// Client sort vocabulary → server sort enum.
fn sort_field(key: SortKey) -> &'static str {
    match key {
        SortKey::CreatedAt => "CREATION_DATE",
        SortKey::Priority => "PRIORITY",
        SortKey::DueDate => "DUE_DATE",
        SortKey::Done => "DONE",
    }
}

fn sort_dir(dir: SortDir) -> &'static str {
    match dir {
        SortDir::Asc => "asc",
        SortDir::Desc => "desc",
    }
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}
