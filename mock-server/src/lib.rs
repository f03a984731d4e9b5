//! In-memory reference implementation of the todo REST interface.
//!
//! Serves the same contract the production backend exposes: a paginated,
//! filterable, sortable `/api/todos` collection with 0-based `pageNumber`,
//! server-enum `sortBy` values, and a PATCH endpoint for completion state.
//! Used by the core crate's integration tests and runnable standalone.

use std::{cmp::Ordering, collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: u64,
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub done: bool,
    pub done_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub due_date: Option<DateTime<Utc>>,
}

/// Body for both create (POST) and update (PUT). On update, omitted
/// optional fields leave the stored value unchanged.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse {
    pub content: Vec<Todo>,
    pub page_number: u32,
    pub page_size: u32,
    pub total_elements: usize,
    pub total_pages: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    #[serde(default)]
    pub page_number: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    pub sort_by: Option<String>,
    pub sort_dir: Option<String>,
    pub text: Option<String>,
    pub priority: Option<Priority>,
    pub done: Option<bool>,
}

fn default_page_size() -> u32 {
    10
}

#[derive(Debug, Deserialize)]
pub struct DoneParams {
    pub done: bool,
}

#[derive(Default)]
pub struct Repo {
    seq: u64,
    todos: HashMap<u64, Todo>,
}

pub type Db = Arc<RwLock<Repo>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Repo::default()));
    Router::new().nest(
        "/api",
        Router::new()
            .route("/todos", get(list_todos).post(create_todo))
            .route(
                "/todos/{id}",
                get(get_todo).put(update_todo).delete(delete_todo),
            )
            .route("/todos/{id}/done", patch(set_done))
            .with_state(db),
    )
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SortField {
    CreationDate,
    Priority,
    DueDate,
    Done,
}

/// Accepts the server enum names plus the legacy client-side keys; anything
/// unrecognized falls back to creation date, matching the production
/// backend.
fn parse_sort_field(sort_by: Option<&str>) -> SortField {
    match sort_by {
        Some("PRIORITY") | Some("priority") => SortField::Priority,
        Some("DUE_DATE") | Some("dueDate") => SortField::DueDate,
        Some("DONE") | Some("done") | Some("isDone") => SortField::Done,
        _ => SortField::CreationDate,
    }
}

/// Nulls-last comparison for the chosen field. Descending order reverses the
/// whole ordering, null placement included.
fn compare(field: SortField, a: &Todo, b: &Todo) -> Ordering {
    match field {
        SortField::CreationDate => a.created_at.cmp(&b.created_at),
        SortField::Priority => a.priority.cmp(&b.priority),
        SortField::Done => a.done.cmp(&b.done),
        SortField::DueDate => match (a.due_date, b.due_date) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
    }
}

fn matches_filters(todo: &Todo, params: &ListParams) -> bool {
    if let Some(needle) = &params.text {
        let needle = needle.to_lowercase();
        let in_title = todo.title.to_lowercase().contains(&needle);
        let in_description = todo
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(&needle));
        if !in_title && !in_description {
            return false;
        }
    }
    if let Some(priority) = params.priority {
        if todo.priority != priority {
            return false;
        }
    }
    if let Some(done) = params.done {
        if todo.done != done {
            return false;
        }
    }
    true
}

async fn list_todos(State(db): State<Db>, Query(params): Query<ListParams>) -> Json<PageResponse> {
    let repo = db.read().await;
    let mut filtered: Vec<Todo> = repo
        .todos
        .values()
        .filter(|t| matches_filters(t, &params))
        .cloned()
        .collect();

    let field = parse_sort_field(params.sort_by.as_deref());
    let descending = params.sort_dir.as_deref().is_some_and(|d| d.eq_ignore_ascii_case("desc"));
    filtered.sort_by(|a, b| {
        let ordering = compare(field, a, b);
        if descending {
            ordering.reverse()
        } else {
            ordering
        }
    });

    let total = filtered.len();
    let page_size = params.page_size.max(1);
    let from = ((params.page_number as usize) * (page_size as usize)).min(total);
    let to = (from + page_size as usize).min(total);
    let total_pages = total.div_ceil(page_size as usize) as u32;

    Json(PageResponse {
        content: filtered[from..to].to_vec(),
        page_number: params.page_number,
        page_size,
        total_elements: total,
        total_pages,
    })
}

async fn create_todo(
    State(db): State<Db>,
    Json(input): Json<TodoRequest>,
) -> (StatusCode, Json<Todo>) {
    let mut repo = db.write().await;
    repo.seq += 1;
    let now = Utc::now();
    let todo = Todo {
        id: repo.seq,
        title: input.title,
        description: input.description,
        priority: input.priority.unwrap_or(Priority::Medium),
        done: false,
        done_date: None,
        created_at: now,
        updated_at: now,
        due_date: input.due_date,
    };
    repo.todos.insert(todo.id, todo.clone());
    (StatusCode::CREATED, Json(todo))
}

async fn get_todo(State(db): State<Db>, Path(id): Path<u64>) -> Result<Json<Todo>, StatusCode> {
    let repo = db.read().await;
    repo.todos.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn update_todo(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(input): Json<TodoRequest>,
) -> Result<Json<Todo>, StatusCode> {
    let mut repo = db.write().await;
    let todo = repo.todos.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    todo.title = input.title;
    if let Some(description) = input.description {
        todo.description = Some(description);
    }
    if let Some(priority) = input.priority {
        todo.priority = priority;
    }
    if let Some(due_date) = input.due_date {
        todo.due_date = Some(due_date);
    }
    todo.updated_at = Utc::now();
    Ok(Json(todo.clone()))
}

async fn set_done(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Query(params): Query<DoneParams>,
) -> Result<Json<Todo>, StatusCode> {
    let mut repo = db.write().await;
    let todo = repo.todos.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    let now = Utc::now();
    todo.done = params.done;
    todo.done_date = params.done.then_some(now);
    todo.updated_at = now;
    Ok(Json(todo.clone()))
}

async fn delete_todo(State(db): State<Db>, Path(id): Path<u64>) -> Result<StatusCode, StatusCode> {
    let mut repo = db.write().await;
    repo.todos
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or(StatusCode::NOT_FOUND)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn todo(id: u64) -> Todo {
        let created = Utc.with_ymd_and_hms(2026, 1, 1, 9, 0, 0).unwrap();
        Todo {
            id,
            title: format!("Task {id}"),
            description: None,
            priority: Priority::Medium,
            done: false,
            done_date: None,
            created_at: created,
            updated_at: created,
            due_date: None,
        }
    }

    #[test]
    fn todo_serializes_camel_case() {
        let json = serde_json::to_value(todo(1)).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["priority"], "MEDIUM");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("doneDate").is_some());
        assert!(json.get("created_at").is_none());
    }

    #[test]
    fn request_defaults_optional_fields() {
        let input: TodoRequest = serde_json::from_str(r#"{"title":"Just a title"}"#).unwrap();
        assert_eq!(input.title, "Just a title");
        assert!(input.priority.is_none());
        assert!(input.due_date.is_none());
    }

    #[test]
    fn request_rejects_missing_title() {
        let result: Result<TodoRequest, _> = serde_json::from_str(r#"{"priority":"LOW"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn sort_field_accepts_enum_and_legacy_names() {
        assert_eq!(parse_sort_field(Some("CREATION_DATE")), SortField::CreationDate);
        assert_eq!(parse_sort_field(Some("createdAt")), SortField::CreationDate);
        assert_eq!(parse_sort_field(Some("PRIORITY")), SortField::Priority);
        assert_eq!(parse_sort_field(Some("dueDate")), SortField::DueDate);
        assert_eq!(parse_sort_field(Some("DONE")), SortField::Done);
        assert_eq!(parse_sort_field(Some("nonsense")), SortField::CreationDate);
        assert_eq!(parse_sort_field(None), SortField::CreationDate);
    }

    #[test]
    fn due_date_sort_puts_missing_dates_last() {
        let mut with_due = todo(1);
        with_due.due_date = Some(Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap());
        let without_due = todo(2);
        assert_eq!(compare(SortField::DueDate, &with_due, &without_due), Ordering::Less);
        assert_eq!(compare(SortField::DueDate, &without_due, &with_due), Ordering::Greater);
    }

    #[test]
    fn text_filter_searches_title_and_description() {
        let mut t = todo(1);
        t.description = Some("Pick up the DRY cleaning".to_string());
        let params = ListParams {
            page_number: 0,
            page_size: 10,
            sort_by: None,
            sort_dir: None,
            text: Some("dry".to_string()),
            priority: None,
            done: None,
        };
        assert!(matches_filters(&t, &params));

        let miss = todo(2);
        assert!(!matches_filters(&miss, &params));
    }
}
