//! Domain model for the todo service.
//!
//! # Design
//! These types mirror the server's JSON schema (camelCase on the wire) but
//! are defined independently of the mock-server crate; integration tests
//! catch any schema drift. `TodoPage` deserializes leniently so a missing or
//! malformed `content`/`totalPages` field degrades to a safe default instead
//! of failing the whole response.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Task urgency, ordered ascending: `Low < Medium < High < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::Low,
        Priority::Medium,
        Priority::High,
        Priority::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "LOW",
            Priority::Medium => "MEDIUM",
            Priority::High => "HIGH",
            Priority::Critical => "CRITICAL",
        }
    }
}

/// A todo identifier. The server assigns numeric ids; the store assigns
/// `tmp-`-prefixed string ids to records awaiting server confirmation, so a
/// temporary id can never collide with a server-assigned one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TodoId {
    Number(u64),
    Text(String),
}

impl TodoId {
    /// True for client-assigned placeholder ids not yet confirmed by the
    /// server.
    pub fn is_temporary(&self) -> bool {
        matches!(self, TodoId::Text(s) if s.starts_with("tmp-"))
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TodoId::Number(n) => write!(f, "{n}"),
            TodoId::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<u64> for TodoId {
    fn from(n: u64) -> Self {
        TodoId::Number(n)
    }
}

/// A single todo record.
///
/// Invariant: `done_date` is `Some` if and only if `done` is true. The store
/// maintains this optimistically; the server's post-response record is
/// always authoritative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub priority: Priority,
    pub done: bool,
    #[serde(default)]
    pub done_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
}

/// Request payload for creating a todo. The server defaults `priority` to
/// `MEDIUM` when omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodo {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
}

/// Request payload for updating a todo. Only the fields present in the JSON
/// are applied; omitted fields remain unchanged on the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTodo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
}

/// One page of the paginated listing.
///
/// `content` and `totalPages` tolerate missing or malformed values: the
/// store would rather render an empty page than fail the fetch outright.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoPage {
    #[serde(default, deserialize_with = "lenient_content")]
    pub content: Vec<Todo>,
    #[serde(default, deserialize_with = "lenient_total_pages")]
    pub total_pages: Option<u32>,
}

fn lenient_content<'de, D>(deserializer: D) -> Result<Vec<Todo>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

fn lenient_total_pages<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_u64().and_then(|n| u32::try_from(n).ok()))
}

/// Column the server sorts by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    CreatedAt,
    Priority,
    DueDate,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDir {
    Asc,
    Desc,
}

/// Sort criteria sent with every page request. The server is authoritative
/// for ordering; the store only approximates it when inserting optimistic
/// rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sorting {
    pub key: SortKey,
    pub dir: SortDir,
}

impl Default for Sorting {
    fn default() -> Self {
        Sorting {
            key: SortKey::CreatedAt,
            dir: SortDir::Desc,
        }
    }
}

/// Completion-state filter: show everything, only done, or only open tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StateFilter {
    #[default]
    All,
    Done,
    Undone,
}

/// Filter criteria as the user entered them. `normalized` converts them to
/// the optional query values the server expects, dropping unset fields.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TodoFilters {
    pub text: String,
    pub priority: Option<Priority>,
    pub state: StateFilter,
}

/// Filter values ready to be sent as query parameters. Unset filters are
/// `None` and omitted from the request entirely.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NormalizedFilters {
    pub text: Option<String>,
    pub priority: Option<Priority>,
    pub done: Option<bool>,
}

impl TodoFilters {
    pub fn normalized(&self) -> NormalizedFilters {
        let text = self.text.trim();
        NormalizedFilters {
            text: (!text.is_empty()).then(|| text.to_string()),
            priority: self.priority,
            done: match self.state {
                StateFilter::All => None,
                StateFilter::Done => Some(true),
                StateFilter::Undone => Some(false),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_orders_by_urgency() {
        assert!(Priority::Low < Priority::Medium);
        assert!(Priority::High < Priority::Critical);
    }

    #[test]
    fn priority_serializes_uppercase() {
        assert_eq!(serde_json::to_value(Priority::Critical).unwrap(), "CRITICAL");
        let p: Priority = serde_json::from_str(r#""LOW""#).unwrap();
        assert_eq!(p, Priority::Low);
    }

    #[test]
    fn todo_id_accepts_numbers_and_strings() {
        let n: TodoId = serde_json::from_str("42").unwrap();
        assert_eq!(n, TodoId::Number(42));
        let s: TodoId = serde_json::from_str(r#""tmp-1700000000000""#).unwrap();
        assert!(s.is_temporary());
        assert!(!n.is_temporary());
    }

    #[test]
    fn todo_deserializes_from_wire_shape() {
        let todo: Todo = serde_json::from_str(
            r#"{
                "id": 7,
                "title": "Water plants",
                "priority": "HIGH",
                "done": true,
                "doneDate": "2026-01-02T10:00:00Z",
                "createdAt": "2026-01-01T09:00:00Z",
                "updatedAt": "2026-01-02T10:00:00Z"
            }"#,
        )
        .unwrap();
        assert_eq!(todo.id, TodoId::Number(7));
        assert!(todo.done);
        assert!(todo.done_date.is_some());
        assert!(todo.description.is_none());
        assert!(todo.due_date.is_none());
    }

    #[test]
    fn update_todo_omits_unset_fields() {
        let patch = UpdateTodo {
            title: Some("New".to_string()),
            ..UpdateTodo::default()
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json["title"], "New");
        assert!(json.get("priority").is_none());
        assert!(json.get("dueDate").is_none());
    }

    #[test]
    fn page_defaults_missing_fields() {
        let page: TodoPage = serde_json::from_str("{}").unwrap();
        assert!(page.content.is_empty());
        assert!(page.total_pages.is_none());
    }

    #[test]
    fn page_defaults_malformed_fields() {
        let page: TodoPage =
            serde_json::from_str(r#"{"content": "garbage", "totalPages": "three"}"#).unwrap();
        assert!(page.content.is_empty());
        assert!(page.total_pages.is_none());

        let page: TodoPage = serde_json::from_str(r#"{"content": [], "totalPages": -2}"#).unwrap();
        assert!(page.total_pages.is_none());
    }

    #[test]
    fn normalized_filters_drop_unset_values() {
        let filters = TodoFilters::default();
        assert_eq!(filters.normalized(), NormalizedFilters::default());

        let filters = TodoFilters {
            text: "  groceries ".to_string(),
            priority: Some(Priority::High),
            state: StateFilter::Undone,
        };
        let n = filters.normalized();
        assert_eq!(n.text.as_deref(), Some("groceries"));
        assert_eq!(n.priority, Some(Priority::High));
        assert_eq!(n.done, Some(false));
    }
}
