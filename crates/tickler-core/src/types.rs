use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a todo (UUIDv7: time-sortable, so ids follow creation order).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(pub String);

impl TodoId {
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TodoId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for TodoId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TodoId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A persisted todo record.
///
/// Serialised in camelCase (`createdAt`) so the JSON API matches what browser
/// clients of the list page already expect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    /// Assigned by the store at creation; never changes.
    pub id: TodoId,
    /// Trimmed, never empty.
    pub text: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Aggregate counts served by `GET /admin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoStats {
    #[serde(rename = "totalTodos")]
    pub total: u64,
    #[serde(rename = "completedTodos")]
    pub completed: u64,
    #[serde(rename = "pendingTodos")]
    pub pending: u64,
}
