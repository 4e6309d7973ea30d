use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{types::Type, Connection, OptionalExtension};
use tickler_core::{Todo, TodoId, TodoStats};
use tracing::{debug, info};

use crate::db::init_db;
use crate::error::{Result, StoreError};

const SELECT_COLUMNS: &str = "SELECT id, text, completed, created_at FROM todos";

/// Owns all persisted todos.
///
/// Thread-safe: the SQLite connection sits behind a Mutex and every operation
/// holds it for its whole duration, so each call is atomic with respect to the
/// others.
pub struct TodoStore {
    db: Mutex<Connection>,
}

impl TodoStore {
    /// Take ownership of `conn` and make sure the schema exists.
    pub fn new(conn: Connection) -> Result<Self> {
        init_db(&conn)?;
        Ok(Self {
            db: Mutex::new(conn),
        })
    }

    /// Close the underlying connection, reporting any error SQLite raises.
    pub fn close(self) -> Result<()> {
        let conn = self
            .db
            .into_inner()
            .map_err(|_| StoreError::Unavailable("connection lock poisoned".to_string()))?;
        conn.close().map_err(|(_, e)| StoreError::from(e))?;
        info!("todo store closed");
        Ok(())
    }

    /// Persist a new todo. The text is trimmed; blank text is rejected.
    pub fn create(&self, text: &str) -> Result<Todo> {
        let text = text.trim();
        if text.is_empty() {
            return Err(StoreError::InvalidInput(
                "todo text is required".to_string(),
            ));
        }

        let todo = Todo {
            id: TodoId::new(),
            text: text.to_string(),
            completed: false,
            created_at: Utc::now(),
        };

        let db = self.lock()?;
        db.execute(
            "INSERT INTO todos (id, text, completed, created_at) VALUES (?1, ?2, 0, ?3)",
            rusqlite::params![todo.id.as_str(), todo.text, todo.created_at.to_rfc3339()],
        )?;
        info!(todo_id = %todo.id, "todo created");
        Ok(todo)
    }

    /// Every todo, in insertion order.
    pub fn list_all(&self) -> Result<Vec<Todo>> {
        let db = self.lock()?;
        let mut stmt = db.prepare(&format!("{SELECT_COLUMNS} ORDER BY rowid"))?;
        let todos = stmt
            .query_map([], row_to_todo)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(todos)
    }

    /// Todos whose `completed` flag equals `completed`, in insertion order.
    pub fn list_by_status(&self, completed: bool) -> Result<Vec<Todo>> {
        let db = self.lock()?;
        let mut stmt = db.prepare(&format!(
            "{SELECT_COLUMNS} WHERE completed = ?1 ORDER BY rowid"
        ))?;
        let todos = stmt
            .query_map([completed], row_to_todo)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(todos)
    }

    pub fn find_by_id(&self, id: &TodoId) -> Result<Todo> {
        let db = self.lock()?;
        find_in(&db, id)
    }

    /// Flip `completed` for one todo and return the updated record.
    pub fn toggle_completion(&self, id: &TodoId) -> Result<Todo> {
        let db = self.lock()?;
        let n = db.execute(
            "UPDATE todos SET completed = NOT completed WHERE id = ?1",
            [id.as_str()],
        )?;
        if n == 0 {
            return Err(StoreError::NotFound {
                id: id.to_string(),
            });
        }
        let todo = find_in(&db, id)?;
        debug!(todo_id = %id, completed = todo.completed, "todo toggled");
        Ok(todo)
    }

    pub fn count_by_status(&self, completed: bool) -> Result<u64> {
        let db = self.lock()?;
        let n: i64 = db.query_row(
            "SELECT COUNT(*) FROM todos WHERE completed = ?1",
            [completed],
            |row| row.get(0),
        )?;
        Ok(n as u64)
    }

    pub fn count_all(&self) -> Result<u64> {
        let db = self.lock()?;
        let n: i64 = db.query_row("SELECT COUNT(*) FROM todos", [], |row| row.get(0))?;
        Ok(n as u64)
    }

    /// Total/completed/pending counts taken from a single snapshot.
    pub fn stats(&self) -> Result<TodoStats> {
        let db = self.lock()?;
        let (total, completed): (i64, i64) = db.query_row(
            "SELECT COUNT(*), COALESCE(SUM(completed), 0) FROM todos",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        Ok(TodoStats {
            total: total as u64,
            completed: completed as u64,
            pending: (total - completed) as u64,
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.db
            .lock()
            .map_err(|_| StoreError::Unavailable("connection lock poisoned".to_string()))
    }
}

fn find_in(db: &Connection, id: &TodoId) -> Result<Todo> {
    db.query_row(
        &format!("{SELECT_COLUMNS} WHERE id = ?1"),
        [id.as_str()],
        row_to_todo,
    )
    .optional()?
    .ok_or_else(|| StoreError::NotFound {
        id: id.to_string(),
    })
}

fn row_to_todo(row: &rusqlite::Row<'_>) -> rusqlite::Result<Todo> {
    let created_at: String = row.get(3)?;
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?
        .with_timezone(&Utc);
    Ok(Todo {
        id: TodoId(row.get(0)?),
        text: row.get(1)?,
        completed: row.get(2)?,
        created_at,
    })
}
