use rusqlite::Connection;

/// Initialise the todo schema in `conn`. Safe to call on every startup (idempotent).
///
/// Rows are read back in `rowid` order, which is insertion order; the
/// `completed` index serves the reminder's pending-items query and the counts.
pub fn init_db(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS todos (
            id          TEXT    NOT NULL PRIMARY KEY,
            text        TEXT    NOT NULL,
            completed   INTEGER NOT NULL DEFAULT 0,
            created_at  TEXT    NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_todos_completed
            ON todos(completed);",
    )
}
