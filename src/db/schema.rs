//! Database schema management.

use crate::db::Connection;
use crate::error::Result;

/// Schema creation and checks.
pub struct Schema;

impl Schema {
    /// Current schema version.
    pub const VERSION: i32 = 1;

    /// Create tables and indexes if they are not present.
    ///
    /// Safe to call on every open. The `name` CHECK backs the application
    /// level validation; `parent_id` re-roots children when the parent row
    /// is deleted.
    pub fn ensure(conn: &Connection) -> Result<()> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS tasks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL CHECK (length(trim(name)) > 0),
                complete INTEGER NOT NULL DEFAULT 0,
                due TEXT,
                parent_id INTEGER REFERENCES tasks(id) ON DELETE SET NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_tasks_parent_id ON tasks(parent_id)",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_tasks_complete ON tasks(complete)",
            [],
        )?;

        Ok(())
    }

    /// Check if the schema is present.
    pub fn is_initialized(conn: &Connection) -> bool {
        conn.table_exists("tasks").unwrap_or(false)
    }
}
