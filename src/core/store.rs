//! Task store - repository over the database connection.

use crate::core::filter::TaskFilter;
use crate::core::task::{validate_name, NewTask, Task};
use crate::db::{Connection, Schema};
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, params_from_iter};
use std::path::Path;

/// Repository over the tasks table.
pub struct TaskStore {
    conn: Connection,
}

impl TaskStore {
    /// Open a store at the given path, creating the schema if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        Schema::ensure(&conn)?;
        Ok(Self { conn })
    }

    /// Open an in-memory store for testing.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Schema::ensure(&conn)?;
        Ok(Self { conn })
    }

    /// Get the underlying connection.
    pub fn conn(&mut self) -> &mut Connection {
        &mut self.conn
    }

    /// Create a new task and return it as persisted.
    ///
    /// Fails with [`Error::EmptyName`] when the name is empty or whitespace.
    /// A `parent_id` naming a missing task fails the foreign key constraint.
    pub fn create(&mut self, new: NewTask) -> Result<Task> {
        new.validate()?;
        let now = Utc::now();
        self.conn.execute(
            "INSERT INTO tasks (name, complete, due, parent_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
            params![new.name, new.complete, new.due, new.parent_id, now],
        )?;
        self.get(self.conn.last_insert_rowid())
    }

    /// Get a task by id.
    pub fn get(&self, id: i64) -> Result<Task> {
        self.conn
            .query_opt(
                "SELECT * FROM tasks WHERE id = ?1",
                params![id],
                Task::from_row,
            )?
            .ok_or(Error::TaskNotFound(id))
    }

    /// All tasks matching the filter, in insertion order.
    ///
    /// An empty result is a valid outcome, not an error.
    pub fn find_all(&self, filter: &TaskFilter) -> Result<Vec<Task>> {
        let (where_clause, values) = filter.where_clause();
        let sql = format!("SELECT * FROM tasks{where_clause} ORDER BY id");
        self.conn.query(&sql, params_from_iter(values), Task::from_row)
    }

    /// Rename a task.
    pub fn rename(&mut self, id: i64, name: &str) -> Result<Task> {
        validate_name(name)?;
        self.update_field(id, "name = ?2", params![id, name, Utc::now()])
    }

    /// Set or clear the due date.
    pub fn set_due(&mut self, id: i64, due: Option<DateTime<Utc>>) -> Result<Task> {
        self.update_field(id, "due = ?2", params![id, due, Utc::now()])
    }

    /// Set the completion flag.
    pub fn set_complete(&mut self, id: i64, complete: bool) -> Result<Task> {
        self.update_field(id, "complete = ?2", params![id, complete, Utc::now()])
    }

    fn update_field<P: rusqlite::Params>(
        &mut self,
        id: i64,
        assignment: &str,
        params: P,
    ) -> Result<Task> {
        let sql = format!("UPDATE tasks SET {assignment}, updated_at = ?3 WHERE id = ?1");
        let affected = self.conn.execute(&sql, params)?;
        if affected == 0 {
            return Err(Error::TaskNotFound(id));
        }
        self.get(id)
    }

    /// Mark every incomplete task complete.
    ///
    /// Runs in a single transaction. Returns the number of tasks updated;
    /// calling again is a no-op.
    pub fn complete_all(&mut self) -> Result<usize> {
        let now = Utc::now();
        let tx = self.conn.transaction()?;
        let affected = tx.execute(
            "UPDATE tasks SET complete = 1, updated_at = ?1 WHERE complete = 0",
            params![now],
        )?;
        tx.commit()?;
        Ok(affected)
    }

    /// Delete every completed task.
    ///
    /// Children of a deleted parent are re-rooted, not deleted. Runs in a
    /// single transaction. Returns the number of tasks deleted; calling
    /// again is a no-op.
    pub fn clear_completed(&mut self) -> Result<usize> {
        let tx = self.conn.transaction()?;
        let affected = tx.execute("DELETE FROM tasks WHERE complete = 1", [])?;
        tx.commit()?;
        Ok(affected)
    }

    /// Create a task as a child of an existing one.
    pub fn add_child(&mut self, parent_id: i64, new: NewTask) -> Result<Task> {
        self.get(parent_id)?;
        self.create(NewTask {
            parent_id: Some(parent_id),
            ..new
        })
    }

    /// Direct children of a task.
    pub fn children_of(&self, id: i64) -> Result<Vec<Task>> {
        self.get(id)?;
        self.find_all(&TaskFilter::new().parent(id))
    }

    /// Tasks sharing a task's parent slot, excluding the task itself.
    ///
    /// Root tasks form one sibling set: for a root task this returns all
    /// other root tasks.
    pub fn siblings_of(&self, id: i64) -> Result<Vec<Task>> {
        let task = self.get(id)?;
        self.find_all(&TaskFilter::new().parent(task.parent_id).excluding(id))
    }

    /// Every task below the given one, in insertion order.
    ///
    /// A child is always created after its parent, so ancestors precede
    /// descendants in the result.
    pub fn descendants_of(&self, id: i64) -> Result<Vec<Task>> {
        self.get(id)?;
        let sql = "
            WITH RECURSIVE subtree(id) AS (
                SELECT id FROM tasks WHERE parent_id = ?1
                UNION
                SELECT t.id FROM tasks t
                INNER JOIN subtree s ON t.parent_id = s.id
            )
            SELECT t.* FROM tasks t
            INNER JOIN subtree s ON t.id = s.id
            ORDER BY t.id
        ";
        self.conn.query(sql, params![id], Task::from_row)
    }
}
