//! Equality and inequality filters over task fields.

use rusqlite::types::Value;

/// A parent slot: either a concrete task or the root level (no parent).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentRef {
    /// No parent; the task is a root.
    Root,
    /// Child of the given task.
    Task(i64),
}

impl From<i64> for ParentRef {
    fn from(id: i64) -> Self {
        ParentRef::Task(id)
    }
}

impl From<Option<i64>> for ParentRef {
    fn from(id: Option<i64>) -> Self {
        match id {
            Some(id) => ParentRef::Task(id),
            None => ParentRef::Root,
        }
    }
}

/// Conjunctive filter over task fields.
///
/// An empty filter matches every task. Matches are returned in insertion
/// (id) order.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    complete: Option<bool>,
    parent: Option<ParentRef>,
    exclude_id: Option<i64>,
}

impl TaskFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep tasks with the given completion state.
    pub fn complete(mut self, complete: bool) -> Self {
        self.complete = Some(complete);
        self
    }

    /// Keep tasks under the given parent slot.
    pub fn parent(mut self, parent: impl Into<ParentRef>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Drop the task with the given id.
    pub fn excluding(mut self, id: i64) -> Self {
        self.exclude_id = Some(id);
        self
    }

    /// Render as a WHERE clause (empty string for the empty filter) and its
    /// bound parameters.
    pub(crate) fn where_clause(&self) -> (String, Vec<Value>) {
        let mut clauses: Vec<String> = Vec::new();
        let mut params: Vec<Value> = Vec::new();

        if let Some(complete) = self.complete {
            clauses.push("complete = ?".to_string());
            params.push(Value::from(complete));
        }
        match self.parent {
            Some(ParentRef::Task(id)) => {
                clauses.push("parent_id = ?".to_string());
                params.push(Value::from(id));
            }
            Some(ParentRef::Root) => clauses.push("parent_id IS NULL".to_string()),
            None => {}
        }
        if let Some(id) = self.exclude_id {
            clauses.push("id != ?".to_string());
            params.push(Value::from(id));
        }

        if clauses.is_empty() {
            (String::new(), params)
        } else {
            (format!(" WHERE {}", clauses.join(" AND ")), params)
        }
    }
}
