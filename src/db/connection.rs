//! Database connection management.

use crate::error::{Error, Result};
use rusqlite::{Connection as SqliteConnection, OptionalExtension, Params, Transaction};
use std::path::Path;

/// Database connection wrapper.
pub struct Connection {
    conn: SqliteConnection,
}

impl Connection {
    /// Open a connection to the database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = SqliteConnection::open(path)?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database for testing.
    pub fn open_in_memory() -> Result<Self> {
        let conn = SqliteConnection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self { conn })
    }

    /// Begin a new transaction.
    pub fn transaction(&mut self) -> Result<Transaction<'_>> {
        self.conn.transaction().map_err(Error::from)
    }

    /// Execute a statement and return the number of rows affected.
    pub fn execute<P: Params>(&self, sql: &str, params: P) -> Result<usize> {
        self.conn.execute(sql, params).map_err(Error::from)
    }

    /// Query a single row.
    pub fn query_row<T, P, F>(&self, sql: &str, params: P, f: F) -> Result<T>
    where
        P: Params,
        F: FnOnce(&rusqlite::Row) -> rusqlite::Result<T>,
    {
        self.conn.query_row(sql, params, f).map_err(Error::from)
    }

    /// Query a single row, returning `None` when there is no match.
    pub fn query_opt<T, P, F>(&self, sql: &str, params: P, f: F) -> Result<Option<T>>
    where
        P: Params,
        F: FnOnce(&rusqlite::Row) -> rusqlite::Result<T>,
    {
        self.conn
            .query_row(sql, params, f)
            .optional()
            .map_err(Error::from)
    }

    /// Query multiple rows.
    pub fn query<T, P, F>(&self, sql: &str, params: P, f: F) -> Result<Vec<T>>
    where
        P: Params,
        F: FnMut(&rusqlite::Row) -> rusqlite::Result<T>,
    {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt
            .query_map(params, f)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Check if a table exists.
    pub fn table_exists(&self, table_name: &str) -> Result<bool> {
        let name: Option<String> = self.query_opt(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [table_name],
            |row| row.get(0),
        )?;
        Ok(name.is_some())
    }

    /// Get the last inserted row id.
    pub fn last_insert_rowid(&self) -> i64 {
        self.conn.last_insert_rowid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Schema;

    #[test]
    fn open_in_memory_enables_foreign_keys() {
        let conn = Connection::open_in_memory().unwrap();
        let fk: i64 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(fk, 1);
    }

    #[test]
    fn table_exists() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(!conn.table_exists("tasks").unwrap());

        Schema::ensure(&conn).unwrap();
        assert!(conn.table_exists("tasks").unwrap());
    }

    #[test]
    fn transaction_commit() {
        let mut conn = Connection::open_in_memory().unwrap();
        Schema::ensure(&conn).unwrap();

        {
            let tx = conn.transaction().unwrap();
            tx.execute(
                "INSERT INTO tasks (name, created_at, updated_at) VALUES (?1, ?2, ?2)",
                rusqlite::params!["Test", chrono::Utc::now()],
            )
            .unwrap();
            tx.commit().unwrap();
        }

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM tasks", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn transaction_rollback_on_drop() {
        let mut conn = Connection::open_in_memory().unwrap();
        Schema::ensure(&conn).unwrap();

        {
            let tx = conn.transaction().unwrap();
            tx.execute(
                "INSERT INTO tasks (name, created_at, updated_at) VALUES (?1, ?2, ?2)",
                rusqlite::params!["Test", chrono::Utc::now()],
            )
            .unwrap();
            // Dropped without commit
        }

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM tasks", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn last_insert_rowid() {
        let conn = Connection::open_in_memory().unwrap();
        Schema::ensure(&conn).unwrap();

        conn.execute(
            "INSERT INTO tasks (name, created_at, updated_at) VALUES (?1, ?2, ?2)",
            rusqlite::params!["Test", chrono::Utc::now()],
        )
        .unwrap();
        assert_eq!(conn.last_insert_rowid(), 1);
    }
}
