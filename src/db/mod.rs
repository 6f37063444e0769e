//! Database layer.
//!
//! Handles the SQLite connection, schema creation, and low-level queries.

mod connection;
pub mod schema;

pub use connection::Connection;
pub use schema::Schema;
