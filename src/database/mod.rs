//! Embedded SQLite backend.
//!
//! Provides connection management, schema migrations, and [`SqliteTable`],
//! the embedded implementation of the remote `bookmarks` table.
//!
//! # Usage
//!
//! ```no_run
//! use smartbookmarks::database::{Database, SqliteTable};
//!
//! // Persistent table
//! let table = SqliteTable::new(Database::open("smartbookmarks.db").expect("failed to open database"));
//!
//! // Or an in-memory one for testing
//! let table = SqliteTable::in_memory().expect("failed to open in-memory database");
//! ```

pub mod bookmark_table;
pub mod connection;
pub mod migrations;

pub use bookmark_table::SqliteTable;
pub use connection::Database;
