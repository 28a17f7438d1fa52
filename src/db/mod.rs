//! Database layer for aaq.
//!
//! Handles the SQLite connection, schema creation, and typed row mapping.

mod connection;
pub mod schema;

pub use connection::{Connection, DbPath};
pub use schema::{AssociationRow, QuestionRow, ReplyRow, Schema, UserRow};
