//! Database schema and row types.

use crate::db::Connection as DbConnection;
use crate::error::{Error, Result};
use rusqlite::Row;
use tracing::info;

/// Demo data set loaded by [`Schema::seed`].
const SEED_SQL: &str = include_str!("seed.sql");

/// Schema version and management.
pub struct Schema;

impl Schema {
    /// Current schema version.
    pub const VERSION: i32 = 1;

    /// Initialize the database schema.
    ///
    /// Creates all tables and the indexes on foreign-key columns.
    /// Returns an error if the database is already initialized.
    pub fn init(conn: &mut DbConnection) -> Result<()> {
        if Self::is_initialized(conn) {
            return Err(Error::AlreadyInitialized);
        }

        conn.execute(
            "CREATE TABLE users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                fname TEXT NOT NULL,
                lname TEXT NOT NULL
            )",
            &[],
        )?;

        conn.execute(
            "CREATE TABLE questions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                body TEXT NOT NULL,
                author_id INTEGER NOT NULL,
                FOREIGN KEY (author_id) REFERENCES users(id)
            )",
            &[],
        )?;

        conn.execute(
            "CREATE TABLE replies (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                question_id INTEGER NOT NULL,
                parent_reply_id INTEGER,
                author_id INTEGER NOT NULL,
                body TEXT NOT NULL,
                FOREIGN KEY (question_id) REFERENCES questions(id),
                FOREIGN KEY (parent_reply_id) REFERENCES replies(id),
                FOREIGN KEY (author_id) REFERENCES users(id)
            )",
            &[],
        )?;

        conn.execute(
            "CREATE TABLE question_follows (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                question_id INTEGER NOT NULL,
                FOREIGN KEY (user_id) REFERENCES users(id),
                FOREIGN KEY (question_id) REFERENCES questions(id)
            )",
            &[],
        )?;

        conn.execute(
            "CREATE TABLE question_likes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                question_id INTEGER NOT NULL,
                FOREIGN KEY (user_id) REFERENCES users(id),
                FOREIGN KEY (question_id) REFERENCES questions(id)
            )",
            &[],
        )?;

        conn.execute(
            "CREATE INDEX idx_questions_author_id ON questions(author_id)",
            &[],
        )?;
        conn.execute(
            "CREATE INDEX idx_replies_question_id ON replies(question_id)",
            &[],
        )?;
        conn.execute(
            "CREATE INDEX idx_replies_parent_reply_id ON replies(parent_reply_id)",
            &[],
        )?;
        conn.execute(
            "CREATE INDEX idx_replies_author_id ON replies(author_id)",
            &[],
        )?;
        conn.execute(
            "CREATE INDEX idx_question_follows_question_id ON question_follows(question_id)",
            &[],
        )?;
        conn.execute(
            "CREATE INDEX idx_question_follows_user_id ON question_follows(user_id)",
            &[],
        )?;
        conn.execute(
            "CREATE INDEX idx_question_likes_question_id ON question_likes(question_id)",
            &[],
        )?;
        conn.execute(
            "CREATE INDEX idx_question_likes_user_id ON question_likes(user_id)",
            &[],
        )?;

        info!(version = Self::VERSION, "schema initialized");
        Ok(())
    }

    /// Check if the database schema is present.
    pub fn is_initialized(conn: &mut DbConnection) -> bool {
        conn.table_exists("users").unwrap_or(false)
    }

    /// Load the bundled demo data set.
    pub fn seed(conn: &mut DbConnection) -> Result<()> {
        if !Self::is_initialized(conn) {
            return Err(Error::NotInitialized);
        }
        conn.execute_batch(SEED_SQL)?;
        info!("demo data loaded");
        Ok(())
    }
}

/// Row representation of a user from the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRow {
    pub id: i64,
    pub fname: String,
    pub lname: String,
}

impl UserRow {
    /// Create a UserRow from a SQLite row.
    pub fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            fname: row.get("fname")?,
            lname: row.get("lname")?,
        })
    }
}

/// Row representation of a question from the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRow {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub author_id: i64,
}

impl QuestionRow {
    /// Create a QuestionRow from a SQLite row.
    pub fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            title: row.get("title")?,
            body: row.get("body")?,
            author_id: row.get("author_id")?,
        })
    }
}

/// Row representation of a reply from the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyRow {
    pub id: i64,
    pub question_id: i64,
    pub parent_reply_id: Option<i64>,
    pub author_id: i64,
    pub body: String,
}

impl ReplyRow {
    /// Create a ReplyRow from a SQLite row.
    pub fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            question_id: row.get("question_id")?,
            parent_reply_id: row.get("parent_reply_id")?,
            author_id: row.get("author_id")?,
            body: row.get("body")?,
        })
    }
}

/// Row of either association table (`question_follows`, `question_likes`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssociationRow {
    pub id: i64,
    pub user_id: i64,
    pub question_id: i64,
}

impl AssociationRow {
    /// Create an AssociationRow from a SQLite row.
    pub fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            question_id: row.get("question_id")?,
        })
    }
}
