//! User model and operations.

use crate::core::{Question, QuestionFollow, QuestionLike, Reply};
use crate::db::{schema::QuestionRow, schema::ReplyRow, schema::UserRow, Connection};
use crate::error::{Error, Result};
use rusqlite::params;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

/// A user: author of questions and replies, follower and liker of questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// `None` until the user has been created in the database.
    pub id: Option<i64>,
    pub fname: String,
    pub lname: String,
}

impl User {
    /// Build an unsaved user.
    pub fn new(fname: impl Into<String>, lname: impl Into<String>) -> Self {
        Self {
            id: None,
            fname: fname.into(),
            lname: lname.into(),
        }
    }

    /// Convert a UserRow to a User.
    pub fn from_row(row: UserRow) -> Self {
        Self {
            id: Some(row.id),
            fname: row.fname,
            lname: row.lname,
        }
    }

    /// Every user in the database.
    pub fn find_all(conn: &mut Connection) -> Result<Vec<User>> {
        let rows = conn.query("SELECT * FROM users", &[], UserRow::from_row)?;
        Ok(rows.into_iter().map(User::from_row).collect())
    }

    /// Get a user by ID.
    pub fn find_by_id(conn: &mut Connection, id: i64) -> Result<Option<User>> {
        let row = conn.query_optional(
            "SELECT * FROM users WHERE id = ?",
            params![id],
            UserRow::from_row,
        )?;
        Ok(row.map(User::from_row))
    }

    /// All users with exactly this first and last name.
    pub fn find_by_name(conn: &mut Connection, fname: &str, lname: &str) -> Result<Vec<User>> {
        let rows = conn.query(
            "SELECT * FROM users WHERE fname = ? AND lname = ?",
            params![fname, lname],
            UserRow::from_row,
        )?;
        Ok(rows.into_iter().map(User::from_row).collect())
    }

    /// Insert this user and store the generated id on it.
    pub fn create(&mut self, conn: &mut Connection) -> Result<i64> {
        if self.id.is_some() {
            return Err(Error::AlreadyPersisted(self.to_string()));
        }

        conn.execute(
            "INSERT INTO users (fname, lname) VALUES (?, ?)",
            params![self.fname, self.lname],
        )?;

        let id = conn.last_insert_rowid();
        self.id = Some(id);
        info!(user_id = id, "user created");
        Ok(id)
    }

    /// Overwrite the stored names with this object's names.
    pub fn update(&self, conn: &mut Connection) -> Result<()> {
        let id = self.id.ok_or_else(|| Error::NotPersisted(self.to_string()))?;

        conn.execute(
            "UPDATE users SET fname = ?, lname = ? WHERE id = ?",
            params![self.fname, self.lname, id],
        )?;
        info!(user_id = id, "user updated");
        Ok(())
    }

    /// Questions written by this user, or `None` if there are none.
    pub fn authored_questions(&self, conn: &mut Connection) -> Result<Option<Vec<Question>>> {
        let id = self.author_id()?;
        let rows = conn.query(
            "SELECT * FROM questions WHERE author_id = ?",
            params![id],
            QuestionRow::from_row,
        )?;

        if rows.is_empty() {
            return Ok(None);
        }
        Ok(Some(rows.into_iter().map(Question::from_row).collect()))
    }

    /// Replies written by this user, or `None` if there are none.
    pub fn authored_replies(&self, conn: &mut Connection) -> Result<Option<Vec<Reply>>> {
        let id = self.author_id()?;
        let rows = conn.query(
            "SELECT * FROM replies WHERE author_id = ?",
            params![id],
            ReplyRow::from_row,
        )?;

        if rows.is_empty() {
            return Ok(None);
        }
        Ok(Some(rows.into_iter().map(Reply::from_row).collect()))
    }

    /// Questions this user follows.
    pub fn followed_questions(&self, conn: &mut Connection) -> Result<Vec<Question>> {
        QuestionFollow::followed_questions_for_user_id(conn, self.id)
    }

    /// Questions this user liked.
    pub fn liked_questions(&self, conn: &mut Connection) -> Result<Vec<Question>> {
        QuestionLike::liked_questions_for_user_id(conn, self.id)
    }

    fn author_id(&self) -> Result<i64> {
        self.id.ok_or_else(|| Error::NotAnAuthor(self.to_string()))
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            Some(id) => write!(f, "User #{id}"),
            None => write!(f, "User \"{} {}\"", self.fname, self.lname),
        }
    }
}
