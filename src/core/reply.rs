//! Reply model and threaded navigation.
//!
//! Every navigation method issues one query, so walking a chain of depth `d`
//! costs `d` round-trips. Use [`ReplyThread`](crate::core::ReplyThread) to
//! load a whole question's tree at once.

use crate::core::{Question, User};
use crate::db::{schema::QuestionRow, schema::ReplyRow, schema::UserRow, Connection};
use crate::error::Result;
use rusqlite::params;
use serde::{Deserialize, Serialize};

/// A reply to a question, optionally nested under another reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub id: i64,
    pub question_id: i64,
    pub parent_reply_id: Option<i64>,
    pub author_id: i64,
    pub body: String,
}

impl Reply {
    /// Convert a ReplyRow to a Reply.
    pub fn from_row(row: ReplyRow) -> Self {
        Self {
            id: row.id,
            question_id: row.question_id,
            parent_reply_id: row.parent_reply_id,
            author_id: row.author_id,
            body: row.body,
        }
    }

    /// Get a reply by ID.
    pub fn find_by_id(conn: &mut Connection, id: i64) -> Result<Option<Reply>> {
        let row = conn.query_optional(
            "SELECT * FROM replies WHERE id = ?",
            params![id],
            ReplyRow::from_row,
        )?;
        Ok(row.map(Reply::from_row))
    }

    /// Replies written by `user_id`, or `None` if there are none.
    pub fn find_by_user_id(conn: &mut Connection, user_id: i64) -> Result<Option<Vec<Reply>>> {
        Self::find_many(conn, "SELECT * FROM replies WHERE author_id = ?", user_id)
    }

    /// Replies to `question_id`, or `None` if there are none.
    pub fn find_by_question_id(
        conn: &mut Connection,
        question_id: i64,
    ) -> Result<Option<Vec<Reply>>> {
        Self::find_many(conn, "SELECT * FROM replies WHERE question_id = ?", question_id)
    }

    /// The user who wrote this reply, if that user row exists.
    pub fn author(&self, conn: &mut Connection) -> Result<Option<User>> {
        let row = conn.query_optional(
            "SELECT * FROM users WHERE id = ?",
            params![self.author_id],
            UserRow::from_row,
        )?;
        Ok(row.map(User::from_row))
    }

    /// The question this reply belongs to, if that question row exists.
    pub fn question(&self, conn: &mut Connection) -> Result<Option<Question>> {
        let row = conn.query_optional(
            "SELECT * FROM questions WHERE id = ?",
            params![self.question_id],
            QuestionRow::from_row,
        )?;
        Ok(row.map(Question::from_row))
    }

    /// The reply this one answers. `None` for a top-level reply.
    pub fn parent_reply(&self, conn: &mut Connection) -> Result<Option<Reply>> {
        match self.parent_reply_id {
            Some(parent_id) => Self::find_by_id(conn, parent_id),
            None => Ok(None),
        }
    }

    /// Direct children of this reply, or `None` if it has none.
    pub fn child_replies(&self, conn: &mut Connection) -> Result<Option<Vec<Reply>>> {
        Self::find_many(
            conn,
            "SELECT * FROM replies WHERE parent_reply_id = ?",
            self.id,
        )
    }

    /// Whether this reply sits directly under the question.
    pub fn is_top_level(&self) -> bool {
        self.parent_reply_id.is_none()
    }

    fn find_many(conn: &mut Connection, sql: &str, key: i64) -> Result<Option<Vec<Reply>>> {
        let rows = conn.query(sql, params![key], ReplyRow::from_row)?;
        if rows.is_empty() {
            return Ok(None);
        }
        Ok(Some(rows.into_iter().map(Reply::from_row).collect()))
    }
}
