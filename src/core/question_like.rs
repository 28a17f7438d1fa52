//! Question like association, join queries and like counts.

use crate::core::{Question, User};
use crate::db::{
    schema::{AssociationRow, QuestionRow, UserRow},
    Connection,
};
use crate::error::Result;
use rusqlite::params;
use serde::{Deserialize, Serialize};

/// A user liking a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionLike {
    pub id: i64,
    pub user_id: i64,
    pub question_id: i64,
}

impl QuestionLike {
    /// Convert an AssociationRow to a QuestionLike.
    pub fn from_row(row: AssociationRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            question_id: row.question_id,
        }
    }

    /// Get a like record by ID.
    pub fn find_by_id(conn: &mut Connection, id: i64) -> Result<Option<QuestionLike>> {
        let row = conn.query_optional(
            "SELECT * FROM question_likes WHERE id = ?",
            params![id],
            AssociationRow::from_row,
        )?;
        Ok(row.map(QuestionLike::from_row))
    }

    /// Up to `n` questions ordered by like count, highest first.
    ///
    /// Questions without likes never appear. Equal counts keep id order.
    pub fn most_liked_questions(conn: &mut Connection, n: usize) -> Result<Vec<Question>> {
        let limit = i64::try_from(n).unwrap_or(i64::MAX);
        let rows = conn.query(
            "SELECT questions.*
             FROM questions
             JOIN question_likes ON questions.id = question_likes.question_id
             GROUP BY questions.id
             ORDER BY COUNT(*) DESC, questions.id
             LIMIT ?",
            params![limit],
            QuestionRow::from_row,
        )?;
        Ok(rows.into_iter().map(Question::from_row).collect())
    }

    /// Users who liked `question_id`. An unsaved question has none.
    pub fn likers_for_question_id(
        conn: &mut Connection,
        question_id: Option<i64>,
    ) -> Result<Vec<User>> {
        let rows = conn.query(
            "SELECT users.*
             FROM users
             JOIN question_likes ON users.id = question_likes.user_id
             WHERE question_likes.question_id = ?",
            params![question_id],
            UserRow::from_row,
        )?;
        Ok(rows.into_iter().map(User::from_row).collect())
    }

    /// Questions liked by `user_id`. An unsaved user liked nothing.
    pub fn liked_questions_for_user_id(
        conn: &mut Connection,
        user_id: Option<i64>,
    ) -> Result<Vec<Question>> {
        let rows = conn.query(
            "SELECT questions.*
             FROM questions
             JOIN question_likes ON questions.id = question_likes.question_id
             WHERE question_likes.user_id = ?",
            params![user_id],
            QuestionRow::from_row,
        )?;
        Ok(rows.into_iter().map(Question::from_row).collect())
    }

    /// Number of likes recorded for `question_id`, zero when there are none.
    pub fn num_likes_for_question_id(
        conn: &mut Connection,
        question_id: Option<i64>,
    ) -> Result<i64> {
        conn.query_row(
            "SELECT COUNT(*) AS likes FROM question_likes WHERE question_id = ?",
            params![question_id],
            |row| row.get("likes"),
        )
    }
}
