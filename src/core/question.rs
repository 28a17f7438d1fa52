//! Question model and operations.

use crate::core::{QuestionFollow, QuestionLike, Reply, User};
use crate::db::{schema::QuestionRow, schema::ReplyRow, schema::UserRow, Connection};
use crate::error::{Error, Result};
use rusqlite::params;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

/// A question asked by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// `None` until the question has been created in the database.
    pub id: Option<i64>,
    pub title: String,
    pub body: String,
    pub author_id: i64,
}

impl Question {
    /// Build an unsaved question.
    pub fn new(title: impl Into<String>, body: impl Into<String>, author_id: i64) -> Self {
        Self {
            id: None,
            title: title.into(),
            body: body.into(),
            author_id,
        }
    }

    /// Convert a QuestionRow to a Question.
    pub fn from_row(row: QuestionRow) -> Self {
        Self {
            id: Some(row.id),
            title: row.title,
            body: row.body,
            author_id: row.author_id,
        }
    }

    /// Every question in the database.
    pub fn find_all(conn: &mut Connection) -> Result<Vec<Question>> {
        let rows = conn.query("SELECT * FROM questions", &[], QuestionRow::from_row)?;
        Ok(rows.into_iter().map(Question::from_row).collect())
    }

    /// Get a question by ID.
    pub fn find_by_id(conn: &mut Connection, id: i64) -> Result<Option<Question>> {
        let row = conn.query_optional(
            "SELECT * FROM questions WHERE id = ?",
            params![id],
            QuestionRow::from_row,
        )?;
        Ok(row.map(Question::from_row))
    }

    /// The first question (lowest id) written by `author_id`.
    ///
    /// Only one question is returned even when the author has several; use
    /// [`User::authored_questions`] for all of them.
    pub fn find_by_author_id(conn: &mut Connection, author_id: i64) -> Result<Option<Question>> {
        let row = conn.query_optional(
            "SELECT * FROM questions WHERE author_id = ? ORDER BY id LIMIT 1",
            params![author_id],
            QuestionRow::from_row,
        )?;
        Ok(row.map(Question::from_row))
    }

    /// The `n` questions with the most likes.
    pub fn most_liked(conn: &mut Connection, n: usize) -> Result<Vec<Question>> {
        QuestionLike::most_liked_questions(conn, n)
    }

    /// The `n` questions with the most followers.
    pub fn most_followed(conn: &mut Connection, n: usize) -> Result<Vec<Question>> {
        QuestionFollow::most_followed_questions(conn, n)
    }

    /// Insert this question and store the generated id on it.
    pub fn create(&mut self, conn: &mut Connection) -> Result<i64> {
        if self.id.is_some() {
            return Err(Error::AlreadyPersisted(self.to_string()));
        }

        conn.execute(
            "INSERT INTO questions (title, body, author_id) VALUES (?, ?, ?)",
            params![self.title, self.body, self.author_id],
        )?;

        let id = conn.last_insert_rowid();
        self.id = Some(id);
        info!(question_id = id, author_id = self.author_id, "question created");
        Ok(id)
    }

    /// Overwrite title, body and author with this object's values.
    pub fn update(&self, conn: &mut Connection) -> Result<()> {
        let id = self.id.ok_or_else(|| Error::NotPersisted(self.to_string()))?;

        conn.execute(
            "UPDATE questions SET title = ?, body = ?, author_id = ? WHERE id = ?",
            params![self.title, self.body, self.author_id, id],
        )?;
        info!(question_id = id, "question updated");
        Ok(())
    }

    /// The user who asked this question, if that user row exists.
    pub fn author(&self, conn: &mut Connection) -> Result<Option<User>> {
        let row = conn.query_optional(
            "SELECT * FROM users WHERE id = ?",
            params![self.author_id],
            UserRow::from_row,
        )?;
        Ok(row.map(User::from_row))
    }

    /// Replies to this question, or `None` if there are none.
    pub fn replies(&self, conn: &mut Connection) -> Result<Option<Vec<Reply>>> {
        let rows = conn.query(
            "SELECT * FROM replies WHERE question_id = ?",
            params![self.id],
            ReplyRow::from_row,
        )?;

        if rows.is_empty() {
            return Ok(None);
        }
        Ok(Some(rows.into_iter().map(Reply::from_row).collect()))
    }

    /// Users following this question.
    pub fn followers(&self, conn: &mut Connection) -> Result<Vec<User>> {
        QuestionFollow::followers_for_question_id(conn, self.id)
    }

    /// Users who liked this question.
    pub fn likers(&self, conn: &mut Connection) -> Result<Vec<User>> {
        QuestionLike::likers_for_question_id(conn, self.id)
    }

    /// Number of likes; zero for an unliked or unsaved question.
    pub fn num_likes(&self, conn: &mut Connection) -> Result<i64> {
        QuestionLike::num_likes_for_question_id(conn, self.id)
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            Some(id) => write!(f, "Question #{id}"),
            None => write!(f, "Question \"{}\"", self.title),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema::Schema;

    fn setup_db() -> (Connection, User) {
        let mut conn = Connection::open_in_memory().unwrap();
        Schema::init(&mut conn).unwrap();
        let mut author = User::new("Grace", "Hopper");
        author.create(&mut conn).unwrap();
        (conn, author)
    }

    fn ask(conn: &mut Connection, author: &User, title: &str) -> Question {
        let mut question = Question::new(title, "body", author.id.unwrap());
        question.create(conn).unwrap();
        question
    }

    #[test]
    fn test_create_get_question() {
        let (mut conn, author) = setup_db();

        let question = ask(&mut conn, &author, "Compilers?");
        let fetched = Question::find_by_id(&mut conn, question.id.unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(fetched, question);
    }

    #[test]
    fn test_create_twice_fails() {
        let (mut conn, author) = setup_db();

        let mut question = ask(&mut conn, &author, "Compilers?");
        assert!(matches!(
            question.create(&mut conn),
            Err(Error::AlreadyPersisted(_))
        ));
    }

    #[test]
    fn test_update_requires_id() {
        let (mut conn, author) = setup_db();

        let question = Question::new("Unsaved", "body", author.id.unwrap());
        assert!(matches!(
            question.update(&mut conn),
            Err(Error::NotPersisted(_))
        ));
    }

    #[test]
    fn test_update_visible_after_refetch() {
        let (mut conn, author) = setup_db();

        let mut question = ask(&mut conn, &author, "Draft");
        question.title = "Final".to_string();
        question.body = "Edited".to_string();
        question.update(&mut conn).unwrap();

        let fetched = Question::find_by_id(&mut conn, question.id.unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(fetched.title, "Final");
        assert_eq!(fetched.body, "Edited");
    }

    #[test]
    fn test_find_all() {
        let (mut conn, author) = setup_db();
        assert!(Question::find_all(&mut conn).unwrap().is_empty());

        ask(&mut conn, &author, "One");
        ask(&mut conn, &author, "Two");
        assert_eq!(Question::find_all(&mut conn).unwrap().len(), 2);
    }

    #[test]
    fn test_find_by_author_id_returns_first_only() {
        let (mut conn, author) = setup_db();

        let first = ask(&mut conn, &author, "First");
        ask(&mut conn, &author, "Second");

        let found = Question::find_by_author_id(&mut conn, author.id.unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(found, first);
        assert!(Question::find_by_author_id(&mut conn, 999).unwrap().is_none());
    }

    #[test]
    fn test_author() {
        let (mut conn, author) = setup_db();

        let question = ask(&mut conn, &author, "Who asked?");
        let found = question.author(&mut conn).unwrap().unwrap();
        assert_eq!(found.id, author.id);
        assert_eq!(found, author);
    }

    #[test]
    fn test_author_missing_row_is_none() {
        let (mut conn, _) = setup_db();
        conn.set_foreign_keys(false).unwrap();

        let mut orphan = Question::new("Orphan", "No author row", 404);
        orphan.create(&mut conn).unwrap();

        assert!(orphan.author(&mut conn).unwrap().is_none());
    }

    #[test]
    fn test_replies_absent_when_empty() {
        let (mut conn, author) = setup_db();

        let question = ask(&mut conn, &author, "Silence?");
        assert!(question.replies(&mut conn).unwrap().is_none());

        conn.execute(
            "INSERT INTO replies (question_id, author_id, body) VALUES (?, ?, ?)",
            params![question.id, author.id, "Here"],
        )
        .unwrap();
        let replies = question.replies(&mut conn).unwrap().unwrap();
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].body, "Here");
    }

    #[test]
    fn test_num_likes_zero_not_absent() {
        let (mut conn, author) = setup_db();

        let question = ask(&mut conn, &author, "Unloved");
        assert_eq!(question.num_likes(&mut conn).unwrap(), 0);
        assert_eq!(
            Question::new("Unsaved", "", 1).num_likes(&mut conn).unwrap(),
            0
        );
    }

    #[test]
    fn test_followers_and_likers() {
        let (mut conn, author) = setup_db();
        let mut fan = User::new("Alan", "Turing");
        fan.create(&mut conn).unwrap();

        let question = ask(&mut conn, &author, "Popular");
        conn.execute(
            "INSERT INTO question_follows (user_id, question_id) VALUES (?, ?)",
            params![fan.id, question.id],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO question_likes (user_id, question_id) VALUES (?, ?)",
            params![author.id, question.id],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO question_likes (user_id, question_id) VALUES (?, ?)",
            params![fan.id, question.id],
        )
        .unwrap();

        assert_eq!(question.followers(&mut conn).unwrap(), vec![fan.clone()]);
        assert_eq!(question.likers(&mut conn).unwrap().len(), 2);
        assert_eq!(question.num_likes(&mut conn).unwrap(), 2);
    }
}
