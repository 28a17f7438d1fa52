//! Question follow association and its join queries.

use crate::core::{Question, User};
use crate::db::{
    schema::{AssociationRow, QuestionRow, UserRow},
    Connection,
};
use crate::error::Result;
use rusqlite::params;
use serde::{Deserialize, Serialize};

/// A user following a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionFollow {
    pub id: i64,
    pub user_id: i64,
    pub question_id: i64,
}

impl QuestionFollow {
    /// Convert an AssociationRow to a QuestionFollow.
    pub fn from_row(row: AssociationRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            question_id: row.question_id,
        }
    }

    /// Get a follow record by ID.
    pub fn find_by_id(conn: &mut Connection, id: i64) -> Result<Option<QuestionFollow>> {
        let row = conn.query_optional(
            "SELECT * FROM question_follows WHERE id = ?",
            params![id],
            AssociationRow::from_row,
        )?;
        Ok(row.map(QuestionFollow::from_row))
    }

    /// Up to `n` questions ordered by follower count, highest first.
    ///
    /// Questions nobody follows never appear. Equal counts keep id order.
    pub fn most_followed_questions(conn: &mut Connection, n: usize) -> Result<Vec<Question>> {
        let limit = i64::try_from(n).unwrap_or(i64::MAX);
        let rows = conn.query(
            "SELECT questions.*
             FROM questions
             JOIN question_follows ON questions.id = question_follows.question_id
             GROUP BY questions.id
             ORDER BY COUNT(*) DESC, questions.id
             LIMIT ?",
            params![limit],
            QuestionRow::from_row,
        )?;
        Ok(rows.into_iter().map(Question::from_row).collect())
    }

    /// Users following `question_id`. An unsaved question has none.
    pub fn followers_for_question_id(
        conn: &mut Connection,
        question_id: Option<i64>,
    ) -> Result<Vec<User>> {
        let rows = conn.query(
            "SELECT users.*
             FROM users
             JOIN question_follows ON users.id = question_follows.user_id
             WHERE question_follows.question_id = ?",
            params![question_id],
            UserRow::from_row,
        )?;
        Ok(rows.into_iter().map(User::from_row).collect())
    }

    /// Questions followed by `user_id`. An unsaved user follows nothing.
    pub fn followed_questions_for_user_id(
        conn: &mut Connection,
        user_id: Option<i64>,
    ) -> Result<Vec<Question>> {
        let rows = conn.query(
            "SELECT questions.*
             FROM questions
             JOIN question_follows ON questions.id = question_follows.question_id
             WHERE question_follows.user_id = ?",
            params![user_id],
            QuestionRow::from_row,
        )?;
        Ok(rows.into_iter().map(Question::from_row).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema::Schema;

    fn seeded() -> Connection {
        let mut conn = Connection::open_in_memory().unwrap();
        Schema::init(&mut conn).unwrap();
        Schema::seed(&mut conn).unwrap();
        conn
    }

    fn ids(questions: &[Question]) -> Vec<i64> {
        questions.iter().filter_map(|q| q.id).collect()
    }

    #[test]
    fn test_find_by_id() {
        let mut conn = seeded();

        let follow = QuestionFollow::find_by_id(&mut conn, 2).unwrap().unwrap();
        assert_eq!(follow.user_id, 3);
        assert_eq!(follow.question_id, 1);
        assert!(QuestionFollow::find_by_id(&mut conn, 50).unwrap().is_none());
    }

    #[test]
    fn test_most_followed_questions() {
        let mut conn = seeded();

        // Follow counts in the seed: Q1 = 3, Q2 = 1, Q3 = 1.
        let top = QuestionFollow::most_followed_questions(&mut conn, 1).unwrap();
        assert_eq!(ids(&top), vec![1]);

        let all = QuestionFollow::most_followed_questions(&mut conn, 10).unwrap();
        assert_eq!(ids(&all), vec![1, 2, 3]);

        assert!(QuestionFollow::most_followed_questions(&mut conn, 0)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_unfollowed_question_never_ranked() {
        let mut conn = seeded();
        let mut lonely = Question::new("Lonely", "Anyone?", 1);
        let lonely_id = lonely.create(&mut conn).unwrap();

        let all = QuestionFollow::most_followed_questions(&mut conn, 100).unwrap();
        assert!(!ids(&all).contains(&lonely_id));
    }

    #[test]
    fn test_followers_for_question_id() {
        let mut conn = seeded();

        let followers = QuestionFollow::followers_for_question_id(&mut conn, Some(1)).unwrap();
        let names: Vec<&str> = followers.iter().map(|u| u.fname.as_str()).collect();
        assert_eq!(names, vec!["Ada", "Grace", "Alan"]);

        assert!(QuestionFollow::followers_for_question_id(&mut conn, None)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_followed_questions_for_user_id() {
        let mut conn = seeded();

        let followed =
            QuestionFollow::followed_questions_for_user_id(&mut conn, Some(1)).unwrap();
        assert_eq!(ids(&followed), vec![1, 2]);

        assert!(
            QuestionFollow::followed_questions_for_user_id(&mut conn, Some(99))
                .unwrap()
                .is_empty()
        );
    }
}
