//! Output formatting for the CLI.

use crate::core::{Question, Reply, ReplyThread, User};
use anyhow::Result;
use serde::Serialize;

/// A user together with the questions around them.
#[derive(Debug, Serialize)]
pub struct UserDetail {
    pub user: User,
    pub questions: Vec<Question>,
    pub replies: usize,
    pub followed: Vec<Question>,
    pub liked: Vec<Question>,
}

/// A question together with its author and audience.
#[derive(Debug, Serialize)]
pub struct QuestionDetail {
    pub question: Question,
    pub author: Option<User>,
    pub num_likes: i64,
    pub followers: Vec<User>,
    pub replies: Vec<Reply>,
}

#[derive(Serialize)]
struct ThreadEntry<'a> {
    depth: usize,
    #[serde(flatten)]
    reply: &'a Reply,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
}

impl Format {
    pub fn users(self, users: &[User]) -> Result<()> {
        match self {
            Format::Json => print_json(&users),
            Format::Text => {
                if users.is_empty() {
                    println!("No users");
                }
                for user in users {
                    println!("{}", user_line(user));
                }
                Ok(())
            }
        }
    }

    pub fn questions(self, questions: &[Question]) -> Result<()> {
        match self {
            Format::Json => print_json(&questions),
            Format::Text => {
                if questions.is_empty() {
                    println!("No questions");
                }
                for question in questions {
                    println!("{}", question_line(question));
                }
                Ok(())
            }
        }
    }

    pub fn user(self, detail: &UserDetail) -> Result<()> {
        if self == Format::Json {
            return print_json(detail);
        }

        println!("{}", user_line(&detail.user));
        println!("Replies:   {}", detail.replies);
        print_section("Asked", &detail.questions);
        print_section("Follows", &detail.followed);
        print_section("Liked", &detail.liked);
        Ok(())
    }

    pub fn question(self, detail: &QuestionDetail) -> Result<()> {
        if self == Format::Json {
            return print_json(detail);
        }

        let q = &detail.question;
        println!("{}", question_line(q));
        println!("{}", q.body);
        println!();
        match &detail.author {
            Some(author) => println!("Author:    {} {}", author.fname, author.lname),
            None => println!("Author:    #{} (missing)", q.author_id),
        }
        println!("Likes:     {}", detail.num_likes);
        println!("Followers: {}", detail.followers.len());
        println!("Replies:   {}", detail.replies.len());
        Ok(())
    }

    pub fn thread(self, thread: &ReplyThread) -> Result<()> {
        let walked = thread.walk();
        if self == Format::Json {
            let entries: Vec<ThreadEntry> = walked
                .into_iter()
                .map(|(depth, reply)| ThreadEntry { depth, reply })
                .collect();
            return print_json(&entries);
        }

        if walked.is_empty() {
            println!("No replies to #{}", thread.question_id());
        }
        for (depth, reply) in walked {
            println!(
                "{indent}[{id}] (user {author}) {body}",
                indent = "  ".repeat(depth),
                id = reply.id,
                author = reply.author_id,
                body = reply.body,
            );
        }
        Ok(())
    }

    /// Report a newly created entity: its id in text mode, the object in JSON.
    pub fn created<T: Serialize>(self, entity: &T, id: Option<i64>) -> Result<()> {
        match self {
            Format::Json => print_json(entity),
            Format::Text => {
                println!("{}", id.unwrap_or_default());
                Ok(())
            }
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_section(label: &str, questions: &[Question]) {
    println!("{label}:");
    if questions.is_empty() {
        println!("  (none)");
    }
    for question in questions {
        println!("  {}", question_line(question));
    }
}

fn user_line(user: &User) -> String {
    format!(
        "[{}] {} {}",
        user.id.unwrap_or_default(),
        user.fname,
        user.lname
    )
}

fn question_line(question: &Question) -> String {
    format!(
        "[{}] {} (by user {})",
        question.id.unwrap_or_default(),
        question.title,
        question.author_id
    )
}
