//! # aaq - Q&A data-access layer
//!
//! Maps the rows of a SQLite Q&A database (users, questions, threaded
//! replies, follows and likes) to typed entities and back, plus the
//! aggregate queries that rank questions by likes and followers.
//!
//! Every operation takes the storage handle explicitly:
//!
//! ```no_run
//! use aaq::{Connection, Schema, User};
//!
//! let mut conn = Connection::open("questions.db")?;
//! Schema::init(&mut conn)?;
//! let mut ada = User::new("Ada", "Lovelace");
//! ada.create(&mut conn)?;
//! let same = User::find_by_name(&mut conn, "Ada", "Lovelace")?;
//! assert_eq!(same, vec![ada]);
//! # Ok::<(), aaq::Error>(())
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod error;

// Re-export commonly used types
pub use core::{Question, QuestionFollow, QuestionLike, Reply, ReplyThread, User};
pub use error::{Error, Result};

pub use config::StoreConfig;
pub use db::{Connection, DbPath, Schema};
